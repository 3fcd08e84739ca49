//! Connection configuration: which server route the client talks to.

use clap::ValueEnum;

use crate::error::ClientError;

/// Default `host[:port]` the client connects to
pub const DEFAULT_HOST: &str = "127.0.0.1:8080";

/// Known server chat routes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Endpoint {
    /// General-purpose assistant chat
    #[default]
    Chat,
    /// Airline customer-service chat
    Airline,
}

impl Endpoint {
    /// Route path served for this endpoint
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Chat => "/chat",
            Endpoint::Airline => "/websocket-chat",
        }
    }
}

/// Resolved client configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    url: String,
}

impl ClientConfig {
    /// Build `ws://<host>/<path>`.
    ///
    /// A missing leading slash on `path` is added.
    pub fn new(host: &str, path: &str) -> Result<Self, ClientError> {
        let host = host.trim();
        if host.is_empty() || host.contains("://") || host.contains('/') {
            return Err(ClientError::InvalidUrl(host.to_string()));
        }

        let path = path.trim();
        let url = if path.starts_with('/') {
            format!("ws://{}{}", host, path)
        } else {
            format!("ws://{}/{}", host, path)
        };

        Ok(Self { url })
    }

    /// Build the URL for one of the known endpoints.
    pub fn for_endpoint(host: &str, endpoint: Endpoint) -> Result<Self, ClientError> {
        Self::new(host, endpoint.path())
    }

    /// Use a full URL as given. Only `ws://` and `wss://` are accepted.
    pub fn from_url(url: &str) -> Result<Self, ClientError> {
        let url = url.trim();
        let authority = url
            .strip_prefix("ws://")
            .or_else(|| url.strip_prefix("wss://"))
            .ok_or_else(|| ClientError::InvalidUrl(url.to_string()))?;

        if authority.is_empty() || authority.starts_with('/') {
            return Err(ClientError::InvalidUrl(url.to_string()));
        }

        Ok(Self {
            url: url.to_string(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}
