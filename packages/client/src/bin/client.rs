//! Terminal WebSocket chat client.
//!
//! Connects to a chat server, sends each entered line as one text frame and
//! prints every frame the server sends back. The connection is never
//! re-established: restart the client after a disconnect.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin chatterm-client
//! cargo run --bin chatterm-client -- --endpoint airline --host 127.0.0.1:8080
//! cargo run --bin chatterm-client -- --url wss://chat.example.com/chat
//! ```

use clap::Parser;

use chatterm_client::{ClientConfig, ClientError, Endpoint, config::DEFAULT_HOST, run_client};
use chatterm_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "chatterm-client")]
#[command(about = "Terminal chat client over a single WebSocket connection", long_about = None)]
struct Args {
    /// Server host and port
    #[arg(short = 'H', long, default_value = DEFAULT_HOST)]
    host: String,

    /// Chat route on the server
    #[arg(short = 'e', long, value_enum, default_value_t = Endpoint::Chat)]
    endpoint: Endpoint,

    /// Custom route path (overrides --endpoint)
    #[arg(short = 'p', long)]
    path: Option<String>,

    /// Full WebSocket URL (overrides --host, --endpoint and --path)
    #[arg(short = 'u', long)]
    url: Option<String>,
}

impl Args {
    fn config(&self) -> Result<ClientConfig, ClientError> {
        match (&self.url, &self.path) {
            (Some(url), _) => ClientConfig::from_url(url),
            (None, Some(path)) => ClientConfig::new(&self.host, path),
            (None, None) => ClientConfig::for_endpoint(&self.host, self.endpoint),
        }
    }
}

#[tokio::main]
async fn main() {
    // Chat output shares the terminal, so only warnings and errors by default
    setup_logger(env!("CARGO_BIN_NAME"), "warn");

    let args = Args::parse();

    let config = match args.config() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(2);
        }
    };

    match run_client(config).await {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            tracing::error!("Client error: {}", e);
            std::process::exit(1);
        }
    }
}
