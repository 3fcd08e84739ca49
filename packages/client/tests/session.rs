//! Session tests against an in-process WebSocket server.

use std::{future::Future, net::SocketAddr, sync::Arc, time::Duration};

use chatterm_client::{
    ClientError, SessionOutcome,
    client::{CONNECTION_ERROR_MESSAGE, DISCONNECTED_MESSAGE, WELCOME_MESSAGE},
    domain::{ClientEvent, KeyPress, Sender},
    run_session,
    view::MessageLog,
};
use chatterm_shared::time::FixedClock;
use futures_util::{SinkExt, StreamExt};
use tokio::{
    net::{TcpListener, TcpStream},
    sync::mpsc,
};
use tokio_tungstenite::{WebSocketStream, tungstenite::protocol::Message};

const INPUT_DELAY: Duration = Duration::from_millis(300);

/// Accept exactly one WebSocket connection and hand it to `handler`
async fn start_server<F, Fut>(handler: F) -> SocketAddr
where
    F: FnOnce(WebSocketStream<TcpStream>) -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test server");
    let addr = listener.local_addr().expect("Failed to read local address");

    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.expect("Failed to accept");
        let ws = tokio_tungstenite::accept_async(stream)
            .await
            .expect("Failed to complete handshake");
        handler(ws).await;
    });

    addr
}

fn url(addr: SocketAddr) -> String {
    format!("ws://{}/chat", addr)
}

/// Run a session, feeding `inputs` after the connection had time to open
async fn run_with_inputs(url: &str, inputs: Vec<ClientEvent>) -> SessionOutcome<MessageLog> {
    let (events_tx, events_rx) = mpsc::unbounded_channel();

    let input_tx = events_tx.clone();
    tokio::spawn(async move {
        if inputs.is_empty() {
            return;
        }
        tokio::time::sleep(INPUT_DELAY).await;
        for event in inputs {
            if input_tx.send(event).is_err() {
                break;
            }
        }
    });

    let session = run_session(
        url,
        MessageLog::default(),
        Arc::new(FixedClock::new(1672498800000)),
        events_tx,
        events_rx,
    );

    tokio::time::timeout(Duration::from_secs(10), session)
        .await
        .expect("Session did not finish")
}

fn typed(text: &str) -> Vec<ClientEvent> {
    vec![
        ClientEvent::InputChanged(text.to_string()),
        ClientEvent::KeyPressed(KeyPress::enter()),
    ]
}

fn entries(log: &MessageLog) -> Vec<(Sender, String)> {
    log.messages()
        .iter()
        .map(|m| (m.sender, m.text.clone()))
        .collect()
}

#[tokio::test]
async fn test_conversation_round_trip() {
    // テスト項目: 送信した行が 1 フレームとして届き、応答が Bot として表示される
    // given (前提条件):
    let (frames_tx, mut frames_rx) = mpsc::unbounded_channel::<String>();
    let addr = start_server(move |mut ws| async move {
        while let Some(Ok(message)) = ws.next().await {
            if let Message::Text(text) = message {
                frames_tx.send(text.as_str().to_owned()).ok();
                ws.send(Message::Text("hi there".into())).await.ok();
                ws.close(None).await.ok();
            }
        }
    })
    .await;

    // when (操作):
    let outcome = run_with_inputs(&url(addr), typed("hello")).await;

    // then (期待する結果):
    assert_eq!(
        entries(&outcome.view),
        vec![
            (Sender::System, WELCOME_MESSAGE.to_string()),
            (Sender::You, "hello".to_string()),
            (Sender::Bot, "hi there".to_string()),
            (Sender::System, DISCONNECTED_MESSAGE.to_string()),
        ]
    );
    assert_eq!(outcome.result, Err(ClientError::ConnectionClosed));
    assert_eq!(frames_rx.recv().await, Some("hello".to_string()));
    assert!(outcome.view.is_at_bottom());
}

#[tokio::test]
async fn test_blank_lines_are_not_sent() {
    // テスト項目: 空白のみの入力は送信されず、次の有効な入力だけが届く
    // given (前提条件):
    let (frames_tx, mut frames_rx) = mpsc::unbounded_channel::<String>();
    let addr = start_server(move |mut ws| async move {
        while let Some(Ok(message)) = ws.next().await {
            if let Message::Text(text) = message {
                frames_tx.send(text.as_str().to_owned()).ok();
                ws.close(None).await.ok();
            }
        }
    })
    .await;
    let mut inputs = typed("   ");
    inputs.extend(typed("\t"));
    inputs.extend(typed("  real message  "));

    // when (操作):
    let outcome = run_with_inputs(&url(addr), inputs).await;

    // then (期待する結果):
    assert_eq!(frames_rx.recv().await, Some("real message".to_string()));
    assert_eq!(frames_rx.recv().await, None);
    let sent: Vec<_> = entries(&outcome.view)
        .into_iter()
        .filter(|(sender, _)| *sender == Sender::You)
        .collect();
    assert_eq!(sent, vec![(Sender::You, "real message".to_string())]);
}

#[tokio::test]
async fn test_frames_are_shown_in_arrival_order() {
    // テスト項目: 受信したフレームが受信順に 1 件ずつ表示される
    // given (前提条件):
    let addr = start_server(|mut ws| async move {
        for frame in ["one", "two\nlines", "three"] {
            ws.send(Message::Text(frame.into())).await.ok();
        }
        ws.close(None).await.ok();
        while ws.next().await.is_some() {}
    })
    .await;

    // when (操作):
    let outcome = run_with_inputs(&url(addr), Vec::new()).await;

    // then (期待する結果):
    let bot: Vec<String> = entries(&outcome.view)
        .into_iter()
        .filter(|(sender, _)| *sender == Sender::Bot)
        .map(|(_, text)| text)
        .collect();
    assert_eq!(bot, vec!["one", "two\nlines", "three"]);
}

#[tokio::test]
async fn test_server_close_is_reported_once() {
    // テスト項目: サーバーからの切断で Disconnected の通知が 1 件だけ表示され、再接続しない
    // given (前提条件):
    let addr = start_server(|mut ws| async move {
        ws.close(None).await.ok();
        while ws.next().await.is_some() {}
    })
    .await;

    // when (操作):
    let outcome = run_with_inputs(&url(addr), Vec::new()).await;

    // then (期待する結果):
    assert_eq!(
        entries(&outcome.view),
        vec![
            (Sender::System, WELCOME_MESSAGE.to_string()),
            (Sender::System, DISCONNECTED_MESSAGE.to_string()),
        ]
    );
    assert_eq!(outcome.result, Err(ClientError::ConnectionClosed));
}

#[tokio::test]
async fn test_connection_refused() {
    // テスト項目: 接続できない場合はエラーと切断の通知が表示され、ConnectionError で終了する
    // given (前提条件):
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    // when (操作):
    let outcome = run_with_inputs(&url(addr), Vec::new()).await;

    // then (期待する結果):
    assert_eq!(
        entries(&outcome.view),
        vec![
            (Sender::System, CONNECTION_ERROR_MESSAGE.to_string()),
            (Sender::System, DISCONNECTED_MESSAGE.to_string()),
        ]
    );
    assert!(matches!(outcome.result, Err(ClientError::ConnectionError(_))));
}

#[tokio::test]
async fn test_abrupt_disconnect_ends_session() {
    // テスト項目: クローズハンドシェイクなしで切断されてもセッションが終了し、通知が表示される
    // given (前提条件):
    let addr = start_server(|ws| async move {
        drop(ws);
    })
    .await;

    // when (操作):
    let outcome = run_with_inputs(&url(addr), Vec::new()).await;

    // then (期待する結果):
    let log = entries(&outcome.view);
    assert_eq!(log.first(), Some(&(Sender::System, WELCOME_MESSAGE.to_string())));
    assert_eq!(
        log.last(),
        Some(&(Sender::System, DISCONNECTED_MESSAGE.to_string()))
    );
    assert!(outcome.result.is_err());
}

#[tokio::test]
async fn test_user_quit_ends_session_quietly() {
    // テスト項目: ユーザーが終了するとクローズハンドシェイク後に Ok で終了し、切断通知は表示されない
    // given (前提条件):
    let addr = start_server(|mut ws| async move {
        while ws.next().await.is_some() {}
    })
    .await;

    // when (操作):
    let outcome = run_with_inputs(&url(addr), vec![ClientEvent::QuitRequested]).await;

    // then (期待する結果):
    assert_eq!(outcome.result, Ok(()));
    assert_eq!(
        entries(&outcome.view),
        vec![(Sender::System, WELCOME_MESSAGE.to_string())]
    );
}

#[tokio::test]
async fn test_user_quit_while_handshake_pending() {
    // テスト項目: ハンドシェイクが完了しない間でもユーザーの終了要求で Ok として終了する
    // given (前提条件):
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        // Accept TCP but never answer the upgrade request
        let (_stream, _) = listener.accept().await.unwrap();
        tokio::time::sleep(Duration::from_secs(60)).await;
    });
    let (events_tx, events_rx) = mpsc::unbounded_channel();
    events_tx.send(ClientEvent::QuitRequested).unwrap();

    // when (操作):
    let server_url = url(addr);
    let session = run_session(
        &server_url,
        MessageLog::default(),
        Arc::new(FixedClock::new(1672498800000)),
        events_tx,
        events_rx,
    );
    let outcome = tokio::time::timeout(Duration::from_secs(5), session)
        .await
        .expect("Session ignored the quit request while connecting");

    // then (期待する結果):
    assert_eq!(outcome.result, Ok(()));
    assert!(outcome.view.is_empty());
}

#[tokio::test]
async fn test_input_before_open_is_not_sent() {
    // テスト項目: 接続確立前に入力された行は送信されない
    // given (前提条件):
    let (frames_tx, mut frames_rx) = mpsc::unbounded_channel::<String>();
    let addr = start_server(move |mut ws| async move {
        ws.close(None).await.ok();
        while let Some(Ok(message)) = ws.next().await {
            if let Message::Text(text) = message {
                frames_tx.send(text.as_str().to_owned()).ok();
            }
        }
    })
    .await;
    let (events_tx, events_rx) = mpsc::unbounded_channel();
    for event in typed("too early") {
        events_tx.send(event).unwrap();
    }

    // when (操作):
    let server_url = url(addr);
    let session = run_session(
        &server_url,
        MessageLog::default(),
        Arc::new(FixedClock::new(1672498800000)),
        events_tx,
        events_rx,
    );
    let outcome = tokio::time::timeout(Duration::from_secs(10), session)
        .await
        .expect("Session did not finish");

    // then (期待する結果):
    assert_eq!(frames_rx.recv().await, None);
    assert!(
        entries(&outcome.view)
            .iter()
            .all(|(sender, _)| *sender != Sender::You)
    );
    assert_eq!(outcome.result, Err(ClientError::ConnectionClosed));
}
