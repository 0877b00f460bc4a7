//! HttpCandleSource against a throwaway local HTTP server

use signal_engine::prelude::*;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Serve one canned response per connection, recording the request head.
async fn serve(status_line: &'static str, body: String) -> (SocketAddr, Arc<Mutex<Vec<String>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let seen = requests.clone();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let mut buf = vec![0u8; 8192];
            let n = socket.read(&mut buf).await.unwrap_or(0);
            seen.lock()
                .unwrap()
                .push(String::from_utf8_lossy(&buf[..n]).to_string());

            let response = format!(
                "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    });

    (addr, requests)
}

fn request_for(addr: SocketAddr) -> CandleRequest {
    CandleRequest {
        url: format!("http://{}/v2/market/candle/intraday", addr),
        access_token: Some("test-token".to_string()),
        window: 3,
        timeout: Duration::from_secs(2),
        ..CandleRequest::default()
    }
}

#[tokio::test]
async fn test_success_normalizes_and_keeps_recent_window() {
    let body = serde_json::json!({
        "status": "success",
        "data": {
            "candles": [
                ["2024-03-04T09:35:00+05:30", 5, 5, 5, 5, 0, 0],
                ["2024-03-04T09:30:00+05:30", 4, 4, 4, 4, 0, 0],
                ["2024-03-04T09:25:00+05:30", 3, 3, 3, 3, 0, 0],
                ["2024-03-04T09:20:00+05:30", 2, 2, 2, 2, 0, 0],
                ["2024-03-04T09:15:00+05:30", 1, 1, 1, 1, 0, 0]
            ]
        }
    })
    .to_string();
    let (addr, requests) = serve("200 OK", body).await;
    let source = HttpCandleSource::new(request_for(addr)).unwrap();

    let candles = source.fetch_candles().await;

    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
    assert_eq!(closes, vec![3.0, 4.0, 5.0]);

    let requests = requests.lock().unwrap();
    let head = requests[0].to_lowercase();
    assert!(head.contains("instrument_key=bse_index%7csensex"));
    assert!(head.contains("interval=5minute"));
    assert!(head.contains("authorization: bearer test-token"));
}

#[tokio::test]
async fn test_non_2xx_yields_empty_sequence() {
    let (addr, _) = serve("500 Internal Server Error", r#"{"status":"error"}"#.to_string()).await;
    let source = HttpCandleSource::new(request_for(addr)).unwrap();

    assert!(matches!(
        source.try_fetch().await,
        Err(FetchError::Status { status: 500, .. })
    ));
    assert!(source.fetch_candles().await.is_empty());
}

#[tokio::test]
async fn test_malformed_body_yields_empty_sequence() {
    let (addr, _) = serve("200 OK", r#"{"data": {"candles": [["bad"]]}}"#.to_string()).await;
    let source = HttpCandleSource::new(request_for(addr)).unwrap();

    assert!(source.fetch_candles().await.is_empty());
}

#[tokio::test]
async fn test_unreachable_host_yields_empty_sequence() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let source = HttpCandleSource::new(request_for(addr)).unwrap();

    assert!(matches!(source.try_fetch().await, Err(FetchError::Transport(_))));
    assert!(source.fetch_candles().await.is_empty());
}

#[tokio::test]
async fn test_hung_upstream_times_out() {
    // accept and hold connections open without ever answering
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });
    let source = HttpCandleSource::new(CandleRequest {
        timeout: Duration::from_millis(300),
        ..request_for(addr)
    })
    .unwrap();

    match source.try_fetch().await {
        Err(FetchError::Transport(e)) => assert!(e.is_timeout(), "expected timeout, got {}", e),
        other => panic!("expected transport timeout, got {:?}", other),
    }
    assert!(source.fetch_candles().await.is_empty());
}
