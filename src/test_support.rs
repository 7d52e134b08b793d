// src/test_support.rs
// =============================================================================
// Hand-rolled HTTP servers for tests that wiremock can't express: bodies
// that trickle in, stop halfway, or stall, and servers that count how many
// requests they are answering at the same moment.
//
// Each answer carries `Connection: close`, so the client opens a fresh
// connection per request and one connection means one request in flight.
// =============================================================================

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// What the scripted server does once its chunks are written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AfterBody {
    /// Close the connection
    Close,
    /// Keep the connection open without sending anything else
    Stall,
}

/// Answers one request with `Content-Length: declared_len`, then writes
/// `chunks` with `gap` between them. Returns the server's base URL.
pub(crate) async fn serve_script(
    declared_len: usize,
    chunks: Vec<Vec<u8>>,
    gap: Duration,
    after: AfterBody,
) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());

    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        read_request(&mut stream).await;

        let head = format!(
            "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            declared_len
        );
        stream.write_all(head.as_bytes()).await.unwrap();
        stream.flush().await.unwrap();

        for (i, chunk) in chunks.iter().enumerate() {
            if i > 0 {
                tokio::time::sleep(gap).await;
            }
            // The client may already have given up
            if stream.write_all(chunk).await.is_err() {
                return;
            }
            let _ = stream.flush().await;
        }

        if after == AfterBody::Stall {
            tokio::time::sleep(Duration::from_secs(60)).await;
        }
    });

    base
}

/// Answers every request with `body` after `delay`, and records the
/// largest number of requests it was answering at once.
pub(crate) async fn serve_counting(delay: Duration, body: Vec<u8>) -> (String, Arc<AtomicUsize>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    let active = Arc::new(AtomicUsize::new(0));
    let peak = Arc::new(AtomicUsize::new(0));

    let peak_seen = Arc::clone(&peak);
    tokio::spawn(async move {
        loop {
            let Ok((mut stream, _)) = listener.accept().await else {
                return;
            };
            let active = Arc::clone(&active);
            let peak = Arc::clone(&peak_seen);
            let body = body.clone();

            tokio::spawn(async move {
                read_request(&mut stream).await;
                let now = active.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);

                tokio::time::sleep(delay).await;
                // Leave the count before answering, the client may reuse
                // its slot as soon as the body arrives
                active.fetch_sub(1, Ordering::SeqCst);

                let head = format!(
                    "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                    body.len()
                );
                let _ = stream.write_all(head.as_bytes()).await;
                let _ = stream.write_all(&body).await;
                let _ = stream.flush().await;
            });
        }
    });

    (base, peak)
}

// Reads until the blank line that ends a GET request's headers
async fn read_request(stream: &mut TcpStream) {
    let mut request = Vec::new();
    let mut buf = [0u8; 1024];
    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut buf).await {
            Ok(0) | Err(_) => return,
            Ok(n) => request.extend_from_slice(&buf[..n]),
        }
    }
}
