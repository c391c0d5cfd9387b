// src/test_support.rs
// DOCUMENTATION: Helpers shared by unit tests
// PURPOSE: Canned-response HTTP server and ready-made sessions

use crate::client::ApiClient;
use crate::models::{Session, User, UserRole};
use crate::session::SessionContext;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Notify;

/// HTTP server answering one connection per canned response, in order
pub(crate) struct StubServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl StubServer {
    /// Raw requests received so far (head and body)
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

pub(crate) async fn stub_server(responses: Vec<(u16, &'static str)>) -> StubServer {
    serve(responses, None).await
}

/// Like `stub_server`, but each response waits for a `gate` notification
pub(crate) async fn stub_server_gated(
    responses: Vec<(u16, &'static str)>,
    gate: Arc<Notify>,
) -> StubServer {
    serve(responses, Some(gate)).await
}

async fn serve(responses: Vec<(u16, &'static str)>, gate: Option<Arc<Notify>>) -> StubServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let log = requests.clone();

    tokio::spawn(async move {
        for (status, body) in responses {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };
            let request = read_request(&mut socket).await;
            log.lock().unwrap().push(request);
            if let Some(gate) = &gate {
                gate.notified().await;
            }

            let response = format!(
                "HTTP/1.1 {} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    });

    StubServer {
        base_url: format!("http://{}", addr),
        requests,
    }
}

async fn read_request(socket: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    loop {
        let n = socket.read(&mut chunk).await.unwrap_or(0);
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&buf[..pos]).to_string();
            let content_length = head
                .lines()
                .filter_map(|line| {
                    let lower = line.to_ascii_lowercase();
                    lower
                        .strip_prefix("content-length:")
                        .and_then(|v| v.trim().parse::<usize>().ok())
                })
                .next()
                .unwrap_or(0);
            if buf.len() >= pos + 4 + content_length {
                break;
            }
        }
    }

    String::from_utf8_lossy(&buf).to_string()
}

pub(crate) fn session(user_id: i64, role: UserRole) -> Session {
    Session {
        token: "jwt-token".to_string(),
        user: User {
            id: user_id,
            username: format!("user{}", user_id),
            email: format!("user{}@example.com", user_id),
            role,
            avatar_url: None,
            created_at: None,
        },
    }
}

/// Client against `base_url` with an optional signed-in user
pub(crate) async fn client_for(base_url: &str, signed_in: Option<Session>) -> ApiClient {
    let context = SessionContext::anonymous();
    if let Some(session) = signed_in {
        context.login(session).await.unwrap();
    }
    ApiClient::new(reqwest::Client::new(), base_url, context)
}
