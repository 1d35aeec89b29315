//! Mock monitoring backend for integration testing
//!
//! Accepts a single WebSocket client on `127.0.0.1:0` and plays a fixed
//! script of frames at it. The returned report says whether the client sent
//! a Close frame before the connection ended.
//!
//! # Usage Example
//!
//! ```ignore
//! let backend = MockBackend::bind().await;
//! let endpoint = backend.endpoint();
//! let report = backend.serve(vec![Step::Send(wire_transfer_warning()), Step::Close]);
//! ```

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use sentinel_core::Endpoint;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message as WsMessage;

/// One scripted backend action.
#[derive(Debug, Clone)]
pub enum Step {
    /// Push a text frame
    Send(String),
    /// Sleep before the next step
    Pause(Duration),
    /// Close the connection from the backend side
    Close,
    /// Read until the client closes or the stream ends
    AwaitClientClose,
}

/// What the backend observed.
#[derive(Debug, Clone, Default)]
pub struct BackendReport {
    pub client_closed: bool,
}

pub struct MockBackend {
    listener: TcpListener,
    endpoint: Endpoint,
}

impl MockBackend {
    pub async fn bind() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let endpoint = Endpoint::from_parts("127.0.0.1", port, "/").unwrap();
        Self { listener, endpoint }
    }

    pub fn endpoint(&self) -> Endpoint {
        self.endpoint.clone()
    }

    /// Accept one client and run `script` against it.
    pub fn serve(self, script: Vec<Step>) -> JoinHandle<BackendReport> {
        tokio::spawn(async move {
            let (stream, _) = self.listener.accept().await.unwrap();
            let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();
            let mut report = BackendReport::default();

            for step in script {
                match step {
                    Step::Send(text) => {
                        ws.send(WsMessage::Text(text.into())).await.unwrap();
                    }
                    Step::Pause(duration) => tokio::time::sleep(duration).await,
                    Step::Close => {
                        let _ = ws.close(None).await;
                        // Let the client's close reply arrive before the socket drops
                        let _ = tokio::time::timeout(Duration::from_secs(2), async {
                            while let Some(Ok(_)) = ws.next().await {}
                        })
                        .await;
                    }
                    Step::AwaitClientClose => loop {
                        match ws.next().await {
                            Some(Ok(WsMessage::Close(_))) => {
                                report.client_closed = true;
                                break;
                            }
                            Some(Ok(_)) => {}
                            None | Some(Err(_)) => break,
                        }
                    },
                }
            }
            report
        })
    }
}

/// An endpoint nothing listens on.
pub async fn dead_endpoint() -> Endpoint {
    let backend = MockBackend::bind().await;
    backend.endpoint()
}
