// Reconnecting query client - live instant queries over a self-healing WebSocket
use crate::domain::protocol::{ClientMessage, ServerMessage};
use crate::domain::snapshot::Snapshot;
use crate::infrastructure::retry::ReconnectPolicy;
use chrono::{DateTime, Utc};
use futures::{SinkExt, StreamExt};
use std::collections::VecDeque;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_stream::wrappers::WatchStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connected,
    Disconnected,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClientError {
    #[error("not connected")]
    NotConnected,
    #[error("connection lost before the response arrived")]
    ConnectionLost,
    #[error("no response within {0:?}")]
    Timeout(Duration),
    #[error("query client has shut down")]
    Closed,
}

type Reply = oneshot::Sender<Result<Option<Snapshot>, ClientError>>;

struct PendingQuery {
    instant: DateTime<Utc>,
    reply: Reply,
}

/// Handle to the background connection task. Queries are independent;
/// nothing is replayed after a reconnect.
pub struct QueryClient {
    requests: mpsc::Sender<PendingQuery>,
    state: watch::Receiver<ConnectionState>,
    request_timeout: Duration,
    task: JoinHandle<()>,
}

impl QueryClient {
    pub fn spawn(socket_url: impl Into<String>, reconnect: ReconnectPolicy, request_timeout: Duration) -> Self {
        let (requests, requests_rx) = mpsc::channel(32);
        let (state_tx, state) = watch::channel(ConnectionState::Disconnected);

        let connection = Connection {
            url: socket_url.into(),
            reconnect,
            request_timeout,
            requests: requests_rx,
            state: state_tx,
        };
        let task = tokio::spawn(connection.run());

        Self {
            requests,
            state,
            request_timeout,
            task,
        }
    }

    pub fn state(&self) -> ConnectionState {
        *self.state.borrow()
    }

    pub fn is_connected(&self) -> bool {
        self.state() == ConnectionState::Connected
    }

    /// Connected / disconnected signal
    pub fn state_changes(&self) -> WatchStream<ConnectionState> {
        WatchStream::new(self.state.clone())
    }

    pub async fn wait_connected(&self) -> Result<(), ClientError> {
        let mut state = self.state.clone();
        state
            .wait_for(|s| *s == ConnectionState::Connected)
            .await
            .map(|_| ())
            .map_err(|_| ClientError::Closed)
    }

    /// The snapshot at-or-before `instant`. Fails fast while disconnected.
    pub async fn query(&self, instant: DateTime<Utc>) -> Result<Option<Snapshot>, ClientError> {
        if !self.is_connected() {
            return Err(ClientError::NotConnected);
        }

        let (reply, response) = oneshot::channel();
        self.requests
            .send(PendingQuery { instant, reply })
            .await
            .map_err(|_| ClientError::Closed)?;

        match tokio::time::timeout(self.request_timeout, response).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(ClientError::ConnectionLost),
            Err(_) => Err(ClientError::Timeout(self.request_timeout)),
        }
    }

    /// Close the socket and stop reconnecting
    pub async fn shutdown(self) {
        let Self { requests, task, .. } = self;
        drop(requests);
        let _ = task.await;
    }
}

enum Ended {
    Dropped,
    Shutdown,
}

/// Owns the socket. Runs Disconnected -> Connected -> Disconnected -> ... until
/// every `QueryClient` handle is gone. A query left unanswered for
/// `request_timeout` counts as a dead link.
struct Connection {
    url: String,
    reconnect: ReconnectPolicy,
    request_timeout: Duration,
    requests: mpsc::Receiver<PendingQuery>,
    state: watch::Sender<ConnectionState>,
}

impl Connection {
    async fn run(mut self) {
        let mut failed_attempts = 0;

        loop {
            let Some(attempt) = self.reject_until(connect_async(self.url.clone())).await else {
                return;
            };

            match attempt {
                Ok((ws, _)) => {
                    failed_attempts = 0;
                    tracing::info!("Connected to {}", self.url);
                    self.state.send_replace(ConnectionState::Connected);

                    let ended = self.serve(ws).await;
                    self.state.send_replace(ConnectionState::Disconnected);

                    match ended {
                        Ended::Shutdown => return,
                        // reconnect right away
                        Ended::Dropped => tracing::warn!("Connection to {} lost, reconnecting", self.url),
                    }
                }
                Err(e) => {
                    failed_attempts += 1;
                    let delay = self.reconnect.delay_for(failed_attempts);
                    tracing::warn!("Connecting to {} failed ({}), next attempt in {:?}", self.url, e, delay);

                    if self.reject_until(tokio::time::sleep(delay)).await.is_none() {
                        return;
                    }
                }
            }
        }
    }

    /// Drive `fut` to completion while failing every query that arrives meanwhile.
    /// None once all client handles are dropped.
    async fn reject_until<F: Future>(&mut self, fut: F) -> Option<F::Output> {
        tokio::pin!(fut);
        loop {
            tokio::select! {
                out = &mut fut => return Some(out),
                request = self.requests.recv() => match request {
                    Some(q) => {
                        let _ = q.reply.send(Err(ClientError::NotConnected));
                    }
                    None => return None,
                },
            }
        }
    }

    async fn serve(&mut self, mut ws: WsStream) -> Ended {
        // the server answers in order, so replies are owed oldest first
        let mut in_flight: VecDeque<(Instant, Reply)> = VecDeque::new();

        loop {
            let stalled_at = in_flight.front().map(|(sent, _)| *sent + self.request_timeout);

            tokio::select! {
                incoming = ws.next() => match incoming {
                    Some(Ok(Message::Text(text))) => match ServerMessage::decode(text.as_str()) {
                        Ok(ServerMessage::InstantData { data }) => match in_flight.pop_front() {
                            Some((_, reply)) => {
                                let _ = reply.send(Ok(data));
                            }
                            None => tracing::debug!("Dropping unsolicited instant data"),
                        },
                        Err(e) => tracing::warn!("Ignoring server message: {}", e),
                    },
                    Some(Ok(Message::Close(_))) | None => return Ended::Dropped,
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::warn!("WebSocket read failed: {}", e);
                        return Ended::Dropped;
                    }
                },
                request = self.requests.recv() => match request {
                    Some(PendingQuery { instant, reply }) => {
                        let text = ClientMessage::InstantData { instant }.encode();
                        if let Err(e) = ws.send(Message::text(text)).await {
                            tracing::warn!("WebSocket write failed: {}", e);
                            let _ = reply.send(Err(ClientError::ConnectionLost));
                            return Ended::Dropped;
                        }
                        in_flight.push_back((Instant::now(), reply));
                    }
                    None => {
                        let _ = ws.close(None).await;
                        return Ended::Shutdown;
                    }
                },
                _ = tokio::time::sleep_until(stalled_at.unwrap_or_else(Instant::now)), if stalled_at.is_some() => {
                    tracing::warn!(
                        "No response from {} within {:?}, dropping connection",
                        self.url,
                        self.request_timeout
                    );
                    return Ended::Dropped;
                }
            }
        }
    }
}
