//! RealtimeWorker - background WebSocket loop
//!
//! 1. Connect (bearer token on the upgrade request)
//! 2. Decode text frames into order events and broadcast them
//! 3. Keepalive ping; answer server pings
//! 4. On disconnect retry after a fixed delay, giving up after the configured
//!    number of consecutive failures

use futures::{SinkExt, StreamExt};
use shared::message::{ChannelEvent, OrderEvent};
use tokio::net::TcpStream;
use tokio::sync::{broadcast, watch};
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tokio_util::sync::CancellationToken;

use super::RealtimeConfig;
use crate::{ClientError, ClientResult};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Why a session ended
#[derive(Debug, PartialEq, Eq)]
enum SessionEnd {
    Shutdown,
    Disconnected,
}

pub(super) struct RealtimeWorker {
    config: RealtimeConfig,
    events: broadcast::Sender<OrderEvent>,
    connected: watch::Sender<bool>,
    shutdown: CancellationToken,
}

impl RealtimeWorker {
    pub(super) fn new(
        config: RealtimeConfig,
        events: broadcast::Sender<OrderEvent>,
        connected: watch::Sender<bool>,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            config,
            events,
            connected,
            shutdown,
        }
    }

    /// Main run loop: connect, pump messages, reconnect on failure
    pub(super) async fn run(self) {
        tracing::info!(url = %self.config.url, "Realtime client started");
        let mut failures: u32 = 0;

        loop {
            if self.shutdown.is_cancelled() {
                break;
            }

            match self.connect().await {
                Ok(ws) => {
                    failures = 0;
                    self.connected.send_replace(true);
                    tracing::info!("Realtime channel connected");
                    let end = self.run_session(ws).await;
                    self.connected.send_replace(false);
                    if end == SessionEnd::Shutdown {
                        break;
                    }
                }
                Err(e) => {
                    tracing::warn!(attempt = failures + 1, "Realtime connection failed: {e}");
                }
            }

            failures += 1;
            if failures > self.config.reconnect_attempts {
                tracing::warn!(
                    attempts = self.config.reconnect_attempts,
                    "Realtime reconnect attempts exhausted, giving up"
                );
                break;
            }

            tokio::select! {
                _ = self.shutdown.cancelled() => break,
                _ = tokio::time::sleep(self.config.reconnect_delay) => {},
            }
        }

        self.connected.send_replace(false);
        tracing::info!("Realtime client stopped");
    }

    async fn connect(&self) -> ClientResult<WsStream> {
        let mut request = self
            .config
            .url
            .as_str()
            .into_client_request()
            .map_err(|e| ClientError::Realtime(format!("Invalid realtime URL: {e}")))?;

        if let Some(token) = &self.config.token {
            let value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|e| ClientError::Realtime(format!("Invalid token: {e}")))?;
            request.headers_mut().insert("Authorization", value);
        }

        let connect = tokio_tungstenite::connect_async(request);
        let (ws, _response) = tokio::select! {
            _ = self.shutdown.cancelled() => {
                return Err(ClientError::Realtime("Shut down while connecting".to_string()));
            }
            result = connect => result.map_err(|e| ClientError::Realtime(e.to_string()))?,
        };
        Ok(ws)
    }

    /// Run a single WebSocket session until disconnect or shutdown
    async fn run_session(&self, ws: WsStream) -> SessionEnd {
        let (mut ws_sink, mut ws_stream) = ws.split();

        let mut ping_interval = tokio::time::interval(self.config.ping_interval);
        ping_interval.tick().await; // skip immediate tick

        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    let _ = ws_sink.close().await;
                    return SessionEnd::Shutdown;
                }

                _ = ping_interval.tick() => {
                    if ws_sink.send(Message::Ping(vec![].into())).await.is_err() {
                        tracing::warn!("Realtime ping failed, disconnecting");
                        return SessionEnd::Disconnected;
                    }
                }

                msg = ws_stream.next() => {
                    match msg {
                        Some(Ok(Message::Text(text))) => self.handle_text(text.as_str()),
                        Some(Ok(Message::Ping(data))) => {
                            let _ = ws_sink.send(Message::Pong(data)).await;
                        }
                        Some(Ok(Message::Close(_))) => {
                            tracing::info!("Realtime channel closed by server");
                            return SessionEnd::Disconnected;
                        }
                        Some(Err(e)) => {
                            tracing::warn!("Realtime channel error: {e}");
                            return SessionEnd::Disconnected;
                        }
                        None => {
                            tracing::info!("Realtime stream ended");
                            return SessionEnd::Disconnected;
                        }
                        _ => {} // Binary, Pong, Frame
                    }
                }
            }
        }
    }

    fn handle_text(&self, text: &str) {
        let frame = match ChannelEvent::from_text(text) {
            Ok(frame) => frame,
            Err(e) => {
                tracing::warn!("Invalid realtime frame: {e}");
                return;
            }
        };

        match OrderEvent::from_channel(&frame) {
            Ok(Some(event)) => {
                tracing::debug!(event = %event.event_type(), order_id = event.order_id(), "Realtime event");
                // No subscribers is fine
                let _ = self.events.send(event);
            }
            Ok(None) => tracing::debug!(event = %frame.event, "Ignoring unknown realtime event"),
            Err(e) => tracing::warn!(event = %frame.event, "Malformed realtime payload: {e}"),
        }
    }
}
