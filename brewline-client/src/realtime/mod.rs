//! Realtime channel client
//!
//! One shared WebSocket connection receiving `order:created`,
//! `order:updated` and `order:deleted`. The connection runs in a background
//! task; callers never wait on it. Connection problems surface only through
//! [`RealtimeClient::is_connected`].

mod worker;

use std::time::Duration;

use shared::message::OrderEvent;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::ClientConfig;

/// Broadcast buffer; slow subscribers past this many events lag
const EVENT_BUFFER: usize = 256;
/// WebSocket keepalive ping interval
const PING_INTERVAL_SECS: u64 = 30;

/// Realtime connection settings
#[derive(Debug, Clone, PartialEq)]
pub struct RealtimeConfig {
    pub url: String,
    /// Bearer token sent on the upgrade request
    pub token: Option<String>,
    /// Consecutive failed attempts before giving up
    pub reconnect_attempts: u32,
    /// Fixed delay between attempts
    pub reconnect_delay: Duration,
    pub ping_interval: Duration,
}

impl RealtimeConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            token: None,
            reconnect_attempts: crate::config::DEFAULT_RECONNECT_ATTEMPTS,
            reconnect_delay: Duration::from_millis(crate::config::DEFAULT_RECONNECT_DELAY_MS),
            ping_interval: Duration::from_secs(PING_INTERVAL_SECS),
        }
    }

    pub fn from_client_config(config: &ClientConfig) -> Self {
        Self::new(config.ws_url.clone())
            .with_reconnect_attempts(config.reconnect_attempts)
            .with_reconnect_delay(config.reconnect_delay)
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_reconnect_attempts(mut self, attempts: u32) -> Self {
        self.reconnect_attempts = attempts;
        self
    }

    pub fn with_reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = delay;
        self
    }

    pub fn with_ping_interval(mut self, interval: Duration) -> Self {
        self.ping_interval = interval;
        self
    }
}

/// Handle to the shared realtime connection
#[derive(Debug)]
pub struct RealtimeClient {
    events: broadcast::Sender<OrderEvent>,
    connected: watch::Receiver<bool>,
    shutdown: CancellationToken,
    task: std::sync::Mutex<Option<JoinHandle<()>>>,
}

impl RealtimeClient {
    /// Start the background connection; returns immediately
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn(config: RealtimeConfig) -> Self {
        let (events, _) = broadcast::channel(EVENT_BUFFER);
        let (connected_tx, connected) = watch::channel(false);
        let shutdown = CancellationToken::new();

        let worker = worker::RealtimeWorker::new(config, events.clone(), connected_tx, shutdown.clone());
        let task = tokio::spawn(worker.run());

        Self {
            events,
            connected,
            shutdown,
            task: std::sync::Mutex::new(Some(task)),
        }
    }

    /// Whether the connection is currently open
    pub fn is_connected(&self) -> bool {
        *self.connected.borrow()
    }

    /// Watch connection state changes
    pub fn connection_state(&self) -> watch::Receiver<bool> {
        self.connected.clone()
    }

    /// Subscribe to order events; dropping the subscription unsubscribes
    pub fn subscribe(&self) -> Subscription {
        Subscription {
            rx: self.events.subscribe(),
        }
    }

    /// Number of live subscriptions
    pub fn subscriber_count(&self) -> usize {
        self.events.receiver_count()
    }

    /// Whether the background task has stopped (shutdown or attempts exhausted)
    pub fn is_finished(&self) -> bool {
        self.task
            .lock()
            .map(|task| task.as_ref().is_none_or(JoinHandle::is_finished))
            .unwrap_or(true)
    }

    /// Close the connection and wait for the background task
    pub async fn shutdown(&self) {
        self.shutdown.cancel();
        let task = self.task.lock().ok().and_then(|mut t| t.take());
        if let Some(task) = task
            && let Err(e) = task.await
        {
            tracing::warn!("Realtime task ended abnormally: {e}");
        }
    }
}

impl Drop for RealtimeClient {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

/// One consumer's view of the event stream
#[derive(Debug)]
pub struct Subscription {
    rx: broadcast::Receiver<OrderEvent>,
}

impl Subscription {
    /// Next event; `None` once the client has shut down
    ///
    /// Lagging consumers skip the missed events with a warning. Callers that
    /// need a consistent view should re-fetch when that happens.
    pub async fn recv(&mut self) -> Option<OrderEvent> {
        loop {
            match self.rx.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!("Realtime subscriber lagged {n} events");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Non-blocking poll
    pub fn try_recv(&mut self) -> Option<OrderEvent> {
        loop {
            match self.rx.try_recv() {
                Ok(event) => return Some(event),
                Err(broadcast::error::TryRecvError::Lagged(n)) => {
                    tracing::warn!("Realtime subscriber lagged {n} events");
                }
                Err(_) => return None,
            }
        }
    }

    /// Explicit unsubscribe
    pub fn unsubscribe(self) {}
}
