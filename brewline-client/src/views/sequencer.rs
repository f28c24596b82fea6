//! Request sequencing: the most recently *issued* request wins
//!
//! Superseded requests are not aborted. Each fetch takes a ticket before it
//! starts and applies its result only if no newer ticket was issued since.

use std::sync::atomic::{AtomicU64, Ordering};

/// Ticket handed to one request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

/// Issues monotonically increasing tickets
#[derive(Debug, Default)]
pub struct RequestSequencer {
    latest: AtomicU64,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take a ticket for a request about to be sent
    pub fn issue(&self) -> Ticket {
        Ticket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Whether `ticket` is still the newest issued
    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }

    /// Invalidate every outstanding ticket
    pub fn invalidate(&self) {
        self.latest.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_issued_wins() {
        let seq = RequestSequencer::new();
        let first = seq.issue();
        let second = seq.issue();
        assert!(second > first);
        // First resolves last; it must not be applied
        assert!(seq.is_current(second));
        assert!(!seq.is_current(first));
    }

    #[test]
    fn test_invalidate() {
        let seq = RequestSequencer::new();
        let ticket = seq.issue();
        seq.invalidate();
        assert!(!seq.is_current(ticket));
    }

    #[tokio::test]
    async fn test_out_of_order_resolution() {
        use std::sync::Arc;
        use tokio::sync::oneshot;

        let seq = Arc::new(RequestSequencer::new());
        let applied = Arc::new(std::sync::Mutex::new(Vec::new()));

        let (slow_tx, slow_rx) = oneshot::channel::<&'static str>();
        let (fast_tx, fast_rx) = oneshot::channel::<&'static str>();

        let spawn = |rx: oneshot::Receiver<&'static str>| {
            let seq = seq.clone();
            let applied = applied.clone();
            let ticket = seq.issue();
            tokio::spawn(async move {
                let value = rx.await.unwrap();
                if seq.is_current(ticket) {
                    applied.lock().unwrap().push(value);
                }
            })
        };

        let slow = spawn(slow_rx);
        let fast = spawn(fast_rx);
        fast_tx.send("second").unwrap();
        fast.await.unwrap();
        slow_tx.send("first").unwrap();
        slow.await.unwrap();

        assert_eq!(*applied.lock().unwrap(), vec!["second"]);
    }
}
