//! Readiness signal shared between the database connector and the HTTP layer

use tokio::sync::watch;

/// Where the document store connection currently stands.
///
/// The connector starts in `Connecting`, moves to `Ready` once a ping
/// succeeds, and lands in `Unavailable` only when the retry policy is
/// exhausted. With an unlimited policy it never leaves `Connecting` until
/// the store answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Ready,
    Unavailable,
}

/// Read side of the connection state, cheap to clone into request handlers.
#[derive(Debug, Clone)]
pub struct DbHealth {
    rx: watch::Receiver<ConnectionState>,
}

impl DbHealth {
    /// Creates the paired sender and receiver, starting in `Connecting`.
    pub fn channel() -> (watch::Sender<ConnectionState>, DbHealth) {
        let (tx, rx) = watch::channel(ConnectionState::Connecting);
        (tx, DbHealth { rx })
    }

    /// Current connection state.
    pub fn state(&self) -> ConnectionState {
        *self.rx.borrow()
    }

    /// Whether the document store has answered a ping.
    pub fn is_ready(&self) -> bool {
        self.state() == ConnectionState::Ready
    }

    /// Waits until the connector settles, returning whether the store is
    /// reachable. Resolves to `false` when the connector gave up or went
    /// away without ever reaching the store.
    pub async fn wait_ready(&mut self) -> bool {
        match self
            .rx
            .wait_for(|state| *state != ConnectionState::Connecting)
            .await
        {
            Ok(state) => *state == ConnectionState::Ready,
            Err(_) => false,
        }
    }
}
