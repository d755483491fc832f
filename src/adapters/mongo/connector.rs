//! Document store connector and its retrying ping monitor.
//!
//! The driver client connects lazily, so building it performs no I/O and
//! never fails on an unreachable server. Reachability is established by a
//! background monitor that pings the server until it answers, feeding the
//! readiness signal the HTTP layer exposes. Requests are never held back
//! waiting for the store to come up.

use std::future::Future;
use std::time::Duration;

use mongodb::bson::doc;
use mongodb::options::ClientOptions;
use mongodb::Client;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::config::DatabaseConfig;
use crate::ports::{ConnectionState, DbHealth};

/// How reconnection attempts are paced.
///
/// The default policy retries every five seconds, forever. A backoff cap
/// turns the fixed delay into a doubling one bounded by the cap, and a
/// maximum attempt count makes the monitor give up instead of retrying
/// indefinitely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    interval: Duration,
    backoff_cap: Option<Duration>,
    max_attempts: Option<u32>,
}

impl RetryPolicy {
    /// A policy that waits `interval` between attempts and never gives up.
    pub fn fixed(interval: Duration) -> Self {
        Self {
            interval,
            backoff_cap: None,
            max_attempts: None,
        }
    }

    /// Doubles the delay after each failure, bounded by `cap`.
    pub fn with_backoff_cap(mut self, cap: Duration) -> Self {
        self.backoff_cap = Some(cap);
        self
    }

    /// Stops retrying after `max_attempts` failed attempts.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    /// Delay to wait after the given number of failures (starting at 1).
    pub fn delay_after(&self, failures: u32) -> Duration {
        match self.backoff_cap {
            None => self.interval,
            Some(cap) => {
                // Shift bounded so the multiplier stays well inside u32.
                let exponent = failures.saturating_sub(1).min(16);
                self.interval.saturating_mul(1u32 << exponent).min(cap)
            }
        }
    }

    /// Whether the policy allows no further attempts.
    pub fn is_exhausted(&self, failures: u32) -> bool {
        self.max_attempts.map_or(false, |max| failures >= max)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::fixed(Duration::from_secs(5))
    }
}

impl From<&DatabaseConfig> for RetryPolicy {
    fn from(config: &DatabaseConfig) -> Self {
        let mut policy = RetryPolicy::fixed(config.retry_interval());
        if config.retry_backoff_cap_secs > 0 {
            policy = policy.with_backoff_cap(Duration::from_secs(config.retry_backoff_cap_secs));
        }
        if config.retry_max_attempts > 0 {
            policy = policy.with_max_attempts(config.retry_max_attempts);
        }
        policy
    }
}

/// Builds the driver client from configuration.
///
/// This parses the connection URL and applies timeouts but opens no
/// sockets; the driver connects on first use.
pub async fn build_client(config: &DatabaseConfig) -> Result<Client, mongodb::error::Error> {
    let mut options = ClientOptions::parse(config.connection_url()).await?;
    options.app_name = Some("portcullis".to_string());
    options.server_selection_timeout = Some(config.connect_timeout());
    options.connect_timeout = Some(config.connect_timeout());
    Client::with_options(options)
}

/// Spawns the background monitor that pings the store until it answers.
///
/// Returns the readiness handle for the HTTP layer and the task handle.
/// The monitor owns the state transitions: `Ready` once a ping succeeds,
/// `Unavailable` only if the policy runs out of attempts.
pub fn spawn_monitor(client: Client, policy: RetryPolicy) -> (DbHealth, JoinHandle<()>) {
    let (status, health) = DbHealth::channel();
    let handle = tokio::spawn(async move {
        run_with_retry(policy, status, move || {
            let client = client.clone();
            async move { ping(&client).await }
        })
        .await;
    });
    (health, handle)
}

async fn ping(client: &Client) -> Result<(), mongodb::error::Error> {
    client
        .database("admin")
        .run_command(doc! { "ping": 1 })
        .await?;
    Ok(())
}

/// Drives `attempt_fn` under the retry policy, publishing state changes.
///
/// Failures are logged and absorbed; nothing here panics or bubbles an
/// error out of the monitor task.
async fn run_with_retry<F, Fut, E>(
    policy: RetryPolicy,
    status: watch::Sender<ConnectionState>,
    mut attempt_fn: F,
) where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<(), E>>,
    E: std::fmt::Display,
{
    let mut failures = 0u32;
    loop {
        match attempt_fn().await {
            Ok(()) => {
                info!(attempt = failures + 1, "Connected to document store");
                let _ = status.send(ConnectionState::Ready);
                return;
            }
            Err(err) => {
                failures += 1;
                if policy.is_exhausted(failures) {
                    error!(
                        attempts = failures,
                        error = %err,
                        "Giving up on document store connection"
                    );
                    let _ = status.send(ConnectionState::Unavailable);
                    return;
                }
                let delay = policy.delay_after(failures);
                warn!(
                    attempt = failures,
                    error = %err,
                    retry_in_secs = delay.as_secs(),
                    "Document store unreachable, retrying"
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}
