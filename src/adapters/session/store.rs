//! Cache-backed session store.
//!
//! Records are stored as JSON under `sess:<id>` with a TTL matching the
//! cookie deadline. A cache outage never fails a request: reads behave as
//! if no session existed and writes are dropped with a warning, so the
//! gateway keeps serving while sessions are degraded. Only malformed
//! payloads surface as errors.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use time::OffsetDateTime;
use tokio::sync::Mutex;
use tower_sessions::session::{Id, Record};
use tower_sessions::session_store::{self, Error};
use tower_sessions::SessionStore;
use tracing::warn;

/// Key prefix for session records in the cache.
const SESSION_KEY_PREFIX: &str = "sess:";

/// Cache-backed implementation of the session store.
///
/// Holds the client plus a cached multiplexed connection. The connection
/// is (re)established lazily, so the store can be constructed and served
/// while the cache is still down.
#[derive(Clone)]
pub struct RedisSessionStore {
    client: redis::Client,
    conn: Arc<Mutex<Option<MultiplexedConnection>>>,
    connect_timeout: Duration,
}

impl RedisSessionStore {
    /// Creates a store over the given client without connecting.
    pub fn new(client: redis::Client, connect_timeout: Duration) -> Self {
        Self {
            client,
            conn: Arc::new(Mutex::new(None)),
            connect_timeout,
        }
    }

    /// Eagerly connects and caches the connection.
    ///
    /// Startup calls this once to surface cache problems in the logs;
    /// a failure here is not fatal because every operation reconnects
    /// on demand.
    pub async fn connect(&self) -> Result<(), redis::RedisError> {
        let conn = self.open_connection().await?;
        *self.conn.lock().await = Some(conn);
        Ok(())
    }

    async fn open_connection(&self) -> Result<MultiplexedConnection, redis::RedisError> {
        match tokio::time::timeout(
            self.connect_timeout,
            self.client.get_multiplexed_tokio_connection(),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(std::io::Error::new(
                std::io::ErrorKind::TimedOut,
                "Connection attempt timed out",
            )
            .into()),
        }
    }

    /// Returns the cached connection, dialing a fresh one if needed.
    async fn connection(&self) -> Result<MultiplexedConnection, redis::RedisError> {
        let mut guard = self.conn.lock().await;
        if let Some(conn) = guard.as_ref() {
            return Ok(conn.clone());
        }
        let conn = self.open_connection().await?;
        *guard = Some(conn.clone());
        Ok(conn)
    }

    /// Drops the cached connection when the error says it died.
    async fn reset_connection(&self, err: &redis::RedisError) {
        if err.is_io_error() || err.is_connection_dropped() {
            *self.conn.lock().await = None;
        }
    }
}

impl std::fmt::Debug for RedisSessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisSessionStore")
            .field("connect_timeout", &self.connect_timeout)
            .finish_non_exhaustive()
    }
}

fn redis_key(id: &Id) -> String {
    format!("{SESSION_KEY_PREFIX}{id}")
}

/// TTL for a record, rounded up so the cache never expires a session
/// before its cookie deadline.
fn ttl_seconds(expiry_date: OffsetDateTime, now: OffsetDateTime) -> i64 {
    let remaining = expiry_date - now;
    let mut secs = remaining.whole_seconds();
    if remaining.subsec_milliseconds() > 0 {
        secs += 1;
    }
    secs.max(1)
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn create(&self, record: &mut Record) -> session_store::Result<()> {
        loop {
            let payload =
                serde_json::to_string(record).map_err(|e| Error::Encode(e.to_string()))?;
            let ttl = ttl_seconds(record.expiry_date, OffsetDateTime::now_utc());
            let outcome = async {
                let mut conn = self.connection().await?;
                redis::cmd("SET")
                    .arg(redis_key(&record.id))
                    .arg(&payload)
                    .arg("NX")
                    .arg("EX")
                    .arg(ttl)
                    .query_async::<_, Option<String>>(&mut conn)
                    .await
            }
            .await;
            match outcome {
                Ok(Some(_)) => return Ok(()),
                Ok(None) => {
                    // Id collision; pick a fresh one and retry.
                    record.id = Id::default();
                }
                Err(err) => {
                    self.reset_connection(&err).await;
                    warn!(error = %err, "Session cache unreachable, session not persisted");
                    return Ok(());
                }
            }
        }
    }

    async fn save(&self, record: &Record) -> session_store::Result<()> {
        let payload = serde_json::to_string(record).map_err(|e| Error::Encode(e.to_string()))?;
        let ttl = ttl_seconds(record.expiry_date, OffsetDateTime::now_utc());
        let outcome = async {
            let mut conn = self.connection().await?;
            redis::cmd("SET")
                .arg(redis_key(&record.id))
                .arg(&payload)
                .arg("EX")
                .arg(ttl)
                .query_async::<_, ()>(&mut conn)
                .await
        }
        .await;
        if let Err(err) = outcome {
            self.reset_connection(&err).await;
            warn!(error = %err, "Session cache unreachable, session not persisted");
        }
        Ok(())
    }

    async fn load(&self, session_id: &Id) -> session_store::Result<Option<Record>> {
        let outcome = async {
            let mut conn = self.connection().await?;
            conn.get::<_, Option<String>>(redis_key(session_id)).await
        }
        .await;
        let payload = match outcome {
            Ok(payload) => payload,
            Err(err) => {
                self.reset_connection(&err).await;
                warn!(error = %err, "Session cache unreachable, treating request as session-less");
                return Ok(None);
            }
        };
        let Some(payload) = payload else {
            return Ok(None);
        };
        let record: Record =
            serde_json::from_str(&payload).map_err(|e| Error::Decode(e.to_string()))?;
        // Cache TTLs are second-granular; enforce the exact deadline here.
        if record.expiry_date <= OffsetDateTime::now_utc() {
            return Ok(None);
        }
        Ok(Some(record))
    }

    async fn delete(&self, session_id: &Id) -> session_store::Result<()> {
        let outcome = async {
            let mut conn = self.connection().await?;
            conn.del::<_, ()>(redis_key(session_id)).await
        }
        .await;
        if let Err(err) = outcome {
            self.reset_connection(&err).await;
            warn!(error = %err, "Session cache unreachable, session not deleted");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn keys_carry_the_session_prefix() {
        let id = Id::default();
        assert_eq!(redis_key(&id), format!("sess:{id}"));
    }

    #[test]
    fn ttl_rounds_up_to_whole_seconds() {
        let now = OffsetDateTime::now_utc();
        assert_eq!(ttl_seconds(now + time::Duration::seconds(30), now), 30);
        assert_eq!(ttl_seconds(now + time::Duration::milliseconds(30_500), now), 31);
        assert_eq!(ttl_seconds(now + time::Duration::milliseconds(200), now), 1);
    }

    #[test]
    fn ttl_never_drops_below_one_second() {
        let now = OffsetDateTime::now_utc();
        assert_eq!(ttl_seconds(now - time::Duration::seconds(10), now), 1);
        assert_eq!(ttl_seconds(now, now), 1);
    }

    #[test]
    fn records_round_trip_through_json() {
        let record = Record {
            id: Id::default(),
            data: HashMap::from([(
                "user".to_string(),
                serde_json::json!({ "id": "0123456789abcdef01234567", "username": "alice" }),
            )]),
            expiry_date: OffsetDateTime::now_utc() + time::Duration::seconds(30),
        };
        let payload = serde_json::to_string(&record).unwrap();
        let back: Record = serde_json::from_str(&payload).unwrap();
        assert_eq!(back.id, record.id);
        assert_eq!(back.data, record.data);
        assert_eq!(back.expiry_date, record.expiry_date);
    }
}
