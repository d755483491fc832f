//! Helpers for the user identity carried in the session.

use tower_sessions::Session;

use crate::domain::SessionUser;

/// Session key holding the authenticated user.
pub const SESSION_USER_KEY: &str = "user";

/// Reads the authenticated user from the session, if any.
pub async fn current_user(
    session: &Session,
) -> Result<Option<SessionUser>, tower_sessions::session::Error> {
    session.get::<SessionUser>(SESSION_USER_KEY).await
}

/// Stores the authenticated user in the session.
pub async fn store_current_user(
    session: &Session,
    user: &SessionUser,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(SESSION_USER_KEY, user).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tower_sessions::MemoryStore;

    fn test_session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    #[tokio::test]
    async fn missing_user_reads_as_none() {
        let session = test_session();
        assert_eq!(current_user(&session).await.unwrap(), None);
    }

    #[tokio::test]
    async fn stored_user_reads_back() {
        let session = test_session();
        let user = SessionUser {
            id: "0123456789abcdef01234567".to_string(),
            username: "alice".to_string(),
        };
        store_current_user(&session, &user).await.unwrap();
        assert_eq!(current_user(&session).await.unwrap(), Some(user));
    }
}
