//! Identity stored in the server-side session.

use bookstore_core::models::{AuthenticatedIdentity, Role};
use tower_sessions::{session::Error as SessionError, Session};

use crate::constants::{SESSION_NAME_KEY, SESSION_ROLE_KEY, SESSION_USER_ID_KEY};

/// Identity of the request's session, inserted as a request extension by the guards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser(pub AuthenticatedIdentity);

impl CurrentUser {
    pub fn id(&self) -> i64 {
        self.0.id
    }

    pub fn role(&self) -> Role {
        self.0.role
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }
}

/// Write a freshly authenticated identity into the session.
///
/// Prior session data is dropped and the session id is cycled before anything
/// is written, so an id issued before login is never reused after it.
pub async fn establish_session(
    session: &Session,
    identity: &AuthenticatedIdentity,
) -> Result<(), SessionError> {
    session.clear().await;
    session.cycle_id().await?;
    session.insert(SESSION_USER_ID_KEY, identity.id).await?;
    session.insert(SESSION_ROLE_KEY, identity.role).await?;
    session.insert(SESSION_NAME_KEY, &identity.name).await?;

    tracing::info!(user_id = identity.id, role = %identity.role, "Session established");
    Ok(())
}

/// The identity held by the session, if both the subject id and the role are set.
pub async fn current_identity(
    session: &Session,
) -> Result<Option<AuthenticatedIdentity>, SessionError> {
    let Some(id) = session.get::<i64>(SESSION_USER_ID_KEY).await? else {
        return Ok(None);
    };
    let Some(role) = session.get::<Role>(SESSION_ROLE_KEY).await? else {
        return Ok(None);
    };
    let name = session
        .get::<String>(SESSION_NAME_KEY)
        .await?
        .unwrap_or_default();

    Ok(Some(AuthenticatedIdentity { id, role, name }))
}

/// Forget the identity and every other value, and drop the stored session.
pub async fn end_session(session: &Session) -> Result<(), SessionError> {
    session.flush().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tower_sessions::MemoryStore;

    fn identity(role: Role) -> AuthenticatedIdentity {
        AuthenticatedIdentity {
            id: 42,
            role,
            name: "Ana".to_string(),
        }
    }

    #[tokio::test]
    async fn test_establish_replaces_previous_state() {
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);
        session.insert("cart", vec![1, 2, 3]).await.unwrap();
        session.insert(SESSION_ROLE_KEY, Role::User).await.unwrap();

        establish_session(&session, &identity(Role::Admin)).await.unwrap();

        assert_eq!(session.get::<Vec<i32>>("cart").await.unwrap(), None);
        let current = current_identity(&session).await.unwrap().unwrap();
        assert_eq!(current, identity(Role::Admin));
    }

    #[tokio::test]
    async fn test_missing_role_is_anonymous() {
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);
        session.insert(SESSION_USER_ID_KEY, 7_i64).await.unwrap();

        assert_eq!(current_identity(&session).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_end_session_clears_identity() {
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);
        establish_session(&session, &identity(Role::User)).await.unwrap();

        end_session(&session).await.unwrap();

        assert_eq!(current_identity(&session).await.unwrap(), None);
    }
}
