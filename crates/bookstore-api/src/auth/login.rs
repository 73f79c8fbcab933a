//! Credential checks against the two identity tables.

use async_trait::async_trait;
use bookstore_core::{
    models::{normalize_email, AuthenticatedIdentity, IdentityRecord, Role},
    AppError,
};
use bookstore_db::IdentityRepository;

use super::password::verify_password;

/// Email lookups the login flow needs, one per identity table.
#[async_trait]
pub trait IdentityLookup: Send + Sync {
    async fn find_admin(&self, email: &str) -> Result<Option<IdentityRecord>, AppError>;
    async fn find_user(&self, email: &str) -> Result<Option<IdentityRecord>, AppError>;
}

#[async_trait]
impl IdentityLookup for IdentityRepository {
    async fn find_admin(&self, email: &str) -> Result<Option<IdentityRecord>, AppError> {
        self.find_admin_by_email(email).await
    }

    async fn find_user(&self, email: &str) -> Result<Option<IdentityRecord>, AppError> {
        self.find_user_by_email(email).await
    }
}

fn password_matches(record: &IdentityRecord, password: &str, role: Role) -> bool {
    match verify_password(password, &record.password_hash) {
        Ok(matches) => matches,
        Err(e) => {
            tracing::warn!(error = %e, role = %role, identity_id = record.id, "Stored password hash is unreadable");
            false
        }
    }
}

/// Resolve credentials to an identity.
///
/// The admin table is consulted first, so an email present in both tables with
/// the same password always logs in as admin. Every failure is reported as
/// [`AppError::InvalidCredentials`] whatever the cause.
pub async fn authenticate(
    lookup: &dyn IdentityLookup,
    email: &str,
    password: &str,
) -> Result<AuthenticatedIdentity, AppError> {
    let email = normalize_email(email);
    if email.is_empty() || password.is_empty() {
        return Err(AppError::InvalidCredentials);
    }

    if let Some(admin) = lookup.find_admin(&email).await? {
        if password_matches(&admin, password, Role::Admin) {
            return Ok(AuthenticatedIdentity {
                id: admin.id,
                role: Role::Admin,
                name: admin.full_name,
            });
        }
    }

    if let Some(user) = lookup.find_user(&email).await? {
        if password_matches(&user, password, Role::User) {
            return Ok(AuthenticatedIdentity {
                id: user.id,
                role: Role::User,
                name: user.full_name,
            });
        }
    }

    Err(AppError::InvalidCredentials)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::hash_password;
    use std::collections::HashMap;

    #[derive(Default)]
    struct FakeLookup {
        admins: HashMap<String, IdentityRecord>,
        users: HashMap<String, IdentityRecord>,
    }

    #[async_trait]
    impl IdentityLookup for FakeLookup {
        async fn find_admin(&self, email: &str) -> Result<Option<IdentityRecord>, AppError> {
            Ok(self.admins.get(email).cloned())
        }

        async fn find_user(&self, email: &str) -> Result<Option<IdentityRecord>, AppError> {
            Ok(self.users.get(email).cloned())
        }
    }

    fn record(id: i64, name: &str, email: &str, password: &str) -> IdentityRecord {
        IdentityRecord {
            id,
            full_name: name.to_string(),
            email: email.to_string(),
            password_hash: hash_password(password).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_admin_wins_when_email_in_both_tables() {
        let mut lookup = FakeLookup::default();
        lookup
            .admins
            .insert("a@x.com".to_string(), record(1, "Ada Admin", "a@x.com", "pw1-long-enough"));
        lookup
            .users
            .insert("a@x.com".to_string(), record(9, "Ada User", "a@x.com", "pw1-long-enough"));

        let identity = authenticate(&lookup, " A@X.com ", "pw1-long-enough")
            .await
            .unwrap();
        assert_eq!(identity.role, Role::Admin);
        assert_eq!(identity.id, 1);
        assert_eq!(identity.name, "Ada Admin");
    }

    #[tokio::test]
    async fn test_user_matches_when_admin_password_differs() {
        let mut lookup = FakeLookup::default();
        lookup
            .admins
            .insert("a@x.com".to_string(), record(1, "Ada Admin", "a@x.com", "admin-secret"));
        lookup
            .users
            .insert("a@x.com".to_string(), record(9, "Ada User", "a@x.com", "user-secret"));

        let identity = authenticate(&lookup, "a@x.com", "user-secret").await.unwrap();
        assert_eq!(identity.role, Role::User);
        assert_eq!(identity.id, 9);
    }

    #[tokio::test]
    async fn test_unknown_email_and_wrong_password_look_the_same() {
        let mut lookup = FakeLookup::default();
        lookup
            .users
            .insert("u@x.com".to_string(), record(2, "Uma", "u@x.com", "right-password"));

        let unknown = authenticate(&lookup, "nobody@x.com", "right-password")
            .await
            .unwrap_err();
        let wrong = authenticate(&lookup, "u@x.com", "wrong-password")
            .await
            .unwrap_err();

        assert!(matches!(unknown, AppError::InvalidCredentials));
        assert!(matches!(wrong, AppError::InvalidCredentials));
        assert_eq!(unknown.to_string(), wrong.to_string());
    }
}
