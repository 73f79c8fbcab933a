use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

use crate::AppError;

/// Role held by an authenticated session. A session never holds both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }

    /// Default landing page after a successful login.
    pub fn home_path(&self) -> &'static str {
        match self {
            Role::Admin => "/admin",
            Role::User => "/me",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "user" => Ok(Role::User),
            other => Err(AppError::Internal(format!("Unknown role '{}'", other))),
        }
    }
}

/// Row of either identity table (`admins` or `users`).
#[derive(Debug, Clone)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct IdentityRecord {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    pub password_hash: String,
}

/// Identity established by a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedIdentity {
    pub id: i64,
    pub role: Role,
    pub name: String,
}

/// Normalizes an email the way both identity tables store it.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub next: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct RegisterForm {
    #[serde(default)]
    #[validate(length(min = 1, message = "Full name is required."))]
    pub full_name: String,
    #[serde(default)]
    #[validate(email(message = "Please enter a valid email address."))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 8, message = "Password must be at least 8 characters."))]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
}

/// Registration input after validation, password still in clear text.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub full_name: String,
    pub email: String,
    pub password: String,
}

impl RegisterForm {
    /// Trims and normalizes the form, then checks it field by field.
    pub fn into_new_user(self) -> Result<NewUser, AppError> {
        let normalized = RegisterForm {
            full_name: self.full_name.trim().to_string(),
            email: normalize_email(&self.email),
            password: self.password,
            confirm_password: self.confirm_password,
        };

        if normalized.full_name.is_empty()
            || normalized.email.is_empty()
            || normalized.password.is_empty()
        {
            return Err(AppError::Validation(
                "Please fill in all required fields.".to_string(),
            ));
        }

        normalized.validate()?;

        if normalized.password != normalized.confirm_password {
            return Err(AppError::Validation("Passwords do not match.".to_string()));
        }

        Ok(NewUser {
            full_name: normalized.full_name,
            email: normalized.email,
            password: normalized.password,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> RegisterForm {
        RegisterForm {
            full_name: " Ana Lima ".to_string(),
            email: " Ana@Example.COM ".to_string(),
            password: "correct-horse".to_string(),
            confirm_password: "correct-horse".to_string(),
        }
    }

    #[test]
    fn test_role_round_trip_and_home() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!(Role::User.as_str(), "user");
        assert_eq!(Role::Admin.home_path(), "/admin");
        assert_eq!(Role::User.home_path(), "/me");
        assert!("root".parse::<Role>().is_err());
    }

    #[test]
    fn test_register_normalizes_email() {
        let user = valid_form().into_new_user().unwrap();
        assert_eq!(user.email, "ana@example.com");
        assert_eq!(user.full_name, "Ana Lima");
    }

    #[test]
    fn test_register_rejects_short_password() {
        let mut form = valid_form();
        form.password = "short".to_string();
        form.confirm_password = "short".to_string();
        let err = form.into_new_user().unwrap_err();
        assert!(err.to_string().contains("at least 8 characters"));
    }

    #[test]
    fn test_register_rejects_mismatched_confirmation() {
        let mut form = valid_form();
        form.confirm_password = "something-else".to_string();
        let err = form.into_new_user().unwrap_err();
        assert!(err.to_string().contains("Passwords do not match."));
    }
}
