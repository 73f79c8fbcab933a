//! Route paths and session keys shared across handlers and guards.

/// Login entry point; guards redirect here.
pub const LOGIN_PATH: &str = "/login";
pub const ADMIN_PATH: &str = "/admin";
pub const HOME_PATH: &str = "/";
pub const PROFILE_PATH: &str = "/me";

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "id";

pub const SESSION_USER_ID_KEY: &str = "user_id";
pub const SESSION_ROLE_KEY: &str = "role";
pub const SESSION_NAME_KEY: &str = "name";
pub const SESSION_FLASHES_KEY: &str = "_flashes";
