//! Session authentication: password hashing, credential checks, session
//! identity and the route guards built on it.

pub mod guard;
pub mod login;
pub mod password;
pub mod session;

pub use guard::{require_authenticated, require_role};
pub use login::{authenticate, IdentityLookup};
pub use password::{hash_password, verify_password};
pub use session::{current_identity, end_session, establish_session, CurrentUser};
