//! Authentication and authorization
//!
//! - [`token`]: issue and validate signed bearer tokens
//! - [`password`]: argon2 hashing for stored credentials
//! - [`resolver`]: load the principal a token refers to
//! - [`guard`]: per-route middleware tying the three together

pub mod guard;
pub mod password;
pub mod resolver;
pub mod token;

pub use guard::{require_owner, require_user};
pub use resolver::{PrincipalResolver, ResolveError};
pub use token::{Claims, TokenConfig, TokenError, TokenService};
