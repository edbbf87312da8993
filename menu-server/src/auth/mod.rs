//! Authentication
//!
//! - [`JwtService`] - bearer token verification
//! - [`CurrentUser`] - authenticated user context
//! - [`Caller`] - non-rejecting capability extractor for public reads
//! - [`require_admin`] - admin route guard

pub mod extractor;
pub mod jwt;
pub mod middleware;

pub use extractor::Caller;
pub use jwt::{ADMIN_ROLE, Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::require_admin;
