//! Authentication and authorization.
//!
//! Credentials are checked against a [`UserStore`](crate::users::UserStore), a signed
//! token is issued by [`JwtKeys`], and protected routes decode it again through the
//! [`AuthUser`] and [`RequireRole`] extractors before any handler code runs. No token
//! is stored server-side, so tokens cannot be revoked or refreshed before they expire.

pub mod claims;
pub mod extractors;
pub mod jwt;
pub mod password;
pub mod policy;
pub mod services;

pub use claims::{Claims, Identity, Role};
pub use extractors::{AuthUser, RequireRole};
pub use jwt::JwtKeys;
pub use policy::{authorize, Access, Authenticated, Employees, Managers, Policy};
