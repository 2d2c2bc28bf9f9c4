use crate::{
    auth::claims::{Identity, Role},
    error::AppError,
};

/// What a route requires of its caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Anonymous,
    Authenticated,
    Roles(&'static [Role]),
}

/// Type-level access declaration for the [`RequireRole`](super::extractors::RequireRole) extractor.
pub trait Policy: Send + Sync + 'static {
    const ACCESS: Access;
}

/// Any caller holding a valid token.
pub struct Authenticated;

impl Policy for Authenticated {
    const ACCESS: Access = Access::Authenticated;
}

pub struct Employees;

impl Policy for Employees {
    const ACCESS: Access = Access::Roles(&[Role::Employee]);
}

pub struct Managers;

impl Policy for Managers {
    const ACCESS: Access = Access::Roles(&[Role::Manager]);
}

/// Decides whether `identity` may reach a route declared with `access`.
///
/// A missing identity on a protected route is `Unauthenticated`; a present identity
/// whose role is outside the set is `Forbidden`.
pub fn authorize(identity: Option<&Identity>, access: Access) -> Result<(), AppError> {
    match (access, identity) {
        (Access::Anonymous, _) => Ok(()),
        (_, None) => Err(AppError::Unauthenticated("authentication required")),
        (Access::Authenticated, Some(_)) => Ok(()),
        (Access::Roles(allowed), Some(id)) if allowed.contains(&id.role) => Ok(()),
        (Access::Roles(_), Some(_)) => Err(AppError::Forbidden),
    }
}
