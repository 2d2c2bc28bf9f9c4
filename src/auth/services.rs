use tracing::{debug, error, info, warn};

use crate::{
    auth::{
        claims::Role,
        jwt::JwtKeys,
        password::{hash_password, verify_stored},
    },
    config::BootstrapManager,
    error::AppError,
    users::{NewUser, User, UserStore},
};

/// Verifies credentials and issues a token for the matching user.
///
/// An unknown username and a wrong password both yield `InvalidCredentials`.
pub async fn authenticate(
    store: &dyn UserStore,
    keys: &JwtKeys,
    username: &str,
    password: &str,
) -> Result<(User, String), AppError> {
    let found = store.find_by_username(username).await?;
    let verified = verify_stored(password, found.as_ref().map(|u| u.password_hash.as_str()))?;

    let user = match found {
        Some(u) if verified => u,
        Some(u) => {
            warn!(%username, user_id = %u.id, "login invalid password");
            return Err(AppError::InvalidCredentials);
        }
        None => {
            warn!(%username, "login unknown username");
            return Err(AppError::InvalidCredentials);
        }
    };

    let token = keys.issue(&user)?;
    info!(user_id = %user.id, role = %user.role, "user logged in");
    Ok((user, token))
}

/// Creates a self-registered account. The role is always `employee`.
pub async fn register(
    store: &dyn UserStore,
    username: &str,
    password: &str,
) -> Result<User, AppError> {
    if store.find_by_username(username).await?.is_some() {
        warn!(%username, "username already registered");
        return Err(AppError::ValidationFailed("username already registered".into()));
    }

    let new_user = NewUser {
        username: username.to_string(),
        password_hash: hash_password(password)?,
        role: Role::Employee,
    };
    let user = store.create(&new_user).await.map_err(|e| {
        error!(error = %e, "create user failed");
        AppError::PersistenceFailure("could not create user".into())
    })?;

    info!(user_id = %user.id, username = %user.username, "user registered");
    Ok(user)
}

/// Ensures the configured manager account exists. Existing accounts are left untouched.
pub async fn bootstrap_manager(
    store: &dyn UserStore,
    manager: &BootstrapManager,
) -> anyhow::Result<()> {
    if let Some(existing) = store.find_by_username(&manager.username).await? {
        debug!(user_id = %existing.id, role = %existing.role, "bootstrap manager already present");
        return Ok(());
    }
    let user = store
        .create(&NewUser {
            username: manager.username.clone(),
            password_hash: hash_password(&manager.password)?,
            role: Role::Manager,
        })
        .await?;
    info!(user_id = %user.id, username = %user.username, "bootstrap manager created");
    Ok(())
}
