use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    routing::{get, post, put},
    Json, Router,
};
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::{
        password::hash_password,
        services::{authenticate, register},
        AuthUser, Managers, RequireRole,
    },
    error::AppError,
    state::AppState,
    users::{
        dto::{LoginRequest, LoginResponse, PublicUser, RegisterRequest, UpdateUserRequest},
        NewUser,
    },
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/login", post(login))
        .route("/users/me", get(get_me))
        .route("/users/:id", put(update_user))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, AppError> {
    let Json(payload) = payload?;
    let (user, token) =
        authenticate(state.users.as_ref(), &state.keys, &payload.username, &payload.password)
            .await?;
    Ok(Json(LoginResponse {
        user: user.into(),
        token,
    }))
}

/// Anonymous self-registration; the stored role is always `employee`.
#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Json<PublicUser>, AppError> {
    let Json(mut payload) = payload?;
    payload.validate()?;
    if let Some(role) = payload.role.as_deref() {
        debug!(%role, "ignoring role submitted at registration");
    }
    let user = register(state.users.as_ref(), &payload.username, &payload.password).await?;
    Ok(Json(user.into()))
}

#[instrument(skip(state, manager))]
pub async fn list_users(
    State(state): State<AppState>,
    manager: RequireRole<Managers>,
) -> Result<Json<Vec<PublicUser>>, AppError> {
    let users = state.users.list().await?;
    info!(manager_id = %manager.identity.user_id, count = users.len(), "users listed");
    Ok(Json(users.into_iter().map(PublicUser::from).collect()))
}

/// Replaces username, password and role of an existing user.
#[instrument(skip(state, manager, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    manager: RequireRole<Managers>,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> Result<Json<PublicUser>, AppError> {
    let Path(id) = path?;
    let Json(mut payload) = payload?;
    let role = payload.validate()?;

    if let Some(other) = state.users.find_by_username(&payload.username).await? {
        if other.id != id {
            return Err(AppError::ValidationFailed("username already registered".into()));
        }
    }

    let changes = NewUser {
        username: payload.username,
        password_hash: hash_password(&payload.password)?,
        role,
    };
    let user = match state.users.update(id, &changes).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            return Err(AppError::PersistenceFailure(
                "this user was changed or removed; resubmit".into(),
            ))
        }
        Err(e) => {
            error!(error = %e, %id, "update user failed");
            return Err(AppError::PersistenceFailure("could not update user".into()));
        }
    };

    info!(manager_id = %manager.identity.user_id, user_id = %user.id, role = %user.role, "user updated");
    Ok(Json(user.into()))
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
) -> Result<Json<PublicUser>, AppError> {
    let user = state
        .users
        .find_by_id(identity.user_id)
        .await?
        .ok_or_else(|| {
            warn!(user_id = %identity.user_id, "token subject no longer exists");
            AppError::Unauthenticated("user not found")
        })?;
    Ok(Json(user.into()))
}
