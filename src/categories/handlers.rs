use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::header,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tracing::{error, info, instrument};
use uuid::Uuid;

use crate::{
    auth::{Employees, RequireRole},
    categories::{dto::CategoryPayload, Category},
    error::AppError,
    state::AppState,
};

pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(list_categories).post(create_category))
        .route(
            "/categories/:id",
            get(get_category).put(update_category).delete(delete_category),
        )
}

/// Anonymous; shared caches may keep the list for 30 seconds.
#[instrument(skip(state))]
pub async fn list_categories(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let categories = state.categories.list().await?;
    Ok((
        [
            (header::CACHE_CONTROL, "public, max-age=30"),
            (header::VARY, "User-Agent"),
        ],
        Json(categories),
    ))
}

#[instrument(skip(state))]
pub async fn get_category(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Category>, AppError> {
    let Path(id) = path?;
    state
        .categories
        .find(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("category not found".into()))
}

#[instrument(skip(state, employee, payload))]
pub async fn create_category(
    State(state): State<AppState>,
    employee: RequireRole<Employees>,
    payload: Result<Json<CategoryPayload>, JsonRejection>,
) -> Result<Json<Category>, AppError> {
    let Json(mut payload) = payload?;
    payload.validate()?;

    let category = state.categories.create(&payload.title).await.map_err(|e| {
        error!(error = %e, "create category failed");
        AppError::PersistenceFailure("could not create category".into())
    })?;
    info!(user_id = %employee.identity.user_id, category_id = %category.id, "category created");
    Ok(Json(category))
}

#[instrument(skip(state, employee, payload))]
pub async fn update_category(
    State(state): State<AppState>,
    employee: RequireRole<Employees>,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<CategoryPayload>, JsonRejection>,
) -> Result<Json<Category>, AppError> {
    let Path(id) = path?;
    let Json(mut payload) = payload?;
    if payload.id.is_some_and(|body_id| body_id != id) {
        return Err(AppError::NotFound("category not found".into()));
    }
    payload.validate()?;

    match state.categories.update(id, &payload.title).await {
        Ok(Some(category)) => {
            info!(user_id = %employee.identity.user_id, category_id = %id, "category updated");
            Ok(Json(category))
        }
        Ok(None) => Err(AppError::PersistenceFailure(
            "this category was changed or removed; resubmit".into(),
        )),
        Err(e) => {
            error!(error = %e, %id, "update category failed");
            Err(AppError::PersistenceFailure("could not update category".into()))
        }
    }
}

#[instrument(skip(state, employee))]
pub async fn delete_category(
    State(state): State<AppState>,
    employee: RequireRole<Employees>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Value>, AppError> {
    let Path(id) = path?;
    match state.categories.delete(id).await {
        Ok(true) => {
            info!(user_id = %employee.identity.user_id, category_id = %id, "category removed");
            Ok(Json(json!({ "message": "category removed" })))
        }
        Ok(false) => Err(AppError::NotFound("category not found".into())),
        Err(e) => {
            error!(error = %e, %id, "delete category failed");
            Err(AppError::PersistenceFailure("could not remove category".into()))
        }
    }
}
