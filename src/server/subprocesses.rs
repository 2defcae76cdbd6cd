use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::auth::RequireAdmin;
use crate::server::AppState;
use crate::server::dto::ListSubprocessesParams;
use crate::server::extract::Json;
use crate::server::response::{ApiError, ApiResponse, StoreOptionExt, StoreResultExt};
use crate::server::validation::validate_entity_name;
use crate::types::NewSubprocess;

pub async fn list_subprocesses(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListSubprocessesParams>,
) -> impl IntoResponse {
    // An unknown parent yields an empty list, not an error.
    let subprocesses = match params.macroprocess_id {
        Some(macroprocess_id) => state
            .store
            .list_subprocesses_by_macroprocess(macroprocess_id)
            .api_err("Failed to list subprocesses")?,
        None => state
            .store
            .list_subprocesses()
            .api_err("Failed to list subprocesses")?,
    };

    Ok::<_, ApiError>(Json(ApiResponse::success(subprocesses)))
}

pub async fn get_subprocess(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let subprocess = state
        .store
        .get_subprocess(id)
        .api_err("Failed to get subprocess")?
        .or_not_found("Subprocess not found")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(subprocess)))
}

pub async fn create_subprocess(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Json(req): Json<NewSubprocess>,
) -> impl IntoResponse {
    validate_entity_name(&req.name, "Subprocess")?;

    if state
        .store
        .get_macroprocess(req.macroprocess_id)
        .api_err("Failed to check macroprocess")?
        .is_none()
    {
        return Err(ApiError::bad_request("macroprocess_id does not exist"));
    }

    let subprocess = state
        .store
        .create_subprocess(&req)
        .api_err("Failed to create subprocess")?;

    Ok::<_, ApiError>((StatusCode::CREATED, Json(ApiResponse::success(subprocess))))
}

pub async fn update_subprocess(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<NewSubprocess>,
) -> impl IntoResponse {
    validate_entity_name(&req.name, "Subprocess")?;

    if state
        .store
        .get_macroprocess(req.macroprocess_id)
        .api_err("Failed to check macroprocess")?
        .is_none()
    {
        return Err(ApiError::bad_request("macroprocess_id does not exist"));
    }

    let subprocess = state
        .store
        .update_subprocess(id, &req)
        .api_err("Failed to update subprocess")?
        .or_not_found("Subprocess not found")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(subprocess)))
}

pub async fn delete_subprocess(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let deleted = state
        .store
        .delete_subprocess(id)
        .api_err("Failed to delete subprocess")?;

    if !deleted {
        return Err(ApiError::not_found("Subprocess not found"));
    }

    Ok::<_, ApiError>(StatusCode::NO_CONTENT)
}
