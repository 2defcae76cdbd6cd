use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::auth::RequireAdmin;
use crate::server::AppState;
use crate::server::dto::ListMacroprocessesParams;
use crate::server::extract::Json;
use crate::server::response::{ApiError, ApiResponse, StoreOptionExt, StoreResultExt};
use crate::server::validation::validate_entity_name;
use crate::types::NewMacroprocess;

pub async fn list_macroprocesses(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListMacroprocessesParams>,
) -> impl IntoResponse {
    let macroprocesses = state
        .store
        .list_macroprocesses(params.category)
        .api_err("Failed to list macroprocesses")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(macroprocesses)))
}

pub async fn get_macroprocess(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let macroprocess = state
        .store
        .get_macroprocess(id)
        .api_err("Failed to get macroprocess")?
        .or_not_found("Macroprocess not found")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(macroprocess)))
}

pub async fn create_macroprocess(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Json(req): Json<NewMacroprocess>,
) -> impl IntoResponse {
    validate_entity_name(&req.name, "Macroprocess")?;

    let macroprocess = state
        .store
        .create_macroprocess(&req)
        .api_err("Failed to create macroprocess")?;

    Ok::<_, ApiError>((StatusCode::CREATED, Json(ApiResponse::success(macroprocess))))
}

pub async fn update_macroprocess(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<NewMacroprocess>,
) -> impl IntoResponse {
    validate_entity_name(&req.name, "Macroprocess")?;

    let macroprocess = state
        .store
        .update_macroprocess(id, &req)
        .api_err("Failed to update macroprocess")?
        .or_not_found("Macroprocess not found")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(macroprocess)))
}

pub async fn delete_macroprocess(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let deleted = state
        .store
        .delete_macroprocess(id)
        .api_err("Failed to delete macroprocess")?;

    if !deleted {
        return Err(ApiError::not_found("Macroprocess not found"));
    }

    Ok::<_, ApiError>(StatusCode::NO_CONTENT)
}
