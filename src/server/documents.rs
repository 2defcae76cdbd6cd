use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::auth::RequireAdmin;
use crate::server::AppState;
use crate::server::dto::ListDocumentsParams;
use crate::server::extract::Json;
use crate::server::response::{ApiError, ApiResponse, StoreOptionExt, StoreResultExt};
use crate::server::validation::{validate_document_url, validate_entity_name};
use crate::types::NewDocument;

pub async fn list_documents(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListDocumentsParams>,
) -> impl IntoResponse {
    // Both filters apply when both are present.
    let documents = state
        .store
        .list_documents(params.subprocess_id, params.doc_type)
        .api_err("Failed to list documents")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(documents)))
}

pub async fn get_document(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let document = state
        .store
        .get_document(id)
        .api_err("Failed to get document")?
        .or_not_found("Document not found")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(document)))
}

pub async fn create_document(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Json(req): Json<NewDocument>,
) -> impl IntoResponse {
    validate_entity_name(&req.name, "Document")?;
    validate_document_url(&req.url)?;

    if state
        .store
        .get_subprocess(req.subprocess_id)
        .api_err("Failed to check subprocess")?
        .is_none()
    {
        return Err(ApiError::bad_request("subprocess_id does not exist"));
    }

    let document = state
        .store
        .create_document(&req)
        .api_err("Failed to create document")?;

    Ok::<_, ApiError>((StatusCode::CREATED, Json(ApiResponse::success(document))))
}

pub async fn update_document(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<NewDocument>,
) -> impl IntoResponse {
    validate_entity_name(&req.name, "Document")?;
    validate_document_url(&req.url)?;

    if state
        .store
        .get_subprocess(req.subprocess_id)
        .api_err("Failed to check subprocess")?
        .is_none()
    {
        return Err(ApiError::bad_request("subprocess_id does not exist"));
    }

    let document = state
        .store
        .update_document(id, &req)
        .api_err("Failed to update document")?
        .or_not_found("Document not found")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(document)))
}

pub async fn delete_document(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let deleted = state
        .store
        .delete_document(id)
        .api_err("Failed to delete document")?;

    if !deleted {
        return Err(ApiError::not_found("Document not found"));
    }

    Ok::<_, ApiError>(StatusCode::NO_CONTENT)
}
