use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::auth::{RequireAdmin, hash_password};
use crate::server::AppState;
use crate::server::dto::{CreateUserRequest, UpdateUserRequest};
use crate::server::extract::Json;
use crate::server::response::{ApiError, ApiResponse, StoreOptionExt, StoreResultExt};
use crate::server::validation::{validate_password, validate_username};
use crate::types::NewUser;

async fn check_macroprocess(state: &AppState, macroprocess_id: i64) -> Result<(), ApiError> {
    if state
        .store
        .get_macroprocess(macroprocess_id)
        .api_err("Failed to check macroprocess")?
        .is_none()
    {
        return Err(ApiError::bad_request("macroprocess_id does not exist"));
    }
    Ok(())
}

pub async fn list_users(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let users = state.store.list_users().api_err("Failed to list users")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(users)))
}

pub async fn get_user(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let user = state
        .store
        .get_user(id)
        .api_err("Failed to get user")?
        .or_not_found("User not found")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(user)))
}

pub async fn create_user(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateUserRequest>,
) -> impl IntoResponse {
    validate_username(&req.username)?;
    validate_password(&req.password)?;

    if let Some(macroprocess_id) = req.macroprocess_id {
        check_macroprocess(&state, macroprocess_id).await?;
    }

    if state
        .store
        .get_user_by_username(&req.username)
        .api_err("Failed to check username")?
        .is_some()
    {
        return Err(ApiError::conflict("Username already taken"));
    }

    let password_hash =
        hash_password(&req.password).map_err(|_| ApiError::internal("Failed to hash password"))?;

    let user = state
        .store
        .create_user(&NewUser {
            username: req.username,
            password_hash,
            is_admin: req.is_admin,
            macroprocess_id: req.macroprocess_id,
            panel_url: req.panel_url,
            panel_title: req.panel_title,
        })
        .api_err("Failed to create user")?;

    Ok::<_, ApiError>((StatusCode::CREATED, Json(ApiResponse::success(user))))
}

pub async fn update_user(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateUserRequest>,
) -> impl IntoResponse {
    let mut user = state
        .store
        .get_user(id)
        .api_err("Failed to get user")?
        .or_not_found("User not found")?;

    if let Some(username) = req.username {
        validate_username(&username)?;
        if username != user.username
            && state
                .store
                .get_user_by_username(&username)
                .api_err("Failed to check username")?
                .is_some()
        {
            return Err(ApiError::conflict("Username already taken"));
        }
        user.username = username;
    }
    if let Some(password) = req.password {
        validate_password(&password)?;
        user.password_hash = hash_password(&password)
            .map_err(|_| ApiError::internal("Failed to hash password"))?;
    }
    if let Some(is_admin) = req.is_admin {
        user.is_admin = is_admin;
    }
    if let Some(macroprocess_id) = req.macroprocess_id {
        if let Some(macroprocess_id) = macroprocess_id {
            check_macroprocess(&state, macroprocess_id).await?;
        }
        user.macroprocess_id = macroprocess_id;
    }
    if let Some(panel_url) = req.panel_url {
        user.panel_url = panel_url;
    }
    if let Some(panel_title) = req.panel_title {
        user.panel_title = panel_title;
    }

    state
        .store
        .update_user(&user)
        .api_err("Failed to update user")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(user)))
}

pub async fn delete_user(
    admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    if admin.user.id == id {
        return Err(ApiError::bad_request("Cannot delete your own account"));
    }

    let deleted = state
        .store
        .delete_user(id)
        .api_err("Failed to delete user")?;

    if !deleted {
        return Err(ApiError::not_found("User not found"));
    }

    Ok::<_, ApiError>(StatusCode::NO_CONTENT)
}
