use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use chrono::Utc;
use uuid::Uuid;

use crate::auth::{RequireAuth, TokenGenerator, verify_password};
use crate::error::Error;
use crate::server::AppState;
use crate::server::dto::{LoginRequest, LoginResponse};
use crate::server::extract::Json;
use crate::server::response::{ApiError, ApiResponse, StoreResultExt};
use crate::types::Token;

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> impl IntoResponse {
    let user = state
        .store
        .get_user_by_username(&req.username)
        .api_err("Failed to look up user")?
        .ok_or_else(|| ApiError::unauthorized("Invalid username or password"))?;

    let verified = verify_password(&req.password, &user.password_hash)
        .map_err(|_| ApiError::internal("Failed to verify password"))?;
    if !verified {
        return Err(ApiError::unauthorized("Invalid username or password"));
    }

    let generator = TokenGenerator::new();

    const MAX_RETRIES: u32 = 3;
    for _ in 0..MAX_RETRIES {
        let (raw_token, lookup, hash) = generator
            .generate()
            .map_err(|_| ApiError::internal("Failed to generate token"))?;

        let token = Token {
            id: Uuid::new_v4().to_string(),
            token_hash: hash,
            token_lookup: lookup,
            user_id: user.id,
            created_at: Utc::now(),
            expires_at: None,
            last_used_at: None,
        };

        match state.store.create_token(&token) {
            Ok(()) => {
                return Ok(Json(ApiResponse::success(LoginResponse {
                    token: raw_token,
                    user,
                })));
            }
            // Lookup prefix collision; roll a new token
            Err(Error::AlreadyExists) => continue,
            Err(_) => return Err(ApiError::internal("Failed to create token")),
        }
    }

    Err(ApiError::internal("Failed to create token after retries"))
}

pub async fn logout(auth: RequireAuth, State(state): State<Arc<AppState>>) -> impl IntoResponse {
    state
        .store
        .delete_token(&auth.token.id)
        .api_err("Failed to revoke token")?;

    Ok::<_, ApiError>(StatusCode::NO_CONTENT)
}

/// Returns the current principal, or 401 via the extractor.
pub async fn current_user(auth: RequireAuth) -> impl IntoResponse {
    Json(ApiResponse::success(auth.user))
}
