use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::auth::RequireAdmin;
use crate::server::AppState;
use crate::server::dto::SetConfigRequest;
use crate::server::extract::Json;
use crate::server::response::{ApiError, ApiResponse, StoreResultExt};
use crate::server::validation::validate_config_key;
use crate::types::ConfigEntry;

/// Panel keys that fall back to a documented default when unset. Keys
/// without a default (notably `panel_url`) return 404 instead.
const PANEL_DEFAULTS: &[(&str, &str)] = &[
    ("panel_title", "User Panel"),
    ("panel_height", "600"),
    ("panel_description", ""),
];

fn default_for(key: &str) -> Option<&'static str> {
    PANEL_DEFAULTS
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, v)| *v)
}

pub async fn get_config(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
) -> impl IntoResponse {
    let value = state
        .store
        .get_config(&key)
        .api_err("Failed to get config")?;

    let value = match value {
        Some(value) => value,
        None => match default_for(&key) {
            Some(default) => default.to_string(),
            None => return Err(ApiError::not_found("Config entry not found")),
        },
    };

    Ok::<_, ApiError>(Json(ApiResponse::success(ConfigEntry { key, value })))
}

pub async fn set_config(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Json(req): Json<SetConfigRequest>,
) -> impl IntoResponse {
    validate_config_key(&req.key)?;

    state
        .store
        .set_config(&req.key, &req.value)
        .api_err("Failed to set config")?;

    Ok::<_, ApiError>((
        StatusCode::CREATED,
        Json(ApiResponse::success(ConfigEntry {
            key: req.key,
            value: req.value,
        })),
    ))
}
