use serde::{Deserialize, Deserializer, Serialize};

use crate::types::{Category, DocType, User};

/// Wraps the value in an extra Option so an absent field (None) can be told
/// apart from an explicit null (Some(None)).
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

// Content entities use full-replace updates, so create and update share the
// same body shapes (NewMacroprocess / NewSubprocess / NewDocument).

#[derive(Debug, Default, Deserialize)]
pub struct ListMacroprocessesParams {
    #[serde(default)]
    pub category: Option<Category>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListSubprocessesParams {
    #[serde(default)]
    pub macroprocess_id: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListDocumentsParams {
    #[serde(default)]
    pub subprocess_id: Option<i64>,
    #[serde(default, rename = "type")]
    pub doc_type: Option<DocType>,
}

#[derive(Debug, Deserialize)]
pub struct SetConfigRequest {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub macroprocess_id: Option<i64>,
    #[serde(default)]
    pub panel_url: Option<String>,
    #[serde(default)]
    pub panel_title: Option<String>,
}

/// Users support partial updates; absent fields are left untouched. Password
/// is re-hashed when present. The nullable fields take an explicit null to
/// clear the stored value.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub is_admin: Option<bool>,
    #[serde(default, deserialize_with = "double_option")]
    pub macroprocess_id: Option<Option<i64>>,
    #[serde(default, deserialize_with = "double_option")]
    pub panel_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub panel_title: Option<Option<String>>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}
