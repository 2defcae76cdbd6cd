use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Category, DocType};

/// Top tier of the content hierarchy. Owns subprocesses; deleting one
/// cascades through its subprocesses down to their documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Macroprocess {
    pub id: i64,
    pub name: String,
    pub category: Category,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMacroprocess {
    pub name: String,
    pub category: Category,
}

/// Mid-tier grouping owned by a macroprocess.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subprocess {
    pub id: i64,
    pub name: String,
    pub macroprocess_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSubprocess {
    pub name: String,
    pub macroprocess_id: i64,
}

/// Leaf content record pointing at an externally hosted file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub doc_type: DocType,
    pub url: String,
    pub subprocess_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewDocument {
    pub name: String,
    #[serde(rename = "type")]
    pub doc_type: DocType,
    pub url: String,
    pub subprocess_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(skip)]
    pub password_hash: String,
    pub is_admin: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub macroprocess_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub panel_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub panel_title: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub is_admin: bool,
    pub macroprocess_id: Option<i64>,
    pub panel_url: Option<String>,
    pub panel_title: Option<String>,
}

/// Flat key-value setting for side-panel embedding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigEntry {
    pub key: String,
    pub value: String,
}

/// Auth credential bound to a user. The raw token is only shown once at
/// issuance; only its argon2 hash and a short lookup prefix are stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub id: String,
    #[serde(skip)]
    pub token_hash: String,
    #[serde(skip)]
    pub token_lookup: String,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_used_at: Option<DateTime<Utc>>,
}
