use crate::server::response::ApiError;

const MAX_NAME_LEN: usize = 120;
const MAX_USERNAME_LEN: usize = 64;
const MAX_CONFIG_KEY_LEN: usize = 64;
const MAX_URL_LEN: usize = 2048;

/// Display names for macroprocesses, subprocesses, and documents.
pub fn validate_entity_name(name: &str, entity: &str) -> Result<(), ApiError> {
    if name.trim().is_empty() {
        return Err(ApiError::bad_request(format!(
            "{entity} name cannot be empty"
        )));
    }
    if name.len() > MAX_NAME_LEN {
        return Err(ApiError::bad_request(format!(
            "{entity} name cannot exceed {MAX_NAME_LEN} characters"
        )));
    }
    Ok(())
}

pub fn validate_document_url(url: &str) -> Result<(), ApiError> {
    if url.is_empty() {
        return Err(ApiError::bad_request("Document url cannot be empty"));
    }
    if url.len() > MAX_URL_LEN {
        return Err(ApiError::bad_request(format!(
            "Document url cannot exceed {MAX_URL_LEN} characters"
        )));
    }
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ApiError::bad_request(
            "Document url must start with http:// or https://",
        ));
    }
    Ok(())
}

pub fn validate_username(username: &str) -> Result<(), ApiError> {
    if username.is_empty() {
        return Err(ApiError::bad_request("Username cannot be empty"));
    }
    if username.len() > MAX_USERNAME_LEN {
        return Err(ApiError::bad_request(format!(
            "Username cannot exceed {MAX_USERNAME_LEN} characters"
        )));
    }
    if username.contains(char::is_whitespace) {
        return Err(ApiError::bad_request("Username cannot contain whitespace"));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), ApiError> {
    if password.is_empty() {
        return Err(ApiError::bad_request("Password cannot be empty"));
    }
    Ok(())
}

pub fn validate_config_key(key: &str) -> Result<(), ApiError> {
    if key.is_empty() {
        return Err(ApiError::bad_request("Config key cannot be empty"));
    }
    if key.len() > MAX_CONFIG_KEY_LEN {
        return Err(ApiError::bad_request(format!(
            "Config key cannot exceed {MAX_CONFIG_KEY_LEN} characters"
        )));
    }
    if !key
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
    {
        return Err(ApiError::bad_request(
            "Config key can only contain alphanumeric characters, hyphens, underscores, and periods",
        ));
    }
    Ok(())
}
