use super::types::{ConfigError, Environment};

pub(super) const DEFAULT_CORS_ORIGINS: &[&str] = &[
    "http://localhost:3000",
    "http://localhost:5173",
    "http://localhost:8080",
];

pub(super) fn env_optional(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

pub(super) fn env_or_default(name: &str, default: &str) -> String {
    env_optional(name).unwrap_or_else(|| default.to_string())
}

pub(super) fn parse_u16(field: &'static str, value: &str) -> Result<u16, ConfigError> {
    value
        .trim()
        .parse::<u16>()
        .map_err(|_| ConfigError::InvalidValue { field, value: value.to_string() })
}

pub(super) fn parse_u64(field: &'static str, value: &str) -> Result<u64, ConfigError> {
    value
        .trim()
        .parse::<u64>()
        .map_err(|_| ConfigError::InvalidValue { field, value: value.to_string() })
}

pub(super) fn parse_bool(value: &str) -> bool {
    matches!(value.trim(), "1" | "true" | "TRUE" | "yes" | "YES" | "on" | "ON")
}

pub(super) fn parse_environment(value: &str) -> Environment {
    match value.trim().to_ascii_lowercase().as_str() {
        "prod" | "production" => Environment::Production,
        "staging" => Environment::Staging,
        "test" | "testing" => Environment::Test,
        _ => Environment::Development,
    }
}

/// Accepts either a JSON array (`["http://a", "http://b"]`) or a comma
/// separated list. An empty value falls back to the localhost defaults.
pub(super) fn parse_cors_origins(raw: &str) -> Result<Vec<String>, ConfigError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(default_cors_origins());
    }

    let origins: Vec<String> = if trimmed.starts_with('[') {
        serde_json::from_str::<Vec<String>>(trimmed)
            .map_err(|_| ConfigError::InvalidCors(raw.to_string()))?
    } else {
        trimmed.split(',').map(|part| part.to_string()).collect()
    };

    let cleaned: Vec<String> = origins
        .into_iter()
        .map(|origin| origin.trim().trim_end_matches('/').to_string())
        .filter(|origin| !origin.is_empty())
        .collect();

    if cleaned.is_empty() {
        return Ok(default_cors_origins());
    }
    Ok(cleaned)
}

pub(super) fn default_cors_origins() -> Vec<String> {
    DEFAULT_CORS_ORIGINS.iter().map(|origin| origin.to_string()).collect()
}
