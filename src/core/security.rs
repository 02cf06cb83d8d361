// Verification of identity-service JWTs. Tokens are minted by the central
// university auth service; this crate only decodes and validates them. The
// encoding half is kept for tests and local tooling.
#![allow(dead_code)]

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::{Duration, OffsetDateTime};

use crate::core::config::Settings;

#[derive(Debug, Error)]
pub(crate) enum SecurityError {
    #[error("failed to encode JWT: {0}")]
    JwtEncoding(#[source] jsonwebtoken::errors::Error),
    #[error("failed to decode JWT: {0}")]
    JwtDecoding(#[source] jsonwebtoken::errors::Error),
    #[error("unsupported JWT algorithm: {0}")]
    UnsupportedAlgorithm(String),
}

/// Claims carried by identity-service tokens. `sub` is the numeric user id,
/// `group_id` is present for students, `permissions` is the flat
/// `verb:domain` grant list.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct Claims {
    pub(crate) sub: String,
    pub(crate) role: String,
    #[serde(default)]
    pub(crate) group_id: Option<i64>,
    #[serde(default)]
    pub(crate) permissions: Vec<String>,
    pub(crate) exp: i64,
}

pub(crate) struct IdentityTokenParams<'a> {
    pub(crate) subject: &'a str,
    pub(crate) role: &'a str,
    pub(crate) group_id: Option<i64>,
    pub(crate) permissions: Vec<String>,
}

pub(crate) fn create_identity_token(
    params: IdentityTokenParams<'_>,
    settings: &Settings,
    expires_in: Option<Duration>,
) -> Result<String, SecurityError> {
    let algorithm = algorithm_from_settings(settings)?;
    let lifetime = expires_in.unwrap_or_else(|| {
        Duration::minutes(settings.security().access_token_expire_minutes as i64)
    });
    let expires_at = OffsetDateTime::now_utc() + lifetime;

    let claims = Claims {
        sub: params.subject.to_string(),
        role: params.role.to_string(),
        group_id: params.group_id,
        permissions: params.permissions,
        exp: expires_at.unix_timestamp(),
    };

    encode(
        &Header::new(algorithm),
        &claims,
        &EncodingKey::from_secret(settings.security().secret_key.as_bytes()),
    )
    .map_err(SecurityError::JwtEncoding)
}

pub(crate) fn verify_token(token: &str, settings: &Settings) -> Result<Claims, SecurityError> {
    let algorithm = algorithm_from_settings(settings)?;
    let mut validation = Validation::new(algorithm);
    validation.validate_exp = true;
    validation.required_spec_claims.insert("exp".to_string());
    validation.required_spec_claims.insert("sub".to_string());

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(settings.security().secret_key.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(SecurityError::JwtDecoding)
}

fn algorithm_from_settings(settings: &Settings) -> Result<Algorithm, SecurityError> {
    match settings.security().algorithm.as_str() {
        "HS256" => Ok(Algorithm::HS256),
        other => Err(SecurityError::UnsupportedAlgorithm(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;

    fn test_settings() -> Settings {
        let _guard = test_support::env_lock_blocking();
        std::env::remove_var("UNIQUIZ_STRICT_CONFIG");
        std::env::remove_var("ALGORITHM");
        std::env::set_var("SECRET_KEY", "test-secret");
        Settings::load().unwrap()
    }

    #[test]
    fn token_roundtrip_preserves_claims() {
        let settings = test_settings();
        let token = create_identity_token(
            IdentityTokenParams {
                subject: "42",
                role: "student",
                group_id: Some(7),
                permissions: vec!["read:attempt".to_string(), "create:attempt".to_string()],
            },
            &settings,
            None,
        )
        .unwrap();

        let claims = verify_token(&token, &settings).unwrap();
        assert_eq!(claims.sub, "42");
        assert_eq!(claims.role, "student");
        assert_eq!(claims.group_id, Some(7));
        assert!(claims.permissions.contains(&"read:attempt".to_string()));
    }

    #[test]
    fn expired_token_is_rejected() {
        let settings = test_settings();
        let token = create_identity_token(
            IdentityTokenParams {
                subject: "42",
                role: "student",
                group_id: None,
                permissions: Vec::new(),
            },
            &settings,
            Some(Duration::minutes(-5)),
        )
        .unwrap();

        assert!(matches!(verify_token(&token, &settings), Err(SecurityError::JwtDecoding(_))));
    }

    #[test]
    fn unknown_algorithm_is_rejected() {
        let settings = {
            let _guard = test_support::env_lock_blocking();
            std::env::remove_var("UNIQUIZ_STRICT_CONFIG");
            std::env::set_var("SECRET_KEY", "test-secret");
            std::env::set_var("ALGORITHM", "RS256");
            let settings = Settings::load().unwrap();
            std::env::remove_var("ALGORITHM");
            settings
        };
        assert!(matches!(
            verify_token("irrelevant", &settings),
            Err(SecurityError::UnsupportedAlgorithm(_))
        ));
    }
}
