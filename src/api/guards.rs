use async_trait::async_trait;
use axum::extract::{FromRequestParts, State};
use axum::http::header;
use axum::http::request::Parts;

use crate::api::errors::ApiError;
use crate::core::security;
use crate::core::state::AppState;
use crate::services::access::{Identity, Role};

/// Extracts the caller from the Authorization header. Tokens are issued by
/// the university identity service; there is no local user table to check
/// against, so the claims themselves are the identity.
pub(crate) struct CurrentIdentity(pub(crate) Identity);

#[async_trait]
impl FromRequestParts<AppState> for CurrentIdentity {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let State(app_state) = State::<AppState>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to access application state"))?;

        let header_value = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(ApiError::Unauthorized("Not authenticated"))?;

        let token = header_value
            .strip_prefix("Bearer ")
            .ok_or(ApiError::Unauthorized("Not authenticated"))?;

        let claims = security::verify_token(token, app_state.settings())
            .map_err(|_| ApiError::Unauthorized("Could not validate credentials"))?;

        let user_id: i64 = claims
            .sub
            .parse()
            .map_err(|_| ApiError::Unauthorized("Could not validate credentials"))?;

        let Some(role) = Role::parse(&claims.role) else {
            return Err(ApiError::Unauthorized("Unknown role"));
        };

        Ok(CurrentIdentity(Identity {
            user_id,
            role,
            group_id: claims.group_id,
            permissions: claims.permissions.into_iter().collect(),
        }))
    }
}

pub(crate) fn require_permission(identity: &Identity, permission: &str) -> Result<(), ApiError> {
    if identity.has_permission(permission) {
        Ok(())
    } else {
        Err(ApiError::Forbidden("Permission denied"))
    }
}
