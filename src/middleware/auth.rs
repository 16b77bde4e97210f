use axum::{
    extract::OptionalFromRequestParts,
    http::{header, request::Parts},
};
use uuid::Uuid;

use crate::{
    error::AppError,
    models::{User, UserRole},
    state::AppState,
};

/// The resolved caller of a request.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: i64,
    pub uuid: Uuid,
    pub role: UserRole,
}

impl From<&User> for AuthUser {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id,
            uuid: user.uuid,
            role: user.role,
        }
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    let value = parts.headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then_some(token)
}

// Anything short of a valid token for an existing user resolves to `None`;
// the access policy then turns an absent caller into 401.
impl OptionalFromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Option<Self>, Self::Rejection> {
        let Some(token) = bearer_token(parts) else {
            return Ok(None);
        };
        let Some(uuid) = state.tokens.verify(token) else {
            return Ok(None);
        };

        let user = state.store.find_user_by_uuid(uuid).await?;
        if user.is_none() {
            tracing::debug!(user = %uuid, "token subject no longer exists");
        }
        Ok(user.as_ref().map(AuthUser::from))
    }
}
