use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::warn;
use uuid::Uuid;

use crate::{error::ApiError, state::AppState, users::repo::User};

use super::jwt::{JwtKeys, TokenKind};

/// Lightweight extractor carrying just the verified subject id. Enough for
/// routes that only need to know who is calling.
pub struct AuthUser(pub Uuid);

/// Extractor that also loads the caller's user row. Authorization policy
/// needs the stored role and email, so routes guarded by `policy::*` use
/// this one. Account status is deliberately not checked here (see
/// DESIGN.md).
pub struct CurrentUser(pub User);

/// Optional variant for public routes whose response differs for
/// authenticated callers (draft visibility, liked-by-me). Any token
/// problem degrades to anonymous instead of failing the request.
pub struct MaybeUser(pub Option<User>);

fn bearer_token(parts: &Parts) -> Result<&str, ApiError> {
    let header = parts
        .headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::Unauthenticated("Missing Authorization header".into()))?;
    header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::Unauthenticated("Invalid Authorization header".into()))
}

fn verify_access(keys: &JwtKeys, token: &str) -> Result<Uuid, ApiError> {
    let claims = keys.verify(token).map_err(|_| {
        warn!("invalid or expired token");
        ApiError::Unauthenticated("Invalid or expired token".into())
    })?;
    if claims.kind != TokenKind::Access {
        return Err(ApiError::Unauthenticated("Access token required".into()));
    }
    Ok(claims.sub)
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = JwtKeys::from_ref(state);
        let user_id = verify_access(&keys, bearer_token(parts)?)?;
        Ok(AuthUser(user_id))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let keys = JwtKeys::from_ref(state);
        let user_id = verify_access(&keys, bearer_token(parts)?)?;
        let user = User::find_by_id(&state.db, user_id)
            .await?
            .ok_or_else(|| ApiError::Unauthenticated("User no longer exists".into()))?;
        Ok(CurrentUser(user))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match CurrentUser::from_request_parts(parts, state).await {
            Ok(CurrentUser(user)) => Ok(MaybeUser(Some(user))),
            Err(_) => Ok(MaybeUser(None)),
        }
    }
}
