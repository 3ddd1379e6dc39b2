use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, Query, State},
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::{
        dto::PublicUser,
        extractors::{CurrentUser, MaybeUser},
    },
    blogs::dto::Pagination,
    blogs::services::{keep_nonempty, nonempty},
    error::ApiError,
    policy,
    state::AppState,
    storage::ext_from_mime,
};

use super::dto::{SetStatusRequest, UpdateProfileRequest, UserProfile};
use super::repo::User;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/me", patch(update_my_profile))
        .route("/users/me/avatar", post(upload_avatar))
        .route("/users/:id", get(get_profile).delete(delete_user))
        .route("/users/:id/status", patch(set_status))
        .route("/users/:id/role", patch(set_role))
        .layer(DefaultBodyLimit::max(5 * 1024 * 1024))
}

#[instrument(skip(state, user))]
pub async fn list_users(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(p): Query<Pagination>,
) -> Result<Json<Vec<PublicUser>>, ApiError> {
    policy::require_admin(&user.as_actor(), &state.config.admin.email)?;
    let users = User::list(&state.db, p.limit, p.offset).await?;
    Ok(Json(users.into_iter().map(PublicUser::from).collect()))
}

#[instrument(skip(state))]
pub async fn get_profile(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<UserProfile>, ApiError> {
    let user = User::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("User"))?;
    Ok(Json(user.into()))
}

#[instrument(skip(state, user, payload))]
pub async fn update_my_profile(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<PublicUser>, ApiError> {
    // Same last-non-empty-wins rule as blog updates.
    let name = keep_nonempty(payload.name, &user.name);
    let bio = nonempty(payload.bio).or(user.bio.clone());
    let updated = User::update_profile(&state.db, user.id, &name, bio.as_deref()).await?;
    Ok(Json(updated.into()))
}

#[instrument(skip(state, user, mp))]
pub async fn upload_avatar(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    mut mp: Multipart,
) -> Result<Json<PublicUser>, ApiError> {
    let mut upload = None;
    while let Ok(Some(field)) = mp.next_field().await {
        let name = field.name().map(|s| s.to_string());
        if name.as_deref() == Some("avatar") || name.as_deref() == Some("file") {
            let content_type = field
                .content_type()
                .map(|s| s.to_string())
                .unwrap_or_else(|| "application/octet-stream".into());
            let data = field
                .bytes()
                .await
                .map_err(|e| ApiError::Validation(e.to_string()))?;
            upload = Some((data, content_type));
            break;
        }
    }
    let (data, content_type) =
        upload.ok_or_else(|| ApiError::Validation("avatar field is required".into()))?;

    let ext = ext_from_mime(&content_type).unwrap_or("bin");
    let key = format!("avatars/{}/{}.{}", user.id, Uuid::new_v4(), ext);
    state
        .storage
        .put_object(&key, data, &content_type)
        .await
        .map_err(|e| ApiError::Upstream(e.to_string()))?;

    let url = state.storage.public_url(&key);
    let updated = User::set_avatar_url(&state.db, user.id, &url).await?;
    info!(user_id = %user.id, "avatar updated");
    Ok(Json(updated.into()))
}

#[instrument(skip(state, actor))]
pub async fn set_status(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<SetStatusRequest>,
) -> Result<Json<PublicUser>, ApiError> {
    policy::can_change_user_status(&actor.as_actor(), &state.config.admin.email)?;

    // 404 before the write so a missing target is not reported as updated
    let target = User::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("User"))?;

    let updated = User::set_status(&state.db, target.id, payload.status).await?;
    info!(user_id = %target.id, status = ?payload.status, "user status changed");
    Ok(Json(updated.into()))
}

/// Role mutation is categorically rejected, for every caller including the
/// admin. The startup reconciliation is the only path that ever writes
/// `role = admin`.
#[instrument(skip(maybe))]
pub async fn set_role(
    MaybeUser(maybe): MaybeUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    warn!(target_id = %id, "role change attempt rejected");
    let actor = maybe.as_ref().map(|u| u.as_actor());
    policy::can_change_user_role(actor.as_ref())?;
    Ok(StatusCode::OK)
}

#[instrument(skip(state, actor))]
pub async fn delete_user(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    policy::can_delete_user(&actor.as_actor(), &state.config.admin.email)?;

    let deleted = User::delete_cascading(&state.db, id).await?;
    if !deleted {
        return Err(ApiError::not_found("User"));
    }
    info!(user_id = %id, actor_id = %actor.id, "user deleted with their blogs");
    Ok(StatusCode::NO_CONTENT)
}
