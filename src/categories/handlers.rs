use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    auth::extractors::CurrentUser,
    blogs::services::keep_nonempty,
    error::ApiError,
    policy,
    slug::slugify,
    state::AppState,
};

use super::dto::{CreateCategoryRequest, UpdateCategoryRequest};
use super::repo::{Category, CategoryWithCount};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/categories", get(list_categories).post(create_category))
        .route(
            "/categories/:id",
            patch(update_category).delete(delete_category),
        )
}

#[instrument(skip(state))]
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<CategoryWithCount>>, ApiError> {
    let categories = Category::list_with_counts(&state.db).await?;
    Ok(Json(categories))
}

#[instrument(skip(state, actor, payload))]
pub async fn create_category(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Json(payload): Json<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<Category>), ApiError> {
    policy::require_admin(&actor.as_actor(), &state.config.admin.email)?;

    let name = payload.name.trim().to_string();
    let slug = slugify(&name);
    if slug.is_empty() {
        return Err(ApiError::Validation(
            "Category name must contain at least one letter or digit".into(),
        ));
    }
    if Category::name_or_slug_taken(&state.db, &name, &slug).await? {
        return Err(ApiError::Conflict(format!(
            "Category '{}' already exists",
            name
        )));
    }

    let category = Category::create(&state.db, &name, &slug, &payload.color).await?;
    info!(category_id = %category.id, slug = %category.slug, "category created");
    Ok((StatusCode::CREATED, Json(category)))
}

#[instrument(skip(state, actor, payload))]
pub async fn update_category(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCategoryRequest>,
) -> Result<Json<Category>, ApiError> {
    policy::require_admin(&actor.as_actor(), &state.config.admin.email)?;

    let existing = Category::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Category"))?;

    let name = keep_nonempty(payload.name, &existing.name);
    let color = keep_nonempty(payload.color, &existing.color);
    let updated = Category::update(&state.db, id, name.trim(), &color).await?;
    Ok(Json(updated))
}

#[instrument(skip(state, actor))]
pub async fn delete_category(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    policy::require_admin(&actor.as_actor(), &state.config.admin.email)?;

    if !Category::delete(&state.db, id).await? {
        return Err(ApiError::not_found("Category"));
    }
    info!(category_id = %id, "category deleted");
    Ok(StatusCode::NO_CONTENT)
}
