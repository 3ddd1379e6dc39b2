use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post, put},
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::extractors::{AuthUser, CurrentUser, MaybeUser},
    error::ApiError,
    policy,
    slug::slugify,
    state::AppState,
    storage::ext_from_mime,
};

use super::dto::{
    BlogDetails, BlogListItem, CreateBlogRequest, LikeResponse, ListFilter, Pagination,
    UpdateBlogRequest,
};
use super::repo::{Blog, BlogFilter, BlogStatus};
use super::services::merge_blog_update;

// Single-blog routes address by slug throughout: the slug is the public
// identity of a post and stays stable across title edits.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/blogs", get(list_blogs).post(create_blog))
        .route("/blogs/mine", get(list_my_blogs))
        .route(
            "/blogs/:slug",
            get(get_blog).patch(update_blog).delete(delete_blog),
        )
        .route("/blogs/:slug/like", put(like_blog).delete(unlike_blog))
        .route("/blogs/:slug/image", post(upload_featured_image))
        .layer(DefaultBodyLimit::max(20 * 1024 * 1024))
}

#[instrument(skip(state))]
pub async fn list_blogs(
    State(state): State<AppState>,
    Query(f): Query<ListFilter>,
) -> Result<Json<Vec<BlogListItem>>, ApiError> {
    let filter = BlogFilter {
        category: f.category,
        tag: f.tag,
        author_id: f.author,
    };
    let blogs = Blog::list_published(&state.db, &filter, f.limit, f.offset).await?;
    Ok(Json(blogs.into_iter().map(BlogListItem::from).collect()))
}

#[instrument(skip(state))]
pub async fn list_my_blogs(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(p): Query<Pagination>,
) -> Result<Json<Vec<BlogListItem>>, ApiError> {
    let blogs = Blog::list_by_author(&state.db, user_id, p.limit, p.offset).await?;
    Ok(Json(blogs.into_iter().map(BlogListItem::from).collect()))
}

/// Public read. Drafts answer 404 to everyone but the author and the
/// admin, so unpublished slugs are not discoverable by probing.
#[instrument(skip(state, maybe))]
pub async fn get_blog(
    State(state): State<AppState>,
    MaybeUser(maybe): MaybeUser,
    Path(slug): Path<String>,
) -> Result<Json<BlogDetails>, ApiError> {
    let mut blog = Blog::find_by_slug(&state.db, &slug)
        .await?
        .ok_or_else(|| ApiError::not_found("Blog"))?;

    let actor = maybe.as_ref().map(|u| u.as_actor());
    if !policy::can_read_blog(
        actor.as_ref(),
        blog.author_id,
        blog.status,
        &state.config.admin.email,
    ) {
        return Err(ApiError::not_found("Blog"));
    }

    // Only published reads count toward the view counter.
    if blog.status == BlogStatus::Published {
        blog.views = Blog::increment_views(&state.db, blog.id).await?;
    }

    let like_count = Blog::like_count(&state.db, blog.id).await?;
    let liked_by_me = match &maybe {
        Some(user) => Some(Blog::liked_by(&state.db, blog.id, user.id).await?),
        None => None,
    };

    Ok(Json(BlogDetails {
        blog,
        like_count,
        liked_by_me,
    }))
}

#[instrument(skip(state, user, payload))]
pub async fn create_blog(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<CreateBlogRequest>,
) -> Result<(StatusCode, HeaderMap, Json<Blog>), ApiError> {
    let slug = slugify(&payload.title);
    if slug.is_empty() {
        warn!(title = %payload.title, "title yields an empty slug");
        return Err(ApiError::Validation(
            "Title must contain at least one letter or digit".into(),
        ));
    }
    if Blog::slug_taken(&state.db, &slug).await? {
        return Err(ApiError::Conflict(format!(
            "A blog with slug '{}' already exists",
            slug
        )));
    }

    let status = payload.status.unwrap_or(BlogStatus::Published);
    let blog = Blog::create(
        &state.db,
        user.id,
        &payload.title,
        &slug,
        &payload.excerpt,
        &payload.body,
        &payload.tags,
        &payload.category,
        status,
    )
    .await?;

    info!(blog_id = %blog.id, author_id = %user.id, slug = %blog.slug, "blog created");

    let mut headers = HeaderMap::new();
    if let Ok(location) = format!("/api/v1/blogs/{}", blog.slug).parse() {
        headers.insert(axum::http::header::LOCATION, location);
    }
    Ok((StatusCode::CREATED, headers, Json(blog)))
}

#[instrument(skip(state, user, payload))]
pub async fn update_blog(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(slug): Path<String>,
    Json(payload): Json<UpdateBlogRequest>,
) -> Result<Json<Blog>, ApiError> {
    let existing = Blog::find_by_slug(&state.db, &slug)
        .await?
        .ok_or_else(|| ApiError::not_found("Blog"))?;

    let actor = user.as_actor();
    policy::can_mutate_blog(Some(&actor), existing.author_id, &state.config.admin.email)?;

    let merged = merge_blog_update(&existing, payload);
    let updated = Blog::update_merged(&state.db, &merged).await?;
    Ok(Json(updated))
}

#[instrument(skip(state, user))]
pub async fn delete_blog(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(slug): Path<String>,
) -> Result<StatusCode, ApiError> {
    let existing = Blog::find_by_slug(&state.db, &slug)
        .await?
        .ok_or_else(|| ApiError::not_found("Blog"))?;

    let actor = user.as_actor();
    policy::can_mutate_blog(Some(&actor), existing.author_id, &state.config.admin.email)?;

    Blog::delete(&state.db, existing.id).await?;
    info!(blog_id = %existing.id, actor_id = %user.id, "blog deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state, user))]
pub async fn like_blog(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(slug): Path<String>,
) -> Result<Json<LikeResponse>, ApiError> {
    let blog = readable_blog(&state, &user, &slug).await?;
    Blog::add_like(&state.db, blog.id, user.id).await?;
    like_response(&state, blog.id, user.id).await
}

#[instrument(skip(state, user))]
pub async fn unlike_blog(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(slug): Path<String>,
) -> Result<Json<LikeResponse>, ApiError> {
    let blog = readable_blog(&state, &user, &slug).await?;
    Blog::remove_like(&state.db, blog.id, user.id).await?;
    like_response(&state, blog.id, user.id).await
}

#[instrument(skip(state, user, mp))]
pub async fn upload_featured_image(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(slug): Path<String>,
    mut mp: Multipart,
) -> Result<Json<Blog>, ApiError> {
    let existing = Blog::find_by_slug(&state.db, &slug)
        .await?
        .ok_or_else(|| ApiError::not_found("Blog"))?;

    let actor = user.as_actor();
    policy::can_mutate_blog(Some(&actor), existing.author_id, &state.config.admin.email)?;

    let mut upload = None;
    while let Ok(Some(field)) = mp.next_field().await {
        let name = field.name().map(|s| s.to_string());
        if name.as_deref() == Some("image") || name.as_deref() == Some("file") {
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
        upload.ok_or_else(|| ApiError::Validation("image field is required".into()))?;

    let ext = ext_from_mime(&content_type).unwrap_or("bin");
    let key = format!("blogs/{}/{}.{}", existing.id, Uuid::new_v4(), ext);
    state
        .storage
        .put_object(&key, data, &content_type)
        .await
        .map_err(|e| ApiError::Upstream(e.to_string()))?;

    let url = state.storage.public_url(&key);
    let updated = Blog::set_featured_image_url(&state.db, existing.id, &url).await?;
    Ok(Json(updated))
}

async fn readable_blog(
    state: &AppState,
    user: &crate::users::repo::User,
    slug: &str,
) -> Result<Blog, ApiError> {
    let blog = Blog::find_by_slug(&state.db, slug)
        .await?
        .ok_or_else(|| ApiError::not_found("Blog"))?;
    let actor = user.as_actor();
    if !policy::can_read_blog(
        Some(&actor),
        blog.author_id,
        blog.status,
        &state.config.admin.email,
    ) {
        return Err(ApiError::not_found("Blog"));
    }
    Ok(blog)
}

async fn like_response(
    state: &AppState,
    blog_id: Uuid,
    user_id: Uuid,
) -> Result<Json<LikeResponse>, ApiError> {
    let like_count = Blog::like_count(&state.db, blog_id).await?;
    let liked_by_me = Blog::liked_by(&state.db, blog_id, user_id).await?;
    Ok(Json(LikeResponse {
        blog_id,
        like_count,
        liked_by_me,
    }))
}
