use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo::{Blog, BlogStatus};

#[derive(Debug, Deserialize)]
pub struct CreateBlogRequest {
    pub title: String,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub category: String,
    /// Defaults to published when omitted.
    pub status: Option<BlogStatus>,
}

/// Partial update. Absent or empty fields keep their stored value, see
/// `services::merge_blog_update`.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateBlogRequest {
    pub title: Option<String>,
    pub excerpt: Option<String>,
    pub body: Option<String>,
    pub featured_image_url: Option<String>,
    pub tags: Option<Vec<String>>,
    pub category: Option<String>,
    pub status: Option<BlogStatus>,
}

#[derive(Debug, Serialize)]
pub struct BlogListItem {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub featured_image_url: Option<String>,
    pub tags: Vec<String>,
    pub category: String,
    pub status: BlogStatus,
    pub views: i64,
    pub created_at: OffsetDateTime,
}

impl From<Blog> for BlogListItem {
    fn from(b: Blog) -> Self {
        Self {
            id: b.id,
            author_id: b.author_id,
            title: b.title,
            slug: b.slug,
            excerpt: b.excerpt,
            featured_image_url: b.featured_image_url,
            tags: b.tags,
            category: b.category,
            status: b.status,
            views: b.views,
            created_at: b.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BlogDetails {
    #[serde(flatten)]
    pub blog: Blog,
    pub like_count: i64,
    /// Present only for authenticated readers.
    pub liked_by_me: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct LikeResponse {
    pub blog_id: Uuid,
    pub like_count: i64,
    pub liked_by_me: bool,
}

#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    20
}

#[derive(Debug, Deserialize)]
pub struct ListFilter {
    pub category: Option<String>,
    pub tag: Option<String>,
    pub author: Option<Uuid>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}
