use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "blog_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BlogStatus {
    Draft,
    Published,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Blog {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub body: String,
    pub featured_image_url: Option<String>,
    pub tags: Vec<String>,
    pub category: String,
    pub status: BlogStatus,
    pub views: i64,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Optional filters for the public listing. All of them AND together.
#[derive(Debug, Default)]
pub struct BlogFilter {
    pub category: Option<String>,
    pub tag: Option<String>,
    pub author_id: Option<Uuid>,
}

const BLOG_COLUMNS: &str = "id, author_id, title, slug, excerpt, body, featured_image_url, \
                            tags, category, status, views, created_at, updated_at";

impl Blog {
    pub async fn create(
        db: &PgPool,
        author_id: Uuid,
        title: &str,
        slug: &str,
        excerpt: &str,
        body: &str,
        tags: &[String],
        category: &str,
        status: BlogStatus,
    ) -> sqlx::Result<Blog> {
        sqlx::query_as::<_, Blog>(&format!(
            r#"
            INSERT INTO blogs (author_id, title, slug, excerpt, body, tags, category, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {BLOG_COLUMNS}
            "#
        ))
        .bind(author_id)
        .bind(title)
        .bind(slug)
        .bind(excerpt)
        .bind(body)
        .bind(tags)
        .bind(category)
        .bind(status)
        .fetch_one(db)
        .await
    }

    pub async fn find_by_slug(db: &PgPool, slug: &str) -> sqlx::Result<Option<Blog>> {
        sqlx::query_as::<_, Blog>(&format!(
            "SELECT {BLOG_COLUMNS} FROM blogs WHERE slug = $1"
        ))
        .bind(slug)
        .fetch_optional(db)
        .await
    }

    pub async fn slug_taken(db: &PgPool, slug: &str) -> sqlx::Result<bool> {
        let row: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM blogs WHERE slug = $1")
            .bind(slug)
            .fetch_optional(db)
            .await?;
        Ok(row.is_some())
    }

    pub async fn list_published(
        db: &PgPool,
        filter: &BlogFilter,
        limit: i64,
        offset: i64,
    ) -> sqlx::Result<Vec<Blog>> {
        sqlx::query_as::<_, Blog>(&format!(
            r#"
            SELECT {BLOG_COLUMNS}
            FROM blogs
            WHERE status = 'published'
              AND ($1::text IS NULL OR category = $1)
              AND ($2::text IS NULL OR $2 = ANY(tags))
              AND ($3::uuid IS NULL OR author_id = $3)
            ORDER BY created_at DESC
            LIMIT $4 OFFSET $5
            "#
        ))
        .bind(filter.category.as_deref())
        .bind(filter.tag.as_deref())
        .bind(filter.author_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await
    }

    /// Dashboard listing: everything the author wrote, drafts included.
    pub async fn list_by_author(
        db: &PgPool,
        author_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> sqlx::Result<Vec<Blog>> {
        sqlx::query_as::<_, Blog>(&format!(
            r#"
            SELECT {BLOG_COLUMNS}
            FROM blogs
            WHERE author_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(author_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await
    }

    /// Write back an already-merged record. The slug is deliberately not in
    /// the SET list: it is fixed at creation so URLs stay stable.
    pub async fn update_merged(db: &PgPool, merged: &Blog) -> sqlx::Result<Blog> {
        sqlx::query_as::<_, Blog>(&format!(
            r#"
            UPDATE blogs
            SET title = $2, excerpt = $3, body = $4, featured_image_url = $5,
                tags = $6, category = $7, status = $8, updated_at = now()
            WHERE id = $1
            RETURNING {BLOG_COLUMNS}
            "#
        ))
        .bind(merged.id)
        .bind(&merged.title)
        .bind(&merged.excerpt)
        .bind(&merged.body)
        .bind(&merged.featured_image_url)
        .bind(&merged.tags)
        .bind(&merged.category)
        .bind(merged.status)
        .fetch_one(db)
        .await
    }

    pub async fn set_featured_image_url(db: &PgPool, id: Uuid, url: &str) -> sqlx::Result<Blog> {
        sqlx::query_as::<_, Blog>(&format!(
            r#"
            UPDATE blogs
            SET featured_image_url = $2, updated_at = now()
            WHERE id = $1
            RETURNING {BLOG_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(url)
        .fetch_one(db)
        .await
    }

    pub async fn delete(db: &PgPool, id: Uuid) -> sqlx::Result<bool> {
        let res = sqlx::query("DELETE FROM blogs WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    /// Single-statement increment, so concurrent readers never lose counts.
    pub async fn increment_views(db: &PgPool, id: Uuid) -> sqlx::Result<i64> {
        let (views,): (i64,) = sqlx::query_as(
            "UPDATE blogs SET views = views + 1 WHERE id = $1 RETURNING views",
        )
        .bind(id)
        .fetch_one(db)
        .await?;
        Ok(views)
    }

    /// Idempotent: liking twice leaves a single row.
    pub async fn add_like(db: &PgPool, blog_id: Uuid, user_id: Uuid) -> sqlx::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO blog_likes (blog_id, user_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(blog_id)
        .bind(user_id)
        .execute(db)
        .await?;
        Ok(())
    }

    /// Idempotent: removing an absent like is a no-op.
    pub async fn remove_like(db: &PgPool, blog_id: Uuid, user_id: Uuid) -> sqlx::Result<()> {
        sqlx::query("DELETE FROM blog_likes WHERE blog_id = $1 AND user_id = $2")
            .bind(blog_id)
            .bind(user_id)
            .execute(db)
            .await?;
        Ok(())
    }

    pub async fn like_count(db: &PgPool, blog_id: Uuid) -> sqlx::Result<i64> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM blog_likes WHERE blog_id = $1")
                .bind(blog_id)
                .fetch_one(db)
                .await?;
        Ok(count)
    }

    pub async fn liked_by(db: &PgPool, blog_id: Uuid, user_id: Uuid) -> sqlx::Result<bool> {
        let row: Option<(Uuid,)> = sqlx::query_as(
            "SELECT blog_id FROM blog_likes WHERE blog_id = $1 AND user_id = $2",
        )
        .bind(blog_id)
        .bind(user_id)
        .fetch_optional(db)
        .await?;
        Ok(row.is_some())
    }
}
