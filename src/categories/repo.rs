use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub color: String,
    pub created_at: OffsetDateTime,
}

/// Listing row with the derived count. The count is never stored: it is a
/// string match between `blogs.category` and the category slug, so a blog
/// whose category matches no slug simply counts toward nothing.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CategoryWithCount {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub color: String,
    pub created_at: OffsetDateTime,
    pub blog_count: i64,
}

const CATEGORY_COLUMNS: &str = "id, name, slug, color, created_at";

impl Category {
    pub async fn create(db: &PgPool, name: &str, slug: &str, color: &str) -> sqlx::Result<Category> {
        sqlx::query_as::<_, Category>(&format!(
            r#"
            INSERT INTO categories (name, slug, color)
            VALUES ($1, $2, $3)
            RETURNING {CATEGORY_COLUMNS}
            "#
        ))
        .bind(name)
        .bind(slug)
        .bind(color)
        .fetch_one(db)
        .await
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> sqlx::Result<Option<Category>> {
        sqlx::query_as::<_, Category>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await
    }

    pub async fn name_or_slug_taken(db: &PgPool, name: &str, slug: &str) -> sqlx::Result<bool> {
        let row: Option<(Uuid,)> =
            sqlx::query_as("SELECT id FROM categories WHERE name = $1 OR slug = $2")
                .bind(name)
                .bind(slug)
                .fetch_optional(db)
                .await?;
        Ok(row.is_some())
    }

    pub async fn list_with_counts(db: &PgPool) -> sqlx::Result<Vec<CategoryWithCount>> {
        sqlx::query_as::<_, CategoryWithCount>(
            r#"
            SELECT c.id, c.name, c.slug, c.color, c.created_at,
                   (SELECT COUNT(*) FROM blogs b WHERE b.category = c.slug) AS blog_count
            FROM categories c
            ORDER BY c.name ASC
            "#,
        )
        .fetch_all(db)
        .await
    }

    /// Write back merged fields. The slug stays fixed, matching blog slugs.
    pub async fn update(db: &PgPool, id: Uuid, name: &str, color: &str) -> sqlx::Result<Category> {
        sqlx::query_as::<_, Category>(&format!(
            r#"
            UPDATE categories
            SET name = $2, color = $3
            WHERE id = $1
            RETURNING {CATEGORY_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(name)
        .bind(color)
        .fetch_one(db)
        .await
    }

    pub async fn delete(db: &PgPool, id: Uuid) -> sqlx::Result<bool> {
        let res = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}
