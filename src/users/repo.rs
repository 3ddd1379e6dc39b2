use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::policy::Actor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

/// Account status is stored and admin-mutable but not checked at login.
/// Whether it should gate authentication is an open gap in the product,
/// tracked in DESIGN.md; do not wire it into the login path silently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Active,
    Inactive,
    Suspended,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub status: UserStatus,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

const USER_COLUMNS: &str =
    "id, email, name, password_hash, role, status, bio, avatar_url, created_at, updated_at";

impl User {
    pub fn as_actor(&self) -> Actor {
        Actor {
            id: self.id,
            email: self.email.clone(),
            role: self.role,
        }
    }

    pub async fn find_by_email(db: &PgPool, email: &str) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(db)
        .await
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(db)
            .await
    }

    /// Create a regular account; role/status fall back to column defaults.
    pub async fn create(
        db: &PgPool,
        email: &str,
        name: &str,
        password_hash: &str,
    ) -> sqlx::Result<User> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (email, name, password_hash)
            VALUES ($1, $2, $3)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(email)
        .bind(name)
        .bind(password_hash)
        .fetch_one(db)
        .await
    }

    /// Create the configured admin account. Only the startup reconciliation
    /// calls this.
    pub async fn create_admin(db: &PgPool, email: &str, password_hash: &str) -> sqlx::Result<User> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (email, name, password_hash, role, status)
            VALUES ($1, 'Administrator', $2, 'admin', 'active')
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(email)
        .bind(password_hash)
        .fetch_one(db)
        .await
    }

    pub async fn list(db: &PgPool, limit: i64, offset: i64) -> sqlx::Result<Vec<User>> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await
    }

    /// Write already-merged profile fields. Merging happens in the handler
    /// via `merged_profile` so the skip-empty rule stays a pure function.
    pub async fn update_profile(
        db: &PgPool,
        id: Uuid,
        name: &str,
        bio: Option<&str>,
    ) -> sqlx::Result<User> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET name = $2, bio = $3, updated_at = now()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(name)
        .bind(bio)
        .fetch_one(db)
        .await
    }

    pub async fn set_avatar_url(db: &PgPool, id: Uuid, url: &str) -> sqlx::Result<User> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET avatar_url = $2, updated_at = now()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(url)
        .fetch_one(db)
        .await
    }

    pub async fn set_status(db: &PgPool, id: Uuid, status: UserStatus) -> sqlx::Result<User> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET status = $2, updated_at = now()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(status)
        .fetch_one(db)
        .await
    }

    /// Only the startup reconciliation promotes roles; the HTTP surface
    /// rejects role changes outright.
    pub async fn set_role(db: &PgPool, id: Uuid, role: Role) -> sqlx::Result<User> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET role = $2, updated_at = now()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(role)
        .fetch_one(db)
        .await
    }

    /// Delete a user and every blog they authored. Both deletes run in one
    /// transaction; the blogs go first so no orphaned content survives a
    /// partial failure. Returns false when the user did not exist.
    pub async fn delete_cascading(db: &PgPool, id: Uuid) -> sqlx::Result<bool> {
        let mut tx = db.begin().await?;
        sqlx::query("DELETE FROM blogs WHERE author_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let res = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(res.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: Uuid::new_v4(),
            email: "author@example.com".into(),
            name: "Author".into(),
            password_hash: "argon2-hash".into(),
            role: Role::User,
            status: UserStatus::Active,
            bio: None,
            avatar_url: None,
            created_at: OffsetDateTime::now_utc(),
            updated_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn serialization_never_leaks_password_hash() {
        let json = serde_json::to_string(&sample_user()).unwrap();
        assert!(!json.contains("argon2-hash"));
        assert!(!json.contains("password_hash"));
        assert!(json.contains("author@example.com"));
    }

    #[test]
    fn role_and_status_serialize_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
        assert_eq!(
            serde_json::to_string(&UserStatus::Suspended).unwrap(),
            "\"suspended\""
        );
    }

    #[test]
    fn as_actor_snapshots_identity_fields() {
        let user = sample_user();
        let actor = user.as_actor();
        assert_eq!(actor.id, user.id);
        assert_eq!(actor.email, user.email);
        assert_eq!(actor.role, Role::User);
    }
}
