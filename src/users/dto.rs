use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo::{User, UserStatus};

/// Self-service profile update; empty fields keep their stored value.
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub bio: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SetStatusRequest {
    pub status: UserStatus,
}

/// What anyone may see about an author. Email stays private.
#[derive(Debug, Serialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub name: String,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: OffsetDateTime,
}

impl From<User> for UserProfile {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            name: u.name,
            bio: u.bio,
            avatar_url: u.avatar_url,
            created_at: u.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::users::repo::Role;

    #[test]
    fn profile_hides_email_and_hash() {
        let user = User {
            id: Uuid::new_v4(),
            email: "hidden@example.com".into(),
            name: "Author".into(),
            password_hash: "argon2-hash".into(),
            role: Role::User,
            status: UserStatus::Active,
            bio: Some("writes about Rust".into()),
            avatar_url: None,
            created_at: OffsetDateTime::now_utc(),
            updated_at: OffsetDateTime::now_utc(),
        };
        let json = serde_json::to_string(&UserProfile::from(user)).unwrap();
        assert!(!json.contains("hidden@example.com"));
        assert!(!json.contains("argon2-hash"));
        assert!(json.contains("writes about Rust"));
    }
}
