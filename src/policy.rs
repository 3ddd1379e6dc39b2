//! Pure authorization rules.
//!
//! Every function here is a total function over its inputs: no I/O, no
//! ambient configuration. The configured admin email is passed in
//! explicitly so the rules stay testable and the admin identity stays
//! pinned to deployment config rather than to mutable database state.

use uuid::Uuid;

use crate::blogs::repo::BlogStatus;
use crate::users::repo::Role;

/// Snapshot of the authenticated caller, taken from the user row loaded by
/// the bearer-token extractor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
}

/// Why a check refused. Unauthenticated and Forbidden are distinct
/// outcomes (401 vs 403) and must never be conflated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deny {
    Unauthenticated,
    Forbidden,
}

/// A stored `role = admin` alone is not enough: the email must also match
/// the configured admin address. Database tampering or an accidental role
/// escalation cannot mint a second admin.
pub fn is_admin(actor: &Actor, admin_email: &str) -> bool {
    actor.role == Role::Admin && actor.email.eq_ignore_ascii_case(admin_email)
}

/// Published blogs are world-readable. Drafts are visible only to their
/// author and the admin.
pub fn can_read_blog(
    actor: Option<&Actor>,
    author_id: Uuid,
    status: BlogStatus,
    admin_email: &str,
) -> bool {
    match status {
        BlogStatus::Published => true,
        BlogStatus::Draft => match actor {
            Some(a) => a.id == author_id || is_admin(a, admin_email),
            None => false,
        },
    }
}

/// Update and delete share one rule: the author or the admin, nobody else.
pub fn can_mutate_blog(
    actor: Option<&Actor>,
    author_id: Uuid,
    admin_email: &str,
) -> Result<(), Deny> {
    let actor = actor.ok_or(Deny::Unauthenticated)?;
    if actor.id == author_id || is_admin(actor, admin_email) {
        Ok(())
    } else {
        Err(Deny::Forbidden)
    }
}

/// Role mutation over the API is categorically rejected, for every caller.
/// The startup reconciliation is the only writer of `role = admin`.
pub fn can_change_user_role(_actor: Option<&Actor>) -> Result<(), Deny> {
    Err(Deny::Forbidden)
}

pub fn can_change_user_status(actor: &Actor, admin_email: &str) -> Result<(), Deny> {
    require_admin(actor, admin_email)
}

pub fn can_delete_user(actor: &Actor, admin_email: &str) -> Result<(), Deny> {
    require_admin(actor, admin_email)
}

pub fn require_admin(actor: &Actor, admin_email: &str) -> Result<(), Deny> {
    if is_admin(actor, admin_email) {
        Ok(())
    } else {
        Err(Deny::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADMIN_EMAIL: &str = "admin@example.com";

    fn actor(role: Role, email: &str) -> Actor {
        Actor {
            id: Uuid::new_v4(),
            email: email.into(),
            role,
        }
    }

    #[test]
    fn admin_requires_role_and_email_together() {
        let pinned = actor(Role::Admin, ADMIN_EMAIL);
        let stray_admin_row = actor(Role::Admin, "impostor@example.com");
        let right_email_wrong_role = actor(Role::User, ADMIN_EMAIL);

        assert!(is_admin(&pinned, ADMIN_EMAIL));
        assert!(!is_admin(&stray_admin_row, ADMIN_EMAIL));
        assert!(!is_admin(&right_email_wrong_role, ADMIN_EMAIL));
    }

    #[test]
    fn admin_email_compare_is_case_insensitive() {
        let a = actor(Role::Admin, "Admin@Example.com");
        assert!(is_admin(&a, ADMIN_EMAIL));
    }

    #[test]
    fn published_blogs_are_readable_by_anyone() {
        let author = Uuid::new_v4();
        assert!(can_read_blog(None, author, BlogStatus::Published, ADMIN_EMAIL));
        let stranger = actor(Role::User, "reader@example.com");
        assert!(can_read_blog(
            Some(&stranger),
            author,
            BlogStatus::Published,
            ADMIN_EMAIL
        ));
    }

    #[test]
    fn drafts_are_visible_only_to_author_and_admin() {
        let author = actor(Role::User, "author@example.com");
        let stranger = actor(Role::User, "reader@example.com");
        let admin = actor(Role::Admin, ADMIN_EMAIL);

        assert!(!can_read_blog(None, author.id, BlogStatus::Draft, ADMIN_EMAIL));
        assert!(!can_read_blog(
            Some(&stranger),
            author.id,
            BlogStatus::Draft,
            ADMIN_EMAIL
        ));
        assert!(can_read_blog(
            Some(&author),
            author.id,
            BlogStatus::Draft,
            ADMIN_EMAIL
        ));
        assert!(can_read_blog(
            Some(&admin),
            author.id,
            BlogStatus::Draft,
            ADMIN_EMAIL
        ));
    }

    #[test]
    fn mutation_denies_anonymous_and_strangers_distinctly() {
        let author_id = Uuid::new_v4();
        let stranger = actor(Role::User, "reader@example.com");

        assert_eq!(
            can_mutate_blog(None, author_id, ADMIN_EMAIL),
            Err(Deny::Unauthenticated)
        );
        assert_eq!(
            can_mutate_blog(Some(&stranger), author_id, ADMIN_EMAIL),
            Err(Deny::Forbidden)
        );
    }

    #[test]
    fn mutation_allows_author_and_pinned_admin_only() {
        let author = actor(Role::User, "author@example.com");
        let admin = actor(Role::Admin, ADMIN_EMAIL);
        let stray_admin_row = actor(Role::Admin, "impostor@example.com");

        assert!(can_mutate_blog(Some(&author), author.id, ADMIN_EMAIL).is_ok());
        assert!(can_mutate_blog(Some(&admin), author.id, ADMIN_EMAIL).is_ok());
        assert_eq!(
            can_mutate_blog(Some(&stray_admin_row), author.id, ADMIN_EMAIL),
            Err(Deny::Forbidden)
        );
    }

    #[test]
    fn role_changes_are_rejected_for_everyone() {
        let admin = actor(Role::Admin, ADMIN_EMAIL);
        assert_eq!(can_change_user_role(None), Err(Deny::Forbidden));
        assert_eq!(can_change_user_role(Some(&admin)), Err(Deny::Forbidden));
    }

    #[test]
    fn status_change_and_user_delete_are_admin_only() {
        let admin = actor(Role::Admin, ADMIN_EMAIL);
        let user = actor(Role::User, "someone@example.com");

        assert!(can_change_user_status(&admin, ADMIN_EMAIL).is_ok());
        assert_eq!(
            can_change_user_status(&user, ADMIN_EMAIL),
            Err(Deny::Forbidden)
        );
        assert!(can_delete_user(&admin, ADMIN_EMAIL).is_ok());
        assert_eq!(can_delete_user(&user, ADMIN_EMAIL), Err(Deny::Forbidden));
    }
}
