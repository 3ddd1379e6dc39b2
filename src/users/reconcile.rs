use sqlx::PgPool;
use tracing::{debug, info};

use crate::auth::password::hash_password;
use crate::config::AdminConfig;

use super::repo::{Role, User};

/// What the startup pass has to do to converge the configured admin
/// account. Computed from the stored state alone, so idempotence is
/// checkable without a database.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileAction {
    CreateAdmin,
    Promote,
    Converged,
}

pub fn decide(existing_role: Option<Role>) -> ReconcileAction {
    match existing_role {
        None => ReconcileAction::CreateAdmin,
        Some(Role::Admin) => ReconcileAction::Converged,
        Some(Role::User) => ReconcileAction::Promote,
    }
}

/// Ensure the deployment-configured admin email corresponds to a user with
/// role=admin. Runs once at startup, before serving; at most one mutation
/// per run. Stray admin-role rows under other emails are left alone:
/// `policy::is_admin` re-checks the email on every decision, so they hold
/// no privilege.
pub async fn reconcile_admin(db: &PgPool, admin: &AdminConfig) -> anyhow::Result<()> {
    let existing = User::find_by_email(db, &admin.email).await?;
    match decide(existing.as_ref().map(|u| u.role)) {
        ReconcileAction::CreateAdmin => {
            let hash = hash_password(&admin.password)?;
            let user = User::create_admin(db, &admin.email, &hash).await?;
            info!(user_id = %user.id, email = %admin.email, "admin account created");
        }
        ReconcileAction::Promote => {
            // unwrap is safe: decide() returned Promote, so a row exists
            let user = existing.unwrap();
            User::set_role(db, user.id, Role::Admin).await?;
            info!(user_id = %user.id, email = %admin.email, "existing account promoted to admin");
        }
        ReconcileAction::Converged => {
            debug!(email = %admin.email, "admin account already converged");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// The role each action leaves behind for the configured email.
    fn role_after(action: ReconcileAction, before: Option<Role>) -> Option<Role> {
        match action {
            ReconcileAction::CreateAdmin | ReconcileAction::Promote => Some(Role::Admin),
            ReconcileAction::Converged => before,
        }
    }

    #[test]
    fn decides_each_starting_state() {
        assert_eq!(decide(None), ReconcileAction::CreateAdmin);
        assert_eq!(decide(Some(Role::User)), ReconcileAction::Promote);
        assert_eq!(decide(Some(Role::Admin)), ReconcileAction::Converged);
    }

    #[test]
    fn running_twice_equals_running_once() {
        for start in [None, Some(Role::User), Some(Role::Admin)] {
            let first = decide(start);
            let after_first = role_after(first, start);
            let second = decide(after_first);
            assert_eq!(second, ReconcileAction::Converged, "start = {:?}", start);
            assert_eq!(role_after(second, after_first), Some(Role::Admin));
        }
    }
}
