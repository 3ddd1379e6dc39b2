mod app;
mod assist;
mod auth;
mod blogs;
mod categories;
mod clients;
mod config;
mod contact;
mod error;
mod policy;
mod slug;
mod state;
mod storage;
mod users;

use crate::users::reconcile::reconcile_admin;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "inkpress=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let state = state::AppState::init().await?;

    // Run migrations if present
    if let Err(e) = sqlx::migrate!("./migrations").run(&state.db).await {
        tracing::warn!(error = %e, "migrations folder not found or migration failed; continuing");
    }

    // Converge the configured admin account before accepting requests.
    reconcile_admin(&state.db, &state.config.admin).await?;

    let app = app::build_app(state);
    app::serve(app).await
}
