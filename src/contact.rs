use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde::Deserialize;
use tracing::{info, instrument, warn};

use crate::{auth::handlers::is_valid_email, error::ApiError, state::AppState};

#[derive(Debug, Deserialize)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub message: String,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/contact", post(contact))
}

/// Public contact form: one mail to the configured admin address.
#[instrument(skip(state, payload))]
pub async fn contact(
    State(state): State<AppState>,
    Json(payload): Json<ContactRequest>,
) -> Result<StatusCode, ApiError> {
    if !is_valid_email(payload.email.trim()) {
        return Err(ApiError::Validation("Invalid email".into()));
    }
    if payload.message.trim().is_empty() {
        return Err(ApiError::Validation("Message is required".into()));
    }

    let subject = format!("Contact form: {}", payload.name.trim());
    let body = format!(
        "From: {} <{}>\n\n{}",
        payload.name.trim(),
        payload.email.trim(),
        payload.message.trim()
    );

    state
        .mailer
        .send(&state.config.admin.email, &subject, &body)
        .await
        .map_err(|e| {
            warn!(error = %e, "contact mail failed");
            ApiError::Upstream(e.to_string())
        })?;

    info!(from = %payload.email, "contact message forwarded");
    Ok(StatusCode::ACCEPTED)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fake_mailer_accepts_contact_mail() {
        let state = AppState::fake();
        state
            .mailer
            .send("admin@example.com", "Contact form: Reader", "hello")
            .await
            .unwrap();
    }
}
