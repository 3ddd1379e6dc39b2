use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};

use crate::{auth::extractors::CurrentUser, error::ApiError, state::AppState};

#[derive(Debug, Deserialize)]
pub struct CompleteRequest {
    pub prompt: String,
}

#[derive(Debug, Serialize)]
pub struct CompleteResponse {
    pub completion: String,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/assist/complete", post(complete))
}

/// Writing assistance for the author dashboard. The completion API is a
/// pass-through collaborator: its failure becomes a 502 with the upstream
/// message, no retry.
#[instrument(skip(state, user, payload))]
pub async fn complete(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<CompleteRequest>,
) -> Result<Json<CompleteResponse>, ApiError> {
    if payload.prompt.trim().is_empty() {
        return Err(ApiError::Validation("prompt is required".into()));
    }

    let completion = state.ai.complete(&payload.prompt).await.map_err(|e| {
        warn!(user_id = %user.id, error = %e, "completion failed");
        ApiError::Upstream(e.to_string())
    })?;

    Ok(Json(CompleteResponse { completion }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fake_completion_round_trips() {
        let state = AppState::fake();
        let text = state.ai.complete("outline a post about lifetimes").await.unwrap();
        assert!(text.contains("outline a post about lifetimes"));
    }
}
