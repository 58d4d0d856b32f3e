use axum::{Json, extract::State, response::IntoResponse};
use tracing::debug;
use validator::Validate;

use crate::{
    api::{app_state::AppState, dto::chat_dto::*},
    error::AppError,
};

pub async fn post_chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<impl IntoResponse, AppError> {
    debug!("Chat message for persona: {}", request.persona);

    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let start = std::time::Instant::now();
    let outcome = state
        .chat_service
        .send_message(&request.persona, &request.message)
        .await
        .inspect_err(|_| state.metrics.record_chat_failure())?;

    state
        .metrics
        .record_chat(start.elapsed().as_millis() as u64);
    if outcome.summary_refreshed {
        state.metrics.record_summary_refresh();
    }

    let response = ChatResponse {
        response: outcome.reply,
        summary_refreshed: outcome.summary_refreshed,
    };

    Ok(Json(response))
}
