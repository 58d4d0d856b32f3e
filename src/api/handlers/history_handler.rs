use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use tracing::debug;

use crate::{
    api::{app_state::AppState, dto::history_dto::*},
    error::AppError,
};

pub async fn get_history(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    debug!("Getting history for persona: {}", name);

    // 先确认人格存在，未知人格返回 404
    let persona = state.persona_service.get(&name).await?;

    let log = state.history_store.load_log(&persona.name).await?;
    let total = log.len();

    let response = HistoryResponse {
        persona: persona.name,
        messages: log
            .into_iter()
            .map(|m| MessageResponse {
                role: m.role.as_str().to_string(),
                content: m.content,
            })
            .collect(),
        total,
    };

    Ok(Json(response))
}

pub async fn reset_history(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    debug!("Resetting history for persona: {}", name);

    let persona = state.persona_service.get(&name).await?;

    // 日志和摘要一起删除：摘要没有独立生命周期
    state.history_store.clear(&persona.name).await?;

    let response = ResetHistoryResponse {
        persona: persona.name,
        message: "History reset".to_string(),
    };

    Ok(Json(response))
}
