use axum::{Json, extract::State, response::IntoResponse};
use tracing::{debug, warn};

use crate::{
    api::{app_state::AppState, dto::model_dto::*},
    error::AppError,
};

pub async fn list_models(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    debug!("Listing backend models");

    // 后端不可用时降级为单个默认模型，不向调用方报错
    let models = match state.backend.list_models().await {
        Ok(models) if !models.is_empty() => models,
        Ok(_) => vec![state.config.backend.default_model.clone()],
        Err(e) => {
            warn!(error = %e, "model listing failed, falling back to default");
            vec![state.config.backend.default_model.clone()]
        }
    };

    let total = models.len();
    Ok(Json(ModelListResponse { models, total }))
}
