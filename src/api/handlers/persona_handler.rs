use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::debug;
use validator::Validate;

use crate::{
    api::{app_state::AppState, dto::persona_dto::*},
    error::AppError,
    models::persona::Persona,
};

fn to_response(persona: Persona) -> PersonaResponse {
    PersonaResponse {
        name: persona.name,
        role: persona.role,
        temperament: persona.temperament,
        expertise: persona.expertise,
        communication_style: persona.communication_style,
        model: persona.model,
        temperature: persona.temperature,
        max_tokens: persona.max_tokens,
        top_p: persona.top_p,
        created_at: persona.created_at,
    }
}

pub async fn list_personas(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    debug!("Listing personas");

    let personas = state.persona_service.list().await?;
    let total = personas.len();

    let response = PersonaListResponse {
        personas: personas.into_iter().map(to_response).collect(),
        total,
    };

    Ok(Json(response))
}

pub async fn create_persona(
    State(state): State<AppState>,
    Json(request): Json<CreatePersonaRequest>,
) -> Result<impl IntoResponse, AppError> {
    debug!("Creating persona: {}", request.name);

    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let defaults = &state.config.persona_defaults;
    let mut persona = Persona::new(
        &request.name,
        &request.role,
        &request.temperament,
        &request.expertise,
        &request.communication_style,
        request
            .model
            .as_deref()
            .unwrap_or(&state.config.backend.default_model),
        defaults,
    );

    if let Some(temperature) = request.temperature {
        persona.temperature = temperature;
    }
    if let Some(max_tokens) = request.max_tokens {
        persona.max_tokens = max_tokens;
    }
    if let Some(top_p) = request.top_p {
        persona.top_p = top_p;
    }

    let persona = state.persona_service.create(persona).await?;

    let response = CreatePersonaResponse {
        name: persona.name,
        created_at: persona.created_at,
        message: "Persona created".to_string(),
    };

    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn delete_persona(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    debug!("Deleting persona: {}", name);

    state.persona_service.delete(&name).await?;

    let response = DeletePersonaResponse {
        name,
        message: "Persona deleted".to_string(),
    };

    Ok(Json(response))
}
