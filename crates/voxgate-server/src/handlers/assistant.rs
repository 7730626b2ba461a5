//! Slug-addressed assistant handlers.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use tracing::{error, info};
use voxgate_core::Assistant;

use crate::dto::{AgentIdResponse, AssistantProfileResponse, SignedUrlResponse};
use crate::error::AppError;
use crate::services::assistant as assistant_service;
use crate::state::ServerState;

/// GET /{slug}/api/signed-url - Signed ElevenLabs conversation URL.
pub async fn signed_url(
    State(state): State<Arc<ServerState>>,
    Path(slug): Path<String>,
) -> Result<Json<SignedUrlResponse>, AppError> {
    info!("Signed URL requested for {}", slug);

    let signed_url = assistant_service::signed_url(&state, &slug)
        .await
        .map_err(|e| log_failure("signed URL", &slug, e))?;

    Ok(Json(SignedUrlResponse { signed_url }))
}

/// GET /{slug}/api/getAgentId - ElevenLabs agent id.
pub async fn agent_id(
    State(state): State<Arc<ServerState>>,
    Path(slug): Path<String>,
) -> Result<Json<AgentIdResponse>, AppError> {
    let agent_id = assistant_service::find_agent_id(&state, &slug)
        .await
        .map_err(|e| log_failure("agent id", &slug, e))?;

    Ok(Json(AgentIdResponse { agent_id }))
}

/// GET /{slug} - Full assistant record.
pub async fn get(
    State(state): State<Arc<ServerState>>,
    Path(slug): Path<String>,
) -> Result<Json<Assistant>, AppError> {
    let assistant = assistant_service::find_assistant(&state, &slug)
        .await
        .map_err(|e| log_failure("assistant", &slug, e))?;

    Ok(Json(assistant))
}

/// GET /api/assistente/{slug} - Profile fields and signed URL together.
pub async fn profile(
    State(state): State<Arc<ServerState>>,
    Path(slug): Path<String>,
) -> Result<Json<AssistantProfileResponse>, AppError> {
    info!("Profile requested for {}", slug);

    let profile = assistant_service::profile(&state, &slug)
        .await
        .map_err(|e| log_failure("profile", &slug, e))?;

    Ok(Json(profile))
}

fn log_failure(what: &str, slug: &str, e: AppError) -> AppError {
    match &e {
        AppError::NotFound => info!("No assistant for slug {}", slug),
        other => error!("Failed to resolve {} for {}: {:?}", what, slug, other),
    }
    e
}
