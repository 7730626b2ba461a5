//! Slug resolution: repository lookups and signed-URL brokering.

use voxgate_core::Assistant;

use crate::dto::AssistantProfileResponse;
use crate::error::AppError;
use crate::state::ServerState;

/// Full assistant record for `slug`.
pub async fn find_assistant(state: &ServerState, slug: &str) -> Result<Assistant, AppError> {
    state
        .assistants
        .find_by_slug(slug)
        .await?
        .ok_or(AppError::NotFound)
}

/// Stored ElevenLabs agent id for `slug`. `None` when the column is null.
pub async fn find_agent_id(state: &ServerState, slug: &str) -> Result<Option<String>, AppError> {
    state
        .assistants
        .find_voice_agent_id_by_slug(slug)
        .await?
        .ok_or(AppError::NotFound)
}

/// Signed conversation URL for `slug`.
///
/// The lookup finishes, and its connection is back in the pool, before the
/// outbound request starts. A null or empty id is left to the broker, which
/// reports a missing API key before it looks at the id.
pub async fn signed_url(state: &ServerState, slug: &str) -> Result<String, AppError> {
    let agent_id = find_agent_id(state, slug).await?.unwrap_or_default();
    let url = state.broker.signed_url(&agent_id).await?;
    Ok(url)
}

/// Display fields of the assistant plus a fresh signed URL, in one call.
pub async fn profile(state: &ServerState, slug: &str) -> Result<AssistantProfileResponse, AppError> {
    let assistant = find_assistant(state, slug).await?;
    let agent_id = assistant.voice_agent_id().unwrap_or_default();
    let signed_url = state.broker.signed_url(agent_id).await?;

    Ok(AssistantProfileResponse::new(&assistant, signed_url))
}
