use serde::Serialize;
use serde_json::Value;
use voxgate_core::{Assistant, VOICE_AGENT_ID_COLUMN};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedUrlResponse {
    pub signed_url: String,
}

/// `agentId` is `null` when the stored id is null.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentIdResponse {
    pub agent_id: Option<String>,
}

/// Body of `/api/assistente/{slug}`. Field names follow the table columns,
/// except the agent id which is exposed as `voice_id`.
#[derive(Debug, Serialize)]
pub struct AssistantProfileResponse {
    pub nome: Value,
    pub descricao: Value,
    pub foto_url: Value,
    pub background_image: Value,
    pub voice_id: Value,
    pub signed_url: String,
}

impl AssistantProfileResponse {
    pub fn new(assistant: &Assistant, signed_url: String) -> Self {
        let field = |column: &str| assistant.get(column).cloned().unwrap_or(Value::Null);
        Self {
            nome: field("nome"),
            descricao: field("descricao"),
            foto_url: field("foto_url"),
            background_image: field("background_image"),
            voice_id: field(VOICE_AGENT_ID_COLUMN),
            signed_url,
        }
    }
}
