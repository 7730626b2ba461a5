//! ElevenLabs Conversational AI client.
//!
//! Exchanges an agent id for a signed websocket URL that the frontend uses
//! to open a conversation.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, error};
use voxgate_config::VoiceSettings;
use voxgate_core::{BrokerError, SignedUrlBroker};

const SIGNED_URL_PATH: &str = "/v1/convai/conversation/get_signed_url";
const API_KEY_HEADER: &str = "xi-api-key";

#[derive(Deserialize)]
struct SignedUrlResponse {
    signed_url: String,
}

/// Client for the ElevenLabs signed-URL endpoint.
///
/// One request per call, no retries and no caching. The inner
/// `reqwest::Client` is shared so connections to the API are reused.
#[derive(Clone)]
pub struct ElevenLabsBroker {
    client: Client,
    api_base: String,
    api_key: Option<String>,
}

impl ElevenLabsBroker {
    pub fn new(settings: &VoiceSettings) -> Self {
        Self::with_client(Client::new(), settings)
    }

    pub fn with_client(client: Client, settings: &VoiceSettings) -> Self {
        tracing::info!(
            "ElevenLabsBroker: api_base={}, api_key_configured={}",
            settings.api_base,
            settings.api_key.is_some()
        );
        Self {
            client,
            api_base: settings.api_base.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}{}", self.api_base, SIGNED_URL_PATH)
    }
}

#[async_trait]
impl SignedUrlBroker for ElevenLabsBroker {
    async fn signed_url(&self, voice_agent_id: &str) -> Result<String, BrokerError> {
        let api_key = self.api_key.as_deref().ok_or(BrokerError::MissingApiKey)?;
        if voice_agent_id.is_empty() {
            return Err(BrokerError::EmptyAgentId);
        }

        debug!("Requesting signed URL for agent {}", voice_agent_id);

        let response = self
            .client
            .get(self.endpoint())
            .query(&[("agent_id", voice_agent_id)])
            .header(API_KEY_HEADER, api_key)
            .send()
            .await
            .map_err(|e| {
                error!("ElevenLabs request failed: {}", e);
                BrokerError::Upstream(e.to_string())
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!("ElevenLabs API error {}: {}", status, body);
            return Err(BrokerError::Upstream(format!(
                "ElevenLabs API error {}: {}",
                status, body
            )));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| BrokerError::Upstream(e.to_string()))?;

        let parsed: SignedUrlResponse = serde_json::from_slice(&body).map_err(|e| {
            error!("Unexpected ElevenLabs response: {}", e);
            BrokerError::MalformedResponse(e.to_string())
        })?;

        Ok(parsed.signed_url)
    }
}
