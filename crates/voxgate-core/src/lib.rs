//! Core domain types and contracts for voxgate.
//!
//! - [`Assistant`]: a row of the `assistentes` table, passed through verbatim
//! - [`AssistantRepository`]: slug lookups against the assistant store
//! - [`SignedUrlBroker`]: exchanges a voice agent id for a signed session URL
//! - [`RepositoryError`] and [`BrokerError`]: failures of the two contracts
//!
//! # Example
//!
//! ```rust
//! use voxgate_core::Assistant;
//!
//! let assistant = Assistant::from_value(serde_json::json!({
//!     "slug": "maria",
//!     "elevenlabs_voice_id": "ag_123",
//!     "nome": "Maria",
//! }))
//! .unwrap();
//!
//! assert_eq!(assistant.slug(), Some("maria"));
//! assert_eq!(assistant.voice_agent_id(), Some("ag_123"));
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Column holding the unique slug.
pub const SLUG_COLUMN: &str = "slug";

/// Column holding the ElevenLabs agent identifier.
pub const VOICE_AGENT_ID_COLUMN: &str = "elevenlabs_voice_id";

// ─────────────────────────────────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────────────────────────────────

/// Failures while reading from the assistant store.
///
/// A missing slug is not an error; lookups return `Ok(None)` for it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// Connection, pool or query failure.
    #[error("{0}")]
    Database(String),

    /// A column could not be converted to JSON.
    #[error("failed to decode column {column}: {message}")]
    Decode { column: String, message: String },
}

/// Failures while obtaining a signed URL.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BrokerError {
    /// `XI_API_KEY` is not configured. No request was sent.
    #[error("XI_API_KEY não configurada")]
    MissingApiKey,

    /// The assistant's stored agent id is null or empty. No request was sent.
    #[error("voice agent id is empty")]
    EmptyAgentId,

    /// Transport failure or non-success status.
    #[error("ElevenLabs request failed: {0}")]
    Upstream(String),

    /// The response body did not contain a string `signed_url`.
    #[error("ElevenLabs response malformed: {0}")]
    MalformedResponse(String),
}

// ─────────────────────────────────────────────────────────────────────────────
// Assistant
// ─────────────────────────────────────────────────────────────────────────────

/// One voice assistant record.
///
/// Columns are kept exactly as stored; this type only knows about `slug` and
/// `elevenlabs_voice_id`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Assistant {
    fields: Map<String, Value>,
}

impl Assistant {
    pub fn from_fields(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Builds an assistant from a JSON object. Returns `None` for any other
    /// JSON value.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self { fields }),
            _ => None,
        }
    }

    pub fn slug(&self) -> Option<&str> {
        self.fields.get(SLUG_COLUMN).and_then(Value::as_str)
    }

    /// The stored ElevenLabs agent id. `None` when the column is null or
    /// missing; an empty string is returned as is.
    pub fn voice_agent_id(&self) -> Option<&str> {
        self.fields.get(VOICE_AGENT_ID_COLUMN).and_then(Value::as_str)
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.fields.get(column)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn into_fields(self) -> Map<String, Value> {
        self.fields
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Contracts
// ─────────────────────────────────────────────────────────────────────────────

/// Read access to assistants keyed by slug.
///
/// Implementations must bind the slug as a query parameter and must release
/// any connection they borrowed before the returned future resolves.
#[async_trait]
pub trait AssistantRepository: Send + Sync {
    /// Full record for `slug`, or `None` when no row matches.
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Assistant>, RepositoryError>;

    /// Only the agent id for `slug`.
    ///
    /// The outer `None` means no row matches. `Some(None)` is a matching row
    /// whose id is null. Empty ids are returned unchanged.
    async fn find_voice_agent_id_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<Option<String>>, RepositoryError>;
}

/// Issues signed conversation URLs for a voice agent.
#[async_trait]
pub trait SignedUrlBroker: Send + Sync {
    async fn signed_url(&self, voice_agent_id: &str) -> Result<String, BrokerError>;
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_assistant_serializes_as_flat_object() {
        let source = json!({
            "id": 7,
            "slug": "maria",
            "elevenlabs_voice_id": "ag_123",
            "nome": "Maria",
            "foto_url": null,
        });
        let assistant = Assistant::from_value(source.clone()).unwrap();

        assert_eq!(serde_json::to_value(&assistant).unwrap(), source);
    }

    #[test]
    fn test_assistant_rejects_non_objects() {
        assert!(Assistant::from_value(json!(["maria"])).is_none());
        assert!(Assistant::from_value(json!("maria")).is_none());
    }

    #[test]
    fn test_voice_agent_id_is_the_stored_value() {
        let with_null = Assistant::from_value(json!({"slug": "a", "elevenlabs_voice_id": null})).unwrap();
        assert_eq!(with_null.voice_agent_id(), None);

        let with_empty = Assistant::from_value(json!({"slug": "b", "elevenlabs_voice_id": ""})).unwrap();
        assert_eq!(with_empty.voice_agent_id(), Some(""));

        let present = Assistant::from_value(json!({"slug": "c", "elevenlabs_voice_id": "ag_9"})).unwrap();
        assert_eq!(present.voice_agent_id(), Some("ag_9"));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(BrokerError::MissingApiKey.to_string(), "XI_API_KEY não configurada");
        assert_eq!(
            RepositoryError::Database("Access denied".into()).to_string(),
            "Access denied"
        );
        let decode = RepositoryError::Decode {
            column: "criado_em".into(),
            message: "bad date".into(),
        };
        assert_eq!(decode.to_string(), "failed to decode column criado_em: bad date");
    }
}
