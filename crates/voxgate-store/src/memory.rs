//! In-memory assistant repository.

use std::collections::HashMap;

use async_trait::async_trait;
use voxgate_core::{Assistant, AssistantRepository, RepositoryError};

/// Assistants held in a map keyed by slug.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAssistantRepository {
    assistants: HashMap<String, Assistant>,
}

impl InMemoryAssistantRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `assistant` under its slug. Records without a string `slug`
    /// are not stored and `false` is returned.
    pub fn insert(&mut self, assistant: Assistant) -> bool {
        let Some(slug) = assistant.slug().map(str::to_string) else {
            return false;
        };
        self.assistants.insert(slug, assistant);
        true
    }

    pub fn with(mut self, assistant: Assistant) -> Self {
        self.insert(assistant);
        self
    }
}

#[async_trait]
impl AssistantRepository for InMemoryAssistantRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Assistant>, RepositoryError> {
        Ok(self.assistants.get(slug).cloned())
    }

    async fn find_voice_agent_id_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<Option<String>>, RepositoryError> {
        Ok(self
            .assistants
            .get(slug)
            .map(|assistant| assistant.voice_agent_id().map(str::to_string)))
    }
}
