//! MySQL repository over a lazily connected pool.

use async_trait::async_trait;
use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions};
use tracing::{debug, error};
use voxgate_config::DatabaseSettings;
use voxgate_core::{Assistant, AssistantRepository, RepositoryError};

use crate::row::assistant_from_row;

pub const ASSISTANTS_TABLE: &str = "assistentes";

const FIND_BY_SLUG: &str = "SELECT * FROM assistentes WHERE slug = ? LIMIT 1";
const FIND_VOICE_AGENT_ID: &str =
    "SELECT elevenlabs_voice_id FROM assistentes WHERE slug = ? LIMIT 1";

/// Builds driver connect options from settings. Unset user, password and
/// database fall back to the driver defaults.
pub fn connect_options(settings: &DatabaseSettings) -> MySqlConnectOptions {
    let mut options = MySqlConnectOptions::new()
        .host(&settings.host)
        .port(settings.port);

    if let Some(user) = &settings.user {
        options = options.username(user);
    }
    if let Some(password) = &settings.password {
        options = options.password(password);
    }
    if let Some(name) = &settings.name {
        options = options.database(name);
    }
    options
}

/// Reads assistants from MySQL.
///
/// Every lookup runs one statement on a connection borrowed from the pool.
/// The connection goes back to the pool when the statement finishes, so it
/// is already released by the time the caller sees the result.
#[derive(Clone)]
pub struct MySqlAssistantRepository {
    pool: MySqlPool,
}

impl MySqlAssistantRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Creates the pool without opening any connection. Connectivity errors
    /// surface on the first lookup instead of at startup.
    pub fn connect_lazy(settings: &DatabaseSettings) -> Self {
        let pool = MySqlPoolOptions::new()
            .max_connections(settings.max_connections)
            .connect_lazy_with(connect_options(settings));
        Self::new(pool)
    }

    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    /// Runs `SELECT 1` to confirm the database is reachable.
    pub async fn health_check(&self) -> Result<(), RepositoryError> {
        let _: i64 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map_err(database_error)?;
        Ok(())
    }

    /// Closes the pool, waiting for borrowed connections to come back.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl AssistantRepository for MySqlAssistantRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Assistant>, RepositoryError> {
        let row = sqlx::query(FIND_BY_SLUG)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!("Assistant lookup failed for slug {}: {}", slug, e);
                database_error(e)
            })?;

        debug!("Assistant lookup for slug {}: found={}", slug, row.is_some());
        row.as_ref().map(assistant_from_row).transpose()
    }

    async fn find_voice_agent_id_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<Option<String>>, RepositoryError> {
        let agent_id: Option<Option<String>> = sqlx::query_scalar(FIND_VOICE_AGENT_ID)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!("Agent id lookup failed for slug {}: {}", slug, e);
                database_error(e)
            })?;

        debug!("Agent id lookup for slug {}: found={}", slug, agent_id.is_some());
        Ok(agent_id)
    }
}

fn database_error(e: sqlx::Error) -> RepositoryError {
    RepositoryError::Database(e.to_string())
}
