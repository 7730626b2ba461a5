//! Application error types and Axum response conversion.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use voxgate_core::{BrokerError, RepositoryError};

pub const NOT_FOUND_DETAIL: &str = "Assistente não encontrado";
pub const UPSTREAM_DETAIL: &str = "Falha ao acessar a API da ElevenLabs";
pub const MALFORMED_UPSTREAM_DETAIL: &str = "Resposta inválida da API da ElevenLabs";

/// Application-level errors with HTTP status code mapping.
#[derive(Debug)]
pub enum AppError {
    /// No assistant matches the slug.
    NotFound,
    /// Database connectivity or query failure.
    Repository(RepositoryError),
    /// A required secret is missing.
    Configuration(String),
    /// The ElevenLabs call failed. Holds the client-facing detail.
    Upstream(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn detail(&self) -> String {
        match self {
            AppError::NotFound => NOT_FOUND_DETAIL.to_string(),
            AppError::Repository(e) => format!("Erro no banco de dados: {}", e),
            AppError::Configuration(message) | AppError::Upstream(message) => message.clone(),
        }
    }
}

impl From<RepositoryError> for AppError {
    fn from(e: RepositoryError) -> Self {
        AppError::Repository(e)
    }
}

impl From<BrokerError> for AppError {
    fn from(e: BrokerError) -> Self {
        match e {
            BrokerError::MissingApiKey => AppError::Configuration(e.to_string()),
            BrokerError::MalformedResponse(_) => {
                AppError::Upstream(MALFORMED_UPSTREAM_DETAIL.to_string())
            }
            BrokerError::EmptyAgentId | BrokerError::Upstream(_) => {
                AppError::Upstream(UPSTREAM_DETAIL.to_string())
            }
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    detail: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status(), Json(ErrorResponse { detail: self.detail() })).into_response()
    }
}
