use prompt_shared::BackendError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PromptClientError {
    // HTTP ошибки
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    // Бизнес-логика ошибки
    #[error("Resource not found")]
    NotFound,

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    // Транспортные ошибки
    #[error("Transport error: {0}")]
    TransportError(String),

    // Ошибки сериализации/десериализации
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    // Ошибки конфигурации
    #[error("Configuration error: {0}")]
    Config(String),
}

impl BackendError for PromptClientError {
    fn is_unauthorized(&self) -> bool {
        matches!(self, PromptClientError::Unauthorized(_))
    }
}
