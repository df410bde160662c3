use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("validation: {0}")]
    Validation(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("configuration: {0}")]
    Config(String),

    #[error("database: {0}")]
    Database(#[from] sqlx::Error),

    #[error("webhook signature: {0}")]
    WebhookSignature(String),

    #[error("provider: {0}")]
    Provider(String),

    #[error("email: {0}")]
    Email(String),
}
