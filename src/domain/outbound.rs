use {
    super::error::PipelineError,
    std::{future::Future, pin::Pin},
};

/// A rendered message ready for the email provider.
#[derive(Debug, Clone)]
pub struct OutboundEmail {
    pub to: String,
    pub subject: String,
    pub html: String,
}

pub trait Mailer: Send + Sync {
    /// Returns the provider's message id.
    fn send(
        &self,
        email: &OutboundEmail,
    ) -> Pin<Box<dyn Future<Output = Result<String, PipelineError>> + Send + '_>>;
}

/// Outcome of a best-effort side effect (inventory decrement, pipeline
/// email). Deliberately not a `Result`: these paths get logged and can
/// never propagate into the money-relevant write path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SideEffect {
    Applied,
    Skipped,
    Failed,
}
