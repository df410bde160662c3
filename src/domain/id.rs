use derive_more::Display;
use serde::{Deserialize, Serialize};

use super::error::PipelineError;

/// Checkout session identifier (`cs_xxx`).
#[derive(Debug, Clone, PartialEq, Eq, Display, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Result<Self, PipelineError> {
        let id = id.into();
        if !id.starts_with("cs_") {
            return Err(PipelineError::Validation(format!(
                "SessionId must start with cs_, got: {id}"
            )));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Provider-side subscription identifier (`sub_xxx`).
#[derive(Debug, Clone, PartialEq, Eq, Display, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubscriptionRef(String);

impl SubscriptionRef {
    pub fn new(id: impl Into<String>) -> Result<Self, PipelineError> {
        let id = id.into();
        if !id.starts_with("sub_") {
            return Err(PipelineError::Validation(format!(
                "SubscriptionRef must start with sub_, got: {id}"
            )));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
