//! Seam between the analysis unit and whatever produces text.

use async_trait::async_trait;

use crate::OpenAiError;

/// Output of one generation call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Generation {
    /// Generated text, if the model produced any.
    pub text: Option<String>,
    /// Total tokens the provider billed for the call.
    pub tokens_used: Option<u32>,
}

/// Something that turns a system and user prompt into text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Identifier of the model answering requests.
    fn model(&self) -> &str;

    async fn generate(&self, system: &str, user: &str) -> Result<Generation, OpenAiError>;
}
