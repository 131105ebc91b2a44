use async_trait::async_trait;

use crate::error::AppResult;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedText {
    pub text: String,
}

#[async_trait]
pub trait LanguageModelService: Send + Sync {
    async fn generate_text(&self, prompt: &str) -> AppResult<GeneratedText>;
}
