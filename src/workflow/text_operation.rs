use std::sync::Arc;

use crate::config::BackendConfig;
use crate::domain::operation::{Operation, OperationRequest, OperationResult, Tone};
use crate::domain::prompt;
use crate::error::AppResult;
use crate::infra::llm::GeminiClient;
use crate::services::LanguageModelService;

/// Turns text requests into prompts, sends them to the backend and folds the
/// outcome into an [`OperationResult`]. Holds no mutable state.
#[derive(Clone)]
pub struct TextOperationService {
    backend: Arc<dyn LanguageModelService>,
}

impl TextOperationService {
    pub fn new(config: &BackendConfig) -> AppResult<Self> {
        let client = GeminiClient::new(config)?;
        Ok(Self::with_backend(Arc::new(client)))
    }

    pub fn with_backend(backend: Arc<dyn LanguageModelService>) -> Self {
        Self { backend }
    }

    pub async fn execute(&self, request: &OperationRequest) -> OperationResult {
        match request.operation {
            Operation::FixGrammar => self.fix_grammar(&request.text).await,
            Operation::ImproveStyle => {
                self.improve_style(&request.text, request.tone_or_default())
                    .await
            }
            Operation::GenerateContent => self.generate_content(&request.text).await,
        }
    }

    pub async fn fix_grammar(&self, text: &str) -> OperationResult {
        self.run(Operation::FixGrammar, prompt::grammar_prompt(text))
            .await
    }

    pub async fn improve_style(&self, text: &str, tone: Tone) -> OperationResult {
        self.run(Operation::ImproveStyle, prompt::style_prompt(text, tone))
            .await
    }

    pub async fn generate_content(&self, topic: &str) -> OperationResult {
        self.run(Operation::GenerateContent, prompt::content_prompt(topic))
            .await
    }

    async fn run(&self, operation: Operation, prompt: String) -> OperationResult {
        tracing::debug!(operation = operation.as_str(), "built prompt: {prompt}");

        match self.backend.generate_text(&prompt).await {
            Ok(generated) => {
                tracing::info!(operation = operation.as_str(), "operation succeeded");
                OperationResult::Success {
                    output: generated.text.trim().to_string(),
                }
            }
            Err(err) => {
                tracing::warn!(operation = operation.as_str(), "backend call failed: {err}");
                OperationResult::Failure {
                    error_message: format!("Error: {err}"),
                }
            }
        }
    }
}
