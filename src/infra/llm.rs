use async_trait::async_trait;
use reqwest::{
    Client,
    header::{ACCEPT, CONTENT_TYPE},
};
use serde::{Deserialize, Serialize};

use crate::config::BackendConfig;
use crate::error::{AppError, AppResult};
use crate::services::{GeneratedText, LanguageModelService};

const API_KEY_HEADER: &str = "x-goog-api-key";
const GENERATE_METHOD: &str = "generateContent";

pub struct GeminiClient {
    http: Client,
    api_key: String,
    model: String,
    base_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelInfo {
    pub name: String,
    pub supports_generation: bool,
}

impl GeminiClient {
    /// Builds a client. Only an empty key is rejected locally; the backend
    /// judges everything else about it.
    pub fn new(config: &BackendConfig) -> AppResult<Self> {
        let api_key = config.api_key.trim();
        if api_key.is_empty() {
            return Err(AppError::Configuration(
                "Gemini API key must not be empty".to_string(),
            ));
        }

        let http = Client::builder()
            .user_agent(format!("escriba/{}", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .build()
            .map_err(|err| {
                AppError::Configuration(format!("failed to build HTTP client: {err}"))
            })?;

        Ok(Self {
            http,
            api_key: api_key.to_string(),
            model: config.model_name.trim().to_string(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn generate_endpoint(base_url: &str, model: &str) -> String {
        let model = model.strip_prefix("models/").unwrap_or(model);
        format!("{base_url}/models/{model}:{GENERATE_METHOD}")
    }

    fn models_endpoint(base_url: &str) -> String {
        format!("{base_url}/models")
    }

    pub async fn list_models(&self) -> AppResult<Vec<ModelInfo>> {
        let mut models = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .http
                .get(Self::models_endpoint(&self.base_url))
                .header(API_KEY_HEADER, &self.api_key)
                .header(ACCEPT, "application/json");
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token)]);
            }

            let response = request
                .send()
                .await
                .map_err(|err| AppError::Backend(format!("failed to call Gemini: {err}")))?;

            let status = response.status();
            if !status.is_success() {
                let body = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "<unable to read response>".to_string());
                return Err(AppError::Backend(format!(
                    "Gemini responded with {status}: {body}"
                )));
            }

            let payload: ListModelsResponse = response.json().await.map_err(|err| {
                AppError::Backend(format!("failed to parse Gemini model list: {err}"))
            })?;

            models.extend(payload.models.into_iter().map(ModelEntry::into_info));

            match payload.next_page_token.filter(|token| !token.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(models)
    }
}

#[async_trait]
impl LanguageModelService for GeminiClient {
    async fn generate_text(&self, prompt: &str) -> AppResult<GeneratedText> {
        let request_body = GenerateContentRequest::from_prompt(prompt);

        tracing::debug!(model = %self.model, prompt_len = prompt.len(), "calling Gemini");

        let response = self
            .http
            .post(Self::generate_endpoint(&self.base_url, &self.model))
            .header(API_KEY_HEADER, &self.api_key)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .json(&request_body)
            .send()
            .await
            .map_err(|err| AppError::Backend(format!("failed to call Gemini: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unable to read response>".to_string());
            return Err(AppError::Backend(format!(
                "Gemini responded with {status}: {body}"
            )));
        }

        let payload: GenerateContentResponse = response.json().await.map_err(|err| {
            AppError::Backend(format!("failed to parse Gemini response: {err}"))
        })?;

        payload.into_generated_text()
    }
}

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

impl GenerateContentRequest {
    fn from_prompt(prompt: &str) -> Self {
        Self {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
            }],
        }
    }
}

#[derive(Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

impl GenerateContentResponse {
    fn into_generated_text(self) -> AppResult<GeneratedText> {
        if let Some(reason) = self.prompt_feedback.and_then(|feedback| feedback.block_reason) {
            return Err(AppError::Backend(format!(
                "Gemini blocked the prompt: {reason}"
            )));
        }

        let candidate = self
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| AppError::Backend("Gemini returned no candidates".to_string()))?;

        let text = candidate
            .content
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect::<String>()
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            let reason = candidate
                .finish_reason
                .unwrap_or_else(|| "unknown".to_string());
            return Err(AppError::Backend(format!(
                "Gemini returned an empty response (finish reason: {reason})"
            )));
        }

        Ok(GeneratedText { text })
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListModelsResponse {
    #[serde(default)]
    models: Vec<ModelEntry>,
    next_page_token: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModelEntry {
    name: String,
    #[serde(default)]
    supported_generation_methods: Vec<String>,
}

impl ModelEntry {
    fn into_info(self) -> ModelInfo {
        let supports_generation = self
            .supported_generation_methods
            .iter()
            .any(|method| method == GENERATE_METHOD);
        ModelInfo {
            name: self.name,
            supports_generation,
        }
    }
}
