//! Generative-text collaborator used for travel advice and city verdicts.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::{fmt::Debug, sync::Arc};
use tracing::{info, instrument};

use crate::{Config, error::UpstreamError, provider::fetch_json};

const SERVICE: &str = "Gemini";
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

#[async_trait]
pub trait TextGenerator: Send + Sync + Debug {
    async fn generate(&self, prompt: &str) -> Result<String, UpstreamError>;
}

#[derive(Debug, Clone)]
pub struct GeminiClient {
    api_key: String,
    model: String,
    base_url: String,
    http: Client,
}

impl GeminiClient {
    pub fn new(api_key: String, model: impl Into<String>) -> Self {
        Self::with_base_url(api_key, model, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(
        api_key: String,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            api_key,
            model: model.into(),
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            http: Client::new(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn generate_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: [RequestContent<'a>; 1],
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: [RequestPart<'a>; 1],
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateResponse {
    fn into_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .find_map(|p| p.text)
            .filter(|t| !t.trim().is_empty())
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    #[instrument(skip(self, prompt), fields(model = %self.model, prompt_len = prompt.len()))]
    async fn generate(&self, prompt: &str) -> Result<String, UpstreamError> {
        let body = GenerateRequest {
            contents: [RequestContent {
                parts: [RequestPart { text: prompt }],
            }],
        };

        let request = self
            .http
            .post(self.generate_url())
            .query(&[("key", self.api_key.as_str())])
            .json(&body);

        let parsed: GenerateResponse = fetch_json(request, SERVICE).await?;
        parsed
            .into_text()
            .ok_or(UpstreamError::EmptyResponse(SERVICE))
    }
}

/// The generator is optional: without a key, reports are built without advice.
pub fn generator_from_config(config: &Config) -> Option<Arc<dyn TextGenerator>> {
    let Some(api_key) = config.gemini_api_key() else {
        info!("no Gemini API key configured, generative advice disabled");
        return None;
    };

    let client = GeminiClient::new(api_key.to_owned(), config.gemini_model());
    info!(model = client.model(), "initialized Gemini client");
    Some(Arc::new(client))
}
