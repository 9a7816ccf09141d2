//! Gemini `generateContent` client.
//!
//! Uses reqwest with the API key as a query parameter. The model is asked for
//! a JSON answer matching `insight_response_schema`; that JSON comes back as
//! text inside the first candidate.

use async_trait::async_trait;
use serde::Deserialize;
use url::Url;

use crate::error::InsightError;
use crate::types::InsightConfig;

use super::prompts::{build_insight_prompt, insight_response_schema};
use super::provider::{InsightDraft, InsightProvider, InsightRequest};

pub struct GeminiProvider {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl GeminiProvider {
    pub fn new(config: &InsightConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: config.resolved_api_key(),
        }
    }

    fn endpoint(&self, api_key: &str) -> Result<Url, InsightError> {
        let raw = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        Url::parse_with_params(&raw, &[("key", api_key)])
            .map_err(|e| InsightError::InvalidEndpoint(format!("{}: {}", raw, e)))
    }
}

/// Request body for `generateContent`.
pub fn request_body(prompt: &str) -> serde_json::Value {
    serde_json::json!({
        "contents": [{ "parts": [{ "text": prompt }] }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": insight_response_schema(),
        }
    })
}

/// Pull the insight out of a `generateContent` response.
///
/// A response with no candidate text yields an empty draft (filled from
/// locale defaults later); candidate text that is not JSON is an error.
pub fn parse_response(body: &str) -> Result<InsightDraft, InsightError> {
    #[derive(Deserialize)]
    struct Response {
        #[serde(default)]
        candidates: Vec<Candidate>,
    }
    #[derive(Deserialize)]
    struct Candidate {
        content: Option<Content>,
    }
    #[derive(Deserialize)]
    struct Content {
        #[serde(default)]
        parts: Vec<Part>,
    }
    #[derive(Deserialize)]
    struct Part {
        text: Option<String>,
    }

    let response: Response = serde_json::from_str(body)?;
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Ok(InsightDraft::default());
    }

    Ok(serde_json::from_str(&text)?)
}

#[async_trait]
impl InsightProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn fetch_insight(&self, request: &InsightRequest) -> Result<InsightDraft, InsightError> {
        let api_key = self.api_key.as_deref().ok_or(InsightError::MissingApiKey)?;
        let url = self.endpoint(api_key)?;
        let prompt = build_insight_prompt(request);

        log::debug!(
            "Gemini: requesting insight (model={}, {} intentions, {} emotions)",
            self.model,
            request.intentions.len(),
            request.emotions.len()
        );

        let resp = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .json(&request_body(&prompt))
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;
        if !status.is_success() {
            return Err(InsightError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        parse_response(&text)
    }
}
