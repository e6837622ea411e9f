//! HTTP client for the Gemini `generateContent` endpoint.

use reqwest::{Client, StatusCode};
use std::sync::Arc;
use std::time::Duration;
use supper_core::GeminiConfig;

use crate::gemini::{ErrorEnvelope, GenerateContentRequest, GenerateContentResponse};
use crate::types::RecommendationError;

#[derive(Debug, Clone)]
pub struct GeminiProvider {
    client: Arc<Client>,
    base_url: String,
    model: String,
}

impl GeminiProvider {
    pub fn new(config: &GeminiConfig) -> Result<Self, RecommendationError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| RecommendationError::from_message(e.to_string()))?;

        Ok(Self {
            client: Arc::new(client),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    /// Send one request. Every failure is folded into a [`RecommendationError`]
    /// carrying the provider's message.
    pub async fn generate_content(
        &self,
        api_key: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, RecommendationError> {
        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| RecommendationError::from_message(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return response
                .json::<GenerateContentResponse>()
                .await
                .map_err(|e| RecommendationError::from_message(e.to_string()));
        }

        let text = response.text().await.unwrap_or_else(|e| {
            tracing::debug!("Failed to read Gemini error body: {}", e);
            String::new()
        });
        Err(RecommendationError::from_message(error_message(status, &text)))
    }
}

/// Provider `error.message` when the body carries one, else `"{status}: {body}"`.
fn error_message(status: StatusCode, text: &str) -> String {
    let body = serde_json::from_str::<ErrorEnvelope>(text).ok().map(|env| env.error);
    tracing::debug!(
        status = status.as_u16(),
        provider_status = body.as_ref().and_then(|b| b.status.as_deref()).unwrap_or("-"),
        "Gemini returned an error status"
    );

    body.and_then(|b| b.message)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| format!("{}: {}", status, text))
}
