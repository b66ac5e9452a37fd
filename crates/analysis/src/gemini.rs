//! Gemini generateContent client.
//!
//! Model names get retired without notice, so the client walks an ordered
//! list of endpoint paths and keeps the first one that yields a usable
//! analysis.

use tracing::{debug, info, warn};

use crate::prompt::{build_request_body, generated_text, parse_analysis};
use crate::{AnalysisError, AnalysisResult, PromptAnalyzer};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

pub const DEFAULT_ENDPOINTS: &[&str] = &[
    "v1beta/models/gemini-1.5-pro:generateContent",
    "v1/models/gemini-pro:generateContent",
    "v1beta/models/gemini-pro:generateContent",
];

pub struct GeminiClient {
    base_url: String,
    endpoints: Vec<String>,
    client: reqwest::Client,
}

impl GeminiClient {
    pub fn with_endpoints(
        base_url: impl Into<String>,
        endpoints: Vec<String>,
        client: reqwest::Client,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            endpoints,
            client,
        }
    }

    /// One attempt against one endpoint.
    async fn try_endpoint(
        &self,
        endpoint: &str,
        body: &serde_json::Value,
        api_key: &str,
    ) -> Result<AnalysisResult, AnalysisError> {
        let url = format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'));
        debug!(url = %url, "Gemini request");

        let resp = self
            .client
            .post(&url)
            .query(&[("key", api_key)])
            .json(body)
            .send()
            .await
            .map_err(|e| AnalysisError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            // Error bodies are JSON when the API is up; anything else falls
            // back to the bare status.
            let message = resp
                .json::<serde_json::Value>()
                .await
                .ok()
                .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
                .unwrap_or_else(|| format!("API error: {}", status.as_u16()));
            return Err(AnalysisError::Api(message));
        }

        let data: serde_json::Value = resp
            .json()
            .await
            .map_err(|_| AnalysisError::UnexpectedFormat)?;

        let text = generated_text(&data).ok_or(AnalysisError::UnexpectedFormat)?;
        parse_analysis(text)
    }
}

#[async_trait::async_trait]
impl PromptAnalyzer for GeminiClient {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn analyze(&self, prompt: &str, api_key: &str) -> Result<AnalysisResult, AnalysisError> {
        if api_key.is_empty() {
            return Err(AnalysisError::MissingApiKey);
        }
        if prompt.trim().is_empty() {
            return Err(AnalysisError::EmptyPrompt);
        }

        let body = build_request_body(prompt);
        let mut last_error = AnalysisError::NoEndpoints;

        for endpoint in &self.endpoints {
            match self.try_endpoint(endpoint, &body, api_key).await {
                Ok(analysis) => {
                    info!(
                        endpoint = %endpoint,
                        search_query = %analysis.search_query,
                        "prompt analyzed"
                    );
                    return Ok(analysis);
                }
                Err(e) => {
                    warn!(endpoint = %endpoint, error = %e, "Gemini endpoint failed, trying next");
                    last_error = e;
                }
            }
        }

        warn!(error = %last_error, "all Gemini endpoints failed");
        Err(last_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn rejects_missing_key_and_blank_prompt_locally() {
        // Port 9 is discard; nothing is ever sent because validation runs first.
        let client = GeminiClient::with_endpoints(
            "http://127.0.0.1:9",
            vec!["v1/models/m:generateContent".into()],
            reqwest::Client::new(),
        );
        assert_eq!(
            client.analyze("a space western", "").await,
            Err(AnalysisError::MissingApiKey)
        );
        assert_eq!(
            client.analyze("   ", "key").await,
            Err(AnalysisError::EmptyPrompt)
        );
    }

    #[tokio::test]
    async fn no_endpoints_is_a_failure() {
        let client =
            GeminiClient::with_endpoints("http://127.0.0.1:9", vec![], reqwest::Client::new());
        assert_eq!(
            client.analyze("a space western", "key").await,
            Err(AnalysisError::NoEndpoints)
        );
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = GeminiClient::with_endpoints(
            "https://example.test/",
            vec!["v1/models/m:generateContent".into()],
            reqwest::Client::new(),
        );
        assert_eq!(client.base_url, "https://example.test");
    }
}
