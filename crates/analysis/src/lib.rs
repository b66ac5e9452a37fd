pub mod gemini;
pub mod prompt;

use thiserror::Error;

/// Why a prompt analysis failed. The orchestrator treats every variant the
/// same way ("analysis unavailable") but keeps the message for the user.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("Missing API key")]
    MissingApiKey,
    #[error("Please enter a movie description")]
    EmptyPrompt,
    #[error("{0}")]
    Api(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("Unexpected API response format")]
    UnexpectedFormat,
    #[error("Could not find valid JSON in response")]
    NoJson,
    #[error("Failed to parse JSON from response")]
    InvalidJson,
    #[error("Missing required 'searchQuery' field in response")]
    MissingSearchQuery,
    #[error("no analysis endpoints configured")]
    NoEndpoints,
}

/// Structured search hint extracted from a free-text movie description.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AnalysisResult {
    pub genres: Vec<String>,
    pub era: Option<String>,
    pub mood: Option<String>,
    pub keywords: Vec<String>,
    pub search_query: String,
}

/// Turns a free-text description into an [`AnalysisResult`].
#[async_trait::async_trait]
pub trait PromptAnalyzer: Send + Sync {
    fn name(&self) -> &str;

    async fn analyze(&self, prompt: &str, api_key: &str) -> Result<AnalysisResult, AnalysisError>;
}
