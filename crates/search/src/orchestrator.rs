use std::sync::Arc;

use moviematch_analysis::{AnalysisError, PromptAnalyzer};
use moviematch_core::types::Credentials;
use moviematch_metadata::provider::{MovieCatalog, SearchResult};
use serde::Serialize;
use tracing::{debug, info};

use crate::plan::{SearchPlan, Strategy};

pub const FALLBACK_NOTICE: &str = "Using smart search to find movies";
pub const NO_RESULTS_NOTICE: &str = "No movies found. Try a different description.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A user-facing message raised while a search ran.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchOutcome {
    pub results: Vec<SearchResult>,
    /// Strategy that produced `results`; `None` when every strategy came up empty.
    pub strategy: Option<Strategy>,
    pub matched_query: Option<String>,
    /// Catalog queries issued, in order.
    pub attempts: Vec<String>,
    pub notices: Vec<Notice>,
}

/// Sequences prompt analysis and catalog searches, stopping at the first
/// query that returns anything.
#[derive(Clone)]
pub struct SearchOrchestrator {
    catalog: Arc<dyn MovieCatalog>,
    analyzer: Arc<dyn PromptAnalyzer>,
}

impl SearchOrchestrator {
    pub fn new(catalog: Arc<dyn MovieCatalog>, analyzer: Arc<dyn PromptAnalyzer>) -> Self {
        Self { catalog, analyzer }
    }

    pub fn catalog(&self) -> &Arc<dyn MovieCatalog> {
        &self.catalog
    }

    pub async fn search(&self, query: &str, credentials: &Credentials) -> SearchOutcome {
        let mut notices = Vec::new();

        let analysis = match self.analyzer.analyze(query, &credentials.analysis_key).await {
            Ok(analysis) => {
                debug!(
                    refined = %analysis.search_query,
                    keywords = ?analysis.keywords,
                    "using analysis"
                );
                Some(analysis)
            }
            Err(e) => {
                debug!(error = %e, "analysis unavailable, using local strategies only");
                // Local validation failures are expected states, not worth a message.
                if !matches!(e, AnalysisError::MissingApiKey | AnalysisError::EmptyPrompt) {
                    notices.push(Notice::error(e.to_string()));
                }
                None
            }
        };

        let mut attempts = Vec::new();
        let mut entered_local = false;

        for candidate in SearchPlan::new(query, analysis) {
            if candidate.strategy.is_local() && !entered_local {
                entered_local = true;
                notices.push(Notice::info(FALLBACK_NOTICE));
            }

            debug!(strategy = %candidate.strategy, query = %candidate.query, "trying candidate");
            attempts.push(candidate.query.clone());
            let results = self
                .catalog
                .search(&candidate.query, &credentials.metadata_key)
                .await;

            if !results.is_empty() {
                info!(
                    strategy = %candidate.strategy,
                    query = %candidate.query,
                    count = results.len(),
                    "search matched"
                );
                return SearchOutcome {
                    results,
                    strategy: Some(candidate.strategy),
                    matched_query: Some(candidate.query),
                    attempts,
                    notices,
                };
            }
        }

        info!(query, attempts = attempts.len(), "no strategy produced results");
        notices.push(Notice::error(NO_RESULTS_NOTICE));
        SearchOutcome {
            results: Vec::new(),
            strategy: None,
            matched_query: None,
            attempts,
            notices,
        }
    }
}
