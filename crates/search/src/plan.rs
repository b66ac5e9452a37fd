//! The ordered list of progressively looser queries a search walks through.
//!
//! Each [`Strategy`] is a generator of candidate queries. A [`SearchPlan`]
//! asks each generator for its candidates only when the previous ones are
//! used up, so a search that succeeds early never tokenizes the raw query.

use std::collections::VecDeque;

use moviematch_analysis::AnalysisResult;
use serde::Serialize;

use crate::keywords::{extract_keywords, keyword_pairs, reversed_two_words};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// The analysis model's refined query.
    RefinedQuery,
    /// One of the analysis model's keywords.
    AnalysisKeyword,
    /// The user's query, verbatim.
    RawQuery,
    /// One keyword tokenized from the user's query.
    QueryKeyword,
    /// Two tokenized keywords joined by a space.
    KeywordPair,
    /// A two-word query with its words swapped.
    ReversedQuery,
}

impl Strategy {
    pub const ORDER: [Strategy; 6] = [
        Self::RefinedQuery,
        Self::AnalysisKeyword,
        Self::RawQuery,
        Self::QueryKeyword,
        Self::KeywordPair,
        Self::ReversedQuery,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::RefinedQuery => "refined_query",
            Self::AnalysisKeyword => "analysis_keyword",
            Self::RawQuery => "raw_query",
            Self::QueryKeyword => "query_keyword",
            Self::KeywordPair => "keyword_pair",
            Self::ReversedQuery => "reversed_query",
        }
    }

    /// Strategies that only look at the user's own query.
    pub fn is_local(self) -> bool {
        !matches!(self, Self::RefinedQuery | Self::AnalysisKeyword)
    }

    fn generate(self, raw_query: &str, analysis: Option<&AnalysisResult>) -> Vec<String> {
        match self {
            Self::RefinedQuery => analysis
                .map(|a| vec![a.search_query.clone()])
                .unwrap_or_default(),
            Self::AnalysisKeyword => analysis.map(|a| a.keywords.clone()).unwrap_or_default(),
            Self::RawQuery => vec![raw_query.to_string()],
            Self::QueryKeyword => extract_keywords(raw_query),
            Self::KeywordPair => keyword_pairs(&extract_keywords(raw_query)),
            Self::ReversedQuery => reversed_two_words(raw_query).into_iter().collect(),
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One query to send to the catalog, tagged with the strategy that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub query: String,
    pub strategy: Strategy,
}

/// Lazily yields candidates in strategy order.
pub struct SearchPlan {
    raw_query: String,
    analysis: Option<AnalysisResult>,
    next_stage: usize,
    pending: VecDeque<Candidate>,
}

impl SearchPlan {
    /// `analysis` is `None` when prompt analysis failed; the plan then starts
    /// directly with the local strategies.
    pub fn new(raw_query: impl Into<String>, analysis: Option<AnalysisResult>) -> Self {
        Self {
            raw_query: raw_query.into(),
            analysis,
            next_stage: 0,
            pending: VecDeque::new(),
        }
    }
}

impl Iterator for SearchPlan {
    type Item = Candidate;

    fn next(&mut self) -> Option<Candidate> {
        loop {
            if let Some(candidate) = self.pending.pop_front() {
                return Some(candidate);
            }
            let strategy = *Strategy::ORDER.get(self.next_stage)?;
            self.next_stage += 1;
            self.pending.extend(
                strategy
                    .generate(&self.raw_query, self.analysis.as_ref())
                    .into_iter()
                    .map(|query| Candidate { query, strategy }),
            );
        }
    }
}
