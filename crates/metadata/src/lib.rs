pub mod omdb;
pub mod provider;

use moviematch_core::types::MediaType;
use thiserror::Error;

/// Why a catalog call came back empty. Never leaves this crate's public
/// trait surface; clients log it and return an empty result instead.
#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("provider error: {0}")]
    Provider(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("no results: {0}")]
    NoResults(String),
}

/// Full record for the details view.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DetailRecord {
    pub id: String,
    pub title: String,
    pub year: String,
    pub poster: Option<String>,
    pub media_type: MediaType,
    pub plot: Option<String>,
    /// Comma-joined, as the API returns it.
    pub genre: Option<String>,
    pub director: Option<String>,
    pub writer: Option<String>,
    /// Comma-joined, as the API returns it.
    pub actors: Option<String>,
    pub runtime: Option<String>,
    pub rated: Option<String>,
    pub released: Option<String>,
    pub imdb_rating: Option<String>,
    pub ratings: Vec<Rating>,
    pub language: Option<String>,
    pub country: Option<String>,
    pub awards: Option<String>,
    pub website: Option<String>,
}

impl DetailRecord {
    pub fn genres(&self) -> Vec<String> {
        split_list(self.genre.as_deref())
    }

    pub fn cast(&self) -> Vec<String> {
        split_list(self.actors.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Rating {
    pub source: String,
    pub value: String,
}

fn split_list(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}
