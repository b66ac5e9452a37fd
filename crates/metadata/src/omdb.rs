//! OMDb (Open Movie Database) catalog client.
//!
//! API reference: https://www.omdbapi.com/

use moviematch_core::types::MediaType;
use tracing::{debug, warn};

use crate::provider::{MovieCatalog, SearchResult};
use crate::{DetailRecord, MetadataError, Rating};

pub const DEFAULT_BASE_URL: &str = "https://www.omdbapi.com/";

/// Value the API uses for "field not available".
const NOT_AVAILABLE: &str = "N/A";

pub struct OmdbClient {
    base_url: String,
    client: reqwest::Client,
}

impl OmdbClient {
    pub fn with_base_url(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.into(),
            client,
        }
    }

    async fn get_json(&self, params: &[(&str, &str)]) -> Result<serde_json::Value, MetadataError> {
        debug!(url = %self.base_url, "OMDb request");

        let resp = self
            .client
            .get(&self.base_url)
            .query(params)
            .send()
            .await
            .map_err(|e| MetadataError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(MetadataError::Provider(format!(
                "OMDb returned {}",
                resp.status()
            )));
        }

        let data: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| MetadataError::Provider(format!("parse JSON: {e}")))?;

        if data["Response"].as_str() == Some("False") {
            let reason = data["Error"].as_str().unwrap_or("Unknown error");
            return Err(MetadataError::NoResults(reason.to_string()));
        }

        Ok(data)
    }
}

#[async_trait::async_trait]
impl MovieCatalog for OmdbClient {
    fn name(&self) -> &str {
        "omdb"
    }

    async fn search(&self, query: &str, api_key: &str) -> Vec<SearchResult> {
        let query = query.trim();
        if query.is_empty() {
            debug!("empty search query, skipping OMDb request");
            return Vec::new();
        }

        match self
            .get_json(&[("s", query), ("apikey", api_key), ("r", "json")])
            .await
        {
            Ok(data) => parse_search_results(&data),
            Err(MetadataError::NoResults(reason)) => {
                debug!(query, reason = %reason, "OMDb returned no results");
                Vec::new()
            }
            Err(e) => {
                warn!(query, error = %e, "OMDb search failed");
                Vec::new()
            }
        }
    }

    async fn get_details(&self, id: &str, api_key: &str) -> Option<DetailRecord> {
        let id = id.trim();
        if id.is_empty() {
            debug!("empty catalog id, skipping OMDb request");
            return None;
        }

        match self
            .get_json(&[("i", id), ("plot", "full"), ("apikey", api_key), ("r", "json")])
            .await
        {
            Ok(data) => parse_detail_record(&data),
            Err(MetadataError::NoResults(reason)) => {
                debug!(id, reason = %reason, "OMDb returned no details");
                None
            }
            Err(e) => {
                warn!(id, error = %e, "OMDb details request failed");
                None
            }
        }
    }
}

/// Text field, with blanks and the "N/A" sentinel mapped to `None`.
fn available(value: &serde_json::Value) -> Option<String> {
    value
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty() && *s != NOT_AVAILABLE)
        .map(str::to_string)
}

fn parse_search_results(data: &serde_json::Value) -> Vec<SearchResult> {
    let Some(entries) = data["Search"].as_array() else {
        debug!("OMDb response has no Search array");
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(|r| {
            Some(SearchResult {
                id: available(&r["imdbID"])?,
                title: available(&r["Title"])?,
                year: r["Year"].as_str().unwrap_or_default().to_string(),
                poster: available(&r["Poster"]),
                media_type: MediaType::parse(r["Type"].as_str().unwrap_or_default()),
            })
        })
        .collect()
}

fn parse_detail_record(data: &serde_json::Value) -> Option<DetailRecord> {
    let ratings = data["Ratings"]
        .as_array()
        .map(|rs| {
            rs.iter()
                .filter_map(|r| {
                    Some(Rating {
                        source: r["Source"].as_str()?.to_string(),
                        value: r["Value"].as_str()?.to_string(),
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    Some(DetailRecord {
        id: available(&data["imdbID"])?,
        title: available(&data["Title"])?,
        year: data["Year"].as_str().unwrap_or_default().to_string(),
        poster: available(&data["Poster"]),
        media_type: MediaType::parse(data["Type"].as_str().unwrap_or_default()),
        plot: available(&data["Plot"]),
        genre: available(&data["Genre"]),
        director: available(&data["Director"]),
        writer: available(&data["Writer"]),
        actors: available(&data["Actors"]),
        runtime: available(&data["Runtime"]),
        rated: available(&data["Rated"]),
        released: available(&data["Released"]),
        imdb_rating: available(&data["imdbRating"]),
        ratings,
        language: available(&data["Language"]),
        country: available(&data["Country"]),
        awards: available(&data["Awards"]),
        website: available(&data["Website"]),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_search_results_from_json() {
        let json = serde_json::json!({
            "Search": [
                {
                    "Title": "The Matrix",
                    "Year": "1999",
                    "imdbID": "tt0133093",
                    "Type": "movie",
                    "Poster": "https://m.media-amazon.com/images/matrix.jpg"
                },
                {
                    "Title": "The Matrix Reloaded",
                    "Year": "2003",
                    "imdbID": "tt0234215",
                    "Type": "movie",
                    "Poster": "N/A"
                },
                { "Title": "No id", "Year": "2001", "Type": "movie" }
            ],
            "totalResults": "3",
            "Response": "True"
        });

        let results = parse_search_results(&json);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].id, "tt0133093");
        assert_eq!(results[0].media_type, MediaType::Movie);
        assert!(results[0].poster.as_ref().unwrap().contains("matrix.jpg"));
        assert_eq!(results[1].poster, None);
    }

    #[test]
    fn missing_search_array_is_empty() {
        let json = serde_json::json!({ "Response": "True" });
        assert!(parse_search_results(&json).is_empty());
    }

    #[test]
    fn parse_detail_record_from_json() {
        let json = serde_json::json!({
            "Title": "Inception",
            "Year": "2010",
            "Rated": "PG-13",
            "Released": "16 Jul 2010",
            "Runtime": "148 min",
            "Genre": "Action, Adventure, Sci-Fi",
            "Director": "Christopher Nolan",
            "Writer": "Christopher Nolan",
            "Actors": "Leonardo DiCaprio, Joseph Gordon-Levitt, Elliot Page",
            "Plot": "A thief who steals corporate secrets...",
            "Language": "English, Japanese, French",
            "Country": "United States, United Kingdom",
            "Awards": "Won 4 Oscars. 159 wins & 220 nominations total",
            "Poster": "https://m.media-amazon.com/images/inception.jpg",
            "Ratings": [
                { "Source": "Internet Movie Database", "Value": "8.8/10" },
                { "Source": "Rotten Tomatoes", "Value": "87%" }
            ],
            "imdbRating": "8.8",
            "imdbID": "tt1375666",
            "Type": "movie",
            "Website": "N/A",
            "Response": "True"
        });

        let detail = parse_detail_record(&json).unwrap();
        assert_eq!(detail.title, "Inception");
        assert_eq!(detail.runtime.as_deref(), Some("148 min"));
        assert_eq!(detail.genres(), vec!["Action", "Adventure", "Sci-Fi"]);
        assert_eq!(detail.cast().len(), 3);
        assert_eq!(detail.ratings.len(), 2);
        assert_eq!(detail.ratings[1].value, "87%");
        assert_eq!(detail.website, None);
    }

    #[test]
    fn detail_without_id_is_rejected() {
        let json = serde_json::json!({ "Title": "Orphan", "Response": "True" });
        assert!(parse_detail_record(&json).is_none());
    }
}
