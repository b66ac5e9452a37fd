use moviematch_core::types::MediaType;

use crate::DetailRecord;

/// A movie catalog that can be searched by title and queried by identifier.
///
/// Implementations swallow every failure: callers only ever see an empty list
/// or `None`, whether the cause was "no matches" or "network down".
#[async_trait::async_trait]
pub trait MovieCatalog: Send + Sync {
    fn name(&self) -> &str;

    /// Search by free-text title query. Blank queries return an empty list
    /// without touching the network.
    async fn search(&self, query: &str, api_key: &str) -> Vec<SearchResult>;

    /// Fetch the full record for one catalog identifier.
    async fn get_details(&self, id: &str, api_key: &str) -> Option<DetailRecord>;
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SearchResult {
    pub id: String,
    pub title: String,
    pub year: String,
    pub poster: Option<String>,
    pub media_type: MediaType,
}
