use serde::{Deserialize, Serialize};

/// Catalog entry kind as reported by the metadata API's `Type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaType {
    Movie,
    Series,
    Episode,
    Game,
    Unknown,
}

impl MediaType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Series => "series",
            Self::Episode => "episode",
            Self::Game => "game",
            Self::Unknown => "unknown",
        }
    }

    /// Parse the API's type string. Anything unrecognised is `Unknown`.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "movie" => Self::Movie,
            "series" => Self::Series,
            "episode" => Self::Episode,
            "game" => Self::Game,
            _ => Self::Unknown,
        }
    }
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which of the two API credentials a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialKind {
    /// Key for the generative-language (prompt analysis) API.
    Analysis,
    /// Key for the movie metadata API.
    Metadata,
}

impl CredentialKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Analysis => "analysis",
            Self::Metadata => "metadata",
        }
    }

    /// Settings-table key the credential is persisted under.
    pub fn setting_key(self) -> &'static str {
        match self {
            Self::Analysis => "analysis_api_key",
            Self::Metadata => "metadata_api_key",
        }
    }
}

impl std::fmt::Display for CredentialKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CredentialKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "analysis" => Ok(Self::Analysis),
            "metadata" => Ok(Self::Metadata),
            other => Err(format!("unknown credential kind: {other}")),
        }
    }
}

/// The two API keys a search needs. Either may be empty; an empty key is a
/// valid state that simply makes the corresponding API calls fail.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub analysis_key: String,
    pub metadata_key: String,
}

impl Credentials {
    pub fn new(analysis_key: impl Into<String>, metadata_key: impl Into<String>) -> Self {
        Self {
            analysis_key: analysis_key.into(),
            metadata_key: metadata_key.into(),
        }
    }

    pub fn get(&self, kind: CredentialKind) -> &str {
        match kind {
            CredentialKind::Analysis => &self.analysis_key,
            CredentialKind::Metadata => &self.metadata_key,
        }
    }

    pub fn set(&mut self, kind: CredentialKind, value: String) {
        match kind {
            CredentialKind::Analysis => self.analysis_key = value,
            CredentialKind::Metadata => self.metadata_key = value,
        }
    }

    pub fn is_set(&self, kind: CredentialKind) -> bool {
        !self.get(kind).is_empty()
    }

    /// Both keys present.
    pub fn is_complete(&self) -> bool {
        self.is_set(CredentialKind::Analysis) && self.is_set(CredentialKind::Metadata)
    }
}
