//! Publication configuration and API endpoints

use serde::Deserialize;

/// How a publication's backend delivers editions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiMode {
    /// Edition arrives as a ZIP of per-page PDFs plus an ordering manifest.
    Archive,
    /// Pages are fetched one by one from the image endpoint until the
    /// backend answers with its placeholder image.
    Probe,
}

impl std::fmt::Display for ApiMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Archive => write!(f, "archive"),
            Self::Probe => write!(f, "probe"),
        }
    }
}

/// Per-newspaper settings. Supplied by the caller, never mutated here.
#[derive(Debug, Clone, Deserialize)]
pub struct PublicationConfig {
    /// Unique key, used as the output subdirectory name.
    pub slug: String,
    /// Display name.
    pub name: String,
    #[serde(default = "default_mode")]
    pub mode: ApiMode,
    #[serde(default)]
    pub account_guid: String,
    #[serde(default)]
    pub pub_guid: String,
    #[serde(default)]
    pub api_key: Option<String>,
}

fn default_mode() -> ApiMode {
    ApiMode::Archive
}

impl PublicationConfig {
    /// A publication with no GUIDs configured cannot be fetched; batch
    /// runs skip it rather than erroring.
    pub fn is_configured(&self) -> bool {
        match self.mode {
            ApiMode::Archive => !self.account_guid.is_empty() && !self.pub_guid.is_empty(),
            ApiMode::Probe => !self.pub_guid.is_empty(),
        }
    }
}

/// Base URLs of the upstream service. Defaults point at production;
/// overridable so tests and mirrors can redirect.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    /// Archive-mode edition list: `{published_base}/{account}/{pub}/published.json`
    pub published_base: String,
    /// Probe-mode edition list: `{replica_base}/{pub}/editions`
    pub replica_base: String,
    /// Probe-mode page images: `{image_base}?eid=..&pnum=..&w=..`
    pub image_base: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            published_base: "https://published.pagesuite.com".to_string(),
            replica_base: "https://ep.prod.pagesuite.com/prod/replica/publication".to_string(),
            image_base: "https://edition.pagesuite.com/get_image.aspx".to_string(),
        }
    }
}
