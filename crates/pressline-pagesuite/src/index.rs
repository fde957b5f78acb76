//! Edition index: list known editions, resolve a date to one edition
//!
//! Both upstream protocols expose "what editions exist" differently; this
//! module normalizes them into one `{date, editions}` shape so everything
//! downstream is mode-agnostic.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use pressline_core::{get_text, retry_with_backoff};
use serde::Deserialize;
use serde_json::Value;

use crate::config::{ApiMode, Endpoints, PublicationConfig};

/// All editions published on one date. Archive-mode `published.json`
/// already has this shape; probe-mode listings are normalized into it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DayEditions {
    pub date: String,
    pub editions: Vec<Value>,
}

/// Reference to one remote edition, resolved from the index.
///
/// Mode-specific identifiers are optional: archive handles carry the ZIP
/// and manifest URLs, probe handles carry the edition GUID. `record` is
/// the upstream edition object untouched, snapshotted to `metadata.json`.
#[derive(Debug, Clone)]
pub struct EditionHandle {
    pub date: NaiveDate,
    pub name: String,
    pub zip_url: Option<String>,
    pub manifest_url: Option<String>,
    pub edition_guid: Option<String>,
    pub record: Value,
}

impl EditionHandle {
    fn from_record(date: NaiveDate, record: Value) -> Self {
        let field = |key: &str| {
            record
                .get(key)
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(String::from)
        };
        Self {
            date,
            name: field("name").unwrap_or_default(),
            zip_url: field("zip"),
            manifest_url: field("editionLink"),
            edition_guid: field("editionGuid"),
            record,
        }
    }
}

/// Fetches and caches the edition list for one publication.
///
/// The cache lives for this index instance: populated on first use,
/// bypassed and repopulated by `force_refresh`, never persisted.
pub struct EditionIndex {
    config: PublicationConfig,
    endpoints: Endpoints,
    cache: Option<Vec<DayEditions>>,
}

impl EditionIndex {
    pub fn new(config: PublicationConfig, endpoints: Endpoints) -> Self {
        Self {
            config,
            endpoints,
            cache: None,
        }
    }

    /// All known editions, grouped by date, newest ordering as upstream
    /// returns it.
    pub fn editions(&mut self, force_refresh: bool) -> Result<&[DayEditions]> {
        if self.cache.is_none() || force_refresh {
            log::info!("Fetching {} editions from API...", self.config.name);
            let days = match self.config.mode {
                ApiMode::Archive => self.fetch_published()?,
                ApiMode::Probe => self.fetch_replica()?,
            };
            log::info!("Found {} editions", days.len());
            self.cache = Some(days);
        }
        Ok(self.cache.as_deref().unwrap_or_default())
    }

    pub fn invalidate(&mut self) {
        self.cache = None;
    }

    /// Resolve a calendar date to its primary edition. An absent date is
    /// `None`, not an error.
    pub fn resolve(&mut self, date: NaiveDate) -> Result<Option<EditionHandle>> {
        let date_str = date.format("%Y-%m-%d").to_string();
        let handle = self
            .editions(false)?
            .iter()
            .find(|day| day.date == date_str)
            .and_then(|day| day.editions.first())
            .map(|record| EditionHandle::from_record(date, record.clone()));
        Ok(handle)
    }

    /// All dates that have at least one edition.
    pub fn available_dates(&mut self) -> Result<Vec<String>> {
        Ok(self
            .editions(false)?
            .iter()
            .filter(|day| !day.date.is_empty())
            .map(|day| day.date.clone())
            .collect())
    }

    fn fetch_published(&self) -> Result<Vec<DayEditions>> {
        let url = format!(
            "{}/{}/{}/published.json",
            self.endpoints.published_base, self.config.account_guid, self.config.pub_guid
        );
        let body = retry_with_backoff("edition list", || get_text(&url, &[]))
            .with_context(|| format!("failed to fetch edition list for {}", self.config.slug))?;
        parse_published(&body)
    }

    fn fetch_replica(&self) -> Result<Vec<DayEditions>> {
        let url = format!("{}/{}/editions", self.endpoints.replica_base, self.config.pub_guid);
        let mut headers = vec![("accept", "application/json")];
        if let Some(key) = self.config.api_key.as_deref() {
            headers.push(("x-api-key", key));
        }
        let body = retry_with_backoff("edition list", || get_text(&url, &headers))
            .with_context(|| format!("failed to fetch edition list for {}", self.config.slug))?;
        parse_replica(&body)
    }
}

/// Parse an archive-mode `published.json` listing.
pub fn parse_published(body: &str) -> Result<Vec<DayEditions>> {
    serde_json::from_str(body).context("invalid published.json edition list")
}

/// Parse a probe-mode edition listing and normalize it.
///
/// Upstream records are `{editionGuid, name, publishDate}` with an
/// ISO-8601 publish timestamp; the first 10 characters become the date
/// key, matching the archive-mode shape.
pub fn parse_replica(body: &str) -> Result<Vec<DayEditions>> {
    let raw: Vec<Value> = serde_json::from_str(body).context("invalid replica edition list")?;
    let days = raw
        .into_iter()
        .map(|record| {
            let date = record
                .get("publishDate")
                .and_then(Value::as_str)
                .map(|s| s.chars().take(10).collect())
                .unwrap_or_default();
            let edition = serde_json::json!({
                "editionGuid": record.get("editionGuid").and_then(Value::as_str).unwrap_or(""),
                "name": record.get("name").and_then(Value::as_str).unwrap_or(""),
            });
            DayEditions {
                date,
                editions: vec![edition],
            }
        })
        .collect();
    Ok(days)
}
