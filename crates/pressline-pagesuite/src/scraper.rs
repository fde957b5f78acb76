//! Acquisition orchestrator: date in, ordered page images out

use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDate;
use indicatif::MultiProgress;
use pressline_store::EditionDir;

use crate::archive;
use crate::config::{ApiMode, Endpoints, PublicationConfig};
use crate::index::EditionIndex;
use crate::probe::{self, ProbeLimits};
use crate::render::PdfToPpm;

/// What a fetcher did for one edition.
///
/// "Nothing to acquire" is a value, not an error: the caller can tell a
/// clean skip (missing identifier) from an already-materialized edition
/// and from a genuine failure (the `Err` path).
#[derive(Debug)]
pub enum FetchOutcome {
    /// Edition fetched; number of pages written.
    Fetched { pages: usize },
    /// Directory was already complete; no network activity happened.
    AlreadyComplete,
    /// Non-fatal skip with the reason (logged, no directory produced).
    Skipped(String),
}

/// Per-publication scraper: resolves dates through the edition index and
/// dispatches to the mode-appropriate fetcher.
pub struct Scraper {
    config: PublicationConfig,
    endpoints: Endpoints,
    output_dir: PathBuf,
    index: EditionIndex,
    limits: ProbeLimits,
    multi: MultiProgress,
}

impl Scraper {
    pub fn new(config: PublicationConfig, endpoints: Endpoints, output_dir: PathBuf) -> Self {
        let index = EditionIndex::new(config.clone(), endpoints.clone());
        Self {
            config,
            endpoints,
            output_dir,
            index,
            limits: ProbeLimits::default(),
            multi: MultiProgress::new(),
        }
    }

    /// Route progress bars through the caller's MultiProgress so they
    /// interleave cleanly with log output.
    pub fn with_progress(mut self, multi: MultiProgress) -> Self {
        self.multi = multi;
        self
    }

    pub fn config(&self) -> &PublicationConfig {
        &self.config
    }

    /// Output directory for one date of this publication.
    pub fn edition_dir(&self, date: NaiveDate) -> EditionDir {
        let date_str = date.format("%Y-%m-%d").to_string();
        EditionDir::for_edition(&self.output_dir, &self.config.slug, &date_str)
    }

    /// Acquire (or reuse) the edition for `date` and return its page
    /// images in strict page order. An unresolvable date or a skipped
    /// edition yields an empty list.
    pub fn page_images(&mut self, date: NaiveDate) -> Result<Vec<PathBuf>> {
        let Some(handle) = self.index.resolve(date)? else {
            log::info!("No edition found for {}", date.format("%Y-%m-%d"));
            return Ok(Vec::new());
        };

        let dir = self.edition_dir(date);
        let outcome = match self.config.mode {
            ApiMode::Archive => {
                let renderer = PdfToPpm::discover()?;
                archive::fetch(&handle, &dir, &renderer, &self.multi)?
            }
            ApiMode::Probe => {
                probe::fetch(&handle, &dir, &self.endpoints, &self.limits, &self.multi)?
            }
        };

        match outcome {
            FetchOutcome::Fetched { .. } | FetchOutcome::AlreadyComplete => Ok(dir.page_images()),
            FetchOutcome::Skipped(reason) => {
                log::warn!(
                    "{}: skipped {}: {reason}",
                    self.config.slug,
                    date.format("%Y-%m-%d")
                );
                Ok(Vec::new())
            }
        }
    }

    /// All dates the publication has editions for.
    pub fn available_dates(&mut self) -> Result<Vec<String>> {
        self.index.available_dates()
    }

    /// Drop the cached edition list; the next call refetches it.
    pub fn refresh_editions(&mut self) {
        self.index.invalidate();
    }
}
