//! Probe-mode fetcher: request pages by number until the backend runs out
//!
//! The image endpoint never 404s for out-of-range pages; it answers with
//! a small placeholder GIF instead. Body size against a tuned threshold
//! is therefore the end-of-edition signal. The threshold must sit above
//! the placeholder's size and well below any real page image; a real page
//! smaller than it would be misread as the end (acknowledged risk, tuning
//! only).

use anyhow::{Context, Result};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use pressline_core::{HttpError, get_bytes};
use pressline_store::{EditionDir, PageRecord};

use crate::config::Endpoints;
use crate::index::EditionHandle;
use crate::scraper::FetchOutcome;

/// Placeholder GIF responses run ~10KB; real page renders at probe width
/// are hundreds of KB.
pub const PLACEHOLDER_MAX_BYTES: usize = 15_000;

/// Upper bound on probe iterations, so a backend that never serves a
/// placeholder cannot loop forever. No real edition approaches this.
pub const MAX_PROBE_PAGES: u32 = 500;

/// Requested page render width in pixels.
pub const PROBE_IMAGE_WIDTH: u32 = 1200;

/// Tunable probe termination parameters.
#[derive(Debug, Clone, Copy)]
pub struct ProbeLimits {
    pub placeholder_max_bytes: usize,
    pub max_pages: u32,
}

impl Default for ProbeLimits {
    fn default() -> Self {
        Self {
            placeholder_max_bytes: PLACEHOLDER_MAX_BYTES,
            max_pages: MAX_PROBE_PAGES,
        }
    }
}

/// Is this response body the backend's "no such page" placeholder?
pub fn is_placeholder(body: &[u8], limits: &ProbeLimits) -> bool {
    body.len() < limits.placeholder_max_bytes
}

/// Core probe loop, fed by any page-fetching function.
///
/// Saves pages starting at 1 until the source reports a non-success
/// status, returns a placeholder-sized body, or the iteration bound is
/// hit. Connection-level failures abort the edition; the directory is
/// left without a page map and will be re-acquired.
pub fn run_probe_loop(
    dir: &EditionDir,
    limits: &ProbeLimits,
    mut fetch_page: impl FnMut(u32) -> Result<Vec<u8>, HttpError>,
    pb: &ProgressBar,
) -> Result<Vec<PageRecord>> {
    let mut pages = Vec::new();
    for page_num in 1..=limits.max_pages {
        let body = match fetch_page(page_num) {
            Ok(body) => body,
            // The backend said no such page; normal end of edition.
            Err(e) if e.status().is_some() => {
                log::debug!("page {page_num}: {e}, stopping");
                break;
            }
            Err(e) => {
                return Err(e).with_context(|| format!("failed to fetch page {page_num}"));
            }
        };

        if is_placeholder(&body, limits) {
            log::debug!(
                "page {page_num}: {} bytes, placeholder threshold reached",
                body.len()
            );
            break;
        }

        let out = dir.image_path(page_num);
        std::fs::write(&out, &body)
            .with_context(|| format!("failed to write {}", out.display()))?;
        pages.push(PageRecord::probed(page_num));
        pb.set_message(format!("page {page_num}"));
        pb.tick();

        if page_num == limits.max_pages {
            log::warn!("probe bound of {} pages reached without a placeholder", limits.max_pages);
        }
    }
    Ok(pages)
}

/// Acquire one probe-mode edition into `dir`.
pub fn fetch(
    handle: &EditionHandle,
    dir: &EditionDir,
    endpoints: &Endpoints,
    limits: &ProbeLimits,
    multi: &MultiProgress,
) -> Result<FetchOutcome> {
    if dir.is_complete() {
        log::info!("Edition {} already downloaded", handle.date);
        return Ok(FetchOutcome::AlreadyComplete);
    }

    let Some(guid) = handle.edition_guid.as_deref() else {
        return Ok(FetchOutcome::Skipped("no edition GUID".to_string()));
    };

    log::info!("Downloading edition {} (image API)...", handle.date);
    dir.create()?;

    let pb = multi.add(ProgressBar::new_spinner());
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:>12.cyan} {wide_msg}")
            .expect("valid progress template"),
    );
    pb.set_prefix("probing");

    let image_base = endpoints.image_base.as_str();
    let pages = run_probe_loop(
        dir,
        limits,
        |page_num| {
            let url = format!("{image_base}?eid={guid}&pnum={page_num}&w={PROBE_IMAGE_WIDTH}");
            get_bytes(&url, &[])
        },
        &pb,
    )?;
    pb.finish_and_clear();

    log::info!("Downloaded {} pages", pages.len());
    dir.write_page_map(&pages)?;
    dir.write_metadata(&handle.record)?;
    Ok(FetchOutcome::Fetched { pages: pages.len() })
}
