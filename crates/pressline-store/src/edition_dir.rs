//! Edition directory: the materialized result for one (publication, date)

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::page_map::{self, PageRecord, parse_page_number};

/// Filename of the metadata artifact (verbatim upstream edition record).
pub const METADATA_FILE: &str = "metadata.json";

/// Filename for the raw archive-mode edition manifest, kept as fetched.
pub const EDITION_MANIFEST_FILE: &str = "edition.json";

/// Handle on one edition's output directory.
#[derive(Debug, Clone)]
pub struct EditionDir {
    root: PathBuf,
}

impl EditionDir {
    /// Directory for a (publication, date) pair: `<output>/<slug>/<date>`.
    pub fn for_edition(output_dir: &Path, slug: &str, date_str: &str) -> Self {
        Self {
            root: output_dir.join(slug).join(date_str),
        }
    }

    pub fn at(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    pub fn create(&self) -> Result<()> {
        std::fs::create_dir_all(&self.root)
            .with_context(|| format!("failed to create {}", self.root.display()))
    }

    pub fn image_path(&self, page_num: u32) -> PathBuf {
        self.root.join(page_map::page_image_name(page_num))
    }

    /// Whether this edition is fully materialized.
    ///
    /// Completeness is judged by the page map, not by image presence: an
    /// interrupted run leaves `page_NNN.png` files without a map, and
    /// must be treated as incomplete so the next run starts over. The map
    /// must be non-empty and every mapped page image must exist.
    pub fn is_complete(&self) -> bool {
        let Ok(pages) = page_map::read_page_map(&self.root) else {
            return false;
        };
        !pages.is_empty() && pages.len() == self.page_images().len()
    }

    /// Page images in strict page-number order.
    ///
    /// Writers already number sequentially, but filesystem listing order
    /// is not guaranteed, so the sort key is the number parsed from the
    /// filename rather than the raw name.
    pub fn page_images(&self) -> Vec<PathBuf> {
        let pattern = self.root.join("page_*.png");
        let mut images: Vec<(u32, PathBuf)> = glob::glob(&pattern.to_string_lossy())
            .into_iter()
            .flatten()
            .filter_map(|e| e.ok())
            .filter_map(|p| {
                let num = p.file_name().and_then(|n| parse_page_number(&n.to_string_lossy()))?;
                Some((num, p))
            })
            .collect();
        images.sort_by_key(|(num, _)| *num);
        images.into_iter().map(|(_, p)| p).collect()
    }

    pub fn write_page_map(&self, pages: &[PageRecord]) -> Result<()> {
        page_map::write_page_map(&self.root, pages)
    }

    pub fn read_page_map(&self) -> Result<Vec<PageRecord>> {
        page_map::read_page_map(&self.root)
    }

    /// Snapshot the upstream edition record verbatim as `metadata.json`.
    pub fn write_metadata(&self, record: &serde_json::Value) -> Result<()> {
        let path = self.root.join(METADATA_FILE);
        let json = serde_json::to_string_pretty(record).context("failed to serialize metadata")?;
        std::fs::write(&path, json)
            .with_context(|| format!("failed to write {}", path.display()))?;
        Ok(())
    }

    /// Keep the raw archive-mode manifest alongside the derived page map.
    pub fn write_edition_manifest(&self, manifest: &serde_json::Value) -> Result<()> {
        let path = self.root.join(EDITION_MANIFEST_FILE);
        let json =
            serde_json::to_string_pretty(manifest).context("failed to serialize manifest")?;
        std::fs::write(&path, json)
            .with_context(|| format!("failed to write {}", path.display()))?;
        Ok(())
    }
}
