//! Page map: ordered record of page number → section → source document

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Filename of the page map artifact inside an edition directory.
pub const PAGE_MAP_FILE: &str = "page_map.json";

/// Reconstructed metadata for one page of an edition.
///
/// `hash` is the content-addressing key that matched an archive entry to
/// this page; probe-mode pages have no source document, so `hash` and
/// `pdf_name` are empty there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRecord {
    pub page_num: u32,
    pub section: String,
    pub hash: String,
    pub pdf_name: String,
}

impl PageRecord {
    /// Record for a probe-fetched page: no section metadata on that
    /// protocol, no source document.
    pub fn probed(page_num: u32) -> Self {
        Self {
            page_num,
            section: "Unknown".to_string(),
            hash: String::new(),
            pdf_name: String::new(),
        }
    }
}

/// Image filename for a page number: `page_NNN.png`, zero-padded to 3.
pub fn page_image_name(page_num: u32) -> String {
    format!("page_{page_num:03}.png")
}

/// Parse the page number back out of a `page_NNN.png` filename.
pub fn parse_page_number(filename: &str) -> Option<u32> {
    filename
        .strip_prefix("page_")?
        .strip_suffix(".png")?
        .parse()
        .ok()
}

/// Write the page map to `dir/page_map.json`. An empty map is valid
/// output (archive mode with a failed manifest fetch degrades to it).
pub fn write_page_map(dir: &Path, pages: &[PageRecord]) -> Result<()> {
    let path = dir.join(PAGE_MAP_FILE);
    let json = serde_json::to_string_pretty(pages).context("failed to serialize page map")?;
    std::fs::write(&path, json).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

/// Read the page map from `dir/page_map.json`.
pub fn read_page_map(dir: &Path) -> Result<Vec<PageRecord>> {
    let path = dir.join(PAGE_MAP_FILE);
    let json = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let pages: Vec<PageRecord> =
        serde_json::from_str(&json).context("failed to parse page_map.json")?;
    Ok(pages)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_name_zero_padded() {
        assert_eq!(page_image_name(1), "page_001.png");
        assert_eq!(page_image_name(42), "page_042.png");
        assert_eq!(page_image_name(120), "page_120.png");
    }

    #[test]
    fn parse_page_number_roundtrip() {
        assert_eq!(parse_page_number("page_001.png"), Some(1));
        assert_eq!(parse_page_number("page_120.png"), Some(120));
    }

    #[test]
    fn parse_page_number_rejects_other_files() {
        assert_eq!(parse_page_number("page_map.json"), None);
        assert_eq!(parse_page_number("metadata.json"), None);
        assert_eq!(parse_page_number("page_abc.png"), None);
    }

    #[test]
    fn probed_record_defaults() {
        let rec = PageRecord::probed(7);
        assert_eq!(rec.page_num, 7);
        assert_eq!(rec.section, "Unknown");
        assert!(rec.hash.is_empty());
        assert!(rec.pdf_name.is_empty());
    }

    #[test]
    fn write_read_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let pages = vec![
            PageRecord {
                page_num: 1,
                section: "News".to_string(),
                hash: "abc".to_string(),
                pdf_name: "abc.pdf".to_string(),
            },
            PageRecord::probed(2),
        ];
        write_page_map(dir.path(), &pages).unwrap();
        let read = read_page_map(dir.path()).unwrap();
        assert_eq!(read, pages);
    }

    #[test]
    fn serialized_field_names() {
        let rec = PageRecord {
            page_num: 3,
            section: "Sports".to_string(),
            hash: "h".to_string(),
            pdf_name: "h.pdf".to_string(),
        };
        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["page_num"], 3);
        assert_eq!(json["section"], "Sports");
        assert_eq!(json["hash"], "h");
        assert_eq!(json["pdf_name"], "h.pdf");
    }

    #[test]
    fn empty_map_is_valid() {
        let dir = tempfile::tempdir().unwrap();
        write_page_map(dir.path(), &[]).unwrap();
        assert!(read_page_map(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn read_missing_map_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_page_map(dir.path()).is_err());
    }

    #[test]
    fn read_corrupt_map_errors() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(PAGE_MAP_FILE), b"not json").unwrap();
        assert!(read_page_map(dir.path()).is_err());
    }
}
