//! Archive-mode fetcher: edition ZIP + ordering manifest → page images
//!
//! The archive delivers per-page PDFs under content-addressed filenames;
//! a separate manifest (`edition.json`) defines page order and section
//! labels. The manifest is metadata, not content: its failure degrades
//! to an empty page map instead of aborting the download.

use std::collections::HashMap;
use std::io::{Cursor, Read};

use anyhow::{Context, Result};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use pressline_core::{get_bytes, get_text, retry_with_backoff};
use pressline_store::{EditionDir, PageRecord};
use serde_json::Value;

use crate::index::EditionHandle;
use crate::render::PageRenderer;
use crate::scraper::FetchOutcome;

/// Derive the content-addressing key from a filename: the base name with
/// its final extension stripped. `path/ab12.pdf` → `ab12`.
pub fn content_key(entry_name: &str) -> &str {
    let basename = entry_name.rsplit('/').next().unwrap_or(entry_name);
    match basename.rsplit_once('.') {
        Some((stem, _)) => stem,
        None => basename,
    }
}

/// Build page records from a fetched edition manifest.
///
/// Page numbers come from manifest array position (index + 1); entries
/// whose `contenturl` is not a PDF are ignored. The manifest is trusted
/// for ordering; contiguity is not re-validated here.
pub fn parse_manifest_pages(manifest: &Value) -> Vec<PageRecord> {
    let Some(entries) = manifest.get("pages").and_then(Value::as_array) else {
        return Vec::new();
    };
    entries
        .iter()
        .enumerate()
        .filter_map(|(i, page)| {
            let content_url = page.get("contenturl").and_then(Value::as_str)?;
            let hash = content_url.strip_suffix(".pdf")?;
            Some(PageRecord {
                page_num: i as u32 + 1,
                section: page
                    .get("section")
                    .and_then(Value::as_str)
                    .unwrap_or("Unknown")
                    .to_string(),
                hash: hash.to_string(),
                pdf_name: content_url.to_string(),
            })
        })
        .collect()
}

/// Walk the archive and convert every manifest-matched PDF entry.
///
/// Entries absent from the page map are non-page assets and skipped
/// silently; a conversion failure loses that page only. Returns the
/// number of pages converted.
pub fn extract_archive(
    zip_bytes: &[u8],
    pages: &[PageRecord],
    dir: &EditionDir,
    renderer: &dyn PageRenderer,
    multi: &MultiProgress,
) -> Result<usize> {
    let by_key: HashMap<&str, &PageRecord> =
        pages.iter().map(|p| (p.hash.as_str(), p)).collect();

    let mut archive =
        zip::ZipArchive::new(Cursor::new(zip_bytes)).context("failed to open edition archive")?;

    let pb = multi.add(ProgressBar::new(archive.len() as u64));
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{prefix:>12.cyan} {bar:20} {pos}/{len} {wide_msg}")
            .expect("valid progress template")
            .progress_chars("=>-"),
    );
    pb.set_prefix("converting");

    let mut converted = 0;
    for i in 0..archive.len() {
        pb.inc(1);
        let mut entry = match archive.by_index(i) {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("unreadable archive entry #{i}: {e}");
                continue;
            }
        };
        let name = entry.name().to_string();
        if !name.to_lowercase().ends_with(".pdf") {
            continue;
        }
        let Some(record) = by_key.get(content_key(&name)) else {
            continue;
        };

        let mut pdf = Vec::with_capacity(entry.size() as usize);
        if let Err(e) = entry.read_to_end(&mut pdf) {
            log::warn!("failed to read {name}: {e}");
            continue;
        }

        let out = dir.image_path(record.page_num);
        match renderer.render_first_page(&pdf, &out) {
            Ok(()) => {
                pb.set_message(format!("page {} ({})", record.page_num, record.section));
                log::debug!("converted page {} ({})", record.page_num, record.section);
                converted += 1;
            }
            Err(e) => log::warn!("error converting {name}: {e:#}"),
        }
    }
    pb.finish_and_clear();
    Ok(converted)
}

fn fetch_manifest(url: &str) -> Result<Value> {
    let body = get_text(url, &[]).map_err(anyhow::Error::from)?;
    serde_json::from_str(&body).context("invalid edition manifest JSON")
}

/// Acquire one archive-mode edition into `dir`.
pub fn fetch(
    handle: &EditionHandle,
    dir: &EditionDir,
    renderer: &dyn PageRenderer,
    multi: &MultiProgress,
) -> Result<FetchOutcome> {
    if dir.is_complete() {
        log::info!("Edition {} already downloaded", handle.date);
        return Ok(FetchOutcome::AlreadyComplete);
    }

    let Some(zip_url) = handle.zip_url.as_deref() else {
        return Ok(FetchOutcome::Skipped("no ZIP URL on edition".to_string()));
    };

    log::info!("Downloading edition {}...", handle.date);
    let zip_bytes = retry_with_backoff("archive download", || get_bytes(zip_url, &[]))
        .context("failed to download edition archive")?;

    dir.create()?;

    // Ordering manifest is best-effort: without it we still extract, but
    // no entry matches and the page map stays empty.
    let mut pages = Vec::new();
    match handle.manifest_url.as_deref() {
        Some(url) => match fetch_manifest(url) {
            Ok(manifest) => {
                if let Err(e) = dir.write_edition_manifest(&manifest) {
                    log::warn!("could not persist edition manifest: {e:#}");
                }
                pages = parse_manifest_pages(&manifest);
            }
            Err(e) => log::warn!("could not fetch edition manifest: {e:#}"),
        },
        None => log::warn!("edition {} has no manifest URL", handle.date),
    }

    let converted = extract_archive(&zip_bytes, &pages, dir, renderer, multi)?;
    log::info!("Converted {converted}/{} pages", pages.len());

    dir.write_page_map(&pages)?;
    dir.write_metadata(&handle.record)?;
    Ok(FetchOutcome::Fetched { pages: converted })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::Path;

    /// Renderer stub that copies the PDF bytes straight to the output
    /// path, so tests can assert which entries were converted.
    struct CopyRenderer;

    impl PageRenderer for CopyRenderer {
        fn render_first_page(&self, pdf: &[u8], out: &Path) -> Result<()> {
            std::fs::write(out, pdf)?;
            Ok(())
        }
    }

    struct FailingRenderer {
        fail_on: &'static [u8],
    }

    impl PageRenderer for FailingRenderer {
        fn render_first_page(&self, pdf: &[u8], out: &Path) -> Result<()> {
            if pdf == self.fail_on {
                anyhow::bail!("simulated render failure");
            }
            std::fs::write(out, pdf)?;
            Ok(())
        }
    }

    fn build_zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut cursor = Cursor::new(Vec::new());
        let mut writer = zip::ZipWriter::new(&mut cursor);
        let options = zip::write::SimpleFileOptions::default();
        for (name, data) in entries {
            writer.start_file(*name, options).unwrap();
            writer.write_all(data).unwrap();
        }
        writer.finish().unwrap();
        cursor.into_inner()
    }

    fn manifest(pages: &[(&str, &str)]) -> Value {
        serde_json::json!({
            "pages": pages
                .iter()
                .map(|(url, section)| serde_json::json!({"contenturl": url, "section": section}))
                .collect::<Vec<_>>()
        })
    }

    #[test]
    fn content_key_strips_path_and_extension() {
        assert_eq!(content_key("pages/ab12.pdf"), "ab12");
        assert_eq!(content_key("ab12.pdf"), "ab12");
        assert_eq!(content_key("noext"), "noext");
    }

    #[test]
    fn manifest_pages_numbered_by_position() {
        let m = manifest(&[("abc.pdf", "News"), ("def.pdf", "Sports")]);
        let pages = parse_manifest_pages(&m);
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].page_num, 1);
        assert_eq!(pages[0].hash, "abc");
        assert_eq!(pages[0].section, "News");
        assert_eq!(pages[1].page_num, 2);
        assert_eq!(pages[1].pdf_name, "def.pdf");
    }

    #[test]
    fn manifest_skips_non_pdf_contenturl() {
        let m = manifest(&[("cover.jpg", "Front"), ("abc.pdf", "News")]);
        let pages = parse_manifest_pages(&m);
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].hash, "abc");
        // Position in the array, not position among PDFs.
        assert_eq!(pages[0].page_num, 2);
    }

    #[test]
    fn manifest_section_defaults_to_unknown() {
        let m = serde_json::json!({"pages": [{"contenturl": "abc.pdf"}]});
        let pages = parse_manifest_pages(&m);
        assert_eq!(pages[0].section, "Unknown");
    }

    #[test]
    fn manifest_without_pages_is_empty() {
        assert!(parse_manifest_pages(&serde_json::json!({})).is_empty());
    }

    #[test]
    fn extract_converts_only_matched_entries() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = EditionDir::at(tmp.path().to_path_buf());
        dir.create().unwrap();

        let m = manifest(&[("abc.pdf", "News"), ("def.pdf", "Sports")]);
        let pages = parse_manifest_pages(&m);
        // xyz.pdf is in the archive but not the manifest; readme is not a PDF.
        let zip_bytes = build_zip(&[
            ("abc.pdf", b"pdf-abc"),
            ("xyz.pdf", b"pdf-xyz"),
            ("readme.txt", b"ignore me"),
        ]);

        let converted =
            extract_archive(&zip_bytes, &pages, &dir, &CopyRenderer, &MultiProgress::new())
                .unwrap();

        assert_eq!(converted, 1);
        assert_eq!(
            std::fs::read(dir.image_path(1)).unwrap(),
            b"pdf-abc".to_vec()
        );
        assert!(!dir.image_path(2).exists());
        assert!(!tmp.path().join("xyz.png").exists());
    }

    #[test]
    fn extract_matches_nested_and_uppercase_entries() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = EditionDir::at(tmp.path().to_path_buf());
        dir.create().unwrap();

        let m = manifest(&[("abc.pdf", "News")]);
        let pages = parse_manifest_pages(&m);
        let zip_bytes = build_zip(&[("content/abc.PDF", b"pdf-abc")]);

        let converted =
            extract_archive(&zip_bytes, &pages, &dir, &CopyRenderer, &MultiProgress::new())
                .unwrap();
        assert_eq!(converted, 1);
        assert!(dir.image_path(1).exists());
    }

    #[test]
    fn extract_continues_past_conversion_failure() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = EditionDir::at(tmp.path().to_path_buf());
        dir.create().unwrap();

        let m = manifest(&[("bad.pdf", "News"), ("good.pdf", "Sports")]);
        let pages = parse_manifest_pages(&m);
        let zip_bytes = build_zip(&[("bad.pdf", b"broken"), ("good.pdf", b"fine")]);

        let renderer = FailingRenderer { fail_on: b"broken" };
        let converted =
            extract_archive(&zip_bytes, &pages, &dir, &renderer, &MultiProgress::new()).unwrap();

        assert_eq!(converted, 1);
        assert!(!dir.image_path(1).exists());
        assert!(dir.image_path(2).exists());
    }

    #[test]
    fn extract_rejects_garbage_archive() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = EditionDir::at(tmp.path().to_path_buf());
        dir.create().unwrap();
        let result =
            extract_archive(b"not a zip", &[], &dir, &CopyRenderer, &MultiProgress::new());
        assert!(result.is_err());
    }
}
