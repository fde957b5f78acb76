//! PDF page rasterization via poppler's pdftoppm
//!
//! Archive-mode pages arrive as single-page PDFs; rendering is delegated
//! to the system `pdftoppm` binary rather than an in-process PDF stack.
//! Only the first rendered surface of each document is kept.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result, bail};

/// Render resolution for page images.
pub const RENDER_DPI: u32 = 150;

/// Renders the first page of a PDF to a PNG file.
///
/// The trait is the seam between archive extraction and the external
/// renderer, so extraction logic is testable without poppler installed.
pub trait PageRenderer {
    fn render_first_page(&self, pdf: &[u8], out: &Path) -> Result<()>;
}

/// `pdftoppm`-backed renderer.
pub struct PdfToPpm {
    binary: PathBuf,
}

impl PdfToPpm {
    /// Locate `pdftoppm` on PATH.
    pub fn discover() -> Result<Self> {
        match which::which("pdftoppm") {
            Ok(binary) => Ok(Self { binary }),
            Err(_) => bail!("pdftoppm not found in PATH (install poppler-utils)"),
        }
    }
}

impl PageRenderer for PdfToPpm {
    fn render_first_page(&self, pdf: &[u8], out: &Path) -> Result<()> {
        let mut scratch = tempfile::Builder::new()
            .suffix(".pdf")
            .tempfile()
            .context("failed to create scratch file for PDF")?;
        scratch
            .write_all(pdf)
            .context("failed to write scratch PDF")?;
        scratch.flush().context("failed to flush scratch PDF")?;

        // pdftoppm appends ".png" to the output prefix itself.
        let prefix = out.with_extension("");

        let output = Command::new(&self.binary)
            .arg("-png")
            .args(["-r", &RENDER_DPI.to_string()])
            .args(["-f", "1", "-l", "1"])
            .arg("-singlefile")
            .arg(scratch.path())
            .arg(&prefix)
            .output()
            .context("failed to run pdftoppm")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!("pdftoppm exited with {}: {}", output.status, stderr.trim());
        }
        if !out.exists() {
            bail!("pdftoppm produced no output for {}", out.display());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Renderer discovery only fails when poppler is absent; either
    /// outcome must be a clean Result, never a panic.
    #[test]
    fn discover_returns_result() {
        match PdfToPpm::discover() {
            Ok(renderer) => assert!(renderer.binary.ends_with("pdftoppm")),
            Err(e) => assert!(e.to_string().contains("pdftoppm")),
        }
    }
}
