//! Pressline PageSuite - e-paper edition acquisition
//!
//! Discovers editions for a publication, fetches their pages through one
//! of two upstream protocols, and reconstructs an ordered, sectioned set
//! of page images on disk.
//!
//! - **Archive mode**: the edition is one ZIP of per-page PDFs plus a
//!   separate ordering manifest; each PDF is rasterized to PNG.
//! - **Probe mode**: pages are requested by number from an image endpoint
//!   until a placeholder-sized response marks the end of the edition.
//!
//! # Example
//!
//! ```ignore
//! use pressline_pagesuite::{Endpoints, PublicationConfig, Scraper};
//!
//! let config: PublicationConfig = toml::from_str(paper_toml)?;
//! let mut scraper = Scraper::new(config, Endpoints::default(), "output".into());
//! let images = scraper.page_images(date)?;
//! ```

pub mod archive;
pub mod config;
pub mod index;
pub mod probe;
pub mod render;
pub mod scraper;

// Re-exports
pub use config::{ApiMode, Endpoints, PublicationConfig};
pub use index::{DayEditions, EditionHandle, EditionIndex};
pub use probe::ProbeLimits;
pub use render::{PageRenderer, PdfToPpm};
pub use scraper::{FetchOutcome, Scraper};
