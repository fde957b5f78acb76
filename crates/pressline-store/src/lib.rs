//! Pressline Store - On-disk edition directories
//!
//! One edition materializes as a directory of `page_NNN.png` images plus
//! two sidecar artifacts: `page_map.json` (ordered page metadata) and
//! `metadata.json` (verbatim snapshot of the upstream edition record).
//! The page map, not image presence, is the completeness signal: a run
//! that dies mid-download leaves images but no map, and must be redone.

pub mod edition_dir;
pub mod page_map;

pub use edition_dir::EditionDir;
pub use page_map::{PageRecord, page_image_name, read_page_map, write_page_map};
