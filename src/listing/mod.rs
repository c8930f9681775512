//! Directory listing module
//!
//! Walks a directory and shapes the result into the JSON payload returned for
//! directory requests.

mod checksum;
mod entry;
mod walk;

pub use checksum::checksum;
pub use entry::{Entry, EntryKind, Listing, NamedEntry};
pub use walk::{walk, Walk};

use crate::config::ListingFormat;
use std::path::Path;

/// Walk `dir` and collect its descendants in the requested shape.
///
/// Blocking: reads the whole tree and, for the detailed shape, every file.
pub fn build(dir: &Path, format: ListingFormat) -> Listing {
    Listing::collect(format, walk(dir, format.wants_checksums()))
}
