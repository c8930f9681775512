//! File content digests
//!
//! Streams a file through SHA-1 and returns the lowercase hex digest.

use sha1::{Digest, Sha1};
use std::fs::File;
use std::io;
use std::path::Path;

/// Compute the SHA-1 of a file's full content.
///
/// The file is read to completion and closed before returning.
///
/// # Examples
/// ```no_run
/// let digest = dirlist::listing::checksum("Cargo.toml").unwrap();
/// assert_eq!(digest.len(), 40);
/// ```
pub fn checksum(path: impl AsRef<Path>) -> io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha1::new();
    io::copy(&mut file, &mut hasher)?;
    Ok(format!("{:x}", hasher.finalize()))
}
