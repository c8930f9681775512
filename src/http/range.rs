//! HTTP Range request parsing module
//!
//! Single `bytes=` range only, per RFC 7233. Multi-range requests and other
//! units are ignored and the full file is sent.

/// Inclusive byte span resolved against a known file length
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: u64,
    pub end: u64,
}

impl ByteRange {
    pub const fn len(&self) -> u64 {
        self.end - self.start + 1
    }

    pub const fn is_empty(&self) -> bool {
        false
    }

    /// `Content-Range` header value
    pub fn content_range(&self, total: u64) -> String {
        format!("bytes {}-{}/{total}", self.start, self.end)
    }
}

/// Outcome of looking at a `Range` header
#[derive(Debug, PartialEq, Eq)]
pub enum RangeParseResult {
    /// Serve this span with 206
    Valid(ByteRange),
    /// Respond 416
    NotSatisfiable,
    /// No header, or one we ignore; serve the whole file
    None,
}

/// Parse a `Range` header against a file of `len` bytes
///
/// # Examples
/// ```
/// use dirlist::http::range::{parse_range_header, ByteRange, RangeParseResult};
///
/// assert_eq!(
///     parse_range_header(Some("bytes=0-99"), 1000),
///     RangeParseResult::Valid(ByteRange { start: 0, end: 99 })
/// );
/// assert_eq!(parse_range_header(None, 1000), RangeParseResult::None);
/// ```
pub fn parse_range_header(range_header: Option<&str>, len: u64) -> RangeParseResult {
    let Some(spec) = range_header.and_then(|h| h.trim().strip_prefix("bytes=")) else {
        return RangeParseResult::None;
    };
    if spec.contains(',') {
        return RangeParseResult::None;
    }
    let Some((first, last)) = spec.split_once('-') else {
        return RangeParseResult::None;
    };

    match (first.trim(), last.trim()) {
        ("", suffix) => suffix_range(suffix, len),
        (start, end) => bounded_range(start, end, len),
    }
}

/// `-N`: the last N bytes
fn suffix_range(suffix: &str, len: u64) -> RangeParseResult {
    let Ok(n) = suffix.parse::<u64>() else {
        return RangeParseResult::None;
    };
    if n == 0 || len == 0 {
        return RangeParseResult::NotSatisfiable;
    }
    RangeParseResult::Valid(ByteRange {
        start: len.saturating_sub(n),
        end: len - 1,
    })
}

/// `S-` or `S-E`
fn bounded_range(start: &str, end: &str, len: u64) -> RangeParseResult {
    let Ok(start) = start.parse::<u64>() else {
        return RangeParseResult::None;
    };
    if start >= len {
        return RangeParseResult::NotSatisfiable;
    }

    let end = if end.is_empty() {
        len - 1
    } else {
        match end.parse::<u64>() {
            Ok(e) => e.min(len - 1),
            Err(_) => return RangeParseResult::None,
        }
    };

    if start > end {
        return RangeParseResult::NotSatisfiable;
    }
    RangeParseResult::Valid(ByteRange { start, end })
}
