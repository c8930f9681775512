//! Static file transfer
//!
//! Sends the bytes of one resolved file, with content-type inference,
//! `ETag` revalidation and single-range support.

use super::router::RequestContext;
use crate::http::{self, cache, mime, range::ByteRange, range::RangeParseResult};
use hyper::body::Bytes;
use std::fs::Metadata;
use std::io::{self, SeekFrom};
use std::path::Path;
use tokio::fs::{self, File};
use tokio::io::{AsyncReadExt, AsyncSeekExt};

/// Serve a regular file that has already been resolved and stat'ed
pub async fn serve_file(
    ctx: &RequestContext<'_>,
    path: &Path,
    metadata: &Metadata,
) -> io::Result<http::HttpResponse> {
    let total = metadata.len();
    let etag = cache::generate_etag(total, metadata.modified().ok());

    if cache::check_etag_match(ctx.if_none_match.as_deref(), &etag) {
        return Ok(http::build_304_response(&etag));
    }

    let content_type = mime::content_type_for(path);

    match http::parse_range_header(ctx.range_header.as_deref(), total) {
        RangeParseResult::Valid(range) => {
            let data = if ctx.is_head {
                Bytes::new()
            } else {
                read_range(path, range).await?
            };
            Ok(http::build_partial_response(
                data,
                range,
                total,
                content_type,
                &etag,
                ctx.is_head,
            ))
        }
        RangeParseResult::NotSatisfiable => Ok(http::build_416_response(total)),
        RangeParseResult::None => {
            let (data, content_length) = if ctx.is_head {
                (Bytes::new(), total)
            } else {
                let content = fs::read(path).await?;
                let len = content.len() as u64;
                (Bytes::from(content), len)
            };
            Ok(http::build_file_response(
                data,
                content_length,
                content_type,
                &etag,
                ctx.is_head,
            ))
        }
    }
}

/// Read exactly the bytes covered by `range`
async fn read_range(path: &Path, range: ByteRange) -> io::Result<Bytes> {
    let mut file = File::open(path).await?;
    file.seek(SeekFrom::Start(range.start)).await?;

    let mut buf = Vec::with_capacity(usize::try_from(range.len()).unwrap_or(0));
    file.take(range.len()).read_to_end(&mut buf).await?;
    if (buf.len() as u64) < range.len() {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "file shrank while serving range",
        ));
    }
    Ok(Bytes::from(buf))
}
