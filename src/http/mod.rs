//! HTTP protocol layer module
//!
//! Response builders and header helpers, independent of how a request path
//! is resolved.

pub mod cache;
pub mod mime;
pub mod range;
pub mod response;

// Re-export commonly used types
pub use range::parse_range_header;
pub use response::{
    build_304_response, build_404_response, build_405_response, build_416_response,
    build_error_response, build_file_response, build_json_response, build_options_response,
    build_partial_response, HttpResponse,
};
