//! HTTP protocol layer module
//!
//! Protocol helpers decoupled from request dispatch: CORS decoration, MIME
//! detection, path decoding, cache validation, listings and response builders.

pub mod cache;
pub mod cors;
pub mod listing;
pub mod mime;
pub mod path;
pub mod response;

// Re-export commonly used items
pub use cors::apply_cors_headers;
pub use response::{
    build_304_response, build_404_response, build_500_response, build_501_response,
    build_file_response, build_html_response, build_options_response, build_redirect_response,
};
