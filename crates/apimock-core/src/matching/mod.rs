//! Request matching utilities.

mod payload;
mod query;
mod url;

pub use payload::{object_intersects, payload_matches};
pub use query::{parse_query_string, query_matches, request_query};
pub use url::{canonical_path, normalize_path, PatternError, UrlPattern};
