pub mod models;
pub mod error;
pub mod spec;
pub mod request;
pub mod insertion;
pub mod filter;
pub mod catalog;
pub mod source;
pub mod reporting;
pub mod config;

// Re-export commonly used items
pub use models::*;
pub use error::*;
pub use spec::OpenApiParser;
pub use request::{build_request, build_request_bytes, build_request_text, BuiltRequest, HttpService};
pub use insertion::{build_template, locate_ranges, RequestTemplate};
pub use filter::{filter_endpoints, EndpointFilter, MAX_FILTER_PATTERN_LEN};
pub use catalog::Catalog;
pub use source::{Loaded, SpecLoader};
