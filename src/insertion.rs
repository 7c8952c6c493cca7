// Insertion point location for specfuzz
//
// Works on the already-serialized request bytes so every range points at the exact
// bytes that will be transmitted. Ranges are half-open byte offsets.
//
// Path parameters: first occurrence of the placeholder anywhere in the request.
// Two path parameters sharing a placeholder resolve to the same first occurrence,
// and a placeholder like "1" may match earlier text such as "/v1". Consumers rely on
// this first-occurrence behavior, so it is kept as is.
//
// Query parameters: the value part of the first `name=value` occurrence.
// Body: everything after the first blank line, for methods that carry a body.
// Header and cookie parameters are never marked.

use crate::models::{Endpoint, ParameterLocation};
use crate::request::{build_request, HttpService, PATH_PARAM_PLACEHOLDER};
use serde::Serialize;
use std::ops::Range;
use tracing::debug;

const HEADER_TERMINATOR: &[u8] = b"\r\n\r\n";

/// A request plus the byte ranges a payload engine should mutate
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestTemplate {
    pub service: HttpService,
    pub raw: Vec<u8>,
    pub insertion_points: Vec<Range<usize>>,
}

impl RequestTemplate {
    /// The bytes covered by each insertion point, lossily decoded.
    pub fn marked_values(&self) -> Vec<String> {
        self.insertion_points
            .iter()
            .map(|r| String::from_utf8_lossy(&self.raw[r.clone()]).into_owned())
            .collect()
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Compute insertion point ranges for `endpoint` inside `raw`.
/// Placeholders that cannot be found are skipped silently.
pub fn locate_ranges(raw: &[u8], endpoint: &Endpoint) -> Vec<Range<usize>> {
    let mut ranges = Vec::new();

    for p in endpoint.parameters_in(ParameterLocation::Path) {
        let placeholder = match p.placeholder_value() {
            "" => PATH_PARAM_PLACEHOLDER,
            value => value,
        };
        match find(raw, placeholder.as_bytes()) {
            Some(start) => ranges.push(start..start + placeholder.len()),
            None => debug!("path parameter '{}' placeholder not found", p.name()),
        }
    }

    for p in endpoint.parameters_in(ParameterLocation::Query) {
        let search = format!("{}={}", p.name(), p.placeholder_value());
        match find(raw, search.as_bytes()) {
            Some(idx) => {
                let value_start = idx + p.name().len() + 1;
                ranges.push(value_start..value_start + p.placeholder_value().len());
            }
            None => debug!("query parameter '{}' not found", p.name()),
        }
    }

    if endpoint.method().has_body() {
        if let Some(idx) = find(raw, HEADER_TERMINATOR) {
            let body_start = idx + HEADER_TERMINATOR.len();
            if raw.len() > body_start {
                ranges.push(body_start..raw.len());
            }
        }
    }

    ranges
}

/// Build the request for `endpoint` and mark its insertion points.
pub fn build_template(endpoint: &Endpoint, base_url_override: Option<&str>) -> RequestTemplate {
    let request = build_request(endpoint, base_url_override);
    let insertion_points = locate_ranges(&request.raw, endpoint);
    RequestTemplate {
        service: request.service,
        raw: request.raw,
        insertion_points,
    }
}
