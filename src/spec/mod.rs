// OpenAPI/Swagger specification parser for specfuzz
// Turns raw spec text (JSON or YAML, Swagger 2.0 or OpenAPI 3.x) into an endpoint catalog.
//
// Architecture:
//   prelude.rs   strip pasted shell noise ahead of the document
//       ↓
//   document.rs  decode, detect version, normalize Swagger 2.0, resolve local refs
//       ↓
//   mod.rs       map operations/parameters onto Endpoint + ParameterInfo

pub mod document;
pub mod prelude;

pub use document::{Document, SpecVersion};
pub use prelude::strip_leading_noise;

use crate::error::DocumentError;
use crate::models::{normalize_server, Endpoint, ParameterInfo, ParseResult, SpecParser};
use tracing::{debug, info};
use url::Url;

const EMPTY_SPEC_MESSAGE: &str = "Spec content is empty";
const GENERIC_FAILURE_MESSAGE: &str = "Failed to parse OpenAPI spec";

#[derive(Debug, Clone, Copy, Default)]
pub struct OpenApiParser;

impl OpenApiParser {
    pub fn new() -> Self {
        Self
    }
}

impl SpecParser for OpenApiParser {
    fn parse(&self, source_label: &str, spec_text: &str) -> ParseResult {
        if spec_text.trim().is_empty() {
            return ParseResult::failed(vec![EMPTY_SPEC_MESSAGE.to_string()]);
        }

        let cleaned = strip_leading_noise(spec_text.trim());
        let document = match Document::load(cleaned) {
            Ok(doc) => doc,
            Err(err) => {
                let messages = match err {
                    DocumentError::NotAnObject => vec![GENERIC_FAILURE_MESSAGE.to_string()],
                    other => vec![other.to_string()],
                };
                info!(source = source_label, "spec could not be parsed: {}", messages[0]);
                return ParseResult::failed(messages);
            }
        };

        let mut messages = document.diagnostics().to_vec();
        let default_server = resolve_default_server(&document);
        let scheme = extract_scheme(&default_server);

        let (operations, op_messages) = document.operations();
        messages.extend(op_messages);

        let mut endpoints = Vec::with_capacity(operations.len());
        for (i, op) in operations.iter().enumerate() {
            let (raw_params, param_messages) = document.parameters(op);
            messages.extend(param_messages);

            let parameters = raw_params
                .into_iter()
                .map(|p| ParameterInfo::new(p.name, p.location))
                .collect();

            let endpoint = Endpoint::new(
                i + 1,
                scheme.clone(),
                op.method,
                default_server.clone(),
                op.path,
                parameters,
                op.description(),
            );
            debug!(index = endpoint.index(), "{} {}", endpoint.method(), endpoint.path());
            endpoints.push(endpoint);
        }

        info!(
            source = source_label,
            endpoints = endpoints.len(),
            messages = messages.len(),
            "parsed specification"
        );

        ParseResult {
            endpoints,
            messages,
            default_server,
        }
    }
}

/// First declared server URL without trailing slashes; empty when none is declared.
fn resolve_default_server(document: &Document) -> String {
    document
        .first_server_url()
        .map(|url| normalize_server(&url))
        .unwrap_or_default()
}

/// `http` or `https` from the server URL; `https` whenever it cannot be determined.
pub fn extract_scheme(server_url: &str) -> String {
    match Url::parse(server_url.trim()) {
        Ok(url) if url.scheme() == "http" => "http".to_string(),
        _ => "https".to_string(),
    }
}
