// Core data models for specfuzz
// Endpoints and parameters are immutable once built; the parser hands them out by value.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// HTTP methods an OpenAPI path item can declare
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    #[default]
    GET,
    PUT,
    POST,
    DELETE,
    OPTIONS,
    HEAD,
    PATCH,
    TRACE,
}

impl Method {
    /// Operation keys in the order they are read from a path item.
    pub const ALL: [Method; 8] = [
        Method::GET,
        Method::PUT,
        Method::POST,
        Method::DELETE,
        Method::OPTIONS,
        Method::HEAD,
        Method::PATCH,
        Method::TRACE,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::GET => "GET",
            Method::PUT => "PUT",
            Method::POST => "POST",
            Method::DELETE => "DELETE",
            Method::OPTIONS => "OPTIONS",
            Method::HEAD => "HEAD",
            Method::PATCH => "PATCH",
            Method::TRACE => "TRACE",
        }
    }

    /// Lowercase key used for this method inside an OpenAPI path item.
    pub fn spec_key(&self) -> &'static str {
        match self {
            Method::GET => "get",
            Method::PUT => "put",
            Method::POST => "post",
            Method::DELETE => "delete",
            Method::OPTIONS => "options",
            Method::HEAD => "head",
            Method::PATCH => "patch",
            Method::TRACE => "trace",
        }
    }

    /// Synthesized requests carry a placeholder JSON body only for these methods.
    pub fn has_body(&self) -> bool {
        matches!(self, Method::POST | Method::PUT | Method::PATCH)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Method {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Method::ALL
            .iter()
            .copied()
            .find(|m| m.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unsupported HTTP method: {}", s))
    }
}

/// Where a parameter lives in the request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Path,
    Query,
    Header,
    Cookie,
}

impl ParameterLocation {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterLocation::Path => "path",
            ParameterLocation::Query => "query",
            ParameterLocation::Header => "header",
            ParameterLocation::Cookie => "cookie",
        }
    }

    /// Map an OpenAPI `in` value; a missing or unknown location is a query parameter.
    pub fn from_spec(value: Option<&str>) -> Self {
        value
            .and_then(|v| v.parse().ok())
            .unwrap_or(ParameterLocation::Query)
    }

    /// Value a synthesized request uses until a tool fills in a real one.
    pub fn default_placeholder(&self) -> &'static str {
        match self {
            ParameterLocation::Path => "1",
            _ => "",
        }
    }
}

impl fmt::Display for ParameterLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for ParameterLocation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "path" => Ok(ParameterLocation::Path),
            "query" => Ok(ParameterLocation::Query),
            "header" => Ok(ParameterLocation::Header),
            "cookie" => Ok(ParameterLocation::Cookie),
            other => Err(format!("unknown parameter location: {}", other)),
        }
    }
}

/// A single declared parameter of an endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterInfo {
    name: String,
    location: ParameterLocation,
    placeholder_value: String,
}

impl ParameterInfo {
    /// Create a parameter with the placeholder its location calls for.
    pub fn new(name: impl Into<String>, location: ParameterLocation) -> Self {
        Self {
            name: name.into(),
            location,
            placeholder_value: location.default_placeholder().to_string(),
        }
    }

    pub fn with_placeholder(
        name: impl Into<String>,
        location: ParameterLocation,
        placeholder_value: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            location,
            placeholder_value: placeholder_value.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn location(&self) -> ParameterLocation {
        self.location
    }

    pub fn placeholder_value(&self) -> &str {
        &self.placeholder_value
    }
}

/// One documented operation of an API
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Endpoint {
    index: usize,
    scheme: String,
    method: Method,
    server: String,
    path: String,
    parameters: Vec<ParameterInfo>,
    description: String,
}

impl Endpoint {
    /// Build an endpoint, normalizing defaults:
    /// empty scheme becomes `https`, empty path becomes `/`,
    /// and the server never keeps a trailing slash.
    pub fn new(
        index: usize,
        scheme: impl Into<String>,
        method: Method,
        server: impl Into<String>,
        path: impl Into<String>,
        parameters: Vec<ParameterInfo>,
        description: impl Into<String>,
    ) -> Self {
        let scheme = scheme.into();
        let path = path.into();
        Self {
            index,
            scheme: if scheme.is_empty() { "https".to_string() } else { scheme },
            method,
            server: normalize_server(&server.into()),
            path: if path.is_empty() { "/".to_string() } else { path },
            parameters,
            description: description.into(),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn server(&self) -> &str {
        &self.server
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn parameters(&self) -> &[ParameterInfo] {
        &self.parameters
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Parameters declared at `location`, in declaration order.
    pub fn parameters_in(&self, location: ParameterLocation) -> impl Iterator<Item = &ParameterInfo> {
        self.parameters.iter().filter(move |p| p.location == location)
    }

    /// `QUERY:limit, PATH:id` style summary used by the catalog table.
    pub fn params_summary(&self) -> String {
        self.parameters
            .iter()
            .map(|p| format!("{}:{}", p.location.as_str().to_uppercase(), p.name))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// `METHOD path`, truncated with `...` to at most `max_len` characters.
    pub fn tab_label(&self, max_len: usize) -> String {
        let label = format!("{} {}", self.method, self.path);
        if label.chars().count() <= max_len {
            return label;
        }
        let keep = max_len.saturating_sub(3);
        let mut truncated: String = label.chars().take(keep).collect();
        truncated.push_str("...");
        truncated
    }
}

/// Trim whitespace and every trailing slash from a server URL.
pub fn normalize_server(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

/// Output of one specification parse
#[derive(Debug, Clone, Default, Serialize)]
pub struct ParseResult {
    pub endpoints: Vec<Endpoint>,
    pub messages: Vec<String>,
    pub default_server: String,
}

impl ParseResult {
    /// Empty catalog carrying diagnostics only.
    pub fn failed(messages: Vec<String>) -> Self {
        Self {
            endpoints: Vec::new(),
            messages,
            default_server: String::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }
}

/// Turns raw specification text into an endpoint catalog
pub trait SpecParser {
    /// Parse `spec_text`; `source_label` is carried for diagnostics only.
    /// Failures are reported through `ParseResult::messages`, never as errors.
    fn parse(&self, source_label: &str, spec_text: &str) -> ParseResult;
}
