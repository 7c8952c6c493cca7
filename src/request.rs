// Request synthesis for specfuzz
// Serializes one endpoint into a literal HTTP/1.1 request with placeholder values.
//
// Example:
//   Endpoint: POST /users/{id}?notify  (server https://api.test.com:8443)
//   Output:   POST /users/1?notify= HTTP/1.1\r\n
//             Host: api.test.com:8443\r\n
//             User-Agent: specfuzz/<version>\r\n
//             Content-Type: application/json\r\n
//             Content-Length: 2\r\n
//             \r\n
//             {}
//
// Line endings are always \r\n; insertion point offsets depend on it.

use crate::models::{Endpoint, ParameterInfo, ParameterLocation};
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use tracing::debug;
use url::Url;

pub const USER_AGENT: &str = concat!("specfuzz/", env!("CARGO_PKG_VERSION"));
pub const PATH_PARAM_PLACEHOLDER: &str = "1";
pub const BODY_PLACEHOLDER: &str = "{}";
const FALLBACK_SERVER: &str = "https://localhost";
const FALLBACK_HOST: &str = "localhost";

lazy_static! {
    static ref TEMPLATE_TOKEN: Regex = Regex::new(r"\{[^}]+\}").unwrap();
}

/// Target a synthesized request is meant for
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HttpService {
    pub host: String,
    pub port: u16,
    pub secure: bool,
}

impl HttpService {
    /// Derive host/port/TLS from a server URL. Anything unparseable, or a URL
    /// without a host, targets `localhost` over HTTPS.
    pub fn from_server(server: &str) -> Self {
        let url = match Url::parse(server) {
            Ok(url) => url,
            Err(e) => {
                debug!("server '{}' is not a usable URL ({}), targeting localhost", server, e);
                return Self::localhost();
            }
        };
        let Some(host) = url.host_str() else {
            debug!("server '{}' has no host, targeting localhost", server);
            return Self::localhost();
        };

        let secure = url.scheme() == "https";
        let port = url.port().unwrap_or(if secure { 443 } else { 80 });
        Self {
            host: host.to_string(),
            port,
            secure,
        }
    }

    fn localhost() -> Self {
        Self {
            host: FALLBACK_HOST.to_string(),
            port: 443,
            secure: true,
        }
    }

    fn default_port(&self) -> u16 {
        if self.secure {
            443
        } else {
            80
        }
    }

    /// `host` or `host:port` when the port is not the scheme default.
    pub fn host_header(&self) -> String {
        if self.port == self.default_port() {
            self.host.clone()
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

/// A serialized request together with the service it targets
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuiltRequest {
    pub service: HttpService,
    pub raw: Vec<u8>,
}

impl BuiltRequest {
    pub fn as_text(&self) -> String {
        String::from_utf8_lossy(&self.raw).into_owned()
    }
}

/// Override when non-blank, else the endpoint's server, else `https://localhost`;
/// trailing slashes removed.
pub fn effective_server(endpoint: &Endpoint, base_url_override: Option<&str>) -> String {
    let server = match base_url_override.map(str::trim).filter(|s| !s.is_empty()) {
        Some(override_url) => override_url,
        None if !endpoint.server().is_empty() => endpoint.server(),
        None => FALLBACK_SERVER,
    };
    server.trim_end_matches('/').to_string()
}

fn path_placeholder(param: &ParameterInfo) -> &str {
    if param.placeholder_value().is_empty() {
        PATH_PARAM_PLACEHOLDER
    } else {
        param.placeholder_value()
    }
}

/// Replace `{name}` tokens of declared path parameters with their placeholders,
/// then any token still left with `1`.
pub fn substitute_path_params(path: &str, params: &[ParameterInfo]) -> String {
    let mut result = path.to_string();
    for p in params.iter().filter(|p| p.location() == ParameterLocation::Path) {
        result = result.replace(&format!("{{{}}}", p.name()), path_placeholder(p));
    }
    TEMPLATE_TOKEN
        .replace_all(&result, PATH_PARAM_PLACEHOLDER)
        .into_owned()
}

/// `name=value` pairs of query parameters joined with `&`, in declaration order.
pub fn query_string(endpoint: &Endpoint) -> String {
    endpoint
        .parameters_in(ParameterLocation::Query)
        .map(|p| format!("{}={}", p.name(), p.placeholder_value()))
        .collect::<Vec<_>>()
        .join("&")
}

pub fn build_request_text(endpoint: &Endpoint, base_url_override: Option<&str>) -> String {
    let server = effective_server(endpoint, base_url_override);
    let service = HttpService::from_server(&server);
    render(endpoint, &service)
}

pub fn build_request_bytes(endpoint: &Endpoint, base_url_override: Option<&str>) -> Vec<u8> {
    build_request_text(endpoint, base_url_override).into_bytes()
}

pub fn build_request(endpoint: &Endpoint, base_url_override: Option<&str>) -> BuiltRequest {
    let server = effective_server(endpoint, base_url_override);
    let service = HttpService::from_server(&server);
    let raw = render(endpoint, &service).into_bytes();
    BuiltRequest { service, raw }
}

fn render(endpoint: &Endpoint, service: &HttpService) -> String {
    let mut target = substitute_path_params(endpoint.path(), endpoint.parameters());
    let query = query_string(endpoint);
    if !query.is_empty() {
        target.push('?');
        target.push_str(&query);
    }

    let has_body = endpoint.method().has_body();

    let mut request = format!("{} {} HTTP/1.1\r\n", endpoint.method(), target);
    request.push_str(&format!("Host: {}\r\n", service.host_header()));
    request.push_str(&format!("User-Agent: {}\r\n", USER_AGENT));
    if has_body {
        request.push_str("Content-Type: application/json\r\n");
        request.push_str(&format!("Content-Length: {}\r\n", BODY_PLACEHOLDER.len()));
    }
    request.push_str("\r\n");
    if has_body {
        request.push_str(BODY_PLACEHOLDER);
    }
    request
}
