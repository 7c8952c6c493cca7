// Spec retrieval for specfuzz
// Fetches spec content from a URL (reqwest) or a local file, falling back to
// pasted content when retrieval fails, then parses on a blocking worker.

use crate::error::{FetchError, LoadError};
use crate::models::{ParseResult, SpecParser};
use crate::request::USER_AGENT;
use crate::spec::OpenApiParser;
use reqwest::Client;
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

const PASTED_SOURCE: &str = "pasted";

/// Something that can turn a location into spec text
#[allow(async_fn_in_trait)]
pub trait SpecFetcher {
    async fn fetch(&self, location: &str) -> Result<String, FetchError>;
}

pub struct HttpFetcher {
    pub client: Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .pool_max_idle_per_host(10)
            .build()?;
        Ok(Self { client })
    }
}

impl SpecFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let resp = self.client.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        let body = resp.bytes().await?;
        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FileFetcher;

impl SpecFetcher for FileFetcher {
    async fn fetch(&self, path: &str) -> Result<String, FetchError> {
        if !Path::new(path).is_file() {
            return Err(FetchError::NotFound(path.to_string()));
        }
        let bytes = tokio::fs::read(path).await.map_err(|source| FetchError::Io {
            path: path.to_string(),
            source,
        })?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

pub fn looks_like_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Parse outcome together with where the content came from
#[derive(Debug, Clone)]
pub struct Loaded {
    pub source: String,
    pub result: ParseResult,
}

pub struct SpecLoader {
    http: HttpFetcher,
    files: FileFetcher,
    parser: OpenApiParser,
}

impl SpecLoader {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        Ok(Self {
            http: HttpFetcher::new(timeout)?,
            files: FileFetcher,
            parser: OpenApiParser::new(),
        })
    }

    /// Load from `input` (URL or file path), or from `pasted` content when no
    /// input is given or retrieval fails.
    pub async fn load(&self, input: Option<&str>, pasted: Option<&str>) -> Result<Loaded, LoadError> {
        let input = input.map(str::trim).filter(|s| !s.is_empty());
        let pasted = pasted.filter(|s| !s.trim().is_empty());

        let Some(location) = input else {
            return match pasted {
                Some(content) => self.parse_in_background(PASTED_SOURCE, content).await,
                None => Err(LoadError::NoInput),
            };
        };

        info!("Loading spec from {}", location);
        let fetched = if looks_like_url(location) {
            self.http.fetch(location).await
        } else {
            self.files.fetch(location).await
        };

        match fetched {
            Ok(content) => self.parse_in_background(location, &content).await,
            Err(e) => match pasted {
                Some(content) => {
                    warn!("Unable to load {}: {}. Parsing pasted content instead", location, e);
                    self.parse_in_background(PASTED_SOURCE, content).await
                }
                None => Err(LoadError::Retrieval {
                    location: location.to_string(),
                    source: e,
                }),
            },
        }
    }

    async fn parse_in_background(&self, source: &str, content: &str) -> Result<Loaded, LoadError> {
        let parser = self.parser;
        let label = source.to_string();
        let text = content.to_string();
        let result = tokio::task::spawn_blocking(move || parser.parse(&label, &text)).await?;
        Ok(Loaded {
            source: source.to_string(),
            result,
        })
    }
}
