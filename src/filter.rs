// Regex endpoint filter for specfuzz
//
// Filter patterns come straight from user input (or from whoever wrote the spec a user
// pastes), so evaluation cost has to stay bounded:
// - patterns over MAX_FILTER_PATTERN_LEN characters are ignored
// - compiled programs are capped by REGEX_SIZE_LIMIT
// - the regex crate matches in linear time, there is no backtracking to blow up
// Any pattern that is rejected or fails to compile behaves as "match all".
//
// Matching is "contains a match" against `METHOD path server`.

use crate::models::Endpoint;
use regex::{Regex, RegexBuilder};
use tracing::debug;

/// Longest pattern (in characters) that is compiled at all
pub const MAX_FILTER_PATTERN_LEN: usize = 500;
const REGEX_SIZE_LIMIT: usize = 1 << 20;

/// Text a filter pattern is matched against.
pub fn projection(endpoint: &Endpoint) -> String {
    format!("{} {} {}", endpoint.method(), endpoint.path(), endpoint.server())
}

fn compile(pattern: &str) -> Option<Regex> {
    if pattern.trim().is_empty() {
        return None;
    }
    if pattern.chars().count() > MAX_FILTER_PATTERN_LEN {
        debug!(
            "filter pattern of {} chars exceeds limit of {}, ignoring",
            pattern.chars().count(),
            MAX_FILTER_PATTERN_LEN
        );
        return None;
    }
    match RegexBuilder::new(pattern)
        .size_limit(REGEX_SIZE_LIMIT)
        .dfa_size_limit(REGEX_SIZE_LIMIT)
        .build()
    {
        Ok(re) => Some(re),
        Err(e) => {
            debug!("invalid filter pattern, matching everything: {}", e);
            None
        }
    }
}

/// Compiled filter state; `None` means every endpoint matches
#[derive(Debug, Clone, Default)]
pub struct EndpointFilter {
    pattern: String,
    compiled: Option<Regex>,
}

impl EndpointFilter {
    pub fn new(pattern: &str) -> Self {
        let mut filter = Self::default();
        filter.set_filter(pattern);
        filter
    }

    /// Replace the active pattern. Never fails; unusable patterns match everything.
    pub fn set_filter(&mut self, pattern: &str) {
        self.pattern = pattern.to_string();
        self.compiled = compile(pattern);
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Whether a pattern is actually narrowing results.
    pub fn is_active(&self) -> bool {
        self.compiled.is_some()
    }

    pub fn matches(&self, endpoint: &Endpoint) -> bool {
        match &self.compiled {
            Some(re) => re.is_match(&projection(endpoint)),
            None => true,
        }
    }

    /// Matching endpoints in catalog order.
    pub fn apply<'a>(&self, catalog: &'a [Endpoint]) -> Vec<&'a Endpoint> {
        catalog.iter().filter(|e| self.matches(e)).collect()
    }
}

/// One-shot form of `EndpointFilter::apply`.
pub fn filter_endpoints<'a>(catalog: &'a [Endpoint], pattern: &str) -> Vec<&'a Endpoint> {
    EndpointFilter::new(pattern).apply(catalog)
}
