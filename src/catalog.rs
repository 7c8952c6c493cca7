// Endpoint catalog view
// Holds one immutable parse snapshot plus the filtered row view over it.
// Loading replaces the snapshot wholesale; readers holding an older Arc keep a
// consistent list. Change notification belongs to whatever presents the rows.

use crate::filter::EndpointFilter;
use crate::models::Endpoint;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct Catalog {
    endpoints: Arc<[Endpoint]>,
    filter: EndpointFilter,
    visible: Vec<usize>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl Catalog {
    pub fn new(endpoints: Vec<Endpoint>) -> Self {
        let mut catalog = Self {
            endpoints: endpoints.into(),
            filter: EndpointFilter::default(),
            visible: Vec::new(),
        };
        catalog.refresh();
        catalog
    }

    /// Swap in a new snapshot, keeping the current filter.
    pub fn set_endpoints(&mut self, endpoints: Vec<Endpoint>) {
        self.endpoints = endpoints.into();
        self.refresh();
    }

    pub fn set_filter(&mut self, pattern: &str) {
        self.filter.set_filter(pattern);
        self.refresh();
    }

    fn refresh(&mut self) {
        self.visible = self
            .endpoints
            .iter()
            .enumerate()
            .filter(|(_, e)| self.filter.matches(e))
            .map(|(i, _)| i)
            .collect();
    }

    pub fn filter(&self) -> &EndpointFilter {
        &self.filter
    }

    /// Number of rows the current filter lets through.
    pub fn hit_count(&self) -> usize {
        self.visible.len()
    }

    pub fn total(&self) -> usize {
        self.endpoints.len()
    }

    pub fn snapshot(&self) -> Arc<[Endpoint]> {
        Arc::clone(&self.endpoints)
    }

    /// Endpoint shown at filtered row `row`.
    pub fn endpoint_at(&self, row: usize) -> Option<&Endpoint> {
        self.visible.get(row).map(|&i| &self.endpoints[i])
    }

    /// Endpoints for the given filtered rows; rows out of range are ignored.
    pub fn selected(&self, rows: &[usize]) -> Vec<&Endpoint> {
        rows.iter().filter_map(|&r| self.endpoint_at(r)).collect()
    }

    pub fn rows(&self) -> impl Iterator<Item = &Endpoint> {
        self.visible.iter().map(move |&i| &self.endpoints[i])
    }
}
