use crate::dependency_graph::domain::Scope;

/// GraphRequest - request DTO for the dependency graph use case
#[derive(Debug, Clone)]
pub struct GraphRequest {
    /// Scope whose packages are fetched and linked
    pub scope: Scope,
    /// Maximum number of manifest requests in flight
    pub max_concurrency: usize,
}

impl GraphRequest {
    pub fn new(scope: Scope, max_concurrency: usize) -> Self {
        Self {
            scope,
            max_concurrency: max_concurrency.max(1),
        }
    }
}
