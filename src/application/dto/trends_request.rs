use crate::dependency_graph::domain::Scope;

/// Length of the download window when none is configured
pub const DEFAULT_DAYS: u32 = 60;

/// TrendsRequest - request DTO for the download trends use case
#[derive(Debug, Clone)]
pub struct TrendsRequest {
    pub scope: Scope,
    /// Window length; the range is `[today - days, today]`
    pub days: u32,
    pub max_concurrency: usize,
    /// Short or full names to keep in the result; empty keeps every package
    pub selected_packages: Vec<String>,
}

impl TrendsRequest {
    pub fn new(
        scope: Scope,
        days: u32,
        max_concurrency: usize,
        selected_packages: Vec<String>,
    ) -> Self {
        Self {
            scope,
            days,
            max_concurrency: max_concurrency.max(1),
            selected_packages,
        }
    }
}
