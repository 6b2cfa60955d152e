use super::DependencyKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A package's dependencies split into the four [`DependencyKind`] buckets
///
/// A name is never in both `peer` and `opt`; it may additionally appear in
/// `deps` and/or `dev`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatedDependencies {
    deps: BTreeMap<String, String>,
    dev: BTreeMap<String, String>,
    opt: BTreeMap<String, String>,
    peer: BTreeMap<String, String>,
}

impl AggregatedDependencies {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one dependency under `kind`, keeping `peer` and `opt` disjoint
    pub fn with(mut self, kind: DependencyKind, name: &str, version_range: &str) -> Self {
        self.insert(kind, name.to_string(), version_range.to_string());
        self
    }

    pub(crate) fn insert(&mut self, kind: DependencyKind, name: String, version_range: String) {
        match kind {
            DependencyKind::Peer => {
                self.opt.remove(&name);
                self.peer.insert(name, version_range);
            }
            DependencyKind::Opt => {
                self.peer.remove(&name);
                self.opt.insert(name, version_range);
            }
            DependencyKind::Deps => {
                self.deps.insert(name, version_range);
            }
            DependencyKind::Dev => {
                self.dev.insert(name, version_range);
            }
        }
    }

    pub fn by_kind(&self, kind: DependencyKind) -> &BTreeMap<String, String> {
        match kind {
            DependencyKind::Peer => &self.peer,
            DependencyKind::Opt => &self.opt,
            DependencyKind::Deps => &self.deps,
            DependencyKind::Dev => &self.dev,
        }
    }

    pub fn deps(&self) -> &BTreeMap<String, String> {
        &self.deps
    }

    pub fn dev(&self) -> &BTreeMap<String, String> {
        &self.dev
    }

    pub fn opt(&self) -> &BTreeMap<String, String> {
        &self.opt
    }

    pub fn peer(&self) -> &BTreeMap<String, String> {
        &self.peer
    }

    pub fn total_count(&self) -> usize {
        DependencyKind::ALL
            .iter()
            .map(|kind| self.by_kind(*kind).len())
            .sum()
    }
}
