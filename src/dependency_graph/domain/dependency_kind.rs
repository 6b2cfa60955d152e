use crate::dependency_graph::policies::DependencyPriority;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// The four relations a package can declare towards another package
///
/// The ordering of this type is the edge-reduction priority:
/// `Peer > Opt > Deps > Dev`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyKind {
    /// Required peer dependency
    Peer,
    /// Peer dependency marked `optional` in `peerDependenciesMeta`
    Opt,
    /// Runtime dependency (`dependencies`)
    Deps,
    /// Development-only dependency (`devDependencies`)
    Dev,
}

impl DependencyKind {
    /// Every kind, highest priority first
    pub const ALL: [DependencyKind; 4] = [
        DependencyKind::Peer,
        DependencyKind::Opt,
        DependencyKind::Deps,
        DependencyKind::Dev,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DependencyKind::Peer => "peer",
            DependencyKind::Opt => "opt",
            DependencyKind::Deps => "deps",
            DependencyKind::Dev => "dev",
        }
    }

    /// Stroke colour used by renderers for edges of this kind
    pub fn color(&self) -> &'static str {
        match self {
            DependencyKind::Peer => "#e74c3c",
            DependencyKind::Opt => "#e67e22",
            DependencyKind::Deps => "#3498db",
            DependencyKind::Dev => "#27ae60",
        }
    }
}

impl Ord for DependencyKind {
    fn cmp(&self, other: &Self) -> Ordering {
        DependencyPriority::rank(*self).cmp(&DependencyPriority::rank(*other))
    }
}

impl PartialOrd for DependencyKind {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl std::fmt::Display for DependencyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for DependencyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "peer" => Ok(DependencyKind::Peer),
            "opt" => Ok(DependencyKind::Opt),
            "deps" => Ok(DependencyKind::Deps),
            "dev" => Ok(DependencyKind::Dev),
            _ => Err(format!(
                "Invalid dependency kind: {}. Expected one of peer, opt, deps, dev",
                s
            )),
        }
    }
}
