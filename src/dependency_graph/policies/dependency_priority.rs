use crate::dependency_graph::domain::{DependencyKind, RawEdge, ResolvedEdge};
use std::collections::BTreeSet;

/// DependencyPriority policy for reducing several relations to one edge type
///
/// When a package relates to the same target in more than one way, the edge is
/// drawn with the strongest relation. Ranks are strict, so ties cannot occur.
///
/// Priority order:
/// 1. `peer` (4)
/// 2. `opt` (3)
/// 3. `deps` (2)
/// 4. `dev` (1)
pub struct DependencyPriority;

impl DependencyPriority {
    /// Numeric rank of a kind; higher wins
    pub fn rank(kind: DependencyKind) -> u8 {
        match kind {
            DependencyKind::Peer => 4,
            DependencyKind::Opt => 3,
            DependencyKind::Deps => 2,
            DependencyKind::Dev => 1,
        }
    }

    /// The highest-priority kind of the set, or None if it is empty
    pub fn primary(types: &BTreeSet<DependencyKind>) -> Option<DependencyKind> {
        types.iter().max().copied()
    }

    /// All kinds of the set, highest priority first
    pub fn sorted(types: &BTreeSet<DependencyKind>) -> Vec<DependencyKind> {
        types.iter().rev().copied().collect()
    }

    /// Reduces a raw edge to its resolved form
    ///
    /// Returns None for an edge with no observed relation.
    pub fn resolve(raw: RawEdge) -> Option<ResolvedEdge> {
        let primary_type = Self::primary(&raw.types)?;
        let primary_version = raw.versions.get(&primary_type).cloned().unwrap_or_default();
        let all_types = Self::sorted(&raw.types);

        Some(ResolvedEdge {
            source: raw.source,
            target: raw.target,
            primary_type,
            primary_version,
            all_types,
        })
    }
}
