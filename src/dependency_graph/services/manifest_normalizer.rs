use crate::dependency_graph::domain::{AggregatedDependencies, DependencyKind, PackageManifest};

/// ManifestNormalizer service: raw manifest to categorized dependencies
///
/// `dependencies` and `devDependencies` pass through unchanged. Each entry of
/// `peerDependencies` goes to `opt` when its `peerDependenciesMeta` entry says
/// `optional: true`, and to `peer` otherwise.
pub struct ManifestNormalizer;

impl ManifestNormalizer {
    pub fn normalize(manifest: PackageManifest) -> AggregatedDependencies {
        let PackageManifest {
            dependencies,
            dev_dependencies,
            peer_dependencies,
            peer_dependencies_meta,
            ..
        } = manifest;

        let mut info = AggregatedDependencies::new();

        for (name, version) in dependencies {
            info.insert(DependencyKind::Deps, name, version);
        }
        for (name, version) in dev_dependencies {
            info.insert(DependencyKind::Dev, name, version);
        }
        for (name, version) in peer_dependencies {
            let optional = peer_dependencies_meta
                .get(&name)
                .is_some_and(|meta| meta.optional);
            let kind = if optional {
                DependencyKind::Opt
            } else {
                DependencyKind::Peer
            };
            info.insert(kind, name, version);
        }

        info
    }
}
