/// Integration tests for the application layer
mod test_utilities;

use chrono::{Duration, NaiveDate};
use scope_graph::dependency_graph::domain::{PackageManifest, PeerDependencyMeta};
use scope_graph::prelude::*;
use scope_graph::shared::error::ScopeGraphError;
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;
use test_utilities::mocks::*;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn manifest(name: &str) -> PackageManifest {
    PackageManifest {
        name: Some(name.to_string()),
        version: Some("1.0.0".to_string()),
        ..Default::default()
    }
}

fn pairs(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// `@scope/pkg-a` peers on `@scope/pkg-b`, which depends on lodash only
fn peer_scenario() -> MockPackageRegistry {
    MockPackageRegistry::new()
        .with_manifest(PackageManifest {
            peer_dependencies: pairs(&[("@scope/pkg-b", "^1.0.0")]),
            ..manifest("@scope/pkg-a")
        })
        .with_manifest(PackageManifest {
            dependencies: pairs(&[("lodash", "^4.17.21")]),
            ..manifest("@scope/pkg-b")
        })
}

fn scope() -> Scope {
    Scope::new("@scope").unwrap()
}

fn memory_cache(clock: FixedClock) -> TtlCache {
    TtlCache::new(Arc::new(MemoryKeyValueStore::new()), Arc::new(clock))
}

#[tokio::test]
async fn test_graph_json_contract() {
    let use_case = BuildDependencyGraphUseCase::new(peer_scenario(), MockProgressReporter::new());

    let response = use_case.execute(GraphRequest::new(scope(), 4)).await.unwrap();
    let output = JsonFormatter::new().format_graph(&response.graph).unwrap();
    let value: serde_json::Value = serde_json::from_str(&output).unwrap();

    assert_eq!(
        value,
        json!({
            "nodes": [
                { "id": "@scope/pkg-a", "label": "pkg-a" },
                { "id": "@scope/pkg-b", "label": "pkg-b" }
            ],
            "edges": [{
                "source": "@scope/pkg-a",
                "target": "@scope/pkg-b",
                "type": "peer",
                "version": "^1.0.0",
                "allTypes": ["peer"]
            }]
        })
    );
    assert_eq!(response.package_count, 2);
    assert!(response.skipped.is_empty());
}

#[tokio::test]
async fn test_graph_reduces_edges_by_priority() {
    let mut meta = BTreeMap::new();
    meta.insert("@scope/core".to_string(), PeerDependencyMeta { optional: true });
    let registry = MockPackageRegistry::new()
        .with_manifest(PackageManifest {
            dependencies: pairs(&[("@scope/core", "^2.0.0")]),
            dev_dependencies: pairs(&[("@scope/core", "^2.1.0")]),
            peer_dependencies: pairs(&[("@scope/core", ">=2")]),
            peer_dependencies_meta: meta,
            ..manifest("@scope/app")
        })
        .with_manifest(manifest("@scope/core"));

    let use_case = BuildDependencyGraphUseCase::new(registry, MockProgressReporter::new());
    let response = use_case.execute(GraphRequest::new(scope(), 2)).await.unwrap();

    assert_eq!(response.graph.edge_count(), 1);
    let edge = &response.graph.edges()[0];
    assert_eq!(edge.primary_type, DependencyKind::Opt);
    assert_eq!(edge.primary_version, ">=2");
    assert_eq!(
        edge.all_types,
        vec![DependencyKind::Opt, DependencyKind::Deps, DependencyKind::Dev]
    );
}

#[tokio::test]
async fn test_graph_skips_unreachable_package() {
    let registry = peer_scenario().with_listed("@scope/gone");
    let reporter = MockProgressReporter::new();
    let use_case = BuildDependencyGraphUseCase::new(registry, reporter.clone());

    let response = use_case.execute(GraphRequest::new(scope(), 4)).await.unwrap();

    assert_eq!(response.package_count, 3);
    assert_eq!(response.skipped.len(), 1);
    assert_eq!(response.skipped[0].name, "@scope/gone");
    assert!(response.skipped[0].reason.contains("404"));
    assert!(!response.graph.contains_node("@scope/gone"));
    assert!(reporter
        .errors()
        .iter()
        .any(|e| e.contains("Skipped @scope/gone")));
}

#[tokio::test]
async fn test_graph_fails_for_empty_scope() {
    let use_case =
        BuildDependencyGraphUseCase::new(MockPackageRegistry::new(), MockProgressReporter::new());

    let err = use_case
        .execute(GraphRequest::new(Scope::new("@nobody").unwrap(), 4))
        .await
        .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<ScopeGraphError>(),
        Some(ScopeGraphError::NoPackagesFound { scope }) if scope == "@nobody"
    ));
}

#[tokio::test]
async fn test_cached_registry_fetches_each_manifest_once() {
    let inner = peer_scenario();
    let registry = CachingPackageRegistry::new(inner.clone(), memory_cache(FixedClock::at(2025, 1, 6)));
    let use_case = BuildDependencyGraphUseCase::new(registry, MockProgressReporter::new());

    let first = use_case.execute(GraphRequest::new(scope(), 4)).await.unwrap();
    let second = use_case.execute(GraphRequest::new(scope(), 4)).await.unwrap();

    assert_eq!(first.graph, second.graph);
    assert_eq!(inner.manifest_calls(), 2);
}

#[tokio::test]
async fn test_markdown_graph_report() {
    let use_case = BuildDependencyGraphUseCase::new(peer_scenario(), MockProgressReporter::new());
    let response = use_case.execute(GraphRequest::new(scope(), 4)).await.unwrap();

    let output = MarkdownFormatter::new().format_graph(&response.graph).unwrap();

    assert!(output.starts_with("# Dependency Graph"));
    assert!(output.contains("## Dependencies"));
    assert!(output.contains("@scope/pkg-a"));
    assert!(!output.contains("lodash"));
}

#[tokio::test]
async fn test_dot_graph_output() {
    let use_case = BuildDependencyGraphUseCase::new(peer_scenario(), MockProgressReporter::new());
    let response = use_case.execute(GraphRequest::new(scope(), 4)).await.unwrap();

    let output = DotFormatter::new().format_graph(&response.graph).unwrap();

    assert!(output.starts_with("digraph dependencies {"));
    assert!(output.contains("\"@scope/pkg-a\" -> \"@scope/pkg-b\""));
    assert!(output.trim_end().ends_with('}'));
}

fn trends_registry() -> MockPackageRegistry {
    MockPackageRegistry::new()
        .with_downloads(
            "@scope/a",
            vec![(date(2025, 1, 7), 10), (date(2025, 1, 15), 5)],
        )
        .with_downloads("@scope/b", vec![(date(2025, 1, 21), 7)])
        .with_listed("@scope/no-data")
}

#[tokio::test]
async fn test_trends_are_densified_on_shared_axis() {
    let reporter = MockProgressReporter::new();
    // 2025-01-22 is a Wednesday
    let use_case =
        BuildDownloadTrendsUseCase::new(trends_registry(), reporter.clone(), FixedClock::at(2025, 1, 22));

    let response = use_case
        .execute(TrendsRequest::new(scope(), 60, 4, vec![]))
        .await
        .unwrap();

    assert_eq!(response.end, date(2025, 1, 22));
    assert_eq!(response.start, date(2025, 1, 22) - Duration::days(60));
    assert_eq!(response.skipped.len(), 1);
    assert_eq!(response.skipped[0].name, "@scope/no-data");

    let output = JsonFormatter::new().format_trends(&response.trends).unwrap();
    let value: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(
        value,
        json!({
            "weeks": ["2025-01-06", "2025-01-13", "2025-01-20"],
            "series": {
                "@scope/a": [10, 5, 0],
                "@scope/b": [0, 0, 7]
            }
        })
    );
}

#[tokio::test]
async fn test_trends_selection_by_short_name() {
    let reporter = MockProgressReporter::new();
    let use_case =
        BuildDownloadTrendsUseCase::new(trends_registry(), reporter.clone(), FixedClock::at(2025, 1, 22));

    let response = use_case
        .execute(TrendsRequest::new(
            scope(),
            60,
            4,
            vec!["b".to_string(), "missing".to_string()],
        ))
        .await
        .unwrap();

    let dense = response.trends.densify();
    assert_eq!(dense.weeks.len(), 3);
    assert_eq!(dense.series.keys().collect::<Vec<_>>(), vec!["@scope/b"]);
    assert_eq!(response.unmatched_selection, vec!["missing".to_string()]);
    assert!(reporter
        .errors()
        .iter()
        .any(|e| e.contains("'missing'")));
}

#[tokio::test]
async fn test_trends_markdown_report() {
    let use_case = BuildDownloadTrendsUseCase::new(
        trends_registry(),
        MockProgressReporter::new(),
        FixedClock::at(2025, 1, 22),
    );
    let response = use_case
        .execute(TrendsRequest::new(scope(), 60, 4, vec![]))
        .await
        .unwrap();

    let output = MarkdownFormatter::new().format_trends(&response.trends).unwrap();

    assert!(output.starts_with("# Download Trends"));
    assert!(output.contains("2025-01-06"));
    assert!(output.contains("@scope/a"));
}
