use std::sync::Arc;

use covertree_core::{CacheStore, CoverageConfig, CoverageError, Node};
use covertree_gen::{CoverageGenerator, init_tree};
use covertree_repo::{
    CoverageRepository, RepositoryError, RepositoryInfo, RepositoryRef, RepositoryRegistry, Source,
    StaticRepository,
};
use tempfile::TempDir;

fn eot() -> StaticRepository {
    StaticRepository::new("eot")
        .with_url("https://www.epa.gov/climate/data", true)
        .with_url("https://www.epa.gov/climate/reports", false)
        .with_url("https://www.epa.gov/water", false)
}

fn ipfs() -> StaticRepository {
    StaticRepository::new("ipfs")
        .with_url("https://www.epa.gov/water", true)
        .with_url("https://www.noaa.gov/", true)
}

fn registry() -> RepositoryRegistry {
    let mut registry = RepositoryRegistry::new();
    registry.register(eot()).register(ipfs());
    registry
}

#[test]
fn test_tree_merges_repositories() {
    let generator = CoverageGenerator::new::<&str, &str>(&registry(), &[], &[]).unwrap();
    let tree = generator.tree().unwrap();

    assert_eq!(tree.id, "root");
    assert_eq!(tree.num_children, 2);
    let water = tree.find("www.epa.gov/water").unwrap();
    assert_eq!(water.coverage.len(), 2);
    assert!(water.is_covered());

    // www.epa.gov, climate, data, reports, water, www.noaa.gov
    assert_eq!(tree.num_descendants, 6);
    assert_eq!(tree.num_leaves, 4);
    assert_eq!(tree.num_leaves_archived, 3);
}

#[test]
fn test_unknown_repository_yields_empty_tree() {
    let generator = CoverageGenerator::new::<_, &str>(&registry(), &["nope"], &[]).unwrap();
    assert!(generator.repositories().is_empty());

    let tree = generator.tree().unwrap();
    assert!(tree.is_leaf());
    assert_eq!(tree.num_children, 0);
    assert_eq!(tree.num_descendants, 0);
    assert_eq!(tree.num_leaves, 0);

    let summary = generator.summary().unwrap();
    assert_eq!(summary.descendants, 0);
    assert_eq!(summary.archived, 0);
}

#[test]
fn test_allow_list_restricts_repositories() {
    let generator =
        CoverageGenerator::new::<_, &str>(&registry(), &["ipfs", "missing"], &[]).unwrap();
    let tree = generator.tree().unwrap();
    assert!(tree.find("www.epa.gov/climate").is_none());
    assert!(tree.find("www.noaa.gov").is_some());
}

#[test]
fn test_sources_are_passed_to_repositories() {
    let patterns = ["https://www.epa.gov/climate"];
    let generator = CoverageGenerator::new::<&str, _>(&registry(), &[], &patterns).unwrap();
    let tree = generator.tree().unwrap();

    assert!(tree.find("www.epa.gov/climate/data").is_some());
    assert!(tree.find("www.epa.gov/water").is_none());
    assert!(tree.find("www.noaa.gov").is_none());
}

#[test]
fn test_tree_fails_fast() {
    let mut registry = registry();
    registry.register(StaticRepository::new("down").fail_with("connection refused"));

    let generator = CoverageGenerator::new::<&str, &str>(&registry, &[], &[]).unwrap();
    let err = generator.tree().unwrap_err();
    assert!(matches!(err, CoverageError::Repository(_)));
    assert!(generator.summary().is_err());
}

#[test]
fn test_invocation_order_does_not_change_tree() {
    let forward = CoverageGenerator::new::<_, &str>(&registry(), &["eot", "ipfs"], &[])
        .unwrap()
        .tree()
        .unwrap();
    let backward = CoverageGenerator::new::<_, &str>(&registry(), &["ipfs", "eot"], &[])
        .unwrap()
        .tree()
        .unwrap();

    fn shape(node: &Node, out: &mut Vec<String>) {
        node.walk(&mut |n| {
            out.push(format!("{}:{}:{}", n.id, n.num_descendants, n.num_leaves_archived))
        });
    }
    let (mut a, mut b) = (Vec::new(), Vec::new());
    shape(&forward, &mut a);
    shape(&backward, &mut b);
    assert_eq!(a, b);
}

#[test]
fn test_from_config() {
    let config = CoverageConfig::builder()
        .repository_ids(vec!["eot".to_string()])
        .source_patterns(vec!["https://www.epa.gov/*".to_string()])
        .build()
        .unwrap();
    let generator = CoverageGenerator::from_config(&registry(), &config).unwrap();
    assert_eq!(generator.repositories().len(), 1);
    assert_eq!(generator.sources().len(), 1);
}

#[test]
fn test_init_tree_builds_on_cache() {
    let dir = TempDir::new().unwrap();
    let cache = CacheStore::new(dir.path().join("cache.json"));

    let first = CoverageGenerator::new::<_, &str>(&registry(), &["eot"], &[]).unwrap();
    let outcome = first.init_tree(&cache).unwrap();
    assert!(outcome.is_clean());
    assert_eq!(outcome.tree.num_descendants, 5);
    assert_eq!(outcome.tree.num_descendants_archived, 1);

    // A second rebuild with another repository merges into the cached tree.
    let second = CoverageGenerator::new::<_, &str>(&registry(), &["ipfs"], &[]).unwrap();
    let outcome = second.init_tree(&cache).unwrap();
    assert_eq!(outcome.tree.num_descendants, 6);
    assert_eq!(outcome.tree.num_descendants_archived, 3);

    let cached = cache.load().unwrap().unwrap();
    assert_eq!(cached, outcome.tree);
}

#[test]
fn test_init_tree_unchanged_input_writes_identical_cache() {
    let dir = TempDir::new().unwrap();
    let cache = CacheStore::new(dir.path().join("cache.json"));
    let repos: Vec<RepositoryRef> =
        vec![Arc::new(StaticRepository::new("r").with_url("https://a.org/x", true))];

    init_tree(&repos, &cache).unwrap();
    let first = std::fs::read(cache.path()).unwrap();
    init_tree(&repos, &cache).unwrap();
    let second = std::fs::read(cache.path()).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_init_tree_clears_archived_flag_when_source_downgrades() {
    let dir = TempDir::new().unwrap();
    let cache = CacheStore::new(dir.path().join("cache.json"));
    let archived: Vec<RepositoryRef> =
        vec![Arc::new(StaticRepository::new("r").with_url("https://a.org/x", true))];
    let dropped: Vec<RepositoryRef> =
        vec![Arc::new(StaticRepository::new("r").with_url("https://a.org/x", false))];

    let outcome = init_tree(&archived, &cache).unwrap();
    assert_eq!(outcome.tree.num_leaves_archived, 1);

    let outcome = init_tree(&dropped, &cache).unwrap();
    let node = outcome.tree.find("a.org/x").unwrap();
    assert!(!node.coverage[0].archived);
    assert!(!node.archived);
    assert_eq!(outcome.tree.num_leaves_archived, 0);
    assert_eq!(outcome.tree.num_descendants_archived, 0);
}

#[test]
fn test_init_tree_rejects_malformed_cache() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("cache.json");
    std::fs::write(&path, "garbage").unwrap();

    let generator = CoverageGenerator::new::<&str, &str>(&registry(), &[], &[]).unwrap();
    let err = generator.init_tree(&CacheStore::new(&path)).unwrap_err();
    assert!(matches!(err, CoverageError::Cache(_)));
}

struct CountingRepository;

impl CoverageRepository for CountingRepository {
    fn id(&self) -> &str {
        "counting"
    }

    fn info(&self) -> RepositoryInfo {
        RepositoryInfo {
            id: "counting".to_string(),
            name: "Counting".to_string(),
            description: String::new(),
            url_count: None,
        }
    }

    fn add_urls(&self, tree: &mut Node, sources: &[Source]) -> Result<(), RepositoryError> {
        tree.find_or_create_child("sources", sources.len().to_string());
        Ok(())
    }

    fn add_coverage(&self, _tree: &mut Node) {}
}

#[test]
fn test_custom_repository_receives_every_source() {
    let mut registry = RepositoryRegistry::new();
    registry.register_shared(Arc::new(CountingRepository));

    let patterns = ["https://a.org", "https://b.org"];
    let generator = CoverageGenerator::new::<&str, _>(&registry, &[], &patterns).unwrap();
    let tree = generator.tree().unwrap();
    assert_eq!(tree.child("sources").unwrap().name, "2");
}
