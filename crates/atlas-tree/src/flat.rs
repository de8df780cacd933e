//! Leaf-form reference implementation of the clustering contracts.
//!
//! [`FlatLeafStrategy`] stages every mutation in sorted in-memory maps and
//! [`LeafBuildAlgorithm`] materializes them as a single leaf tree. This is
//! enough to exercise the builder contract end to end; distributing
//! entries across hash-fan-out buckets is the job of the production
//! clustering algorithm, which lives outside this crate.

use std::collections::BTreeMap;
use std::sync::Arc;

use atlas_model::{
    ContentId, DefaultFactory, Node, NodeKind, RevObjectFactory, RevTree, RevisionObject,
};
use atlas_store::ObjectStore;

use crate::error::{TreeError, TreeResult};
use crate::strategy::{AbortPredicate, ClusteringStrategy, TreeBuildAlgorithm};

// Abort-poll granularity while encoding large staged sets.
const ABORT_CHECK_INTERVAL: usize = 512;

/// Clustering strategy that keeps everything in one leaf.
///
/// Amends leaf-form base trees only; the bucketed form requires the
/// production clustering algorithm.
#[derive(Debug, Default)]
pub struct FlatLeafStrategy {
    features: BTreeMap<String, Node>,
    trees: BTreeMap<String, Node>,
}

impl FlatLeafStrategy {
    /// An empty strategy.
    pub fn new() -> Self {
        Self::default()
    }

    /// A strategy seeded with the entries of a leaf-form base tree.
    pub fn seeded(base: &RevTree) -> Self {
        let mut strategy = Self::new();
        for node in base.features().iter().chain(base.trees()) {
            strategy.stage(node.clone());
        }
        strategy
    }

    fn stage(&mut self, node: Node) -> Option<Node> {
        let map = match node.kind() {
            NodeKind::Feature => &mut self.features,
            NodeKind::Tree => &mut self.trees,
        };
        map.insert(node.name().to_owned(), node)
    }

    /// Name-ordered copies of the staged entries: `(features, trees)`.
    pub fn snapshot(&self) -> (Vec<Node>, Vec<Node>) {
        (
            self.features.values().cloned().collect(),
            self.trees.values().cloned().collect(),
        )
    }

    /// Number of staged entries across both kinds.
    pub fn len(&self) -> usize {
        self.features.len() + self.trees.len()
    }

    /// Returns `true` if nothing is staged.
    pub fn is_empty(&self) -> bool {
        self.features.is_empty() && self.trees.is_empty()
    }
}

impl ClusteringStrategy for FlatLeafStrategy {
    fn put(&mut self, node: &Node) -> i32 {
        match self.stage(node.clone()) {
            None => 1,
            Some(_) => 0,
        }
    }

    fn remove(&mut self, node: &Node) -> bool {
        let map = match node.kind() {
            NodeKind::Feature => &mut self.features,
            NodeKind::Tree => &mut self.trees,
        };
        map.remove(node.name()).is_some()
    }

    fn update(&mut self, old: &Node, new: &Node) -> i32 {
        let removed = i32::from(self.remove(old));
        self.put(new) - removed
    }

    fn dispose(&mut self) {
        self.features.clear();
        self.trees.clear();
    }
}

/// Build algorithm producing a single persisted leaf tree.
pub struct LeafBuildAlgorithm {
    factory: Arc<dyn RevObjectFactory>,
}

impl LeafBuildAlgorithm {
    pub fn new(factory: Arc<dyn RevObjectFactory>) -> Self {
        Self { factory }
    }
}

impl Default for LeafBuildAlgorithm {
    fn default() -> Self {
        Self::new(Arc::new(DefaultFactory))
    }
}

impl TreeBuildAlgorithm<FlatLeafStrategy> for LeafBuildAlgorithm {
    fn build(
        &self,
        strategy: &mut FlatLeafStrategy,
        store: &dyn ObjectStore,
        abort: AbortPredicate<'_>,
    ) -> TreeResult<Option<RevTree>> {
        if abort() {
            return Ok(None);
        }
        let (features, trees) = strategy.snapshot();

        // Recursive size: direct features plus everything reachable through
        // staged subtrees.
        let mut size = features.len() as u64;
        for node in &trees {
            let child = store
                .get(&node.object_id())?
                .and_then(|obj| obj.as_tree().cloned())
                .ok_or_else(|| {
                    TreeError::InvariantViolation(format!(
                        "staged subtree {} ({}) is not a tree in the object store",
                        node.name(),
                        node.object_id()
                    ))
                })?;
            size += child.size();
        }

        let id = match canonical_id(size, &features, &trees, abort) {
            Some(id) => id,
            None => return Ok(None),
        };
        if abort() {
            return Ok(None);
        }

        let tree = self.factory.create_leaf_tree(id, size, features, trees)?;
        store.put(&RevisionObject::Tree(tree.clone()))?;
        Ok(Some(tree))
    }
}

/// Ad-hoc canonical encoding for the reference algorithm. The production
/// serializer defines the real canonical format; only determinism matters
/// here. Returns `None` when aborted mid-encode.
fn canonical_id(
    size: u64,
    features: &[Node],
    trees: &[Node],
    abort: AbortPredicate<'_>,
) -> Option<ContentId> {
    let mut buf = Vec::with_capacity(64 * (features.len() + trees.len()) + 8);
    buf.extend_from_slice(&size.to_be_bytes());
    for (i, node) in features.iter().chain(trees).enumerate() {
        if i % ABORT_CHECK_INTERVAL == 0 && abort() {
            return None;
        }
        buf.push(match node.kind() {
            NodeKind::Feature => b'f',
            NodeKind::Tree => b't',
        });
        buf.extend_from_slice(node.name().as_bytes());
        buf.push(0);
        buf.extend_from_slice(&node.object_id().to_bytes());
        buf.extend_from_slice(&node.metadata_id().unwrap_or(ContentId::NULL).to_bytes());
    }
    Some(ContentId::hash_of(&buf))
}

#[cfg(test)]
mod tests {
    use super::*;
    use atlas_model::{BoundingBox32, ExtraAttributes, ObjectKind};
    use atlas_store::InMemoryObjectStore;

    fn feature_node(name: &str) -> Node {
        DefaultFactory
            .create_node(
                name,
                ContentId::hash_of(name.as_bytes()),
                ContentId::NULL,
                ObjectKind::Feature,
                BoundingBox32::EMPTY,
                ExtraAttributes::empty(),
            )
            .unwrap()
    }

    fn tree_node(name: &str, target: ContentId) -> Node {
        DefaultFactory
            .create_node(
                name,
                target,
                ContentId::NULL,
                ObjectKind::Tree,
                BoundingBox32::EMPTY,
                ExtraAttributes::empty(),
            )
            .unwrap()
    }

    #[test]
    fn put_reports_insert_vs_replace() {
        let mut strategy = FlatLeafStrategy::new();
        assert_eq!(strategy.put(&feature_node("a")), 1);
        assert_eq!(strategy.put(&feature_node("a")), 0);
        assert_eq!(strategy.put(&feature_node("b")), 1);
        assert_eq!(strategy.len(), 2);
    }

    #[test]
    fn feature_and_tree_namespaces_are_distinct() {
        let mut strategy = FlatLeafStrategy::new();
        assert_eq!(strategy.put(&feature_node("same")), 1);
        assert_eq!(
            strategy.put(&tree_node("same", ContentId::hash_of(b"sub"))),
            1
        );
        assert_eq!(strategy.len(), 2);
    }

    #[test]
    fn remove_reports_presence() {
        let mut strategy = FlatLeafStrategy::new();
        let node = feature_node("x");
        strategy.put(&node);
        assert!(strategy.remove(&node));
        assert!(!strategy.remove(&node));
        assert!(strategy.is_empty());
    }

    #[test]
    fn update_net_change() {
        let mut strategy = FlatLeafStrategy::new();
        let a = feature_node("a");
        let b = feature_node("b");

        // Replace-in-place: no net change.
        strategy.put(&a);
        assert_eq!(strategy.update(&a, &feature_node("a")), 0);

        // Old absent, new absent: net +1.
        assert_eq!(strategy.update(&b, &b), 1);

        // Rename onto an existing entry: two entries collapse to one.
        assert_eq!(strategy.update(&a, &feature_node("b")), -1);
        assert_eq!(strategy.len(), 1);
    }

    #[test]
    fn dispose_clears_staged_state() {
        let mut strategy = FlatLeafStrategy::new();
        strategy.put(&feature_node("a"));
        strategy.dispose();
        assert!(strategy.is_empty());
    }

    #[test]
    fn seeded_from_leaf_base() {
        let base = DefaultFactory
            .create_leaf_tree(
                ContentId::hash_of(b"base"),
                2,
                vec![feature_node("a"), feature_node("b")],
                vec![],
            )
            .unwrap();
        let strategy = FlatLeafStrategy::seeded(&base);
        assert_eq!(strategy.len(), 2);
        let (features, trees) = strategy.snapshot();
        assert_eq!(features.len(), 2);
        assert!(trees.is_empty());
    }

    #[test]
    fn build_persists_a_sorted_leaf_tree() {
        let store = InMemoryObjectStore::new();
        let mut strategy = FlatLeafStrategy::new();
        strategy.put(&feature_node("b"));
        strategy.put(&feature_node("a"));

        let algorithm = LeafBuildAlgorithm::default();
        let tree = algorithm
            .build(&mut strategy, &store, &|| false)
            .unwrap()
            .expect("not aborted");

        assert_eq!(tree.size(), 2);
        assert_eq!(tree.feature(0).unwrap().name(), "a");
        assert_eq!(tree.feature(1).unwrap().name(), "b");
        assert!(store.exists(&tree.id()).unwrap());
    }

    #[test]
    fn build_is_deterministic() {
        let store = InMemoryObjectStore::new();
        let algorithm = LeafBuildAlgorithm::default();

        let build = |names: &[&str]| {
            let mut strategy = FlatLeafStrategy::new();
            for name in names {
                strategy.put(&feature_node(name));
            }
            algorithm
                .build(&mut strategy, &store, &|| false)
                .unwrap()
                .unwrap()
        };

        // Insertion order does not affect the result id.
        assert_eq!(build(&["a", "b", "c"]).id(), build(&["c", "a", "b"]).id());
        assert_ne!(build(&["a"]).id(), build(&["b"]).id());
    }

    #[test]
    fn build_counts_subtree_sizes() {
        let store = InMemoryObjectStore::new();
        let algorithm = LeafBuildAlgorithm::default();

        // Persist a subtree with 3 features first.
        let mut sub = FlatLeafStrategy::new();
        for name in ["s1", "s2", "s3"] {
            sub.put(&feature_node(name));
        }
        let subtree = algorithm.build(&mut sub, &store, &|| false).unwrap().unwrap();

        let mut root = FlatLeafStrategy::new();
        root.put(&feature_node("direct"));
        root.put(&tree_node("sub", subtree.id()));
        let tree = algorithm
            .build(&mut root, &store, &|| false)
            .unwrap()
            .unwrap();

        assert_eq!(tree.size(), 4);
        assert_eq!(tree.features_size(), 1);
        assert_eq!(tree.trees_size(), 1);
        assert_eq!(tree.child_tree_count(), 1);
    }

    #[test]
    fn build_fails_on_dangling_subtree() {
        let store = InMemoryObjectStore::new();
        let mut strategy = FlatLeafStrategy::new();
        strategy.put(&tree_node("ghost", ContentId::hash_of(b"never persisted")));

        let err = LeafBuildAlgorithm::default()
            .build(&mut strategy, &store, &|| false)
            .unwrap_err();
        assert!(matches!(err, TreeError::InvariantViolation(_)));
    }

    #[test]
    fn build_honors_abort_and_writes_nothing() {
        let store = InMemoryObjectStore::new();
        let mut strategy = FlatLeafStrategy::new();
        strategy.put(&feature_node("a"));

        let result = LeafBuildAlgorithm::default()
            .build(&mut strategy, &store, &|| true)
            .unwrap();
        assert!(result.is_none());
        assert!(store.is_empty());
    }
}
