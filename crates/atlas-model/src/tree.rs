use serde::{Deserialize, Serialize};

use crate::id::ContentId;
use crate::node::{Bucket, Node};

/// The physical representation of a revision tree.
///
/// A tree is either a leaf (direct, name-sorted entry arrays) or bucketed
/// (a sorted array of fan-out buckets pointing at subtrees). A tree never
/// mixes forms; the choice is made by the clustering strategy that built
/// it, never by the tree itself.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum TreeRepr {
    Leaf {
        /// Feature entries, sorted by name.
        features: Vec<Node>,
        /// Subtree entries, sorted by name.
        trees: Vec<Node>,
    },
    Buckets {
        /// Logical number of descendant trees, which is distinct from the
        /// number of populated fan-out slots.
        child_tree_count: u64,
        /// Populated fan-out slots, sorted by index.
        buckets: Vec<Bucket>,
    },
}

/// An immutable, content-addressed revision tree: a read-only passive view.
///
/// `size` is the total number of features reachable through this tree and
/// is always O(1). Like every revision object, equality is by id.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RevTree {
    id: ContentId,
    size: u64,
    repr: TreeRepr,
}

impl RevTree {
    pub(crate) fn new(id: ContentId, size: u64, repr: TreeRepr) -> Self {
        Self { id, size, repr }
    }

    /// The empty leaf tree with the null id.
    pub fn empty() -> Self {
        Self {
            id: ContentId::NULL,
            size: 0,
            repr: TreeRepr::Leaf {
                features: Vec::new(),
                trees: Vec::new(),
            },
        }
    }

    pub fn id(&self) -> ContentId {
        self.id
    }

    /// Total feature count reachable through this tree.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Returns `true` if nothing is reachable through this tree.
    pub fn is_empty(&self) -> bool {
        self.size == 0 && self.trees_size() == 0 && self.buckets_size() == 0
    }

    pub fn repr(&self) -> &TreeRepr {
        &self.repr
    }

    /// Returns `true` for the leaf form.
    pub fn is_leaf(&self) -> bool {
        matches!(self.repr, TreeRepr::Leaf { .. })
    }

    /// Returns `true` for the bucketed form.
    pub fn is_bucketed(&self) -> bool {
        matches!(self.repr, TreeRepr::Buckets { .. })
    }

    /// Direct feature entries; empty for the bucketed form.
    pub fn features(&self) -> &[Node] {
        match &self.repr {
            TreeRepr::Leaf { features, .. } => features,
            TreeRepr::Buckets { .. } => &[],
        }
    }

    /// Direct subtree entries; empty for the bucketed form.
    pub fn trees(&self) -> &[Node] {
        match &self.repr {
            TreeRepr::Leaf { trees, .. } => trees,
            TreeRepr::Buckets { .. } => &[],
        }
    }

    /// Fan-out buckets; empty for the leaf form.
    pub fn buckets(&self) -> &[Bucket] {
        match &self.repr {
            TreeRepr::Leaf { .. } => &[],
            TreeRepr::Buckets { buckets, .. } => buckets,
        }
    }

    /// Number of direct feature entries.
    pub fn features_size(&self) -> usize {
        self.features().len()
    }

    /// Number of direct subtree entries.
    pub fn trees_size(&self) -> usize {
        self.trees().len()
    }

    /// Number of populated fan-out slots.
    pub fn buckets_size(&self) -> usize {
        self.buckets().len()
    }

    /// Logical number of descendant trees. For the leaf form this equals
    /// [`RevTree::trees_size`].
    pub fn child_tree_count(&self) -> u64 {
        match &self.repr {
            TreeRepr::Leaf { trees, .. } => trees.len() as u64,
            TreeRepr::Buckets {
                child_tree_count, ..
            } => *child_tree_count,
        }
    }

    /// The i-th feature entry, in name order.
    pub fn feature(&self, i: usize) -> Option<&Node> {
        self.features().get(i)
    }

    /// The i-th subtree entry, in name order.
    pub fn tree(&self, i: usize) -> Option<&Node> {
        self.trees().get(i)
    }

    /// The bucket occupying fan-out slot `index`, if populated.
    ///
    /// Binary search over the sorted index column: O(log n), no search
    /// object fabricated.
    pub fn bucket(&self, index: u32) -> Option<&Bucket> {
        let buckets = self.buckets();
        buckets
            .binary_search_by_key(&index, Bucket::index)
            .ok()
            .map(|i| &buckets[i])
    }
}

// Content-identity law: revision objects are equal iff their ids are equal.
impl PartialEq for RevTree {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for RevTree {}

impl std::hash::Hash for RevTree {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bbox::BoundingBox32;
    use crate::extra::ExtraAttributes;
    use crate::node::NodeKind;

    fn node(kind: NodeKind, name: &str) -> Node {
        Node::new(
            kind,
            name.to_owned(),
            ContentId::hash_of(name.as_bytes()),
            ContentId::NULL,
            BoundingBox32::EMPTY,
            ExtraAttributes::empty(),
        )
    }

    fn leaf(features: Vec<Node>, trees: Vec<Node>) -> RevTree {
        let size = features.len() as u64;
        RevTree::new(
            ContentId::hash_of(b"leaf"),
            size,
            TreeRepr::Leaf { features, trees },
        )
    }

    fn bucketed(indices: &[u32]) -> RevTree {
        let buckets: Vec<Bucket> = indices
            .iter()
            .map(|&i| {
                Bucket::new(
                    i,
                    ContentId::hash_of(&i.to_be_bytes()),
                    BoundingBox32::EMPTY,
                )
            })
            .collect();
        RevTree::new(
            ContentId::hash_of(b"bucketed"),
            1000,
            TreeRepr::Buckets {
                child_tree_count: 42,
                buckets,
            },
        )
    }

    #[test]
    fn empty_tree() {
        let tree = RevTree::empty();
        assert!(tree.is_empty());
        assert!(tree.is_leaf());
        assert!(tree.id().is_null());
        assert_eq!(tree.size(), 0);
        assert_eq!(tree.child_tree_count(), 0);
    }

    #[test]
    fn leaf_tree_roundtrip() {
        let tree = leaf(
            vec![node(NodeKind::Feature, "A"), node(NodeKind::Feature, "B")],
            vec![],
        );
        assert_eq!(tree.size(), 2);
        assert_eq!(tree.features_size(), 2);
        assert_eq!(tree.trees_size(), 0);
        assert_eq!(tree.feature(0).unwrap().name(), "A");
        assert_eq!(tree.feature(1).unwrap().name(), "B");
        assert_eq!(tree.feature(2), None);
        assert!(tree.is_leaf());
        assert!(!tree.is_bucketed());
    }

    #[test]
    fn leaf_form_has_no_buckets() {
        let tree = leaf(vec![node(NodeKind::Feature, "A")], vec![]);
        assert_eq!(tree.buckets_size(), 0);
        assert_eq!(tree.bucket(0), None);
    }

    #[test]
    fn child_tree_count_for_leaf_equals_trees_size() {
        let tree = leaf(
            vec![node(NodeKind::Feature, "A")],
            vec![node(NodeKind::Tree, "sub1"), node(NodeKind::Tree, "sub2")],
        );
        assert_eq!(tree.trees_size(), 2);
        assert_eq!(tree.child_tree_count(), 2);
        assert_eq!(tree.tree(0).unwrap().name(), "sub1");
    }

    #[test]
    fn bucket_lookup_hit_and_miss() {
        let tree = bucketed(&[1, 5, 9]);
        assert!(tree.is_bucketed());
        assert_eq!(tree.buckets_size(), 3);
        assert_eq!(tree.child_tree_count(), 42);
        assert_eq!(tree.features_size(), 0);
        assert_eq!(tree.trees_size(), 0);

        let hit = tree.bucket(5).expect("bucket 5 is populated");
        assert_eq!(hit.index(), 5);
        assert_eq!(hit.object_id(), ContentId::hash_of(&5u32.to_be_bytes()));

        assert_eq!(tree.bucket(2), None);
        assert_eq!(tree.bucket(0), None);
        assert_eq!(tree.bucket(10), None);
    }

    #[test]
    fn bucket_lookup_resolves_every_populated_slot() {
        let indices = [0u32, 3, 7, 8, 15, 31];
        let tree = bucketed(&indices);
        for &i in &indices {
            assert_eq!(tree.bucket(i).unwrap().index(), i);
        }
    }

    #[test]
    fn equality_is_by_id() {
        let a = leaf(vec![node(NodeKind::Feature, "A")], vec![]);
        let b = RevTree::new(a.id(), 99, TreeRepr::Leaf {
            features: vec![],
            trees: vec![],
        });
        // Same id, different payload: equal under the content-identity law.
        assert_eq!(a, b);
        assert_ne!(a, RevTree::empty());
    }

    #[test]
    fn serde_roundtrip() {
        let tree = bucketed(&[2, 4]);
        let bytes = bincode::serialize(&tree).unwrap();
        let parsed: RevTree = bincode::deserialize(&bytes).unwrap();
        assert_eq!(parsed.id(), tree.id());
        assert_eq!(parsed.buckets_size(), 2);
        assert_eq!(parsed.size(), 1000);
    }
}
