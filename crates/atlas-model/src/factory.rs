//! The single construction point for revision objects.
//!
//! Everything in the model family is built through a [`RevObjectFactory`],
//! which centralizes the invariant checks (non-empty names, non-null
//! required ids, legal node kinds) so no partially valid object ever
//! exists. Multiple factory implementations can be registered and are
//! ranked by a numeric priority; the lowest value wins, which lets an
//! embedding override the default construction path.

use std::sync::Arc;

use crate::bbox::BoundingBox32;
use crate::error::{ModelError, ModelResult};
use crate::extra::ExtraAttributes;
use crate::id::ContentId;
use crate::node::{Bucket, Node, NodeKind};
use crate::object::{
    AttributeDescriptor, ObjectKind, RevCommit, RevFeature, RevFeatureType, RevPerson, RevTag,
};
use crate::tree::{RevTree, TreeRepr};
use crate::value::Value;

/// Pluggable construction point for the revision object family.
///
/// Implementations must be safe for concurrent use; the registry ranking
/// is fixed at startup and factories hold no per-call mutable state.
pub trait RevObjectFactory: Send + Sync {
    /// Selection rank; the registry prefers the lowest value.
    fn priority(&self) -> i32;

    fn create_person(
        &self,
        name: Option<String>,
        email: Option<String>,
        timestamp: i64,
        tz_offset: i32,
    ) -> RevPerson;

    fn create_commit(
        &self,
        id: ContentId,
        tree_id: ContentId,
        parent_ids: Vec<ContentId>,
        author: RevPerson,
        committer: RevPerson,
        message: String,
    ) -> ModelResult<RevCommit>;

    /// Build a leaf-form tree. Entry arrays are sorted by name.
    fn create_leaf_tree(
        &self,
        id: ContentId,
        size: u64,
        features: Vec<Node>,
        trees: Vec<Node>,
    ) -> ModelResult<RevTree>;

    /// Build a bucket-form tree. The bucket array is sorted by index.
    fn create_bucket_tree(
        &self,
        id: ContentId,
        size: u64,
        child_tree_count: u64,
        buckets: Vec<Bucket>,
    ) -> ModelResult<RevTree>;

    fn create_bucket(
        &self,
        object_id: ContentId,
        index: u32,
        bounds: BoundingBox32,
    ) -> ModelResult<Bucket>;

    /// Build a named tree entry. Only [`ObjectKind::Feature`] and
    /// [`ObjectKind::Tree`] are legal kinds; the metadata id may be the
    /// null sentinel for "absent".
    fn create_node(
        &self,
        name: &str,
        object_id: ContentId,
        metadata_id: ContentId,
        kind: ObjectKind,
        bounds: BoundingBox32,
        extra: ExtraAttributes,
    ) -> ModelResult<Node>;

    fn create_tag(
        &self,
        id: ContentId,
        name: &str,
        commit_id: ContentId,
        message: &str,
        tagger: RevPerson,
    ) -> ModelResult<RevTag>;

    fn create_feature_type(
        &self,
        id: ContentId,
        name: &str,
        descriptors: Vec<AttributeDescriptor>,
    ) -> ModelResult<RevFeatureType>;

    /// Build a feature, taking ownership of `values` without copying.
    /// This is the bulk-load path.
    fn create_feature(&self, id: ContentId, values: Vec<Value>) -> ModelResult<RevFeature>;

    /// Build a feature from borrowed values, copying them defensively.
    fn create_feature_from_slice(
        &self,
        id: ContentId,
        values: &[Value],
    ) -> ModelResult<RevFeature> {
        self.create_feature(id, values.to_vec())
    }
}

fn require_id(id: ContentId, what: &str) -> ModelResult<()> {
    if id.is_null() {
        return Err(ModelError::InvalidArgument(format!("{what} id is null")));
    }
    Ok(())
}

fn require_name(name: &str, what: &str) -> ModelResult<()> {
    if name.is_empty() {
        return Err(ModelError::InvalidArgument(format!("{what} name is empty")));
    }
    Ok(())
}

/// Baseline factory, registered at priority 0.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultFactory;

impl RevObjectFactory for DefaultFactory {
    fn priority(&self) -> i32 {
        0
    }

    fn create_person(
        &self,
        name: Option<String>,
        email: Option<String>,
        timestamp: i64,
        tz_offset: i32,
    ) -> RevPerson {
        RevPerson::new(name, email, timestamp, tz_offset)
    }

    fn create_commit(
        &self,
        id: ContentId,
        tree_id: ContentId,
        parent_ids: Vec<ContentId>,
        author: RevPerson,
        committer: RevPerson,
        message: String,
    ) -> ModelResult<RevCommit> {
        require_id(id, "commit")?;
        // The null tree id is legal: it denotes the empty tree.
        if parent_ids.iter().any(ContentId::is_null) {
            return Err(ModelError::InvalidArgument(
                "commit parent id is null".to_owned(),
            ));
        }
        Ok(RevCommit::new(
            id, tree_id, parent_ids, author, committer, message,
        ))
    }

    fn create_leaf_tree(
        &self,
        id: ContentId,
        size: u64,
        mut features: Vec<Node>,
        mut trees: Vec<Node>,
    ) -> ModelResult<RevTree> {
        require_id(id, "tree")?;
        if features.iter().any(Node::is_tree) {
            return Err(ModelError::InvalidArgument(
                "tree node in the feature array".to_owned(),
            ));
        }
        if trees.iter().any(Node::is_feature) {
            return Err(ModelError::InvalidArgument(
                "feature node in the tree array".to_owned(),
            ));
        }
        features.sort_by(|a, b| a.name().cmp(b.name()));
        trees.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(RevTree::new(id, size, TreeRepr::Leaf { features, trees }))
    }

    fn create_bucket_tree(
        &self,
        id: ContentId,
        size: u64,
        child_tree_count: u64,
        mut buckets: Vec<Bucket>,
    ) -> ModelResult<RevTree> {
        require_id(id, "tree")?;
        buckets.sort_by_key(Bucket::index);
        if buckets.windows(2).any(|w| w[0].index() == w[1].index()) {
            return Err(ModelError::InvalidArgument(
                "duplicate bucket index".to_owned(),
            ));
        }
        Ok(RevTree::new(
            id,
            size,
            TreeRepr::Buckets {
                child_tree_count,
                buckets,
            },
        ))
    }

    fn create_bucket(
        &self,
        object_id: ContentId,
        index: u32,
        bounds: BoundingBox32,
    ) -> ModelResult<Bucket> {
        require_id(object_id, "bucket target")?;
        Ok(Bucket::new(index, object_id, bounds))
    }

    fn create_node(
        &self,
        name: &str,
        object_id: ContentId,
        metadata_id: ContentId,
        kind: ObjectKind,
        bounds: BoundingBox32,
        extra: ExtraAttributes,
    ) -> ModelResult<Node> {
        require_name(name, "node")?;
        require_id(object_id, "node target")?;
        let kind = match kind {
            ObjectKind::Feature => NodeKind::Feature,
            ObjectKind::Tree => NodeKind::Tree,
            other => {
                return Err(ModelError::InvalidArgument(format!(
                    "invalid node kind: {other}"
                )))
            }
        };
        Ok(Node::new(
            kind,
            name.to_owned(),
            object_id,
            metadata_id,
            bounds,
            extra,
        ))
    }

    fn create_tag(
        &self,
        id: ContentId,
        name: &str,
        commit_id: ContentId,
        message: &str,
        tagger: RevPerson,
    ) -> ModelResult<RevTag> {
        require_id(id, "tag")?;
        require_name(name, "tag")?;
        require_id(commit_id, "tagged commit")?;
        Ok(RevTag::new(
            id,
            name.to_owned(),
            commit_id,
            message.to_owned(),
            tagger,
        ))
    }

    fn create_feature_type(
        &self,
        id: ContentId,
        name: &str,
        descriptors: Vec<AttributeDescriptor>,
    ) -> ModelResult<RevFeatureType> {
        require_id(id, "feature type")?;
        require_name(name, "feature type")?;
        Ok(RevFeatureType::new(
            id,
            name.to_owned(),
            descriptors.into_boxed_slice(),
        ))
    }

    fn create_feature(&self, id: ContentId, values: Vec<Value>) -> ModelResult<RevFeature> {
        require_id(id, "feature")?;
        // Ownership transfer, no per-value copy.
        Ok(RevFeature::new(id, values.into_boxed_slice()))
    }
}

/// Priority-ranked registry of factory implementations.
///
/// Registration happens at startup; afterwards the registry is read-only
/// and safe to share.
#[derive(Clone, Default)]
pub struct FactoryRegistry {
    factories: Vec<Arc<dyn RevObjectFactory>>,
}

impl FactoryRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry seeded with [`DefaultFactory`].
    pub fn with_default() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(DefaultFactory));
        registry
    }

    /// Register a factory. Stable sort: among equal priorities, the
    /// earliest registration wins.
    pub fn register(&mut self, factory: Arc<dyn RevObjectFactory>) {
        self.factories.push(factory);
        self.factories.sort_by_key(|f| f.priority());
    }

    /// The highest-ranked (lowest-priority-value) factory.
    pub fn best(&self) -> Option<Arc<dyn RevObjectFactory>> {
        self.factories.first().cloned()
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl std::fmt::Debug for FactoryRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FactoryRegistry")
            .field("factories", &self.factories.len())
            .finish()
    }
}
