use std::fmt;

use serde::{Deserialize, Serialize};

use crate::bbox::{BoundingBox32, Envelope};
use crate::extra::ExtraAttributes;
use crate::id::ContentId;

/// Discriminates the two kinds of named tree entries.
///
/// Fields and invariants are identical for both kinds; the tag records
/// whether the referenced child is a feature or a subtree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    Feature,
    Tree,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Feature => write!(f, "feature"),
            Self::Tree => write!(f, "tree"),
        }
    }
}

/// A named tree entry pointing at a child revision object.
///
/// Immutable after construction; equality is by full field value. The
/// metadata id uses the null sentinel for "absent" and is surfaced as an
/// `Option`; absent bounds are the empty box.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
    kind: NodeKind,
    name: String,
    object_id: ContentId,
    metadata_id: ContentId,
    bounds: BoundingBox32,
    extra: ExtraAttributes,
}

impl Node {
    pub(crate) fn new(
        kind: NodeKind,
        name: String,
        object_id: ContentId,
        metadata_id: ContentId,
        bounds: BoundingBox32,
        extra: ExtraAttributes,
    ) -> Self {
        Self {
            kind,
            name,
            object_id,
            metadata_id,
            bounds,
            extra,
        }
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Id of the referenced child object.
    pub fn object_id(&self) -> ContentId {
        self.object_id
    }

    /// Id of the metadata object describing this entry, if any.
    pub fn metadata_id(&self) -> Option<ContentId> {
        if self.metadata_id.is_null() {
            None
        } else {
            Some(self.metadata_id)
        }
    }

    /// Spatial bounds of the referenced child; empty when absent.
    pub fn bounds(&self) -> &BoundingBox32 {
        &self.bounds
    }

    /// Extra attributes attached to this entry.
    pub fn extra(&self) -> &ExtraAttributes {
        &self.extra
    }

    /// Returns `true` if this entry references a feature.
    pub fn is_feature(&self) -> bool {
        self.kind == NodeKind::Feature
    }

    /// Returns `true` if this entry references a subtree.
    pub fn is_tree(&self) -> bool {
        self.kind == NodeKind::Tree
    }

    /// Whether this entry's bounds intersect `env`; false when bounds are
    /// absent.
    pub fn intersects(&self, env: &Envelope) -> bool {
        self.bounds.intersects(env)
    }

    /// Grow `env` to cover this entry's bounds; no-op when absent.
    pub fn expand(&self, env: &mut Envelope) {
        self.bounds.expand(env);
    }
}

/// An unnamed, index-ordered tree entry used for hash fan-out.
///
/// A bucket points at a subtree and aggregates the bounds of everything
/// beneath it. Buckets order by `index` alone; id and bounds play no part
/// in ordering.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bucket {
    index: u32,
    object_id: ContentId,
    bounds: BoundingBox32,
}

impl Bucket {
    pub(crate) fn new(index: u32, object_id: ContentId, bounds: BoundingBox32) -> Self {
        Self {
            index,
            object_id,
            bounds,
        }
    }

    /// The 0-based fan-out slot this bucket occupies.
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Id of the subtree this bucket points at.
    pub fn object_id(&self) -> ContentId {
        self.object_id
    }

    /// Aggregate bounds of everything beneath this bucket.
    pub fn bounds(&self) -> &BoundingBox32 {
        &self.bounds
    }

    /// Whether the aggregate bounds intersect `env`.
    pub fn intersects(&self, env: &Envelope) -> bool {
        self.bounds.intersects(env)
    }

    /// Grow `env` to cover the aggregate bounds.
    pub fn expand(&self, env: &mut Envelope) {
        self.bounds.expand(env);
    }
}
