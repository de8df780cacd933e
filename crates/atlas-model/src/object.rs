//! The content-addressed revision object family.
//!
//! Every variant owns a [`ContentId`] established at construction time and
//! never recomputed here; the canonical-encoding hash function lives with
//! the serializer. The content-identity law holds across the whole family:
//! two objects are equal iff their ids are equal, and the hash code is
//! derived solely from the id.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::id::ContentId;
use crate::tree::RevTree;
use crate::value::{Value, ValueKind};

/// The kind of a revision object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectKind {
    Commit,
    Tree,
    Feature,
    FeatureType,
    Tag,
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Commit => write!(f, "commit"),
            Self::Tree => write!(f, "tree"),
            Self::Feature => write!(f, "feature"),
            Self::FeatureType => write!(f, "featuretype"),
            Self::Tag => write!(f, "tag"),
        }
    }
}

/// Author or committer identity: a plain value type, not content-addressed.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RevPerson {
    name: Option<String>,
    email: Option<String>,
    timestamp: i64,
    tz_offset: i32,
}

impl RevPerson {
    pub(crate) fn new(
        name: Option<String>,
        email: Option<String>,
        timestamp: i64,
        tz_offset: i32,
    ) -> Self {
        Self {
            name,
            email,
            timestamp,
            tz_offset,
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Milliseconds since the UNIX epoch.
    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    /// Offset from UTC in minutes.
    pub fn tz_offset(&self) -> i32 {
        self.tz_offset
    }
}

/// A commit: a root tree plus ancestry and authorship.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RevCommit {
    id: ContentId,
    tree_id: ContentId,
    parent_ids: Vec<ContentId>,
    author: RevPerson,
    committer: RevPerson,
    message: String,
}

impl RevCommit {
    pub(crate) fn new(
        id: ContentId,
        tree_id: ContentId,
        parent_ids: Vec<ContentId>,
        author: RevPerson,
        committer: RevPerson,
        message: String,
    ) -> Self {
        Self {
            id,
            tree_id,
            parent_ids,
            author,
            committer,
            message,
        }
    }

    pub fn id(&self) -> ContentId {
        self.id
    }

    /// Id of the root tree this commit snapshots.
    pub fn tree_id(&self) -> ContentId {
        self.tree_id
    }

    /// Parent commit ids: zero for a root commit, two or more for a merge.
    pub fn parent_ids(&self) -> &[ContentId] {
        &self.parent_ids
    }

    /// The i-th parent id, or `None` when out of range. Never panics.
    pub fn parent_at(&self, i: usize) -> Option<ContentId> {
        self.parent_ids.get(i).copied()
    }

    pub fn parent_count(&self) -> usize {
        self.parent_ids.len()
    }

    pub fn author(&self) -> &RevPerson {
        &self.author
    }

    pub fn committer(&self) -> &RevPerson {
        &self.committer
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// A feature: an ordered, fixed-length array of heterogeneous attribute
/// values. Nulls are allowed; every read returns a deep copy.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RevFeature {
    id: ContentId,
    values: Box<[Value]>,
}

impl RevFeature {
    pub(crate) fn new(id: ContentId, values: Box<[Value]>) -> Self {
        Self { id, values }
    }

    pub fn id(&self) -> ContentId {
        self.id
    }

    /// Number of attribute values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The i-th attribute value as an independent copy, or `None` when out
    /// of range. Geometry values are cloned through their box, so the
    /// stored value is never exposed by reference.
    pub fn value(&self, i: usize) -> Option<Value> {
        self.values.get(i).cloned()
    }

    /// Iterate over independent copies of all values, in attribute order.
    pub fn values(&self) -> impl Iterator<Item = Value> + '_ {
        self.values.iter().cloned()
    }
}

/// A single attribute slot in a feature-type schema.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeDescriptor {
    /// Attribute name.
    pub name: String,
    /// Value kind bound to this slot.
    pub binding: ValueKind,
    /// Whether null values are permitted.
    pub nillable: bool,
}

impl AttributeDescriptor {
    pub fn new(name: impl Into<String>, binding: ValueKind, nillable: bool) -> Self {
        Self {
            name: name.into(),
            binding,
            nillable,
        }
    }
}

/// A feature-type: a named schema descriptor, opaque to the revision model
/// beyond its identity and ordered attribute list.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RevFeatureType {
    id: ContentId,
    name: String,
    descriptors: Box<[AttributeDescriptor]>,
}

impl RevFeatureType {
    pub(crate) fn new(id: ContentId, name: String, descriptors: Box<[AttributeDescriptor]>) -> Self {
        Self {
            id,
            name,
            descriptors,
        }
    }

    pub fn id(&self) -> ContentId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Ordered attribute descriptors.
    pub fn descriptors(&self) -> &[AttributeDescriptor] {
        &self.descriptors
    }
}

/// An annotated, named pointer at a commit.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RevTag {
    id: ContentId,
    name: String,
    commit_id: ContentId,
    message: String,
    tagger: RevPerson,
}

impl RevTag {
    pub(crate) fn new(
        id: ContentId,
        name: String,
        commit_id: ContentId,
        message: String,
        tagger: RevPerson,
    ) -> Self {
        Self {
            id,
            name,
            commit_id,
            message,
            tagger,
        }
    }

    pub fn id(&self) -> ContentId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The commit this tag points at.
    pub fn commit_id(&self) -> ContentId {
        self.commit_id
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn tagger(&self) -> &RevPerson {
        &self.tagger
    }
}

/// Any immutable, content-addressed revision object.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum RevisionObject {
    Commit(RevCommit),
    Tree(RevTree),
    Feature(RevFeature),
    FeatureType(RevFeatureType),
    Tag(RevTag),
}

impl RevisionObject {
    pub fn id(&self) -> ContentId {
        match self {
            Self::Commit(c) => c.id(),
            Self::Tree(t) => t.id(),
            Self::Feature(f) => f.id(),
            Self::FeatureType(ft) => ft.id(),
            Self::Tag(t) => t.id(),
        }
    }

    pub fn kind(&self) -> ObjectKind {
        match self {
            Self::Commit(_) => ObjectKind::Commit,
            Self::Tree(_) => ObjectKind::Tree,
            Self::Feature(_) => ObjectKind::Feature,
            Self::FeatureType(_) => ObjectKind::FeatureType,
            Self::Tag(_) => ObjectKind::Tag,
        }
    }

    pub fn as_commit(&self) -> Option<&RevCommit> {
        match self {
            Self::Commit(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_tree(&self) -> Option<&RevTree> {
        match self {
            Self::Tree(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_feature(&self) -> Option<&RevFeature> {
        match self {
            Self::Feature(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_feature_type(&self) -> Option<&RevFeatureType> {
        match self {
            Self::FeatureType(ft) => Some(ft),
            _ => None,
        }
    }

    pub fn as_tag(&self) -> Option<&RevTag> {
        match self {
            Self::Tag(t) => Some(t),
            _ => None,
        }
    }
}

// Content-identity law: equality iff ids are equal, across variants; the
// hash code is derived solely from the id (and thus from `h1`).
impl PartialEq for RevisionObject {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for RevisionObject {}

impl Hash for RevisionObject {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

macro_rules! id_equality {
    ($($ty:ty),+) => {
        $(
            impl PartialEq for $ty {
                fn eq(&self, other: &Self) -> bool {
                    self.id() == other.id()
                }
            }
            impl Eq for $ty {}
            impl Hash for $ty {
                fn hash<H: Hasher>(&self, state: &mut H) {
                    self.id().hash(state);
                }
            }
        )+
    };
}

id_equality!(RevCommit, RevFeature, RevFeatureType, RevTag);
