//! Content-addressed revision object model for geospatial version control.
//!
//! This crate provides the immutable entities a versioned geospatial
//! collection is made of. Everything is identified by the cryptographic
//! hash of its canonical content and never mutated: a "new version" is
//! always a new object with a new id.
//!
//! # Key Types
//!
//! - [`ContentId`] — 160-bit content hash, packed into three integer fields
//! - [`Envelope`] / [`BoundingBox32`] — spatial bounds, with a compact
//!   single-precision form that never shrinks its source
//! - [`Node`] / [`Bucket`] — the two kinds of tree entries (named leaf
//!   entries and index-ordered fan-out slots)
//! - [`RevisionObject`] — the object family: commit, tree, feature,
//!   feature-type, tag
//! - [`RevTree`] — the dual leaf/bucket tree representation
//! - [`RevObjectFactory`] — the single, priority-ranked construction point
//!
//! Canonical hashing and persistence live outside this crate: ids are
//! always supplied by the serializer, and trees are assembled by an
//! external clustering strategy.

pub mod bbox;
pub mod error;
pub mod extra;
pub mod factory;
pub mod id;
pub mod node;
pub mod object;
pub mod tree;
pub mod value;

// Re-export primary types at crate root for ergonomic imports.
pub use bbox::{BoundingBox32, Envelope};
pub use error::{ModelError, ModelResult};
pub use extra::ExtraAttributes;
pub use factory::{DefaultFactory, FactoryRegistry, RevObjectFactory};
pub use id::ContentId;
pub use node::{Bucket, Node, NodeKind};
pub use object::{
    AttributeDescriptor, ObjectKind, RevCommit, RevFeature, RevFeatureType, RevPerson, RevTag,
    RevisionObject,
};
pub use tree::{RevTree, TreeRepr};
pub use value::{Value, ValueKind};
