//! Object storage contract for the Atlas revision model.
//!
//! Revision objects are immutable and keyed by their
//! [`ContentId`](atlas_model::ContentId), so the
//! store is a pure key-value collaborator: it persists, reports existence,
//! and never interprets or re-hashes what it holds. Canonical encoding and
//! hashing belong to the serializer; this crate trusts the id each object
//! carries.
//!
//! # Backends
//!
//! All backends implement the [`ObjectStore`] trait:
//!
//! - [`InMemoryObjectStore`] — `HashMap`-based store for tests and embedding
//!
//! # Design Rules
//!
//! 1. Objects are immutable once written.
//! 2. Writes are idempotent; `put` reports whether anything was inserted.
//! 3. Concurrent reads are always safe.
//! 4. All I/O errors are propagated, never silently ignored.
//! 5. Retry policy, if any, lives in the backend, not in callers.

pub mod error;
pub mod memory;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use memory::InMemoryObjectStore;
pub use traits::ObjectStore;
