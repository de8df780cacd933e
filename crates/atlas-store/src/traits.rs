use atlas_model::{ContentId, RevisionObject};

use crate::error::StoreResult;

/// Content-addressed revision object store.
///
/// All implementations must satisfy these invariants:
/// - Objects are immutable once written. Content-addressing guarantees
///   this: the same content always carries the same id.
/// - Writes are idempotent: re-putting an existing object is a no-op and
///   reports "not newly inserted".
/// - Concurrent reads are always safe (objects are immutable).
/// - The store never recomputes or second-guesses ids — they come from the
///   canonical serializer, outside this crate.
/// - All I/O errors are propagated, never silently ignored.
pub trait ObjectStore: Send + Sync {
    /// Read an object by id.
    ///
    /// Returns `Ok(None)` if the object does not exist.
    /// Returns `Err` on I/O failure or data corruption.
    fn get(&self, id: &ContentId) -> StoreResult<Option<RevisionObject>>;

    /// Write an object under its id.
    ///
    /// Returns `true` if the object was newly inserted, `false` if it was
    /// already present. Rejects the null id.
    fn put(&self, object: &RevisionObject) -> StoreResult<bool>;

    /// Check whether an object exists in the store.
    fn exists(&self, id: &ContentId) -> StoreResult<bool>;

    /// Delete an object by id. Returns `true` if the object existed.
    ///
    /// Intended for garbage collection only. Deleting a referenced object
    /// corrupts the repository.
    fn delete(&self, id: &ContentId) -> StoreResult<bool>;

    /// Read multiple objects in a batch.
    ///
    /// Default implementation calls `get()` per id. Backends may override
    /// for fewer I/O round-trips.
    fn get_batch(&self, ids: &[ContentId]) -> StoreResult<Vec<Option<RevisionObject>>> {
        ids.iter().map(|id| self.get(id)).collect()
    }

    /// Write multiple objects in a batch, reporting newly-inserted per
    /// object.
    ///
    /// Default implementation calls `put()` per object. Backends may
    /// override (e.g., single fsync).
    fn put_batch(&self, objects: &[RevisionObject]) -> StoreResult<Vec<bool>> {
        objects.iter().map(|obj| self.put(obj)).collect()
    }
}
