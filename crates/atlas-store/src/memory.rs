use std::collections::HashMap;
use std::sync::RwLock;

use atlas_model::{ContentId, RevisionObject};

use crate::error::{StoreError, StoreResult};
use crate::traits::ObjectStore;

/// In-memory, HashMap-based object store.
///
/// Intended for tests and embedding. All objects are held in memory behind
/// a `RwLock` for safe concurrent access. Objects are cloned on read.
pub struct InMemoryObjectStore {
    objects: RwLock<HashMap<ContentId, RevisionObject>>,
}

impl InMemoryObjectStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            objects: RwLock::new(HashMap::new()),
        }
    }

    /// Number of objects currently stored.
    pub fn len(&self) -> usize {
        self.objects.read().expect("lock poisoned").len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.read().expect("lock poisoned").is_empty()
    }

    /// Remove all objects from the store.
    pub fn clear(&self) {
        self.objects.write().expect("lock poisoned").clear();
    }

    /// Return a sorted list of all object ids in the store.
    pub fn all_ids(&self) -> Vec<ContentId> {
        let map = self.objects.read().expect("lock poisoned");
        let mut ids: Vec<ContentId> = map.keys().copied().collect();
        ids.sort();
        ids
    }
}

impl Default for InMemoryObjectStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjectStore for InMemoryObjectStore {
    fn get(&self, id: &ContentId) -> StoreResult<Option<RevisionObject>> {
        let map = self.objects.read().expect("lock poisoned");
        Ok(map.get(id).cloned())
    }

    fn put(&self, object: &RevisionObject) -> StoreResult<bool> {
        let id = object.id();
        if id.is_null() {
            return Err(StoreError::NullObjectId);
        }
        let mut map = self.objects.write().expect("lock poisoned");
        // Idempotent: content-addressing means an existing entry already
        // holds the same content.
        if map.contains_key(&id) {
            return Ok(false);
        }
        tracing::trace!(%id, kind = %object.kind(), "store object");
        map.insert(id, object.clone());
        Ok(true)
    }

    fn exists(&self, id: &ContentId) -> StoreResult<bool> {
        let map = self.objects.read().expect("lock poisoned");
        Ok(map.contains_key(id))
    }

    fn delete(&self, id: &ContentId) -> StoreResult<bool> {
        let mut map = self.objects.write().expect("lock poisoned");
        Ok(map.remove(id).is_some())
    }
}

impl std::fmt::Debug for InMemoryObjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryObjectStore")
            .field("object_count", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atlas_model::{DefaultFactory, ObjectKind, RevObjectFactory, Value};

    fn make_feature(content: &str) -> RevisionObject {
        let feature = DefaultFactory
            .create_feature(
                ContentId::hash_of(content.as_bytes()),
                vec![Value::from(content), Value::Long(content.len() as i64)],
            )
            .unwrap();
        RevisionObject::Feature(feature)
    }

    fn make_commit() -> RevisionObject {
        let person = DefaultFactory.create_person(
            Some("Jo Mapper".to_owned()),
            Some("jo@example.com".to_owned()),
            1_700_000_000_000,
            0,
        );
        let commit = DefaultFactory
            .create_commit(
                ContentId::hash_of(b"commit"),
                ContentId::hash_of(b"tree"),
                vec![ContentId::hash_of(b"parent")],
                person.clone(),
                person,
                "import".to_owned(),
            )
            .unwrap();
        RevisionObject::Commit(commit)
    }

    #[test]
    fn put_and_get() {
        let store = InMemoryObjectStore::new();
        let obj = make_feature("hello");
        assert!(store.put(&obj).unwrap());

        let read_back = store.get(&obj.id()).unwrap().expect("should exist");
        assert_eq!(read_back, obj);
        assert_eq!(read_back.kind(), ObjectKind::Feature);
    }

    #[test]
    fn put_reports_newly_inserted() {
        let store = InMemoryObjectStore::new();
        let obj = make_feature("idempotent");
        assert!(store.put(&obj).unwrap()); // new
        assert!(!store.put(&obj).unwrap()); // already present
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn put_rejects_null_id() {
        let store = InMemoryObjectStore::new();
        let empty = RevisionObject::Tree(atlas_model::RevTree::empty());
        assert!(matches!(
            store.put(&empty).unwrap_err(),
            StoreError::NullObjectId
        ));
    }

    #[test]
    fn get_missing_returns_none() {
        let store = InMemoryObjectStore::new();
        assert!(store.get(&ContentId::hash_of(b"missing")).unwrap().is_none());
    }

    #[test]
    fn exists_tracks_presence() {
        let store = InMemoryObjectStore::new();
        let obj = make_commit();
        assert!(!store.exists(&obj.id()).unwrap());
        store.put(&obj).unwrap();
        assert!(store.exists(&obj.id()).unwrap());
    }

    #[test]
    fn delete_present_and_missing() {
        let store = InMemoryObjectStore::new();
        let obj = make_feature("to-delete");
        store.put(&obj).unwrap();
        assert!(store.delete(&obj.id()).unwrap());
        assert!(!store.exists(&obj.id()).unwrap());
        assert!(!store.delete(&obj.id()).unwrap());
    }

    #[test]
    fn batch_operations() {
        let store = InMemoryObjectStore::new();
        let objects = vec![
            make_feature("batch-1"),
            make_feature("batch-2"),
            make_feature("batch-3"),
        ];
        let inserted = store.put_batch(&objects).unwrap();
        assert_eq!(inserted, vec![true, true, true]);
        assert_eq!(store.len(), 3);

        let mut ids: Vec<ContentId> = objects.iter().map(RevisionObject::id).collect();
        ids.push(ContentId::hash_of(b"missing"));
        let read_back = store.get_batch(&ids).unwrap();
        assert_eq!(read_back.len(), 4);
        assert!(read_back[..3].iter().all(Option::is_some));
        assert!(read_back[3].is_none());
    }

    #[test]
    fn len_clear_and_all_ids() {
        let store = InMemoryObjectStore::new();
        assert!(store.is_empty());
        let a = make_feature("a");
        let b = make_commit();
        store.put(&a).unwrap();
        store.put(&b).unwrap();
        assert_eq!(store.len(), 2);

        let ids = store.all_ids();
        assert!(ids.windows(2).all(|w| w[0] <= w[1]));
        assert!(ids.contains(&a.id()));
        assert!(ids.contains(&b.id()));

        store.clear();
        assert!(store.is_empty());
    }

    #[test]
    fn concurrent_reads_are_safe() {
        use std::sync::Arc;
        use std::thread;

        let store = Arc::new(InMemoryObjectStore::new());
        let obj = make_feature("shared");
        let id = obj.id();
        store.put(&obj).unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    let read = store.get(&id).unwrap().expect("object present");
                    assert_eq!(read.id(), id);
                })
            })
            .collect();

        for h in handles {
            h.join().expect("thread should not panic");
        }
    }

    #[test]
    fn debug_format() {
        let store = InMemoryObjectStore::new();
        store.put(&make_feature("x")).unwrap();
        let debug = format!("{store:?}");
        assert!(debug.contains("InMemoryObjectStore"));
        assert!(debug.contains("object_count"));
    }
}
