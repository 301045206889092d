//! Observable entity store
//!
//! An unbounded map from entity id to entity, wrapped in a watch channel so
//! repositories can hand out live views of the cache. Mutations notify every
//! subscriber.

use std::collections::HashMap;
use tokio::sync::watch;
use tracing::debug;

/// Id-keyed in-memory store for one entity type
///
/// Cloning the store is cheap and shares the underlying map, matching how a
/// repository and its watchers see one cache.
#[derive(Debug, Clone)]
pub struct EntityStore<T> {
    tx: watch::Sender<HashMap<u32, T>>,
}

impl<T: Clone> EntityStore<T> {
    /// Create an empty store
    pub fn new() -> Self {
        Self { tx: watch::Sender::new(HashMap::new()) }
    }

    /// Insert or replace a single entity
    pub fn insert(&self, id: u32, value: T) {
        self.tx.send_modify(|map| {
            map.insert(id, value);
        });
    }

    /// Insert or replace a batch of entities
    pub fn insert_many(&self, entries: impl IntoIterator<Item = (u32, T)>) {
        self.tx.send_modify(|map| {
            for (id, value) in entries {
                map.insert(id, value);
            }
        });
    }

    /// Get a snapshot of one entity
    pub fn get(&self, id: u32) -> Option<T> {
        self.tx.borrow().get(&id).cloned()
    }

    /// Check whether an entity is cached
    pub fn contains(&self, id: u32) -> bool {
        self.tx.borrow().contains_key(&id)
    }

    /// Snapshot of all cached entities
    pub fn values(&self) -> Vec<T> {
        self.tx.borrow().values().cloned().collect()
    }

    /// Number of cached entities
    pub fn len(&self) -> usize {
        self.tx.borrow().len()
    }

    /// Whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.tx.borrow().is_empty()
    }

    /// Remove everything
    pub fn clear(&self) {
        debug!("clearing entity store");
        self.tx.send_modify(HashMap::clear);
    }

    /// Subscribe to the store's contents
    ///
    /// The receiver sees the current map immediately and is notified on every
    /// mutation.
    pub fn watch(&self) -> watch::Receiver<HashMap<u32, T>> {
        self.tx.subscribe()
    }
}

impl<T: Clone> Default for EntityStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_get() {
        let store = EntityStore::new();
        store.insert(1, "Goku".to_string());

        assert_eq!(store.get(1), Some("Goku".to_string()));
        assert_eq!(store.get(2), None);
        assert!(store.contains(1));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_insert_replaces() {
        let store = EntityStore::new();
        store.insert(1, "Goku");
        store.insert(1, "Kakarot");

        assert_eq!(store.get(1), Some("Kakarot"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_insert_many() {
        let store = EntityStore::new();
        store.insert_many([(1, "Goku"), (2, "Vegeta"), (3, "Piccolo")]);

        assert_eq!(store.len(), 3);
        assert_eq!(store.get(2), Some("Vegeta"));
    }

    #[test]
    fn test_clear() {
        let store = EntityStore::new();
        store.insert_many([(1, "a"), (2, "b")]);
        store.clear();

        assert!(store.is_empty());
    }

    #[test]
    fn test_clone_shares_contents() {
        let store = EntityStore::new();
        let view = store.clone();

        store.insert(7, "Earth");
        assert_eq!(view.get(7), Some("Earth"));
    }

    #[tokio::test]
    async fn test_watch_sees_mutations() {
        let store = EntityStore::new();
        let mut rx = store.watch();

        assert!(rx.borrow().is_empty());

        store.insert(1, "Namek");
        rx.changed().await.unwrap();

        let snapshot = rx.borrow_and_update();
        assert_eq!(snapshot.get(&1), Some(&"Namek"));
    }

    #[tokio::test]
    async fn test_watch_batch_notifies_once() {
        let store = EntityStore::new();
        let mut rx = store.watch();

        store.insert_many([(1, "a"), (2, "b")]);

        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().len(), 2);

        // No further notification pending after a single batch.
        assert!(!rx.has_changed().unwrap());
    }
}
