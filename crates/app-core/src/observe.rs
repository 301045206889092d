//! Per-entity observation over an [`EntityStore`]

use storage::EntityStore;
use tokio::sync::watch;

/// Derive a watch channel for a single entity out of a store-wide channel.
///
/// The receiver starts with the entity's current cached value and is updated
/// whenever that entry changes. The forwarding task ends once every receiver
/// is dropped. Outside a tokio runtime there is nothing to drive the
/// forwarding, so the receiver holds the initial snapshot and never updates.
pub(crate) fn watch_entity<T>(store: &EntityStore<T>, id: u32) -> watch::Receiver<Option<T>>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    let mut source = store.watch();
    let (tx, rx) = watch::channel(source.borrow().get(&id).cloned());

    let Ok(handle) = tokio::runtime::Handle::try_current() else {
        return rx;
    };

    handle.spawn(async move {
        while source.changed().await.is_ok() {
            let value = source.borrow_and_update().get(&id).cloned();
            tx.send_if_modified(|current| {
                if *current == value {
                    false
                } else {
                    *current = value;
                    true
                }
            });
            if tx.is_closed() {
                break;
            }
        }
    });

    rx
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_watch_entity_outside_runtime_holds_snapshot() {
        let store = EntityStore::new();
        store.insert(1, "Goku".to_string());

        // No runtime running: the call must not panic and still serves the
        // cached value.
        let rx = watch_entity(&store, 1);
        assert_eq!(*rx.borrow(), Some("Goku".to_string()));

        store.insert(1, "Kakarot".to_string());
        assert_eq!(*rx.borrow(), Some("Goku".to_string()));
    }

    #[tokio::test]
    async fn test_watch_entity_initial_value() {
        let store = EntityStore::new();
        store.insert(1, "Goku".to_string());

        let rx = watch_entity(&store, 1);
        assert_eq!(*rx.borrow(), Some("Goku".to_string()));

        let missing = watch_entity(&store, 99);
        assert_eq!(*missing.borrow(), None);
    }

    #[tokio::test]
    async fn test_watch_entity_sees_updates() {
        let store = EntityStore::new();
        let mut rx = watch_entity(&store, 5);

        store.insert(5, "Namek".to_string());
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), Some("Namek".to_string()));
    }

    #[tokio::test]
    async fn test_watch_entity_ignores_other_ids() {
        let store = EntityStore::new();
        store.insert(1, "Earth".to_string());

        let mut rx = watch_entity(&store, 1);
        store.insert(2, "Vegeta".to_string());

        // Give the forwarding task a chance to run; entry 1 is unchanged so
        // no notification should arrive.
        tokio::task::yield_now().await;
        assert!(!rx.has_changed().unwrap());
    }
}
