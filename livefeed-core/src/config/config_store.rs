//! Generic config store with change notification.
//!
//! `ConfigStore<T>` keeps the current value in a `watch` channel together
//! with a version counter, so consumers can either read the latest value
//! synchronously or `await` the next change.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::watch;

/// A shared, versioned configuration store with change notification.
pub struct ConfigStore<T> {
    inner: Arc<ConfigStoreInner<T>>,
}

struct ConfigStoreInner<T> {
    version: AtomicU64,
    data_tx: watch::Sender<T>,
}

/// Receives notifications when a [`ConfigStore`] is updated.
///
/// Reading never blocks, which makes a watcher usable from synchronous
/// code such as renderer callbacks.
pub struct ConfigWatcher<T> {
    data_rx: watch::Receiver<T>,
}

// -- ConfigStore --------------------------------------------------------

impl<T> ConfigStore<T> {
    /// Create a new `ConfigStore` with the given initial value.
    pub fn new(initial: T) -> Self {
        let (data_tx, _) = watch::channel(initial);
        Self {
            inner: Arc::new(ConfigStoreInner {
                version: AtomicU64::new(0),
                data_tx,
            }),
        }
    }

    /// Replace the stored value and notify all watchers.
    ///
    /// Returns the new version.
    pub fn update(&self, value: T) -> u64 {
        // `send_replace` stores the value even when nobody is subscribed yet.
        self.inner.data_tx.send_replace(value);
        self.inner.version.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Number of updates applied since creation.
    pub fn version(&self) -> u64 {
        self.inner.version.load(Ordering::Relaxed)
    }

    /// Subscribe to change notifications.
    pub fn subscribe(&self) -> ConfigWatcher<T> {
        ConfigWatcher {
            data_rx: self.inner.data_tx.subscribe(),
        }
    }
}

impl<T: Clone> ConfigStore<T> {
    /// Clone out the current value.
    pub fn current(&self) -> T {
        self.inner.data_tx.borrow().clone()
    }
}

impl<T> Clone for ConfigStore<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

// -- ConfigWatcher ------------------------------------------------------

impl<T> ConfigWatcher<T> {
    /// Wait until the config store is updated.
    ///
    /// Returns `Ok(())` when a new value is available, or `Err` if the
    /// [`ConfigStore`] has been dropped.
    pub async fn changed(&mut self) -> Result<(), watch::error::RecvError> {
        self.data_rx.changed().await
    }
}

impl<T: Clone> ConfigWatcher<T> {
    /// Clone out the latest value and mark it as seen.
    pub fn latest(&mut self) -> T {
        self.data_rx.borrow_and_update().clone()
    }

    /// Clone out the latest value without marking it as seen.
    pub fn current(&self) -> T {
        self.data_rx.borrow().clone()
    }
}

impl<T> Clone for ConfigWatcher<T> {
    fn clone(&self) -> Self {
        Self {
            data_rx: self.data_rx.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_update_notifies_watchers() {
        let store = ConfigStore::new(1_u32);
        let mut watcher = store.subscribe();
        assert_eq!(watcher.current(), 1);

        assert_eq!(store.update(2), 1);
        watcher.changed().await.unwrap();
        assert_eq!(watcher.latest(), 2);
        assert_eq!(store.current(), 2);
        assert_eq!(store.version(), 1);
    }

    #[test]
    fn test_update_without_subscribers_is_kept() {
        let store = ConfigStore::new("a".to_string());
        store.update("b".to_string());
        assert_eq!(store.current(), "b");
        assert_eq!(store.subscribe().current(), "b");
    }

    #[tokio::test]
    async fn test_changed_fails_after_store_dropped() {
        let store = ConfigStore::new(0_u8);
        let mut watcher = store.subscribe();
        drop(store);
        assert!(watcher.changed().await.is_err());
    }
}
