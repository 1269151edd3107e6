use std::{
    collections::HashMap,
    sync::{
        Mutex, PoisonError,
        atomic::{AtomicU64, Ordering},
    },
};

use tokio::sync::mpsc;

#[derive(Debug)]
struct StreamWaiter {
    keys: Vec<String>,
    notifier: mpsc::Sender<()>,
}

/// Registry of blocked XREAD calls, keyed by a registration id.
///
/// Notification never blocks: each waiter has a channel of capacity one and a
/// full channel already means "something changed, look again".
#[derive(Debug, Default)]
pub struct StreamWaiters {
    next_id: AtomicU64,
    waiters: Mutex<HashMap<u64, StreamWaiter>>,
}

impl StreamWaiters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers interest in `keys`. The returned registration removes itself
    /// from the registry when dropped.
    pub fn register(&self, keys: Vec<String>) -> WaiterRegistration<'_> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (notifier, receiver) = mpsc::channel(1);

        self.waiters
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, StreamWaiter { keys, notifier });

        WaiterRegistration {
            waiters: self,
            id,
            receiver,
        }
    }

    /// Wakes every waiter interested in `key`.
    pub fn notify(&self, key: &str) {
        let waiters = self.waiters.lock().unwrap_or_else(PoisonError::into_inner);

        for waiter in waiters.values() {
            if waiter.keys.iter().any(|waiting_key| waiting_key == key) {
                let _ = waiter.notifier.try_send(());
            }
        }
    }

    pub fn len(&self) -> usize {
        self.waiters
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn remove(&self, id: u64) {
        self.waiters
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id);
    }
}

#[derive(Debug)]
pub struct WaiterRegistration<'a> {
    waiters: &'a StreamWaiters,
    id: u64,
    receiver: mpsc::Receiver<()>,
}

impl WaiterRegistration<'_> {
    pub async fn notified(&mut self) {
        // The sender lives in the registry for as long as this registration does.
        let _ = self.receiver.recv().await;
    }
}

impl Drop for WaiterRegistration<'_> {
    fn drop(&mut self) {
        self.waiters.remove(self.id);
    }
}
