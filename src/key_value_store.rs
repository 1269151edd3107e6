use std::{collections::HashMap, time::Duration};

use jiff::{SignedDuration, Timestamp};
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::streams::StreamValue;

#[derive(Debug, Clone, PartialEq)]
pub enum DataType {
    String(String),
    Stream(StreamValue),
}

impl DataType {
    /// Name reported by the TYPE command.
    pub fn type_name(&self) -> &'static str {
        match self {
            DataType::String(_) => "string",
            DataType::Stream(_) => "stream",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Value {
    pub data: DataType,
    pub expiration: Option<Timestamp>,
}

impl Value {
    pub fn new(data: DataType) -> Self {
        Self {
            data,
            expiration: None,
        }
    }

    /// A value expiring `ttl` from now. A ttl too large to represent never expires.
    pub fn with_ttl(data: DataType, ttl: Option<Duration>) -> Self {
        let expiration = ttl
            .and_then(|ttl| SignedDuration::try_from(ttl).ok())
            .and_then(|ttl| Timestamp::now().checked_add(ttl).ok());

        Self { data, expiration }
    }

    pub fn is_expired(&self) -> bool {
        self.expiration
            .is_some_and(|expiration| expiration <= Timestamp::now())
    }
}

pub type Entries = HashMap<String, Value>;

/// The keyspace shared by every connection and the replication link.
///
/// Reads take the shared lock and writes the exclusive one. Expired entries
/// are removed lazily by the first `get` that observes them and are invisible
/// to every other operation.
#[derive(Debug, Default)]
pub struct KeyValueStore {
    entries: RwLock<Entries>,
}

impl KeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Entries) -> Self {
        Self {
            entries: RwLock::new(entries),
        }
    }

    pub async fn get(&self, key: &str) -> Option<Value> {
        {
            let entries = self.entries.read().await;

            match entries.get(key) {
                None => return None,
                Some(value) if !value.is_expired() => return Some(value.clone()),
                Some(_) => (),
            }
        }

        let mut entries = self.entries.write().await;

        // Another writer may have replaced the key between the two locks.
        match entries.get(key) {
            Some(value) if value.is_expired() => {
                entries.remove(key);
                None
            }
            other => other.cloned(),
        }
    }

    pub async fn set(&self, key: String, value: String, ttl: Option<Duration>) {
        self.set_entry(key, Value::with_ttl(DataType::String(value), ttl))
            .await;
    }

    pub async fn set_entry(&self, key: String, value: Value) {
        self.entries.write().await.insert(key, value);
    }

    pub async fn delete(&self, key: &str) -> bool {
        self.entries.write().await.remove(key).is_some()
    }

    /// Snapshot of all live keys.
    pub async fn keys(&self) -> Vec<String> {
        self.entries
            .read()
            .await
            .iter()
            .filter(|(_, value)| !value.is_expired())
            .map(|(key, _)| key.clone())
            .collect()
    }

    pub async fn len(&self) -> usize {
        self.entries
            .read()
            .await
            .values()
            .filter(|value| !value.is_expired())
            .count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Installs entries loaded from a snapshot, replacing existing keys.
    pub async fn extend(&self, loaded: Entries) {
        self.entries.write().await.extend(loaded);
    }

    pub async fn read(&self) -> RwLockReadGuard<'_, Entries> {
        self.entries.read().await
    }

    pub async fn write(&self) -> RwLockWriteGuard<'_, Entries> {
        self.entries.write().await
    }
}

/// Looks up a key under a held lock, treating expired entries as absent.
pub fn live_value<'a>(entries: &'a Entries, key: &str) -> Option<&'a Value> {
    entries.get(key).filter(|value| !value.is_expired())
}

/// Like [`live_value`] but removes the entry when it has expired.
pub fn live_value_mut<'a>(entries: &'a mut Entries, key: &str) -> Option<&'a mut Value> {
    if entries.get(key).is_some_and(Value::is_expired) {
        entries.remove(key);
        return None;
    }

    entries.get_mut(key)
}
