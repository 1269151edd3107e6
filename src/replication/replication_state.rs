use std::{
    collections::HashMap,
    sync::{
        PoisonError, RwLock as StdRwLock,
        atomic::{AtomicI64, Ordering},
    },
    time::Duration,
};

use bytes::Bytes;
use tokio::{
    io::AsyncWriteExt,
    net::tcp::OwnedWriteHalf,
    sync::{
        Mutex, MutexGuard, RwLock,
        mpsc::{self, error::TrySendError},
    },
    time::Instant,
};
use tracing::{debug, warn};

use crate::{config::MasterAddress, resp::RespValue};

pub const MASTER_REPLICATION_ID: &str = "8371b4fb1155b71f4a04d3e1bc3e18c4a990aeeb";

const WAIT_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Frames that may wait for a replica's writer before the replica is dropped.
pub const REPLICA_QUEUE_CAPACITY: usize = 4096;

#[derive(Debug, Clone, PartialEq)]
pub enum ReplicationRole {
    Master,
    Replica(MasterAddress),
}

impl ReplicaHandle {
    /// Queues `payload` for the writer task. A full or closed queue means the
    /// replica can no longer keep up, and the caller must drop it.
    fn enqueue(&mut self, address: &str, payload: &Bytes) -> bool {
        match self.outbound.try_send(payload.clone()) {
            Ok(()) => {
                self.sent_offset += payload.len() as i64;
                true
            }
            Err(TrySendError::Full(_)) => {
                warn!(replica = %address, "replica outbound queue is full, dropping replica");
                false
            }
            Err(TrySendError::Closed(_)) => {
                warn!(replica = %address, "replica writer is gone, dropping replica");
                false
            }
        }
    }
}

impl ReplicationRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReplicationRole::Master => "master",
            ReplicationRole::Replica(_) => "slave",
        }
    }
}

#[derive(Debug)]
struct ReplicaHandle {
    outbound: mpsc::Sender<Bytes>,
    /// Bytes enqueued to this replica since it registered, GETACK probes included.
    sent_offset: i64,
    /// Last offset the replica reported with REPLCONF ACK.
    acked_offset: i64,
}

/// Replication bookkeeping shared by every connection.
///
/// On a master `offset` counts the bytes of propagated write commands. On a
/// replica it counts every byte consumed from the master since the snapshot.
#[derive(Debug)]
pub struct ReplicationState {
    role: ReplicationRole,
    replication_id: StdRwLock<String>,
    offset: AtomicI64,
    replicas: RwLock<HashMap<String, ReplicaHandle>>,
    write_order: Mutex<()>,
}

impl ReplicationState {
    pub fn new(role: ReplicationRole) -> Self {
        Self {
            role,
            replication_id: StdRwLock::new(MASTER_REPLICATION_ID.to_string()),
            offset: AtomicI64::new(0),
            replicas: RwLock::new(HashMap::new()),
            write_order: Mutex::new(()),
        }
    }

    pub fn role(&self) -> &ReplicationRole {
        &self.role
    }

    pub fn is_master(&self) -> bool {
        self.role == ReplicationRole::Master
    }

    pub fn replication_id(&self) -> String {
        self.replication_id
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set_replication_id(&self, replication_id: String) {
        *self
            .replication_id
            .write()
            .unwrap_or_else(PoisonError::into_inner) = replication_id;
    }

    pub fn offset(&self) -> i64 {
        self.offset.load(Ordering::SeqCst)
    }

    pub fn set_offset(&self, offset: i64) {
        self.offset.store(offset, Ordering::SeqCst);
    }

    pub fn add_to_offset(&self, bytes: usize) {
        self.offset.fetch_add(bytes as i64, Ordering::SeqCst);
    }

    /// Serialises apply-then-propagate so replicas see writes in the order the
    /// store applied them.
    pub async fn write_order(&self) -> MutexGuard<'_, ()> {
        self.write_order.lock().await
    }

    pub async fn register_replica(&self, address: &str, outbound: mpsc::Sender<Bytes>) {
        self.replicas.write().await.insert(
            address.to_string(),
            ReplicaHandle {
                outbound,
                sent_offset: 0,
                acked_offset: 0,
            },
        );
    }

    pub async fn remove_replica(&self, address: &str) -> bool {
        self.replicas.write().await.remove(address).is_some()
    }

    pub async fn replica_count(&self) -> usize {
        self.replicas.read().await.len()
    }

    pub async fn record_ack(&self, address: &str, offset: i64) {
        if let Some(replica) = self.replicas.write().await.get_mut(address) {
            replica.acked_offset = offset;
        }
    }

    /// Sends a write command to every replica and advances the offset by its
    /// encoded length. Nothing happens while no replica is connected. Replicas
    /// whose queue is full or closed are removed from the registry.
    pub async fn propagate(&self, command: &RespValue) {
        let payload = Bytes::from(command.encode());
        let mut replicas = self.replicas.write().await;

        if replicas.is_empty() {
            return;
        }

        self.add_to_offset(payload.len());
        replicas.retain(|address, replica| replica.enqueue(address, &payload));
    }

    /// Waits until `number_of_replicas` replicas acknowledged everything sent
    /// to them before the call, or until `timeout` passes. Returns how many did.
    pub async fn wait_for_replicas(&self, number_of_replicas: usize, timeout: Duration) -> usize {
        let targets: Vec<(String, i64)> = self
            .replicas
            .read()
            .await
            .iter()
            .map(|(address, replica)| (address.clone(), replica.sent_offset))
            .collect();

        if targets.is_empty() {
            return 0;
        }

        let synced = self.count_synced(&targets).await;

        if synced >= number_of_replicas {
            return synced;
        }

        self.send_getack(&targets).await;

        let deadline = Instant::now() + timeout;

        loop {
            let synced = self.count_synced(&targets).await;
            let now = Instant::now();

            if synced >= number_of_replicas || now >= deadline {
                return synced;
            }

            tokio::time::sleep(WAIT_POLL_INTERVAL.min(deadline - now)).await;
        }
    }

    async fn count_synced(&self, targets: &[(String, i64)]) -> usize {
        let replicas = self.replicas.read().await;

        targets
            .iter()
            .filter(|(address, target)| {
                replicas
                    .get(address)
                    .is_some_and(|replica| replica.acked_offset >= *target)
            })
            .count()
    }

    async fn send_getack(&self, targets: &[(String, i64)]) {
        let getack = Bytes::from(RespValue::command(&["REPLCONF", "GETACK", "*"]).encode());
        let mut replicas = self.replicas.write().await;

        for (address, target) in targets {
            let Some(replica) = replicas.get_mut(address) else {
                continue;
            };

            if replica.acked_offset >= *target {
                continue;
            }

            if replica.enqueue(address, &getack) {
                debug!(replica = %address, "sent GETACK");
            } else {
                replicas.remove(address);
            }
        }
    }
}

/// Spawns the task that owns a replica's socket and writes queued bytes in order.
pub fn spawn_replica_writer(
    address: String,
    mut writer: OwnedWriteHalf,
) -> mpsc::Sender<Bytes> {
    let (outbound, mut receiver) = mpsc::channel::<Bytes>(REPLICA_QUEUE_CAPACITY);

    tokio::spawn(async move {
        while let Some(bytes) = receiver.recv().await {
            if let Err(e) = writer.write_all(&bytes).await {
                warn!(replica = %address, error = %e, "failed to write to replica");
                break;
            }
        }

        debug!(replica = %address, "replica writer finished");
    });

    outbound
}
