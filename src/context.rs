use crate::{
    config::ServerConfig,
    key_value_store::{Entries, KeyValueStore},
    replication::{ReplicationRole, ReplicationState},
    state::State,
    streams::StreamWaiters,
};

/// Everything a server instance shares between its connections, created once
/// at startup and handed to each worker behind an `Arc`.
#[derive(Debug)]
pub struct ServerContext {
    pub config: ServerConfig,
    pub store: KeyValueStore,
    pub state: State,
    pub stream_waiters: StreamWaiters,
    pub replication: ReplicationState,
}

impl ServerContext {
    pub fn new(config: ServerConfig, entries: Entries) -> Self {
        let role = match &config.replica_of {
            Some(master) => ReplicationRole::Replica(master.clone()),
            None => ReplicationRole::Master,
        };

        Self {
            config,
            store: KeyValueStore::from_entries(entries),
            state: State::new(),
            stream_waiters: StreamWaiters::new(),
            replication: ReplicationState::new(role),
        }
    }
}
