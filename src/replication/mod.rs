//! Master–replica replication: replica registry, propagation and WAIT on the
//! master side, handshake and the apply loop on the replica side.

mod handshake;
mod replica_link;
mod replication_state;

use thiserror::Error;

use crate::{input::CommandReadError, rdb::RdbError};

pub use handshake::{FullResync, perform_handshake};
pub use replica_link::run_replication_link;
pub use replication_state::{
    MASTER_REPLICATION_ID, ReplicationRole, ReplicationState, spawn_replica_writer,
};

#[derive(Error, Debug, PartialEq)]
pub enum ReplicationError {
    #[error("I/O error on replication link: {0}")]
    Io(String),
    #[error("failed to read from master: {0}")]
    Read(#[from] CommandReadError),
    #[error("unexpected reply to {step}: {reply}")]
    UnexpectedReply { step: &'static str, reply: String },
    #[error("invalid replication id '{0}'")]
    InvalidReplicationId(String),
    #[error("invalid snapshot from master: {0}")]
    Snapshot(#[from] RdbError),
}

impl From<std::io::Error> for ReplicationError {
    fn from(err: std::io::Error) -> Self {
        ReplicationError::Io(err.to_string())
    }
}
