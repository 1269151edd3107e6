//! An in-memory key-value and stream server speaking the Redis wire protocol,
//! with master/replica replication.
//!
//! Supported commands cover strings with expiry (GET, SET, INCR, KEYS, TYPE),
//! streams with blocking reads (XADD, XRANGE, XREAD), transactions (MULTI,
//! EXEC, DISCARD) and replication (REPLCONF, PSYNC, WAIT, INFO).

pub mod commands;
pub mod config;
pub mod connection;
pub mod context;
pub mod input;
pub mod key_value_store;
pub mod rdb;
pub mod replication;
pub mod resp;
pub mod server;
pub mod state;
pub mod streams;
