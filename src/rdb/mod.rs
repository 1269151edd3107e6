//! Reading of the RDB snapshot format, used at startup and for the snapshot a
//! master sends to a new replica.

mod encoding;
mod opcode;
mod rdb_file_operations;
mod rdb_parser;

use thiserror::Error;

pub use rdb_file_operations::load_rdb_file;
pub use rdb_parser::{RdbParser, RdbSnapshot};

/// The snapshot a master sends on full resynchronisation: a header, the end of
/// file marker and a checksum, with no keys.
pub const EMPTY_RDB: &[u8] = &[
    0x52, 0x45, 0x44, 0x49, 0x53, 0x30, 0x30, 0x30, 0x36, 0xFF, 0x00, 0x00, 0x6B, 0x24, 0x71,
    0xD2, 0x4E, 0x01, 0x00, 0x00,
];

#[derive(Error, Debug, PartialEq)]
pub enum RdbError {
    #[error("failed to read snapshot: {0}")]
    Io(String),
    #[error("snapshot does not start with the REDIS magic string")]
    InvalidMagicString,
    #[error("snapshot ended unexpectedly at byte {0}")]
    UnexpectedEof(usize),
    #[error("invalid length encoding byte {0:#04x}")]
    InvalidLengthEncoding(u8),
    #[error("compressed strings are not supported")]
    UnsupportedEncoding,
    #[error("value type {0:#04x} is not supported")]
    UnsupportedValueType(u8),
    #[error("invalid expiration timestamp {0}")]
    InvalidExpiration(u64),
    #[error("snapshot contains invalid UTF-8")]
    InvalidUtf8,
}
