use thiserror::Error;

use crate::{resp::RespValue, state::StateError, streams::StreamError};

/// Errors a command can fail with. The display text is the RESP error line
/// sent back to the client.
#[derive(Error, Debug, PartialEq)]
pub enum CommandError {
    #[error("ERR Protocol error: expected an array of bulk strings")]
    InvalidCommandFrame,
    #[error("ERR unknown command '{0}'")]
    UnknownCommand(String),
    #[error("ERR unknown subcommand '{0}'")]
    UnknownSubcommand(String),
    #[error("ERR wrong number of arguments for '{0}' command")]
    WrongNumberOfArguments(String),
    #[error("ERR syntax error")]
    SyntaxError,
    #[error("ERR invalid expire time in '{0}' command")]
    InvalidExpireTime(String),
    #[error("ERR value is not an integer or out of range")]
    NotAnInteger,
    #[error("ERR timeout is not an integer or out of range")]
    InvalidTimeout,
    #[error("WRONGTYPE Operation against a key holding the wrong kind of value")]
    WrongType,
    #[error("{0}")]
    InvalidStreamId(#[from] StreamError),
    #[error(
        "ERR Unbalanced 'xread' list of streams: for each stream key an ID or '$' must be specified."
    )]
    UnbalancedXreadStreams,
    #[error("ERR invalid pattern: {0}")]
    InvalidGlobPattern(String),
    #[error("ERR EXEC without MULTI")]
    ExecWithoutMulti,
    #[error("ERR DISCARD without MULTI")]
    DiscardWithoutMulti,
    #[error("ERR Command not allowed inside a transaction")]
    CommandNotAllowedInTransaction,
    #[error("ERR transaction error: {0}")]
    TransactionError(#[from] StateError),
    #[error("ERR Unrecognized REPLCONF option: {0}")]
    InvalidReplconfOption(String),
    #[error("ERR PSYNC is only served by a master")]
    PsyncOnReplica,
    #[error("READONLY You can't write against a read only replica.")]
    ReadOnlyReplica,
}

impl CommandError {
    pub fn as_string(&self) -> String {
        RespValue::Error(self.to_string()).encode()
    }
}
