//! Buffered reading of RESP frames from network streams.
//!
//! A connection can deliver several frames in one read, or one frame across
//! several reads. [`RespReader`] keeps whatever has not been consumed yet in a
//! `BytesMut` buffer, so pipelined commands, the replication handshake replies,
//! the snapshot payload and the replicated command stream can all be read from
//! the same socket without losing bytes.

use bytes::{Buf, Bytes, BytesMut};
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::commands::CommandError;
use crate::resp::{RespError, RespValue};

/// Errors that can occur while reading and parsing commands from network streams.
#[derive(Error, Debug, PartialEq)]
pub enum CommandReadError {
    #[error("I/O error: {0}")]
    IoError(String),
    #[error("Connection closed")]
    ConnectionClosed,
    #[error("RESP parse error: {0}")]
    RespParseError(#[from] RespError),
    #[error("Command construction error: {0}")]
    CommandError(#[from] CommandError),
    #[error("Invalid response from master")]
    InvalidResponseFromMaster,
}

impl CommandReadError {
    pub fn as_string(&self) -> String {
        match self {
            CommandReadError::IoError(msg) => RespValue::Error(format!("ERR {}", msg)).encode(),
            CommandReadError::ConnectionClosed => {
                RespValue::Error("ERR connection closed".to_string()).encode()
            }
            CommandReadError::RespParseError(err) => err.as_string(),
            CommandReadError::CommandError(err) => err.as_string(),
            CommandReadError::InvalidResponseFromMaster => {
                RespValue::Error("ERR invalid response from master".to_string()).encode()
            }
        }
    }
}

impl From<std::io::Error> for CommandReadError {
    fn from(err: std::io::Error) -> Self {
        CommandReadError::IoError(err.to_string())
    }
}

pub struct RespReader<R> {
    reader: R,
    buffer: BytesMut,
}

impl<R> RespReader<R>
where
    R: AsyncRead + Unpin,
{
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buffer: BytesMut::with_capacity(4096),
        }
    }

    /// Reads the next complete RESP value together with its size on the wire.
    pub async fn read_value(&mut self) -> Result<(RespValue, usize), CommandReadError> {
        loop {
            if let Some((value, consumed)) = RespValue::decode(&self.buffer)? {
                self.buffer.advance(consumed);
                return Ok((value, consumed));
            }

            self.fill_buffer().await?;
        }
    }

    /// Reads a single CRLF terminated line and returns it without the terminator.
    pub async fn read_line(&mut self) -> Result<String, CommandReadError> {
        loop {
            if let Some(position) = self.buffer.windows(2).position(|window| window == b"\r\n") {
                let line = self.buffer.split_to(position + 2);
                let line = std::str::from_utf8(&line[..position])
                    .map_err(|_| CommandReadError::RespParseError(RespError::InvalidUtf8))?;

                return Ok(line.to_string());
            }

            self.fill_buffer().await?;
        }
    }

    /// Reads a snapshot transfer: `$<len>\r\n` followed by `len` raw bytes with
    /// no trailing CRLF.
    pub async fn read_rdb_payload(&mut self) -> Result<Bytes, CommandReadError> {
        let header = self.read_line().await?;

        let Some(length) = header.strip_prefix('$') else {
            return Err(CommandReadError::InvalidResponseFromMaster);
        };

        let length = length
            .parse::<usize>()
            .map_err(|_| CommandReadError::InvalidResponseFromMaster)?;

        while self.buffer.len() < length {
            self.fill_buffer().await?;
        }

        Ok(self.buffer.split_to(length).freeze())
    }

    async fn fill_buffer(&mut self) -> Result<(), CommandReadError> {
        let number_of_bytes = self.reader.read_buf(&mut self.buffer).await?;

        if number_of_bytes == 0 {
            if self.buffer.is_empty() {
                return Err(CommandReadError::ConnectionClosed);
            }

            return Err(CommandReadError::RespParseError(RespError::UnexpectedEof));
        }

        Ok(())
    }
}
