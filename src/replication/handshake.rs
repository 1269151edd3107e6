//! Replica side of the replication handshake.

use regex::Regex;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tracing::debug;

use crate::{input::RespReader, replication::ReplicationError, resp::RespValue};

#[derive(Debug, PartialEq)]
pub struct FullResync {
    pub replication_id: String,
    pub offset: i64,
}

/// Runs PING, REPLCONF listening-port, REPLCONF capa and PSYNC in order, each
/// waiting for the master's one line reply. The snapshot that follows
/// FULLRESYNC is left unread in `reader`.
pub async fn perform_handshake<R, W>(
    reader: &mut RespReader<R>,
    writer: &mut W,
    listening_port: u16,
) -> Result<FullResync, ReplicationError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let reply = send_and_read_line(reader, writer, &["PING"]).await?;
    expect_simple_string("PING", &reply)?;

    let port = listening_port.to_string();
    let reply = send_and_read_line(reader, writer, &["REPLCONF", "listening-port", &port]).await?;
    expect_ok("REPLCONF listening-port", &reply)?;

    let reply = send_and_read_line(reader, writer, &["REPLCONF", "capa", "psync2"]).await?;
    expect_ok("REPLCONF capa", &reply)?;

    let reply = send_and_read_line(reader, writer, &["PSYNC", "?", "-1"]).await?;

    parse_fullresync(&reply)
}

async fn send_and_read_line<R, W>(
    reader: &mut RespReader<R>,
    writer: &mut W,
    command: &[&str],
) -> Result<String, ReplicationError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    writer
        .write_all(RespValue::command(command).encode().as_bytes())
        .await?;
    writer.flush().await?;

    let reply = reader.read_line().await?;
    debug!(command = ?command, reply = %reply, "handshake step");

    Ok(reply)
}

fn expect_simple_string(step: &'static str, reply: &str) -> Result<(), ReplicationError> {
    if reply.starts_with('+') {
        return Ok(());
    }

    Err(ReplicationError::UnexpectedReply {
        step,
        reply: reply.to_string(),
    })
}

fn expect_ok(step: &'static str, reply: &str) -> Result<(), ReplicationError> {
    if reply == "+OK" {
        return Ok(());
    }

    Err(ReplicationError::UnexpectedReply {
        step,
        reply: reply.to_string(),
    })
}

fn parse_fullresync(reply: &str) -> Result<FullResync, ReplicationError> {
    let unexpected = || ReplicationError::UnexpectedReply {
        step: "PSYNC",
        reply: reply.to_string(),
    };

    let parts: Vec<&str> = reply.split_whitespace().collect();

    let ["+FULLRESYNC", replication_id, offset] = parts.as_slice() else {
        return Err(unexpected());
    };

    if !is_valid_repl_id(replication_id) {
        return Err(ReplicationError::InvalidReplicationId(
            replication_id.to_string(),
        ));
    }

    let offset = offset.parse::<i64>().map_err(|_| unexpected())?;

    Ok(FullResync {
        replication_id: replication_id.to_string(),
        offset,
    })
}

fn is_valid_repl_id(repl_id: &str) -> bool {
    Regex::new(r"^[a-zA-Z0-9]{40}$")
        .map(|re| re.is_match(repl_id))
        .unwrap_or(false)
}
