use std::sync::Arc;

use tokio::{
    io::AsyncWriteExt,
    net::{
        TcpStream,
        tcp::{OwnedReadHalf, OwnedWriteHalf},
    },
};
use tracing::{debug, info, warn};

use crate::{
    commands::{ClientExecutionContext, CommandHandler, CommandResult},
    context::ServerContext,
    input::{CommandReadError, RespReader},
    rdb::EMPTY_RDB,
    replication::spawn_replica_writer,
};

/// Serves one client until it disconnects. A PSYNC hands the connection over
/// to the replica loop once the snapshot has been sent.
pub async fn handle_client_connection(
    stream: TcpStream,
    context: Arc<ServerContext>,
    client_address: String,
) {
    let (reader, mut writer) = stream.into_split();
    let mut reader = RespReader::new(reader);
    let execution_context =
        ClientExecutionContext::new(Arc::clone(&context), client_address.clone());

    loop {
        let frame = match reader.read_value().await {
            Ok((frame, _)) => frame,
            Err(CommandReadError::ConnectionClosed) => break,
            Err(e) => {
                warn!(client = %client_address, error = %e, "closing connection after read error");
                let _ = writer.write_all(e.as_string().as_bytes()).await;
                break;
            }
        };

        let handler = match CommandHandler::new(frame) {
            Ok(handler) => handler,
            Err(e) => {
                warn!(client = %client_address, error = %e, "closing connection after malformed command");
                let _ = writer.write_all(e.as_string().as_bytes()).await;
                break;
            }
        };

        debug!(client = %client_address, command = %handler.name, "received command");

        let reply = match execution_context.execute(handler).await {
            Ok(CommandResult::Sync(response)) => {
                if let Err(e) = send_snapshot(&mut writer, &response).await {
                    warn!(client = %client_address, error = %e, "failed to send snapshot");
                    break;
                }

                serve_replica(&context, &client_address, reader, writer).await;
                context.state.remove_client(&client_address).await;
                return;
            }
            Ok(result) => result.into_reply(),
            Err(e) => Some(e.as_string()),
        };

        if let Some(reply) = reply {
            if let Err(e) = writer.write_all(reply.as_bytes()).await {
                warn!(client = %client_address, error = %e, "failed to write reply");
                break;
            }
        }
    }

    context.state.remove_client(&client_address).await;
    debug!(client = %client_address, "client disconnected");
}

async fn send_snapshot(writer: &mut OwnedWriteHalf, fullresync: &str) -> std::io::Result<()> {
    writer.write_all(fullresync.as_bytes()).await?;
    writer
        .write_all(format!("${}\r\n", EMPTY_RDB.len()).as_bytes())
        .await?;
    writer.write_all(EMPTY_RDB).await?;
    writer.flush().await
}

/// Registers the connection as a replica and reads its `REPLCONF ACK`
/// traffic until it disconnects. Propagated commands reach it through the
/// writer task, never from this loop.
async fn serve_replica(
    context: &Arc<ServerContext>,
    replica_address: &str,
    mut reader: RespReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
) {
    let replication = &context.replication;
    let outbound = spawn_replica_writer(replica_address.to_string(), writer);

    replication.register_replica(replica_address, outbound).await;
    info!(replica = %replica_address, "replica connected");

    loop {
        let frame = match reader.read_value().await {
            Ok((frame, _)) => frame,
            Err(CommandReadError::ConnectionClosed) => break,
            Err(e) => {
                warn!(replica = %replica_address, error = %e, "failed to read from replica");
                break;
            }
        };

        let handler = match CommandHandler::new(frame) {
            Ok(handler) if handler.name == "REPLCONF" => handler,
            Ok(handler) => {
                debug!(replica = %replica_address, command = %handler.name, "ignoring command from replica");
                continue;
            }
            Err(e) => {
                warn!(replica = %replica_address, error = %e, "ignoring malformed frame from replica");
                continue;
            }
        };

        if let Err(e) = handler.apply(context, replica_address).await {
            warn!(replica = %replica_address, error = %e, "failed to process replica message");
        }
    }

    replication.remove_replica(replica_address).await;
    info!(replica = %replica_address, "replica disconnected");
}
