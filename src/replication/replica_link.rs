//! Replica side of a replication link: handshake, snapshot install and the
//! loop applying the master's command stream.

use std::{sync::Arc, time::Duration};

use tokio::{
    io::AsyncWriteExt,
    net::{
        TcpStream,
        tcp::{OwnedReadHalf, OwnedWriteHalf},
    },
    sync::Mutex,
    task::JoinHandle,
};
use tracing::{debug, info, warn};

use crate::{
    commands::ReplicationExecutionContext,
    config::MasterAddress,
    context::ServerContext,
    input::{CommandReadError, RespReader},
    rdb::RdbParser,
    replication::{ReplicationError, perform_handshake},
    resp::RespValue,
};

/// Connects to the master, synchronises and applies its command stream until
/// the master closes the connection. Failures end the link without retrying;
/// the server keeps serving clients from the data it already holds.
pub async fn run_replication_link(
    context: Arc<ServerContext>,
    master: MasterAddress,
    listening_port: u16,
) -> Result<(), ReplicationError> {
    let stream = TcpStream::connect((master.host.as_str(), master.port)).await?;
    let (reader, mut writer) = stream.into_split();
    let mut reader = RespReader::new(reader);

    let full_resync = perform_handshake(&mut reader, &mut writer, listening_port).await?;
    info!(
        master = %format!("{}:{}", master.host, master.port),
        replication_id = %full_resync.replication_id,
        "handshake with master completed"
    );

    let payload = reader.read_rdb_payload().await?;
    let snapshot = RdbParser::new(&payload).parse()?;
    info!(keys = snapshot.entries.len(), "installing snapshot from master");

    context.store.extend(snapshot.entries).await;
    context
        .replication
        .set_replication_id(full_resync.replication_id);
    context.replication.set_offset(0);

    let writer = Arc::new(Mutex::new(writer));
    let ack_task = context
        .config
        .ack_interval
        .map(|interval| spawn_periodic_ack(Arc::clone(&context), Arc::clone(&writer), interval));

    let result = apply_command_stream(&context, &mut reader, &writer).await;

    if let Some(ack_task) = ack_task {
        ack_task.abort();
    }

    result
}

async fn apply_command_stream(
    context: &Arc<ServerContext>,
    reader: &mut RespReader<OwnedReadHalf>,
    writer: &Mutex<OwnedWriteHalf>,
) -> Result<(), ReplicationError> {
    let execution_context = ReplicationExecutionContext::new(Arc::clone(context));

    loop {
        let (frame, consumed) = match reader.read_value().await {
            Ok(read) => read,
            Err(CommandReadError::ConnectionClosed) => {
                info!("master closed the replication link");
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        if let Some(reply) = execution_context.execute(frame, consumed).await {
            let mut writer = writer.lock().await;
            writer.write_all(reply.as_bytes()).await?;
            debug!(offset = context.replication.offset(), "answered GETACK");
        }
    }
}

fn spawn_periodic_ack(
    context: Arc<ServerContext>,
    writer: Arc<Mutex<OwnedWriteHalf>>,
    interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.tick().await;

        loop {
            ticker.tick().await;

            let offset = context.replication.offset().to_string();
            let ack = RespValue::command(&["REPLCONF", "ACK", &offset]).encode();

            if let Err(e) = writer.lock().await.write_all(ack.as_bytes()).await {
                warn!(error = %e, "failed to send ACK to master");
                break;
            }
        }
    })
}
