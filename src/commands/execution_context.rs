use std::sync::Arc;

use tracing::{debug, warn};

use crate::{
    commands::{CommandError, CommandHandler, CommandResult},
    context::ServerContext,
    resp::RespValue,
};

/// Client address used when applying commands received from the master.
const MASTER_LINK_ADDRESS: &str = "master";

/// Runs commands on behalf of a connected client: queues them while the
/// client is inside MULTI, rejects writes on a replica and propagates
/// successful writes on a master.
pub struct ClientExecutionContext {
    context: Arc<ServerContext>,
    client_address: String,
}

impl ClientExecutionContext {
    pub fn new(context: Arc<ServerContext>, client_address: String) -> Self {
        Self {
            context,
            client_address,
        }
    }

    pub async fn execute(&self, handler: CommandHandler) -> Result<CommandResult, CommandError> {
        let state = &self.context.state;

        if state.is_in_transaction(&self.client_address).await {
            match handler.name.as_str() {
                "MULTI" | "EXEC" | "DISCARD" => {}
                "PSYNC" => return Err(CommandError::CommandNotAllowedInTransaction),
                _ => {
                    state
                        .add_to_transaction(&self.client_address, handler)
                        .await?;

                    return Ok(CommandResult::Response(
                        RespValue::SimpleString("QUEUED".to_string()).encode(),
                    ));
                }
            }
        }

        match self.execute_single(&handler).await? {
            CommandResult::Batch(commands) => {
                Ok(CommandResult::Response(self.run_batch(commands).await))
            }
            result => Ok(result),
        }
    }

    /// Runs the commands queued by MULTI in order and joins their replies into
    /// one array. A failing command shows up as an error element.
    async fn run_batch(&self, commands: Vec<CommandHandler>) -> String {
        let mut replies = Vec::with_capacity(commands.len());

        for command in commands {
            let reply = match self.execute_single(&command).await {
                Ok(result) => result
                    .into_reply()
                    .unwrap_or_else(|| RespValue::NullBulkString.encode()),
                Err(e) => e.as_string(),
            };

            replies.push(reply);
        }

        RespValue::encode_array_of_encoded(&replies)
    }

    async fn execute_single(&self, handler: &CommandHandler) -> Result<CommandResult, CommandError> {
        if !handler.is_write_command() {
            return handler.apply(&self.context, &self.client_address).await;
        }

        let replication = &self.context.replication;

        if !replication.is_master() {
            return Err(CommandError::ReadOnlyReplica);
        }

        let _write_order = replication.write_order().await;

        match handler.apply(&self.context, &self.client_address).await? {
            CommandResult::Write {
                response,
                propagate,
            } => {
                replication.propagate(&propagate).await;
                Ok(CommandResult::Response(response))
            }
            result => Ok(result),
        }
    }
}

/// Applies the command stream a replica receives from its master.
///
/// Every frame advances the replication offset by its wire length before it
/// is applied. Only writes touch the store and only `REPLCONF GETACK` produces
/// a reply; failures are logged and never sent back.
pub struct ReplicationExecutionContext {
    context: Arc<ServerContext>,
}

impl ReplicationExecutionContext {
    pub fn new(context: Arc<ServerContext>) -> Self {
        Self { context }
    }

    pub async fn execute(&self, frame: RespValue, consumed: usize) -> Option<String> {
        self.context.replication.add_to_offset(consumed);

        let handler = match CommandHandler::new(frame) {
            Ok(handler) => handler,
            Err(e) => {
                warn!(error = %e, "dropping malformed frame from master");
                return None;
            }
        };

        if !handler.is_getack() && !handler.is_write_command() {
            debug!(command = %handler.name, "ignoring command from master");
            return None;
        }

        match handler.apply(&self.context, MASTER_LINK_ADDRESS).await {
            Ok(result) if handler.is_getack() => result.into_reply(),
            Ok(_) => None,
            Err(e) => {
                warn!(command = %handler.name, error = %e, "failed to apply command from master");
                None
            }
        }
    }
}
