use crate::{
    commands::{CommandError, CommandResult},
    replication::ReplicationState,
    resp::RespValue,
};

pub struct PsyncArguments {
    offset: i64,
}

impl PsyncArguments {
    /// `replication-id offset`. Only full resynchronization is served, so the
    /// id is not checked against ours.
    pub fn parse(arguments: Vec<String>) -> Result<Self, CommandError> {
        if arguments.len() != 2 {
            return Err(CommandError::WrongNumberOfArguments("psync".to_string()));
        }

        let offset = arguments[1]
            .parse::<i64>()
            .map_err(|_| CommandError::NotAnInteger)?;

        Ok(Self { offset })
    }
}

/// Answers a replica's PSYNC with `+FULLRESYNC <replid> <offset>`. The
/// connection handler follows up with the snapshot and then turns the
/// connection into a replication stream.
pub fn psync(
    replication: &ReplicationState,
    arguments: Vec<String>,
) -> Result<CommandResult, CommandError> {
    let psync_arguments = PsyncArguments::parse(arguments)?;

    if !replication.is_master() {
        return Err(CommandError::PsyncOnReplica);
    }

    tracing::debug!(
        requested_offset = psync_arguments.offset,
        "replica requested synchronization"
    );

    Ok(CommandResult::Sync(
        RespValue::SimpleString(format!(
            "FULLRESYNC {} {}",
            replication.replication_id(),
            replication.offset()
        ))
        .encode(),
    ))
}
