use std::time::Duration;

use crate::{
    commands::{CommandError, CommandResult},
    replication::ReplicationState,
    resp::RespValue,
};

pub struct WaitArguments {
    number_of_replicas: usize,
    timeout: Duration,
}

impl WaitArguments {
    pub fn parse(arguments: Vec<String>) -> Result<Self, CommandError> {
        if arguments.len() != 2 {
            return Err(CommandError::WrongNumberOfArguments("wait".to_string()));
        }

        let number_of_replicas = arguments[0]
            .parse::<usize>()
            .map_err(|_| CommandError::NotAnInteger)?;

        let timeout = arguments[1]
            .parse::<u64>()
            .map_err(|_| CommandError::InvalidTimeout)?;

        Ok(Self {
            number_of_replicas,
            timeout: Duration::from_millis(timeout),
        })
    }
}

/// Replies with how many replicas have acknowledged every write propagated
/// before this call, waiting up to the timeout for `numreplicas` of them.
/// A replica has no replicas of its own and always answers 0.
pub async fn wait(
    replication: &ReplicationState,
    arguments: Vec<String>,
) -> Result<CommandResult, CommandError> {
    let wait_arguments = WaitArguments::parse(arguments)?;

    if !replication.is_master() {
        return Ok(CommandResult::Response(RespValue::Integer(0).encode()));
    }

    let acknowledged = replication
        .wait_for_replicas(wait_arguments.number_of_replicas, wait_arguments.timeout)
        .await;

    Ok(CommandResult::Response(
        RespValue::Integer(acknowledged as i64).encode(),
    ))
}
