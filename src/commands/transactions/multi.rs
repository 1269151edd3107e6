use crate::{
    commands::{CommandError, CommandResult},
    resp::RespValue,
    state::State,
};

pub struct MultiArguments;

impl MultiArguments {
    pub fn parse(arguments: Vec<String>) -> Result<Self, CommandError> {
        if !arguments.is_empty() {
            return Err(CommandError::WrongNumberOfArguments("multi".to_string()));
        }

        Ok(Self)
    }
}

/// Starts queueing commands for the client. Calling it again while already
/// queueing keeps the existing queue.
pub async fn multi(
    client_address: &str,
    state: &State,
    arguments: Vec<String>,
) -> Result<CommandResult, CommandError> {
    MultiArguments::parse(arguments)?;

    state.start_transaction(client_address).await;

    Ok(CommandResult::Response(
        RespValue::SimpleString("OK".to_string()).encode(),
    ))
}
