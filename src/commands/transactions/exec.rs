use crate::{
    commands::{CommandError, CommandResult},
    resp::RespValue,
    state::State,
};

pub struct ExecArguments;

impl ExecArguments {
    pub fn parse(arguments: Vec<String>) -> Result<Self, CommandError> {
        if !arguments.is_empty() {
            return Err(CommandError::WrongNumberOfArguments("exec".to_string()));
        }

        Ok(Self)
    }
}

/// Ends the client's transaction. The queued commands are handed back as a
/// batch for the execution context to run in order.
pub async fn exec(
    client_address: &str,
    state: &State,
    arguments: Vec<String>,
) -> Result<CommandResult, CommandError> {
    ExecArguments::parse(arguments)?;

    let Ok(transaction) = state.take_transaction(client_address).await else {
        return Err(CommandError::ExecWithoutMulti);
    };

    if transaction.is_empty() {
        Ok(CommandResult::Response(
            RespValue::Array(Vec::new()).encode(),
        ))
    } else {
        Ok(CommandResult::Batch(transaction))
    }
}
