use crate::{
    commands::{CommandError, CommandResult},
    resp::RespValue,
    state::State,
};

pub struct DiscardArguments;

impl DiscardArguments {
    pub fn parse(arguments: Vec<String>) -> Result<Self, CommandError> {
        if !arguments.is_empty() {
            return Err(CommandError::WrongNumberOfArguments("discard".to_string()));
        }

        Ok(Self)
    }
}

pub async fn discard(
    client_address: &str,
    state: &State,
    arguments: Vec<String>,
) -> Result<CommandResult, CommandError> {
    DiscardArguments::parse(arguments)?;

    let Ok(_) = state.take_transaction(client_address).await else {
        return Err(CommandError::DiscardWithoutMulti);
    };

    Ok(CommandResult::Response(
        RespValue::SimpleString("OK".to_string()).encode(),
    ))
}
