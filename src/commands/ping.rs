use crate::{
    commands::{CommandError, CommandResult},
    resp::RespValue,
};

pub fn ping(arguments: Vec<String>) -> Result<CommandResult, CommandError> {
    match arguments.as_slice() {
        [] => Ok(CommandResult::Response(
            RespValue::SimpleString("PONG".to_string()).encode(),
        )),
        [message] => Ok(CommandResult::Response(
            RespValue::BulkString(message.clone()).encode(),
        )),
        _ => Err(CommandError::WrongNumberOfArguments("ping".to_string())),
    }
}
