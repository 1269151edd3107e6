use crate::{
    commands::{CommandError, CommandResult},
    key_value_store::{DataType, KeyValueStore},
    resp::RespValue,
};

/// Represents the parsed arguments for GET command
pub struct GetArguments {
    /// The key name to retrieve from the store
    key: String,
}

impl GetArguments {
    pub fn parse(arguments: Vec<String>) -> Result<Self, CommandError> {
        let [key] = <[String; 1]>::try_from(arguments)
            .map_err(|_| CommandError::WrongNumberOfArguments("get".to_string()))?;

        Ok(Self { key })
    }
}

/// Handles the GET command.
///
/// Returns the string stored at the key as a bulk string, or a null bulk
/// string when the key does not exist or has expired. Expired keys are
/// removed from the store as a side effect.
///
/// # Errors
///
/// * `CommandError::WrongNumberOfArguments` - if not exactly one key is given
/// * `CommandError::WrongType` - if the key holds a stream
pub async fn get(
    store: &KeyValueStore,
    arguments: Vec<String>,
) -> Result<CommandResult, CommandError> {
    let get_arguments = GetArguments::parse(arguments)?;

    let response = match store.get(&get_arguments.key).await {
        None => RespValue::NullBulkString,
        Some(value) => match value.data {
            DataType::String(data) => RespValue::BulkString(data),
            DataType::Stream(_) => return Err(CommandError::WrongType),
        },
    };

    Ok(CommandResult::Response(response.encode()))
}
