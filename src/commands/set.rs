use std::time::Duration;

use crate::{
    commands::{CommandError, CommandResult, command_handler::write_result},
    key_value_store::KeyValueStore,
    resp::RespValue,
};

/// Represents the parsed arguments for SET command
pub struct SetArguments {
    /// The key name to store the value under
    key: String,
    /// The value to be stored under the given key
    value: String,
    /// Time to live of the key value pair
    ttl: Option<Duration>,
}

impl SetArguments {
    /// Parses command arguments into a SetArguments structure.
    ///
    /// Accepts `[key, value]` for permanent storage and
    /// `[key, value, PX|EX, amount]` for a key that expires after `amount`
    /// milliseconds (PX) or seconds (EX). The option name is case-insensitive.
    ///
    /// # Errors
    ///
    /// * `CommandError::WrongNumberOfArguments` - fewer than two arguments
    /// * `CommandError::SyntaxError` - an unknown option or a missing amount
    /// * `CommandError::InvalidExpireTime` - an amount that is not a positive integer
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let result = SetArguments::parse(vec![
    ///     "mykey".to_string(),
    ///     "hello".to_string(),
    ///     "PX".to_string(),
    ///     "1000".to_string()
    /// ]);
    /// // Returns: Ok(SetArguments { key: "mykey", value: "hello", ttl: Some(1s) })
    /// ```
    pub fn parse(arguments: Vec<String>) -> Result<Self, CommandError> {
        if arguments.len() < 2 {
            return Err(CommandError::WrongNumberOfArguments("set".to_string()));
        }

        let ttl = match &arguments[2..] {
            [] => None,
            [option, amount] => {
                let amount = amount
                    .parse::<u64>()
                    .ok()
                    .filter(|amount| *amount > 0)
                    .ok_or_else(|| CommandError::InvalidExpireTime("set".to_string()))?;

                match option.to_uppercase().as_str() {
                    "PX" => Some(Duration::from_millis(amount)),
                    "EX" => Some(Duration::from_secs(amount)),
                    _ => return Err(CommandError::SyntaxError),
                }
            }
            _ => return Err(CommandError::SyntaxError),
        };

        Ok(Self {
            key: arguments[0].clone(),
            value: arguments[1].clone(),
            ttl,
        })
    }
}

/// Handles the SET command.
///
/// Stores a string under the key, replacing any previous value of any type
/// and its expiry.
pub async fn set(
    store: &KeyValueStore,
    arguments: Vec<String>,
) -> Result<CommandResult, CommandError> {
    let set_arguments = SetArguments::parse(arguments.clone())?;

    store
        .set(set_arguments.key, set_arguments.value, set_arguments.ttl)
        .await;

    Ok(write_result(
        "SET",
        &arguments,
        RespValue::SimpleString("OK".to_string()).encode(),
    ))
}
