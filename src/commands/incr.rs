use crate::{
    commands::{CommandError, CommandResult, command_handler::write_result},
    key_value_store::{DataType, KeyValueStore, Value, live_value_mut},
    resp::RespValue,
};

pub struct IncrArguments {
    key: String,
}

impl IncrArguments {
    pub fn parse(arguments: Vec<String>) -> Result<Self, CommandError> {
        let [key] = <[String; 1]>::try_from(arguments)
            .map_err(|_| CommandError::WrongNumberOfArguments("incr".to_string()))?;

        Ok(Self { key })
    }
}

/// Increments the integer stored at the key, creating it with value 1 when
/// missing. The key keeps its expiry.
pub async fn incr(
    store: &KeyValueStore,
    arguments: Vec<String>,
) -> Result<CommandResult, CommandError> {
    let incr_arguments = IncrArguments::parse(arguments.clone())?;

    let mut entries = store.write().await;

    let Some(value) = live_value_mut(&mut entries, &incr_arguments.key) else {
        entries.insert(
            incr_arguments.key,
            Value::new(DataType::String("1".to_string())),
        );

        return Ok(write_result(
            "INCR",
            &arguments,
            RespValue::Integer(1).encode(),
        ));
    };

    let DataType::String(ref mut stored_data) = value.data else {
        return Err(CommandError::WrongType);
    };

    let incremented = stored_data
        .parse::<i64>()
        .ok()
        .and_then(|int| int.checked_add(1))
        .ok_or(CommandError::NotAnInteger)?;
    *stored_data = incremented.to_string();

    Ok(write_result(
        "INCR",
        &arguments,
        RespValue::Integer(incremented).encode(),
    ))
}
