use globset::GlobBuilder;

use crate::{
    commands::{CommandError, CommandResult},
    key_value_store::KeyValueStore,
    resp::RespValue,
};

pub struct KeysArguments {
    pub pattern: String,
}

impl KeysArguments {
    pub fn parse(arguments: Vec<String>) -> Result<Self, CommandError> {
        let [pattern] = <[String; 1]>::try_from(arguments)
            .map_err(|_| CommandError::WrongNumberOfArguments("keys".to_string()))?;

        Ok(KeysArguments { pattern })
    }
}

pub async fn keys(
    store: &KeyValueStore,
    arguments: Vec<String>,
) -> Result<CommandResult, CommandError> {
    let keys_arguments = KeysArguments::parse(arguments)?;

    // Keys are not paths, so `*` must also match `/`.
    let glob = GlobBuilder::new(&keys_arguments.pattern)
        .literal_separator(false)
        .backslash_escape(true)
        .build()
        .map_err(|e| CommandError::InvalidGlobPattern(e.to_string()))?
        .compile_matcher();

    let mut matching_keys: Vec<String> = store
        .keys()
        .await
        .into_iter()
        .filter(|key| glob.is_match(key))
        .collect();
    matching_keys.sort();

    Ok(CommandResult::Response(
        RespValue::Array(matching_keys.into_iter().map(RespValue::BulkString).collect()).encode(),
    ))
}
