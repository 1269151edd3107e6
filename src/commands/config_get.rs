use crate::{
    commands::{CommandError, CommandResult},
    config::ServerConfig,
    resp::RespValue,
};

pub struct ConfigGetArguments {
    parameters: Vec<String>,
}

impl ConfigGetArguments {
    pub fn parse(arguments: Vec<String>) -> Result<Self, CommandError> {
        if arguments.is_empty() {
            return Err(CommandError::WrongNumberOfArguments(
                "config|get".to_string(),
            ));
        }

        Ok(Self {
            parameters: arguments,
        })
    }
}

/// Replies with a flat `[name, value, ...]` array for every known parameter
/// asked for. Unknown parameters are left out.
pub fn config_get(
    config: &ServerConfig,
    arguments: Vec<String>,
) -> Result<CommandResult, CommandError> {
    let config_get_arguments = ConfigGetArguments::parse(arguments)?;
    let mut response = Vec::new();

    for parameter in config_get_arguments.parameters {
        let parameter = parameter.to_lowercase();

        let value = match parameter.as_str() {
            "dir" => config.dir.clone(),
            "dbfilename" => config.dbfilename.clone(),
            "port" => config.port.to_string(),
            _ => continue,
        };

        response.push(RespValue::BulkString(parameter));
        response.push(RespValue::BulkString(value));
    }

    Ok(CommandResult::Response(RespValue::Array(response).encode()))
}
