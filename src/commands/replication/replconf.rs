use crate::{
    commands::{CommandError, CommandResult},
    replication::ReplicationState,
    resp::RespValue,
};

#[derive(Debug, PartialEq)]
enum ReplconfConfiguration {
    ListeningPort,
    Capabilities,
    GetAck,
    Ack(i64),
}

pub struct ReplconfArguments {
    configuration: ReplconfConfiguration,
}

impl ReplconfArguments {
    pub fn parse(arguments: Vec<String>) -> Result<Self, CommandError> {
        if arguments.len() < 2 {
            return Err(CommandError::WrongNumberOfArguments("replconf".to_string()));
        }

        let configuration = match arguments[0].to_lowercase().as_str() {
            "listening-port" => {
                arguments[1]
                    .parse::<u16>()
                    .map_err(|_| CommandError::NotAnInteger)?;

                ReplconfConfiguration::ListeningPort
            }
            "capa" => ReplconfConfiguration::Capabilities,
            "getack" => ReplconfConfiguration::GetAck,
            "ack" => ReplconfConfiguration::Ack(
                arguments[1]
                    .parse::<i64>()
                    .map_err(|_| CommandError::NotAnInteger)?,
            ),
            option => return Err(CommandError::InvalidReplconfOption(option.to_string())),
        };

        Ok(Self { configuration })
    }
}

/// Handles the REPLCONF command.
///
/// `listening-port` and `capa` are handshake steps and are acknowledged with
/// OK. `GETACK` asks this server for its processed offset. `ACK` is a
/// replica reporting its offset to us and gets no reply.
pub async fn replconf(
    client_address: &str,
    replication: &ReplicationState,
    arguments: Vec<String>,
) -> Result<CommandResult, CommandError> {
    let replconf_arguments = ReplconfArguments::parse(arguments)?;

    match replconf_arguments.configuration {
        ReplconfConfiguration::ListeningPort | ReplconfConfiguration::Capabilities => Ok(
            CommandResult::Response(RespValue::SimpleString("OK".to_string()).encode()),
        ),
        ReplconfConfiguration::GetAck => Ok(CommandResult::Response(
            RespValue::command(&["REPLCONF", "ACK", &replication.offset().to_string()]).encode(),
        )),
        ReplconfConfiguration::Ack(offset) => {
            replication.record_ack(client_address, offset).await;
            Ok(CommandResult::NoResponse)
        }
    }
}
