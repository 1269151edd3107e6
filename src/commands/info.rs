use crate::{
    commands::{CommandError, CommandResult},
    replication::ReplicationState,
    resp::RespValue,
};

enum InfoSection {
    Default,
    Replication,
    Other,
}

pub struct InfoArguments {
    section: InfoSection,
}

impl InfoArguments {
    pub fn parse(arguments: Vec<String>) -> Result<Self, CommandError> {
        if arguments.len() > 1 {
            return Err(CommandError::SyntaxError);
        }

        let section = match arguments.first().map(|s| s.to_lowercase()).as_deref() {
            None | Some("default") | Some("all") | Some("everything") => InfoSection::Default,
            Some("replication") => InfoSection::Replication,
            Some(_) => InfoSection::Other,
        };

        Ok(InfoArguments { section })
    }
}

/// Only the replication section exists; any other section is empty.
pub async fn info(
    replication: &ReplicationState,
    arguments: Vec<String>,
) -> Result<CommandResult, CommandError> {
    let info_arguments = InfoArguments::parse(arguments)?;

    if let InfoSection::Other = info_arguments.section {
        return Ok(CommandResult::Response(
            RespValue::BulkString(String::new()).encode(),
        ));
    }

    let lines = [
        "# Replication".to_string(),
        format!("role:{}", replication.role().as_str()),
        format!("connected_slaves:{}", replication.replica_count().await),
        format!("master_replid:{}", replication.replication_id()),
        format!("master_repl_offset:{}", replication.offset()),
    ];

    Ok(CommandResult::Response(
        RespValue::BulkString(lines.join("\r\n")).encode(),
    ))
}
