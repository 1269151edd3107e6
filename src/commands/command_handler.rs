use crate::{
    commands::{
        command_error::CommandError,
        config_get::config_get,
        echo::echo,
        get::get,
        incr::incr,
        info::info,
        keys::keys,
        ping::ping,
        replication::{psync, replconf, wait},
        set::set,
        transactions::{discard, exec, multi},
        type_command::type_command,
        xadd::xadd,
        xrange::xrange,
        xread::xread,
    },
    context::ServerContext,
    resp::RespValue,
};

/// Commands that change the keyspace and are propagated to replicas.
const WRITE_COMMANDS: [&str; 3] = ["SET", "INCR", "XADD"];

#[derive(Debug, PartialEq)]
pub enum CommandResult {
    NoResponse,
    Response(String),
    /// A successful write: the reply for the client and the command as it
    /// must be replayed on replicas.
    Write {
        response: String,
        propagate: RespValue,
    },
    /// Commands queued by MULTI, handed back by EXEC.
    Batch(Vec<CommandHandler>),
    /// FULLRESYNC reply; the connection continues with the snapshot transfer.
    Sync(String),
}

impl CommandResult {
    /// The bytes to send back to whoever issued the command, if any.
    pub fn into_reply(self) -> Option<String> {
        match self {
            CommandResult::Response(response)
            | CommandResult::Write { response, .. }
            | CommandResult::Sync(response) => Some(response),
            CommandResult::NoResponse | CommandResult::Batch(_) => None,
        }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct CommandHandler {
    pub name: String,
    pub arguments: Vec<String>,
    pub input: RespValue,
}

impl CommandHandler {
    pub fn new(input: RespValue) -> Result<Self, CommandError> {
        let RespValue::Array(elements) = &input else {
            return Err(CommandError::InvalidCommandFrame);
        };

        let mut parts = Vec::with_capacity(elements.len());

        for element in elements {
            match element {
                RespValue::BulkString(s) => parts.push(s.clone()),
                _ => return Err(CommandError::InvalidCommandFrame),
            }
        }

        if parts.is_empty() {
            return Err(CommandError::InvalidCommandFrame);
        }

        let mut name = parts.remove(0).to_uppercase();

        if name == "CONFIG" && parts.first().is_some_and(|sub| sub.eq_ignore_ascii_case("GET")) {
            parts.remove(0);
            name = "CONFIG GET".to_string();
        }

        Ok(Self {
            name,
            arguments: parts,
            input,
        })
    }

    pub fn is_write_command(&self) -> bool {
        WRITE_COMMANDS.contains(&self.name.as_str())
    }

    pub fn is_getack(&self) -> bool {
        self.name == "REPLCONF"
            && self
                .arguments
                .first()
                .is_some_and(|option| option.eq_ignore_ascii_case("GETACK"))
    }

    /// Runs the command against the server state. Queueing, propagation and
    /// reply suppression are left to the execution context that calls this.
    pub async fn apply(
        &self,
        context: &ServerContext,
        client_address: &str,
    ) -> Result<CommandResult, CommandError> {
        let arguments = self.arguments.clone();

        match self.name.as_str() {
            "PING" => ping(arguments),
            "ECHO" => echo(arguments),
            "GET" => get(&context.store, arguments).await,
            "SET" => set(&context.store, arguments).await,
            "INCR" => incr(&context.store, arguments).await,
            "KEYS" => keys(&context.store, arguments).await,
            "TYPE" => type_command(&context.store, arguments).await,
            "CONFIG GET" => config_get(&context.config, arguments),
            "CONFIG" => match arguments.first() {
                Some(subcommand) => Err(CommandError::UnknownSubcommand(subcommand.clone())),
                None => Err(CommandError::WrongNumberOfArguments("config".to_string())),
            },
            "INFO" => info(&context.replication, arguments).await,
            "XADD" => xadd(&context.store, &context.stream_waiters, arguments).await,
            "XRANGE" => xrange(&context.store, arguments).await,
            "XREAD" => xread(&context.store, &context.stream_waiters, arguments).await,
            "MULTI" => multi(client_address, &context.state, arguments).await,
            "EXEC" => exec(client_address, &context.state, arguments).await,
            "DISCARD" => discard(client_address, &context.state, arguments).await,
            "REPLCONF" => replconf(client_address, &context.replication, arguments).await,
            "PSYNC" => psync(&context.replication, arguments),
            "WAIT" => wait(&context.replication, arguments).await,
            _ => Err(CommandError::UnknownCommand(self.original_name())),
        }
    }

    fn original_name(&self) -> String {
        match &self.input {
            RespValue::Array(elements) => match elements.first() {
                Some(RespValue::BulkString(name)) => name.clone(),
                _ => self.name.clone(),
            },
            _ => self.name.clone(),
        }
    }
}

/// The reply and propagated form of a write whose arguments replay unchanged.
pub fn write_result(name: &str, arguments: &[String], response: String) -> CommandResult {
    let mut parts = Vec::with_capacity(arguments.len() + 1);
    parts.push(name.to_string());
    parts.extend_from_slice(arguments);

    CommandResult::Write {
        response,
        propagate: RespValue::command(&parts),
    }
}
