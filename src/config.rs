use std::time::Duration;

use clap::{Parser, error::ErrorKind};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum CliError {
    #[error("Invalid command line flag")]
    InvalidCommandLineFlag,
    #[error("Invalid command line flag value")]
    InvalidCommandLineFlagValue,
    #[error("Invalid --replicaof value '{0}', expected \"<host> <port>\"")]
    InvalidReplicaOf(String),
    #[error("{0}")]
    Usage(String),
}

#[derive(Parser, Debug)]
#[command(name = "redis-lite", about = "In-memory key-value and stream server")]
struct Cli {
    /// Port to listen on
    #[arg(long, default_value_t = 6379, value_parser = clap::value_parser!(u16).range(1..))]
    port: u16,

    /// Directory holding the snapshot file
    #[arg(long, default_value = "/tmp/redis-data")]
    dir: String,

    /// Snapshot file name
    #[arg(long, default_value = "dump.rdb")]
    dbfilename: String,

    /// Run as a replica of "<host> <port>"
    #[arg(long)]
    replicaof: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MasterAddress {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub port: u16,
    pub dir: String,
    pub dbfilename: String,
    pub replica_of: Option<MasterAddress>,
    /// How often a replica reports its offset without being asked. `None` only
    /// answers GETACK.
    pub ack_interval: Option<Duration>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 6379,
            dir: "/tmp/redis-data".to_string(),
            dbfilename: "dump.rdb".to_string(),
            replica_of: None,
            ack_interval: Some(Duration::from_secs(1)),
        }
    }
}

impl ServerConfig {
    /// Builds the configuration from process arguments, including the program name.
    pub fn from_args<I: IntoIterator<Item = String>>(command_line_args: I) -> Result<Self, CliError> {
        let cli = Cli::try_parse_from(command_line_args).map_err(|e| match e.kind() {
            ErrorKind::UnknownArgument => CliError::InvalidCommandLineFlag,
            ErrorKind::InvalidValue | ErrorKind::ValueValidation | ErrorKind::NoEquals => {
                CliError::InvalidCommandLineFlagValue
            }
            _ => CliError::Usage(e.to_string()),
        })?;

        let replica_of = cli
            .replicaof
            .as_deref()
            .map(parse_master_address)
            .transpose()?;

        Ok(Self {
            port: cli.port,
            dir: cli.dir,
            dbfilename: cli.dbfilename,
            replica_of,
            ..Self::default()
        })
    }
}

fn parse_master_address(value: &str) -> Result<MasterAddress, CliError> {
    let mut parts = value.split_whitespace();

    let (Some(host), Some(port), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(CliError::InvalidReplicaOf(value.to_string()));
    };

    let port = port
        .parse::<u16>()
        .map_err(|_| CliError::InvalidReplicaOf(value.to_string()))?;

    Ok(MasterAddress {
        host: host.to_string(),
        port,
    })
}
