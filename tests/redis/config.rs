use std::time::Duration;

use redis_lite::config::{CliError, MasterAddress, ServerConfig};

fn args(flags: &[&str]) -> Vec<String> {
    std::iter::once("redis-lite")
        .chain(flags.iter().copied())
        .map(String::from)
        .collect()
}

#[test]
fn test_server_config_without_flags() {
    let config = ServerConfig::from_args(args(&[])).unwrap();

    assert_eq!(config.port, 6379);
    assert_eq!(config.dir, "/tmp/redis-data");
    assert_eq!(config.dbfilename, "dump.rdb");
    assert_eq!(config.replica_of, None);
    assert_eq!(config.ack_interval, Some(Duration::from_secs(1)));
}

#[test]
fn test_server_config_with_flags() {
    let config = ServerConfig::from_args(args(&[
        "--port",
        "6677",
        "--dir",
        "/var/lib/redis",
        "--dbfilename",
        "fruits.rdb",
        "--replicaof",
        "localhost 6379",
    ]))
    .unwrap();

    assert_eq!(config.port, 6677);
    assert_eq!(config.dir, "/var/lib/redis");
    assert_eq!(config.dbfilename, "fruits.rdb");
    assert_eq!(
        config.replica_of,
        Some(MasterAddress {
            host: "localhost".to_string(),
            port: 6379,
        })
    );
}

#[test]
fn test_server_config_with_invalid_flags() {
    let test_cases = vec![
        (args(&["--port", "invalid"]), CliError::InvalidCommandLineFlagValue),
        (args(&["--port", "70000"]), CliError::InvalidCommandLineFlagValue),
        (args(&["--port", "0"]), CliError::InvalidCommandLineFlagValue),
        (args(&["invalid"]), CliError::InvalidCommandLineFlag),
        (args(&["--color", "blue"]), CliError::InvalidCommandLineFlag),
        (
            args(&["--replicaof", "localhost"]),
            CliError::InvalidReplicaOf("localhost".to_string()),
        ),
        (
            args(&["--replicaof", "localhost port"]),
            CliError::InvalidReplicaOf("localhost port".to_string()),
        ),
    ];

    for (args, expected_error) in test_cases {
        assert_eq!(
            ServerConfig::from_args(args.clone()),
            Err(expected_error),
            "parsing {:?}",
            args
        );
    }
}
