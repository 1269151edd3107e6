use redis_lite::{config::ServerConfig, resp::RespValue};

use crate::test_utils::{TestClient, TestUtils};

#[tokio::test]
async fn test_server_replies_over_tcp() {
    let (address, _) = TestUtils::start_server(ServerConfig::default()).await;
    let mut client = TestClient::connect(address).await;

    let test_cases = vec![
        (
            TestUtils::ping_command(),
            RespValue::SimpleString("PONG".to_string()),
        ),
        (
            TestUtils::set_command("grape", "mango"),
            RespValue::SimpleString("OK".to_string()),
        ),
        (
            TestUtils::get_command("grape"),
            RespValue::BulkString("mango".to_string()),
        ),
        (
            TestUtils::command(&["FLY"]),
            RespValue::Error("ERR unknown command 'FLY'".to_string()),
        ),
    ];

    for (command, expected_reply) in test_cases {
        assert_eq!(client.request(command).await, expected_reply);
    }
}

#[tokio::test]
async fn test_server_handles_pipelined_commands() {
    let (address, _) = TestUtils::start_server(ServerConfig::default()).await;
    let mut client = TestClient::connect(address).await;

    client.send(TestUtils::set_command("counter", "1")).await;
    client.send(TestUtils::incr_command("counter")).await;
    client.send(TestUtils::get_command("counter")).await;

    assert_eq!(
        client.read_reply().await,
        RespValue::SimpleString("OK".to_string())
    );
    assert_eq!(client.read_reply().await, RespValue::Integer(2));
    assert_eq!(
        client.read_reply().await,
        RespValue::BulkString("2".to_string())
    );
}

#[tokio::test]
async fn test_server_keeps_transactions_per_connection() {
    let (address, context) = TestUtils::start_server(ServerConfig::default()).await;
    let mut first = TestClient::connect(address).await;
    let mut second = TestClient::connect(address).await;

    assert_eq!(
        first.request(TestUtils::multi_command()).await,
        RespValue::SimpleString("OK".to_string())
    );
    assert_eq!(
        first.request(TestUtils::set_command("grape", "mango")).await,
        RespValue::SimpleString("QUEUED".to_string())
    );
    assert_eq!(
        second.request(TestUtils::get_command("grape")).await,
        RespValue::NullBulkString
    );

    let first_address = first.local_address.to_string();
    assert!(context.state.is_in_transaction(&first_address).await);

    drop(first);

    assert!(
        TestUtils::eventually(|| {
            let context = context.clone();
            let first_address = first_address.clone();
            async move { !context.state.is_in_transaction(&first_address).await }
        })
        .await
    );
    assert_eq!(
        second.request(TestUtils::get_command("grape")).await,
        RespValue::NullBulkString
    );
}

#[tokio::test]
async fn test_server_survives_malformed_frames() {
    let (address, _) = TestUtils::start_server(ServerConfig::default()).await;

    let mut nested = TestClient::connect(address).await;
    nested.send_raw("*1\r\n".repeat(40).as_bytes()).await;
    assert_eq!(
        nested.read_reply().await,
        RespValue::Error("ERR Protocol error: arrays nested too deeply".to_string())
    );

    let mut oversized = TestClient::connect(address).await;
    oversized.send_raw(b"*1000000000000\r\n$4\r\nPING\r\n").await;

    let mut client = TestClient::connect(address).await;
    assert_eq!(
        client.request(TestUtils::ping_command()).await,
        RespValue::SimpleString("PONG".to_string())
    );
}
