use std::{net::SocketAddr, sync::Arc, time::Duration};

use redis_lite::{
    commands::{ClientExecutionContext, CommandError, CommandHandler, CommandResult},
    config::{MasterAddress, ServerConfig},
    context::ServerContext,
    input::RespReader,
    key_value_store::Entries,
    resp::RespValue,
    server::RedisServer,
};
use tokio::{
    io::AsyncWriteExt,
    net::{
        TcpStream,
        tcp::{OwnedReadHalf, OwnedWriteHalf},
    },
    time::timeout,
};

/// Test utilities for building commands and expected replies
pub struct TestUtils;

/// In-process server state, driven through the client execution path
pub struct TestEnv {
    pub context: Arc<ServerContext>,
}

impl TestEnv {
    pub fn new_master_server() -> Self {
        Self {
            context: Arc::new(ServerContext::new(ServerConfig::default(), Entries::new())),
        }
    }

    pub fn new_replica_server() -> Self {
        let config = ServerConfig {
            port: 6380,
            replica_of: Some(MasterAddress {
                host: "127.0.0.1".to_string(),
                port: 6379,
            }),
            ..ServerConfig::default()
        };

        Self {
            context: Arc::new(ServerContext::new(config, Entries::new())),
        }
    }

    pub fn with_config(config: ServerConfig) -> Self {
        Self {
            context: Arc::new(ServerContext::new(config, Entries::new())),
        }
    }

    pub fn clone_context(&self) -> Arc<ServerContext> {
        Arc::clone(&self.context)
    }

    pub async fn exec_command(
        &self,
        command: RespValue,
        client_address: &str,
    ) -> Result<CommandResult, CommandError> {
        let handler = CommandHandler::new(command)?;

        ClientExecutionContext::new(self.clone_context(), client_address.to_string())
            .execute(handler)
            .await
    }

    /// Execute a command and assert it replies with `expected_response`
    pub async fn exec_command_ok(
        &self,
        command: RespValue,
        client_address: &str,
        expected_response: &str,
    ) {
        let result = self.exec_command(command.clone(), client_address).await;

        match result {
            Ok(command_result) => assert_eq!(
                command_result.into_reply(),
                Some(expected_response.to_string()),
                "running {:?}",
                command
            ),
            Err(e) => panic!("{:?} failed with {:?}", command, e),
        }
    }

    /// Execute a command and assert it fails with `expected_error`
    pub async fn exec_command_err(
        &self,
        command: RespValue,
        client_address: &str,
        expected_error: CommandError,
    ) {
        let result = self.exec_command(command.clone(), client_address).await;
        assert_eq!(result, Err(expected_error), "running {:?}", command);
    }
}

/// A client connected to a server started with [`TestUtils::start_server`]
pub struct TestClient {
    pub local_address: SocketAddr,
    reader: RespReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
}

impl TestClient {
    pub async fn connect(address: SocketAddr) -> Self {
        let stream = TcpStream::connect(address).await.unwrap();
        let local_address = stream.local_addr().unwrap();
        let (reader, writer) = stream.into_split();

        Self {
            local_address,
            reader: RespReader::new(reader),
            writer,
        }
    }

    pub async fn send(&mut self, command: RespValue) {
        self.writer
            .write_all(command.encode().as_bytes())
            .await
            .unwrap();
    }

    pub async fn send_raw(&mut self, bytes: &[u8]) {
        self.writer.write_all(bytes).await.unwrap();
    }

    pub async fn read_reply(&mut self) -> RespValue {
        let (reply, _) = timeout(Duration::from_secs(5), self.reader.read_value())
            .await
            .expect("timed out waiting for a reply")
            .unwrap();

        reply
    }

    pub async fn request(&mut self, command: RespValue) -> RespValue {
        self.send(command).await;
        self.read_reply().await
    }
}

impl TestUtils {
    pub fn client_address(port: u16) -> String {
        format!("127.0.0.1:{}", port)
    }

    /// Binds a server on a free port and runs it in the background
    pub async fn start_server(config: ServerConfig) -> (SocketAddr, Arc<ServerContext>) {
        let server = RedisServer::bind(ServerConfig { port: 0, ..config })
            .await
            .unwrap();
        let address = server.local_addr().unwrap();
        let context = server.context();

        tokio::spawn(server.run());

        (address, context)
    }

    /// Polls `condition` every 10ms until it holds or two seconds pass
    pub async fn eventually<F, Fut>(mut condition: F) -> bool
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = bool>,
    {
        for _ in 0..200 {
            if condition().await {
                return true;
            }

            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        false
    }

    pub fn command(parts: &[&str]) -> RespValue {
        RespValue::command(parts)
    }

    pub fn ping_command() -> RespValue {
        RespValue::command(&["PING"])
    }

    pub fn echo_command(message: &str) -> RespValue {
        RespValue::command(&["ECHO", message])
    }

    pub fn get_command(key: &str) -> RespValue {
        RespValue::command(&["GET", key])
    }

    pub fn set_command(key: &str, value: &str) -> RespValue {
        RespValue::command(&["SET", key, value])
    }

    pub fn set_command_with_expiration(key: &str, value: &str, expiration_ms: u64) -> RespValue {
        RespValue::command(&["SET", key, value, "px", &expiration_ms.to_string()])
    }

    pub fn incr_command(key: &str) -> RespValue {
        RespValue::command(&["INCR", key])
    }

    pub fn type_command(key: &str) -> RespValue {
        RespValue::command(&["TYPE", key])
    }

    pub fn keys_command(pattern: &str) -> RespValue {
        RespValue::command(&["KEYS", pattern])
    }

    pub fn xadd_command(key: &str, stream_id: &str, entries: &[&str]) -> RespValue {
        let mut parts = vec!["XADD", key, stream_id];
        parts.extend_from_slice(entries);

        RespValue::command(&parts)
    }

    pub fn xrange_command(key: &str, start_stream_id: &str, end_stream_id: &str) -> RespValue {
        RespValue::command(&["XRANGE", key, start_stream_id, end_stream_id])
    }

    pub fn xread_command(keys: &[&str], start_stream_ids: &[&str]) -> RespValue {
        let mut parts = vec!["XREAD", "STREAMS"];
        parts.extend_from_slice(keys);
        parts.extend_from_slice(start_stream_ids);

        RespValue::command(&parts)
    }

    pub fn xread_blocking_command(
        timeout_milliseconds: &str,
        keys: &[&str],
        start_stream_ids: &[&str],
    ) -> RespValue {
        let mut parts = vec!["XREAD", "BLOCK", timeout_milliseconds, "STREAMS"];
        parts.extend_from_slice(keys);
        parts.extend_from_slice(start_stream_ids);

        RespValue::command(&parts)
    }

    pub fn multi_command() -> RespValue {
        RespValue::command(&["MULTI"])
    }

    pub fn exec_command() -> RespValue {
        RespValue::command(&["EXEC"])
    }

    pub fn discard_command() -> RespValue {
        RespValue::command(&["DISCARD"])
    }

    pub fn wait_command(number_of_replicas: usize, timeout_ms: u64) -> RespValue {
        RespValue::command(&[
            "WAIT",
            &number_of_replicas.to_string(),
            &timeout_ms.to_string(),
        ])
    }

    pub fn expected_simple_string(s: &str) -> String {
        RespValue::SimpleString(s.to_string()).encode()
    }

    pub fn expected_bulk_string(s: &str) -> String {
        RespValue::BulkString(s.to_string()).encode()
    }

    pub fn expected_integer(n: i64) -> String {
        RespValue::Integer(n).encode()
    }

    pub fn expected_null() -> String {
        RespValue::NullBulkString.encode()
    }

    pub fn expected_bulk_string_array(items: &[&str]) -> String {
        RespValue::Array(
            items
                .iter()
                .map(|item| RespValue::BulkString(item.to_string()))
                .collect(),
        )
        .encode()
    }
}
