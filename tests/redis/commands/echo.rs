use redis_lite::commands::CommandError;

use crate::test_utils::{TestEnv, TestUtils};

#[tokio::test]
async fn test_handle_echo_command() {
    let env = TestEnv::new_master_server();

    let test_cases = vec!["grape", "Hello, World!", ""];

    for message in test_cases {
        env.exec_command_ok(
            TestUtils::echo_command(message),
            &TestUtils::client_address(41844),
            &TestUtils::expected_bulk_string(message),
        )
        .await;
    }
}

#[tokio::test]
async fn test_handle_echo_command_invalid() {
    let env = TestEnv::new_master_server();

    let test_cases = vec![
        TestUtils::command(&["ECHO"]),
        TestUtils::command(&["ECHO", "grape", "mango"]),
    ];

    for command in test_cases {
        env.exec_command_err(
            command,
            &TestUtils::client_address(41844),
            CommandError::WrongNumberOfArguments("echo".to_string()),
        )
        .await;
    }
}
