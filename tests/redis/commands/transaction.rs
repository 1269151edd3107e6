use redis_lite::commands::CommandError;

use crate::test_utils::{TestEnv, TestUtils};

#[tokio::test]
async fn test_handle_transaction() {
    let env = TestEnv::new_master_server();
    let client_address = TestUtils::client_address(41844);

    let test_cases = vec![
        (TestUtils::multi_command(), "+OK\r\n".to_string()),
        (TestUtils::set_command("counter", "1"), "+QUEUED\r\n".to_string()),
        (TestUtils::incr_command("counter"), "+QUEUED\r\n".to_string()),
        (TestUtils::get_command("counter"), "+QUEUED\r\n".to_string()),
        (
            TestUtils::exec_command(),
            "*3\r\n+OK\r\n:2\r\n$1\r\n2\r\n".to_string(),
        ),
    ];

    for (command, expected_response) in test_cases {
        env.exec_command_ok(command, &client_address, &expected_response)
            .await;
    }
}

#[tokio::test]
async fn test_handle_transaction_is_isolated_per_client() {
    let env = TestEnv::new_master_server();
    let first_client = TestUtils::client_address(41844);
    let second_client = TestUtils::client_address(41845);

    env.exec_command_ok(TestUtils::multi_command(), &first_client, "+OK\r\n")
        .await;
    env.exec_command_ok(TestUtils::set_command("grape", "mango"), &first_client, "+QUEUED\r\n")
        .await;

    env.exec_command_ok(
        TestUtils::get_command("grape"),
        &second_client,
        &TestUtils::expected_null(),
    )
    .await;
    env.exec_command_err(
        TestUtils::exec_command(),
        &second_client,
        CommandError::ExecWithoutMulti,
    )
    .await;

    env.exec_command_ok(TestUtils::exec_command(), &first_client, "*1\r\n+OK\r\n")
        .await;
    env.exec_command_ok(
        TestUtils::get_command("grape"),
        &second_client,
        &TestUtils::expected_bulk_string("mango"),
    )
    .await;
}

#[tokio::test]
async fn test_handle_transaction_errors_are_part_of_the_reply() {
    let env = TestEnv::new_master_server();
    let client_address = TestUtils::client_address(41844);

    env.exec_command_ok(TestUtils::set_command("fruit", "mango"), &client_address, "+OK\r\n")
        .await;
    env.exec_command_ok(TestUtils::multi_command(), &client_address, "+OK\r\n")
        .await;
    env.exec_command_ok(TestUtils::incr_command("fruit"), &client_address, "+QUEUED\r\n")
        .await;
    env.exec_command_ok(TestUtils::command(&["FLY"]), &client_address, "+QUEUED\r\n")
        .await;
    env.exec_command_ok(TestUtils::incr_command("visits"), &client_address, "+QUEUED\r\n")
        .await;

    env.exec_command_ok(
        TestUtils::exec_command(),
        &client_address,
        "*3\r\n-ERR value is not an integer or out of range\r\n-ERR unknown command 'FLY'\r\n:1\r\n",
    )
    .await;
}

#[tokio::test]
async fn test_handle_empty_transaction() {
    let env = TestEnv::new_master_server();
    let client_address = TestUtils::client_address(41844);

    env.exec_command_ok(TestUtils::multi_command(), &client_address, "+OK\r\n")
        .await;
    env.exec_command_ok(TestUtils::multi_command(), &client_address, "+OK\r\n")
        .await;
    env.exec_command_ok(TestUtils::exec_command(), &client_address, "*0\r\n")
        .await;
}

#[tokio::test]
async fn test_handle_discard() {
    let env = TestEnv::new_master_server();
    let client_address = TestUtils::client_address(41844);

    env.exec_command_err(
        TestUtils::discard_command(),
        &client_address,
        CommandError::DiscardWithoutMulti,
    )
    .await;

    env.exec_command_ok(TestUtils::multi_command(), &client_address, "+OK\r\n")
        .await;
    env.exec_command_ok(TestUtils::set_command("grape", "mango"), &client_address, "+QUEUED\r\n")
        .await;
    env.exec_command_ok(TestUtils::discard_command(), &client_address, "+OK\r\n")
        .await;

    env.exec_command_ok(
        TestUtils::get_command("grape"),
        &client_address,
        &TestUtils::expected_null(),
    )
    .await;
    env.exec_command_err(
        TestUtils::exec_command(),
        &client_address,
        CommandError::ExecWithoutMulti,
    )
    .await;
}

#[tokio::test]
async fn test_psync_is_not_queued() {
    let env = TestEnv::new_master_server();
    let client_address = TestUtils::client_address(41844);

    env.exec_command_ok(TestUtils::multi_command(), &client_address, "+OK\r\n")
        .await;
    env.exec_command_err(
        TestUtils::command(&["PSYNC", "?", "-1"]),
        &client_address,
        CommandError::CommandNotAllowedInTransaction,
    )
    .await;

    assert!(env.context.state.is_in_transaction(&client_address).await);
}
