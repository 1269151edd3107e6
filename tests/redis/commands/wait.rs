use crate::test_utils::{TestEnv, TestUtils};

#[tokio::test]
async fn test_handle_wait_command_without_replicas() {
    let env = TestEnv::new_master_server();
    let client_address = TestUtils::client_address(41844);

    env.exec_command_ok(TestUtils::set_command("grape", "mango"), &client_address, "+OK\r\n")
        .await;

    let started = tokio::time::Instant::now();

    env.exec_command_ok(
        TestUtils::wait_command(1, 500),
        &client_address,
        &TestUtils::expected_integer(0),
    )
    .await;

    assert!(started.elapsed() < std::time::Duration::from_millis(500));
    assert_eq!(env.context.replication.offset(), 0);
}

#[tokio::test]
async fn test_handle_wait_command_on_replica() {
    let env = TestEnv::new_replica_server();

    env.exec_command_ok(
        TestUtils::wait_command(1, 100),
        &TestUtils::client_address(41844),
        &TestUtils::expected_integer(0),
    )
    .await;
}
