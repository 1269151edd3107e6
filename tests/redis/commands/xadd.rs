use redis_lite::{commands::CommandError, streams::StreamError};

use crate::test_utils::{TestEnv, TestUtils};

#[tokio::test]
async fn test_handle_xadd_command() {
    let env = TestEnv::new_master_server();
    let client_address = TestUtils::client_address(41844);

    let test_cases = vec![
        ("0-1", "0-1"),
        ("0-*", "0-2"),
        ("1526919030474-0", "1526919030474-0"),
        ("1526919030474-*", "1526919030474-1"),
        ("1526919030480", "1526919030480-0"),
        ("1526919030490-*", "1526919030490-0"),
    ];

    for (stream_id, expected_id) in test_cases {
        env.exec_command_ok(
            TestUtils::xadd_command("fruits", stream_id, &["mango", "apple"]),
            &client_address,
            &TestUtils::expected_bulk_string(expected_id),
        )
        .await;
    }
}

#[tokio::test]
async fn test_handle_xadd_command_auto_sequence_on_empty_stream() {
    let env = TestEnv::new_master_server();

    env.exec_command_ok(
        TestUtils::xadd_command("fruits", "0-*", &["mango", "apple"]),
        &TestUtils::client_address(41844),
        &TestUtils::expected_bulk_string("0-1"),
    )
    .await;
}

#[tokio::test]
async fn test_handle_xadd_command_auto_id() {
    let env = TestEnv::new_master_server();
    let client_address = TestUtils::client_address(41844);
    let mut previous: Option<(u64, u64)> = None;

    for _ in 0..3 {
        let reply = env
            .exec_command(
                TestUtils::xadd_command("fruits", "*", &["mango", "apple"]),
                &client_address,
            )
            .await
            .unwrap()
            .into_reply()
            .unwrap();

        let id = reply.trim_end().rsplit("\r\n").next().unwrap().to_string();
        let (ms, seq) = id.split_once('-').unwrap();
        let current = (ms.parse::<u64>().unwrap(), seq.parse::<u64>().unwrap());

        if let Some(previous) = previous {
            assert!(current > previous, "{:?} is not after {:?}", current, previous);
        }

        previous = Some(current);
    }
}

#[tokio::test]
async fn test_handle_xadd_command_invalid_ids() {
    let env = TestEnv::new_master_server();
    let client_address = TestUtils::client_address(41844);

    env.exec_command_ok(
        TestUtils::xadd_command("fruits", "1-1", &["mango", "apple"]),
        &client_address,
        &TestUtils::expected_bulk_string("1-1"),
    )
    .await;

    let test_cases = vec![
        ("0-0", StreamError::IdMustBeGreaterThanZero),
        ("1-1", StreamError::IdNotIncreasing),
        ("0-5", StreamError::IdNotIncreasing),
        ("0-*", StreamError::IdNotIncreasing),
        ("one-1", StreamError::InvalidId),
    ];

    for (stream_id, expected_error) in test_cases {
        env.exec_command_err(
            TestUtils::xadd_command("fruits", stream_id, &["mango", "apple"]),
            &client_address,
            CommandError::InvalidStreamId(expected_error),
        )
        .await;
    }

    env.exec_command_ok(TestUtils::set_command("grape", "mango"), &client_address, "+OK\r\n")
        .await;
    env.exec_command_err(
        TestUtils::xadd_command("grape", "1-1", &["mango", "apple"]),
        &client_address,
        CommandError::WrongType,
    )
    .await;
}

#[tokio::test]
async fn test_handle_xadd_command_error_messages() {
    assert_eq!(
        CommandError::InvalidStreamId(StreamError::IdMustBeGreaterThanZero).as_string(),
        "-ERR The ID specified in XADD must be greater than 0-0\r\n"
    );
    assert_eq!(
        CommandError::InvalidStreamId(StreamError::IdNotIncreasing).as_string(),
        "-ERR The ID specified in XADD is equal or smaller than the target stream top item\r\n"
    );
}
