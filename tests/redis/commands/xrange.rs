use crate::test_utils::{TestEnv, TestUtils};

fn entry(id: &str) -> String {
    format!(
        "*2\r\n${}\r\n{}\r\n*2\r\n$5\r\nmango\r\n$5\r\napple\r\n",
        id.len(),
        id
    )
}

fn entries(ids: &[&str]) -> String {
    let mut response = format!("*{}\r\n", ids.len());

    for id in ids {
        response.push_str(&entry(id));
    }

    response
}

async fn env_with_fruits() -> TestEnv {
    let env = TestEnv::new_master_server();

    for stream_id in ["1526919030404-0", "1526919030404-1", "1526919030414-0", "1526919030424-3"] {
        env.exec_command_ok(
            TestUtils::xadd_command("fruits", stream_id, &["mango", "apple"]),
            &TestUtils::client_address(41844),
            &TestUtils::expected_bulk_string(stream_id),
        )
        .await;
    }

    env
}

#[tokio::test]
async fn test_handle_xrange_command() {
    let env = env_with_fruits().await;

    let test_cases = vec![
        (
            ("-", "+"),
            entries(&[
                "1526919030404-0",
                "1526919030404-1",
                "1526919030414-0",
                "1526919030424-3",
            ]),
        ),
        (
            ("1526919030404-1", "1526919030414-0"),
            entries(&["1526919030404-1", "1526919030414-0"]),
        ),
        (
            ("1526919030404", "1526919030414"),
            entries(&["1526919030404-0", "1526919030404-1", "1526919030414-0"]),
        ),
        (
            ("1526919030414", "+"),
            entries(&["1526919030414-0", "1526919030424-3"]),
        ),
        (("1526919030425", "+"), "*0\r\n".to_string()),
        (("1526919030414-1", "1526919030404-0"), "*0\r\n".to_string()),
    ];

    for ((start, end), expected_response) in test_cases {
        env.exec_command_ok(
            TestUtils::xrange_command("fruits", start, end),
            &TestUtils::client_address(41844),
            &expected_response,
        )
        .await;
    }
}

#[tokio::test]
async fn test_handle_xrange_command_with_count() {
    let env = env_with_fruits().await;

    env.exec_command_ok(
        TestUtils::command(&["XRANGE", "fruits", "-", "+", "COUNT", "2"]),
        &TestUtils::client_address(41844),
        &entries(&["1526919030404-0", "1526919030404-1"]),
    )
    .await;
}

#[tokio::test]
async fn test_handle_xrange_command_missing_key_and_string_key() {
    let env = TestEnv::new_master_server();
    let client_address = TestUtils::client_address(41844);

    env.exec_command_ok(
        TestUtils::xrange_command("fruits", "-", "+"),
        &client_address,
        "*0\r\n",
    )
    .await;

    env.exec_command_ok(TestUtils::set_command("grape", "mango"), &client_address, "+OK\r\n")
        .await;
    env.exec_command_ok(
        TestUtils::xrange_command("grape", "-", "+"),
        &client_address,
        "*0\r\n",
    )
    .await;
    env.exec_command_ok(TestUtils::get_command("grape"), &client_address, "$5\r\nmango\r\n")
        .await;
}
