//! Integration tests for password authentication.

mod common;

use common::TestServer;

#[tokio::test]
async fn test_password_required() {
    let server = TestServer::spawn_with(16631, r#"password = "hunter2""#)
        .await
        .expect("Failed to spawn test server");
    let mut client = server.connect().await.expect("Failed to connect");

    assert_eq!(
        client.request("status").await.unwrap(),
        vec![r#"ACK [4@0] {status} you don't have permission for "status""#]
    );
    assert_eq!(client.request("ping").await.unwrap(), vec!["OK"]);
    assert_eq!(
        client.request("password nope").await.unwrap(),
        vec!["ACK [3@0] {password} incorrect password"]
    );
    assert_eq!(client.request("password hunter2").await.unwrap(), vec!["OK"]);

    let status = client.request("status").await.unwrap();
    assert_eq!(status.last().map(String::as_str), Some("OK"));
}

#[tokio::test]
async fn test_notcommands_before_login() {
    let server = TestServer::spawn_with(16632, r#"password = "hunter2""#)
        .await
        .expect("Failed to spawn test server");
    let mut client = server.connect().await.expect("Failed to connect");

    let denied = client.request("notcommands").await.unwrap();
    assert!(denied.contains(&"command: setvol".to_string()));
    assert!(denied.contains(&"command: kill".to_string()));

    client.request("password hunter2").await.unwrap();
    assert_eq!(
        client.request("notcommands").await.unwrap(),
        vec!["command: config", "command: kill", "OK"]
    );
}
