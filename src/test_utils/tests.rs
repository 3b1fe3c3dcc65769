use super::*;
use crate::lsp::ClientState;

#[tokio::test]
async fn connect_fake_completes_handshake() {
    let (client, _server) = connect_fake(json!({})).await;
    assert_eq!(client.state(), ClientState::Normal);
    assert!(client.is_alive());
}

#[tokio::test]
async fn serving_server_records_notifications() {
    let (client, server) = connect_serving(json!({})).await;
    client
        .open_document("python", Path::new("/tmp/a.py"), "x = 1\n", 0)
        .unwrap();
    settle().await;

    let opens = server.received_method("textDocument/didOpen");
    assert_eq!(opens.len(), 1);
    assert_eq!(opens[0]["params"]["textDocument"]["text"], "x = 1\n");
}

#[tokio::test]
async fn crash_closes_the_connection() {
    let (client, server) = connect_serving(json!({})).await;
    server.crash();
    settle().await;
    assert!(!client.is_alive());
}
