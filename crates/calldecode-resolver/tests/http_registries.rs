//! HTTP registries against a canned local server.

use calldecode_core::{RegistryError, Selector};
use calldecode_resolver::{FourByteDirectory, GithubRegistry, SignatureRegistry};
use std::time::Duration;
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpListener,
};

const TRANSFER: Selector = Selector::new([0xa9, 0x05, 0x9c, 0xbb]);

fn respond(path: &str) -> (u16, &'static str, String) {
    match path {
        "/signatures/a9059cbb" => (
            200,
            "text/plain",
            "transfer(address,uint256);many_msg_babbage(bytes1)\n".into(),
        ),
        "/signatures/deadbeef" => (503, "text/plain", "busy".into()),
        "/api/v1/signatures/?hex_signature=0xa9059cbb" => (
            200,
            "application/json",
            r#"{"count":1,"results":[{"id":145,"text_signature":"transfer(address,uint256)","hex_signature":"0xa9059cbb"}]}"#.into(),
        ),
        "/api/v1/signatures/?hex_signature=0x00000000" => (
            200,
            "application/json",
            r#"{"count":0,"results":[]}"#.into(),
        ),
        _ => (404, "text/plain", "404: Not Found".into()),
    }
}

fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap()
}

fn github(base: String) -> GithubRegistry {
    GithubRegistry::with_client(client(), base, Duration::from_secs(5))
}

/// Serve `respond` on an ephemeral port; returns the base URL.
async fn serve() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };
            tokio::spawn(async move {
                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut buf).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => request.extend_from_slice(&buf[..n]),
                    }
                }
                let head = String::from_utf8_lossy(&request);
                let path = head.split_whitespace().nth(1).unwrap_or("/").to_string();
                let (status, content_type, body) = respond(&path);
                let response = format!(
                    "HTTP/1.1 {status} X\r\ncontent-type: {content_type}\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn github_registry_splits_collisions() {
    let registry = github(serve().await);
    assert_eq!(
        registry.lookup(TRANSFER).await.unwrap(),
        vec!["transfer(address,uint256)", "many_msg_babbage(bytes1)"]
    );
}

#[tokio::test]
async fn github_registry_404_is_not_found() {
    let registry = github(serve().await);
    assert!(registry.lookup(Selector::new([0; 4])).await.unwrap().is_empty());
}

#[tokio::test]
async fn github_registry_5xx_is_retryable_status() {
    let registry = github(serve().await);
    let err = registry
        .lookup(Selector::new([0xde, 0xad, 0xbe, 0xef]))
        .await
        .unwrap_err();
    assert_eq!(err, RegistryError::Status { status: 503 });
    assert!(err.is_retryable());
}

#[tokio::test]
async fn fourbyte_directory_results() {
    let base = serve().await;
    let directory = FourByteDirectory::with_client(client(), base, Duration::from_secs(5));
    assert_eq!(
        directory.lookup(TRANSFER).await.unwrap(),
        vec!["transfer(address,uint256)"]
    );
    assert!(directory.lookup(Selector::new([0; 4])).await.unwrap().is_empty());
}

#[tokio::test]
async fn connection_refused_is_http_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let registry = github(format!("http://{addr}"));
    let err = registry.lookup(TRANSFER).await.unwrap_err();
    assert!(matches!(err, RegistryError::Http(_)), "{err:?}");
    assert!(err.is_retryable());
}
