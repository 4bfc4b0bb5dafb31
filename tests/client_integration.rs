//! Integration tests for rb_client network functionality.
//!
//! Tests the gateway's error taxonomy against unreachable servers and the
//! session-gating behavior of protected calls.

use rb_client::api_client::{ApiClient, ApiError};
use rb_client::session::{SessionStore, TokenPair};
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::timeout;

/// Session file under a unique temp directory so tests stay independent
fn temp_session_path(prefix: &str) -> PathBuf {
    let rand_id: u32 = rand::random();
    std::env::temp_dir()
        .join(format!("{prefix}_{rand_id}"))
        .join("session.json")
}

fn client(base_url: &str) -> ApiClient {
    ApiClient::new(
        base_url.to_string(),
        SessionStore::empty(temp_session_path("rb_test")),
    )
}

fn authed_client(base_url: &str) -> ApiClient {
    let mut session = SessionStore::empty(temp_session_path("rb_test_authed"));
    session.set(TokenPair {
        access_token: "stale-access-token".to_string(),
        refresh_token: "stale-refresh-token".to_string(),
    });
    ApiClient::new(base_url.to_string(), session)
}

/// Serve exactly one canned HTTP response, then close the connection.
/// Returns the base URL to point a client at.
async fn serve_once(status_line: &'static str, body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("listener addr");

    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.expect("accept connection");
        read_request(&mut stream).await;
        let response = format!(
            "{status_line}\r\nContent-Type: application/json\r\n\
             Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        let _ = stream.write_all(response.as_bytes()).await;
    });

    format!("http://{addr}")
}

/// Read a full request (headers plus Content-Length body) so the client
/// never sees a reset mid-write.
async fn read_request(stream: &mut TcpStream) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = match stream.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(n) => n,
        };
        buf.extend_from_slice(&chunk[..n]);
        if let Some(header_end) = buf.windows(4).position(|window| window == b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&buf[..header_end]);
            let content_length = head
                .lines()
                .find_map(|line| {
                    let lowered = line.to_ascii_lowercase();
                    lowered
                        .strip_prefix("content-length:")
                        .and_then(|value| value.trim().parse::<usize>().ok())
                })
                .unwrap_or(0);
            if buf.len() >= header_end + 4 + content_length {
                return;
            }
        }
    }
}

// ============================================================================
// Session Gating Tests
// ============================================================================

#[tokio::test]
async fn test_protected_calls_without_session_are_auth_errors() {
    // No session: protected operations must fail before any network I/O
    let client = client("http://localhost:19999");

    assert_eq!(client.list_recipes().await.unwrap_err(), ApiError::Auth);
    assert_eq!(client.list_categories().await.unwrap_err(), ApiError::Auth);
    assert_eq!(client.fetch_profile().await.unwrap_err(), ApiError::Auth);
    assert_eq!(client.get_recipe(1).await.unwrap_err(), ApiError::Auth);
    assert_eq!(client.delete_recipe(1).await.unwrap_err(), ApiError::Auth);
    assert_eq!(
        client.create_category("Dinner").await.unwrap_err(),
        ApiError::Auth
    );
}

#[tokio::test]
async fn test_clear_session_drops_authentication() {
    let mut client = authed_client("http://localhost:19999");
    assert!(client.is_authenticated());

    client.clear_session();
    assert!(!client.is_authenticated());
    assert_eq!(client.list_recipes().await.unwrap_err(), ApiError::Auth);
}

// ============================================================================
// Server Response Tests
// ============================================================================

#[tokio::test]
async fn test_rejected_login_surfaces_server_detail() {
    // The token endpoint answers 401 for bad credentials; that is a login
    // rejection carrying the server's message, not an expired session.
    let base_url = serve_once(
        "HTTP/1.1 401 Unauthorized",
        r#"{"detail":"No active account found with the given credentials"}"#,
    )
    .await;
    let mut client = client(&base_url);

    let result = client.login("alice", "wrong-password").await;

    assert_eq!(
        result.unwrap_err(),
        ApiError::Server("No active account found with the given credentials".to_string())
    );
    assert!(!client.is_authenticated());
}

#[tokio::test]
async fn test_rejected_registration_surfaces_server_detail() {
    let base_url = serve_once(
        "HTTP/1.1 400 Bad Request",
        r#"{"detail":"A user with that username already exists."}"#,
    )
    .await;
    let client = client(&base_url);

    let result = client.register("alice", "alice@example.com", "password").await;

    assert_eq!(
        result.unwrap_err(),
        ApiError::Server("A user with that username already exists.".to_string())
    );
}

#[tokio::test]
async fn test_successful_login_stores_session() {
    let base_url = serve_once(
        "HTTP/1.1 200 OK",
        r#"{"access":"issued-access","refresh":"issued-refresh"}"#,
    )
    .await;
    let mut client = client(&base_url);

    client.login("alice", "password").await.expect("login should succeed");

    assert!(client.is_authenticated());
    assert_eq!(client.session().access_token(), Some("issued-access"));
}

#[tokio::test]
async fn test_stale_bearer_token_is_auth_error() {
    // 401 on a bearer-authenticated call is an expired session
    let base_url = serve_once(
        "HTTP/1.1 401 Unauthorized",
        r#"{"detail":"Given token not valid for any token type"}"#,
    )
    .await;
    let client = authed_client(&base_url);

    assert_eq!(client.list_recipes().await.unwrap_err(), ApiError::Auth);
}

// ============================================================================
// Network Error Scenario Tests
// ============================================================================

#[tokio::test]
async fn test_connection_refused() {
    let mut client = client("http://localhost:19999");

    let result = client.login("testuser", "password").await;

    assert!(
        matches!(result, Err(ApiError::Network(_))),
        "should fail with a transport error when no server is available: {result:?}"
    );
}

#[tokio::test]
async fn test_timeout_handling() {
    // Non-routable IP; either times out or fails to connect
    let mut client = client("http://192.0.2.1:80");

    let result = timeout(Duration::from_secs(3), client.login("testuser", "password")).await;

    assert!(
        result.is_err() || result.unwrap().is_err(),
        "should fail when connecting to unreachable host"
    );
}

#[tokio::test]
async fn test_invalid_hostname() {
    let mut client = client("http://invalid-hostname-that-does-not-exist.local");

    let result = client.login("testuser", "password").await;

    assert!(matches!(result, Err(ApiError::Network(_))));
}

#[tokio::test]
async fn test_malformed_url() {
    let client = client("not-a-valid-url");

    let result = client.register("testuser", "test@example.com", "password").await;

    assert!(result.is_err(), "should fail with malformed URL");
}

#[tokio::test]
async fn test_network_error_on_list_recipes() {
    let client = authed_client("http://localhost:19999");

    let result = client.list_recipes().await;

    assert!(
        matches!(result, Err(ApiError::Network(_))),
        "transport failures on protected calls are not auth errors: {result:?}"
    );
}

// ============================================================================
// Connection State Tests
// ============================================================================

#[tokio::test]
async fn test_multiple_clients() {
    let client1 = authed_client("http://localhost:19999");
    let client2 = authed_client("http://localhost:19999");

    let result1 = client1.list_recipes().await;
    let result2 = client2.list_recipes().await;

    assert!(result1.is_err());
    assert!(result2.is_err());
}

#[tokio::test]
async fn test_client_state_after_failed_request() {
    let mut client = client("http://localhost:19999");

    let result1 = client.login("user1", "pass1").await;
    assert!(result1.is_err());

    let result2 = client.login("user2", "pass2").await;
    assert!(result2.is_err());

    // A failed login never fabricates a session
    assert!(!client.is_authenticated());
}

// ============================================================================
// URL Construction Tests
// ============================================================================

#[tokio::test]
async fn test_url_with_trailing_slash() {
    let mut client = client("http://localhost:19999/");

    let result = client.login("user", "pass").await;

    assert!(result.is_err());
}

#[tokio::test]
async fn test_https_url() {
    let mut client = client("https://localhost:3443");

    let result = client.login("user", "pass").await;

    assert!(result.is_err());
}

// ============================================================================
// Concurrent Request Tests
// ============================================================================

#[tokio::test]
async fn test_concurrent_api_calls() {
    let mut handles = vec![];

    for _ in 0..5 {
        let client = authed_client("http://localhost:19999");
        let handle = tokio::spawn(async move { client.list_recipes().await });
        handles.push(handle);
    }

    let mut error_count = 0;
    for handle in handles {
        let result = handle.await.expect("task should complete");
        if result.is_err() {
            error_count += 1;
        }
    }

    assert_eq!(error_count, 5, "all concurrent requests should fail without server");
}

#[tokio::test]
async fn test_rapid_sequential_requests() {
    let client = authed_client("http://localhost:19999");

    for _ in 0..10 {
        let result = client.list_recipes().await;
        assert!(result.is_err(), "each request should fail without server");
    }
}

// ============================================================================
// Edge Case Tests
// ============================================================================

#[tokio::test]
async fn test_empty_base_url() {
    let mut client = client("");

    let result = client.login("user", "pass").await;

    assert!(result.is_err(), "should fail with empty base URL");
}

#[tokio::test]
async fn test_special_characters_in_credentials() {
    let mut client = client("http://localhost:19999");

    let result = client.login("user@#$%", "pass!@#$%^&*()").await;

    assert!(result.is_err());
}

// ============================================================================
// Retry Behavior Tests
// ============================================================================

#[tokio::test]
async fn test_no_automatic_retry_on_failure() {
    let mut client = client("http://localhost:19999");

    let start = std::time::Instant::now();
    let result = client.login("user", "pass").await;
    let elapsed = start.elapsed();

    assert!(result.is_err());
    assert!(elapsed < Duration::from_secs(5), "should not retry automatically");
}
