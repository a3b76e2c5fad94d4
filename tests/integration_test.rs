//! Tests de integración para el servidor HTTP
//! tests/integration_test.rs
//!
//! Cada test levanta un servidor real en un puerto efímero (127.0.0.1:0)
//! con las rutas de `commands::router` y le habla por TCP.

use minihttpd::commands;
use minihttpd::config::Config;
use minihttpd::server::Server;
use std::fs;
use std::io::{Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::path::Path;
use std::thread;
use std::time::Duration;

/// Helper: arranca el servidor sirviendo `directory` y retorna su dirección
fn start_server(directory: &Path) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().unwrap();

    let server = Server::new(Config::default(), commands::router(directory));
    thread::spawn(move || server.serve(listener));

    addr
}

/// Helper: envía bytes crudos y retorna la response completa
fn send_raw(addr: SocketAddr, raw: &[u8]) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    let mut stream = TcpStream::connect(addr)?;

    stream.set_read_timeout(Some(Duration::from_secs(5)))?;
    stream.set_write_timeout(Some(Duration::from_secs(5)))?;

    stream.write_all(raw)?;
    stream.flush()?;

    // El servidor cierra la conexión después de responder
    let mut response = Vec::new();
    stream.read_to_end(&mut response)?;

    Ok(response)
}

fn send_request(addr: SocketAddr, raw: &str) -> String {
    let bytes = send_raw(addr, raw.as_bytes()).expect("Failed to send request");
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Helper: extrae el body de una response HTTP
fn extract_body(response: &str) -> &str {
    match response.find("\r\n\r\n") {
        Some(pos) => &response[pos + 4..],
        None => "",
    }
}

#[test]
fn test_root() {
    let dir = tempfile::tempdir().unwrap();
    let addr = start_server(dir.path());

    let response = send_request(addr, "GET / HTTP/1.1\r\nHost: localhost\r\n\r\n");
    assert!(response.starts_with("HTTP/1.1 200 OK\r\n"), "got: {}", response);
    assert_eq!(extract_body(&response), "");
}

#[test]
fn test_strict_root_does_not_catch_unknown_paths() {
    let dir = tempfile::tempdir().unwrap();
    let addr = start_server(dir.path());

    let response = send_request(addr, "GET /foo HTTP/1.1\r\n\r\n");
    assert!(response.starts_with("HTTP/1.1 404 Not Found\r\n"));
    assert!(response.contains("Content-Type: text/plain\r\n"));
}

#[test]
fn test_not_found_mirrors_protocol() {
    let dir = tempfile::tempdir().unwrap();
    let addr = start_server(dir.path());

    let response = send_request(addr, "GET /nonexistent HTTP/1.0\r\n\r\n");
    assert!(response.starts_with("HTTP/1.0 404 Not Found\r\n"), "got: {}", response);
}

#[test]
fn test_echo_endpoint() {
    let dir = tempfile::tempdir().unwrap();
    let addr = start_server(dir.path());

    let response = send_request(addr, "GET /echo/abc/def HTTP/1.1\r\n\r\n");
    assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));
    assert!(response.contains("Content-Length: 7\r\n"));
    assert_eq!(extract_body(&response), "abc/def");
}

#[test]
fn test_user_agent_endpoint() {
    let dir = tempfile::tempdir().unwrap();
    let addr = start_server(dir.path());

    let response = send_request(
        addr,
        "GET /user-agent HTTP/1.1\r\nHost: localhost\r\nUser-Agent: grape/raspberry\r\n\r\n",
    );
    assert!(response.contains("Content-Length: 15\r\n"));
    assert_eq!(extract_body(&response), "grape/raspberry");
}

#[test]
fn test_header_line_without_space_is_ignored() {
    let dir = tempfile::tempdir().unwrap();
    let addr = start_server(dir.path());

    let response = send_request(
        addr,
        "GET /user-agent HTTP/1.1\r\nHost:localhost\r\nUser-Agent: curl/8\r\n\r\n",
    );
    assert!(response.starts_with("HTTP/1.1 200 OK\r\n"), "got: {}", response);
    assert_eq!(extract_body(&response), "curl/8");
}

#[test]
fn test_get_file() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("hello.txt"), b"Hello, World!").unwrap();
    let addr = start_server(dir.path());

    let response = send_request(addr, "GET /files/hello.txt HTTP/1.1\r\n\r\n");
    assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));
    assert!(response.contains("Content-Type: application/octet-stream\r\n"));
    assert!(response.contains("Content-Disposition: attachment; filename=\"hello.txt\"\r\n"));
    assert_eq!(extract_body(&response), "Hello, World!");
}

#[test]
fn test_get_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let addr = start_server(dir.path());

    let response = send_request(addr, "GET /files/missing HTTP/1.1\r\n\r\n");
    assert!(response.starts_with("HTTP/1.1 404 Not Found\r\n"));
}

#[test]
fn test_post_then_get_file() {
    let dir = tempfile::tempdir().unwrap();
    let addr = start_server(dir.path());
    let body = "first line\r\nsecond line\r\n";

    let response = send_request(
        addr,
        &format!(
            "POST /files/upload.txt HTTP/1.1\r\nContent-Length: {}\r\n\r\n{}",
            body.len(),
            body
        ),
    );
    assert!(response.starts_with("HTTP/1.1 201 Created\r\n"), "got: {}", response);
    assert_eq!(fs::read_to_string(dir.path().join("upload.txt")).unwrap(), body);

    let response = send_request(addr, "GET /files/upload.txt HTTP/1.1\r\n\r\n");
    assert_eq!(extract_body(&response), body);
}

#[test]
fn test_binary_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let addr = start_server(dir.path());
    let payload: Vec<u8> = (0..=255u8).cycle().take(5000).collect();

    let mut raw = format!(
        "POST /files/blob HTTP/1.1\r\nContent-Length: {}\r\n\r\n",
        payload.len()
    )
    .into_bytes();
    raw.extend_from_slice(&payload);
    let response = send_raw(addr, &raw).unwrap();
    assert!(response.starts_with(b"HTTP/1.1 201 Created\r\n"));

    let response = send_raw(addr, b"GET /files/blob HTTP/1.1\r\n\r\n").unwrap();
    let body_start = response
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .unwrap()
        + 4;
    assert_eq!(&response[body_start..], &payload[..]);
}

#[test]
fn test_malformed_request_gets_400_and_server_survives() {
    let dir = tempfile::tempdir().unwrap();
    let addr = start_server(dir.path());

    let response = send_request(addr, "NONSENSE\r\n\r\n");
    assert!(response.starts_with("HTTP/1.1 400 Bad Request\r\n"));

    let response = send_request(addr, "GET / HTTP/1.1\r\n: empty-name\r\n\r\n");
    assert!(response.starts_with("HTTP/1.1 400 Bad Request\r\n"));

    let response = send_request(addr, "GET /echo/still-alive HTTP/1.1\r\n\r\n");
    assert_eq!(extract_body(&response), "still-alive");
}

#[test]
fn test_exactly_one_response_per_request() {
    let dir = tempfile::tempdir().unwrap();
    let addr = start_server(dir.path());

    let response = send_request(addr, "GET /echo/x HTTP/1.1\r\n\r\n");
    assert_eq!(response.matches("HTTP/1.1 ").count(), 1);
}

#[test]
fn test_concurrent_echo_requests() {
    let dir = tempfile::tempdir().unwrap();
    let addr = start_server(dir.path());

    let clients: Vec<_> = (0..32)
        .map(|i| {
            thread::spawn(move || {
                let text = format!("client-{}", i);
                let response = send_request(addr, &format!("GET /echo/{} HTTP/1.1\r\n\r\n", text));
                (text, response)
            })
        })
        .collect();

    for client in clients {
        let (text, response) = client.join().unwrap();
        assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(response.contains(&format!("Content-Length: {}\r\n", text.len())));
        assert_eq!(extract_body(&response), text);
    }
}
