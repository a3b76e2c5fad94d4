//! # Comandos Básicos
//! src/commands/basic.rs
//!
//! - `/`: 200 vacío
//! - `/echo/<texto>`: devuelve `<texto>` (gzip si el cliente lo acepta)
//! - `/user-agent`: devuelve el header `User-Agent`

use crate::http::{Request, Response};
use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::{self, Write};

/// Prefijo registrado para el comando echo
pub const ECHO_PREFIX: &str = "/echo/";

/// Handler para `/` (registrado como ruta exacta)
pub fn root_handler(req: &Request) -> Response {
    let mut response = Response::ok(req.version());
    response.add_header("Content-Type", "text/plain");
    response
}

/// Handler para /echo/<texto>
///
/// El texto puede contener `/`. Si `Accept-Encoding` incluye `gzip`, el
/// body va comprimido y se agrega `Content-Encoding: gzip`.
///
/// # Ejemplo
/// ```
/// use minihttpd::commands::echo_handler;
/// use minihttpd::http::Request;
///
/// let req = Request::parse(b"GET /echo/a/b HTTP/1.1\r\n\r\n").unwrap();
/// assert_eq!(echo_handler(&req).body(), b"a/b");
/// ```
pub fn echo_handler(req: &Request) -> Response {
    let text = req.path().strip_prefix(ECHO_PREFIX).unwrap_or_default();

    let mut response = Response::ok(req.version());
    response.add_header("Content-Type", "text/plain");

    if !accepts_gzip(req) {
        response.set_body(text);
        return response;
    }

    match gzip(text.as_bytes()) {
        Ok(compressed) => {
            response.add_header("Content-Encoding", "gzip");
            response.set_body_bytes(compressed);
            response
        }
        Err(e) => {
            tracing::warn!(error = %e, "gzip falló");
            Response::internal_error(req.version())
        }
    }
}

/// Handler para /user-agent
pub fn user_agent_handler(req: &Request) -> Response {
    let mut response = Response::ok(req.version());
    response.add_header("Content-Type", "text/plain");
    response.set_body(req.header("User-Agent").unwrap_or_default());
    response
}

/// `Accept-Encoding: deflate, gzip` → true
fn accepts_gzip(req: &Request) -> bool {
    req.header("Accept-Encoding")
        .map(|value| {
            value
                .split(',')
                .any(|encoding| encoding.trim().eq_ignore_ascii_case("gzip"))
        })
        .unwrap_or(false)
}

fn gzip(data: &[u8]) -> io::Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    encoder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::StatusCode;
    use flate2::read::GzDecoder;
    use std::io::Read;

    fn parse(raw: &[u8]) -> Request {
        Request::parse(raw).unwrap()
    }

    #[test]
    fn test_root() {
        let response = root_handler(&parse(b"GET / HTTP/1.1\r\n\r\n"));

        assert_eq!(response.status(), StatusCode::Ok);
        assert!(response.body().is_empty());
    }

    #[test]
    fn test_echo() {
        let response = echo_handler(&parse(b"GET /echo/abc HTTP/1.1\r\n\r\n"));

        assert_eq!(response.status(), StatusCode::Ok);
        assert_eq!(response.body(), b"abc");
        assert_eq!(response.header("Content-Length"), Some("3"));
        assert_eq!(response.header("Content-Type"), Some("text/plain"));
    }

    #[test]
    fn test_echo_keeps_slashes() {
        let response = echo_handler(&parse(b"GET /echo/a/b/c HTTP/1.1\r\n\r\n"));
        assert_eq!(response.body(), b"a/b/c");
    }

    #[test]
    fn test_echo_gzip() {
        let response = echo_handler(&parse(
            b"GET /echo/hello HTTP/1.1\r\nAccept-Encoding: deflate, gzip\r\n\r\n",
        ));

        assert_eq!(response.header("Content-Encoding"), Some("gzip"));
        assert_eq!(
            response.header("Content-Length"),
            Some(response.body().len().to_string().as_str())
        );

        let mut decoded = String::new();
        GzDecoder::new(response.body())
            .read_to_string(&mut decoded)
            .unwrap();
        assert_eq!(decoded, "hello");
    }

    #[test]
    fn test_echo_unknown_encoding_is_plain() {
        let response = echo_handler(&parse(
            b"GET /echo/hello HTTP/1.1\r\nAccept-Encoding: br, gzipped\r\n\r\n",
        ));

        assert!(response.header("Content-Encoding").is_none());
        assert_eq!(response.body(), b"hello");
    }

    #[test]
    fn test_user_agent() {
        let response = user_agent_handler(&parse(
            b"GET /user-agent HTTP/1.1\r\nUser-Agent: foobar/1.2.3\r\n\r\n",
        ));

        assert_eq!(response.body(), b"foobar/1.2.3");
        assert_eq!(response.header("Content-Length"), Some("12"));
    }

    #[test]
    fn test_user_agent_missing() {
        let response = user_agent_handler(&parse(b"GET /user-agent HTTP/1.1\r\n\r\n"));

        assert_eq!(response.status(), StatusCode::Ok);
        assert!(response.body().is_empty());
    }
}
