//! # Parsing de Requests HTTP/1.1
//! src/http/request.rs
//!
//! Parser de requests escrito a mano sobre un buffer de bytes completo.
//!
//! ## Formato de un Request
//!
//! ```text
//! POST /files/notes.txt HTTP/1.1\r\n
//! Host: localhost:4221\r\n
//! Content-Length: 11\r\n
//! \r\n
//! hello\r\nbye
//! ```
//!
//! ## Componentes
//!
//! 1. **Request Line**: `METHOD /path PROTOCOLO`, separados por un espacio
//! 2. **Headers**: Pares `Name: Value`, separados por el primer `": "`.
//!    Una línea sin `": "` no es un header y se ignora.
//! 3. **Línea vacía**: `\r\n\r\n` cierra el bloque de headers
//! 4. **Body**: exactamente `Content-Length` bytes (puede contener `\r\n`)
//!
//! El path se guarda crudo: no se separa la query string.

use std::collections::HashMap;
use thiserror::Error;

/// Secuencia que separa el bloque de headers del body
pub const HEAD_TERMINATOR: &[u8] = b"\r\n\r\n";

/// Métodos HTTP reconocidos
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// GET - Obtener un recurso
    GET,

    /// POST - Enviar datos a un recurso
    POST,

    /// Cualquier otro token. No es un error de parsing: simplemente
    /// no coincide con ninguna ruta.
    Undefined,
}

impl Method {
    /// Convierte el token de la request line en un método
    ///
    /// # Ejemplo
    /// ```
    /// use minihttpd::http::Method;
    ///
    /// assert_eq!(Method::from_token("GET"), Method::GET);
    /// assert_eq!(Method::from_token("DELETE"), Method::Undefined);
    /// ```
    pub fn from_token(token: &str) -> Self {
        match token {
            "GET" => Method::GET,
            "POST" => Method::POST,
            _ => Method::Undefined,
        }
    }

    /// Convierte el método a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::GET => "GET",
            Method::POST => "POST",
            Method::Undefined => "UNDEFINED",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Representa un request HTTP parseado. Inmutable una vez construido.
#[derive(Debug, Clone)]
pub struct Request {
    /// Método HTTP
    method: Method,

    /// Path crudo de la request line (ej: "/echo/abc")
    path: String,

    /// Protocolo tal como llegó (ej: "HTTP/1.1")
    version: String,

    /// Headers con la capitalización recibida; el último duplicado gana
    headers: HashMap<String, String>,

    /// Body, solo si había contenido después de la línea vacía
    body: Option<Vec<u8>>,
}

/// Errores que pueden ocurrir durante el parsing
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Buffer vacío (o solo relleno de ceros / espacios)
    #[error("Empty request")]
    EmptyRequest,

    /// La request line no tiene exactamente 3 tokens o no es UTF-8
    #[error("Invalid request line: {0:?}")]
    InvalidRequestLine(String),

    /// Header con nombre vacío
    #[error("Invalid header: {0:?}")]
    InvalidHeader(String),

    /// `Content-Length` que no es un entero no negativo
    #[error("Invalid Content-Length: {0:?}")]
    InvalidContentLength(String),

    /// Llegaron menos bytes de body que los declarados
    #[error("Incomplete body: expected {expected} bytes, received {received}")]
    IncompleteBody { expected: usize, received: usize },
}

impl Request {
    /// Parsea un request desde bytes
    ///
    /// El buffer puede venir sobre-dimensionado y relleno de ceros al final;
    /// ese relleno se descarta. Si hay `Content-Length`, el body son
    /// exactamente esos bytes; si no, es todo lo que sigue a la línea vacía.
    ///
    /// # Ejemplo
    ///
    /// ```
    /// use minihttpd::http::{Method, Request};
    ///
    /// let raw = b"GET /echo/abc HTTP/1.1\r\nUser-Agent: curl\r\n\r\n";
    /// let request = Request::parse(raw).unwrap();
    ///
    /// assert_eq!(request.method(), Method::GET);
    /// assert_eq!(request.path(), "/echo/abc");
    /// assert_eq!(request.header("User-Agent"), Some("curl"));
    /// assert!(request.body().is_none());
    /// ```
    pub fn parse(buffer: &[u8]) -> Result<Self, ParseError> {
        if strip_nul_padding(buffer).iter().all(u8::is_ascii_whitespace) {
            return Err(ParseError::EmptyRequest);
        }

        let (head, rest) = match find_head_end(buffer) {
            Some(end) => (&buffer[..end], &buffer[end + HEAD_TERMINATOR.len()..]),
            None => (strip_nul_padding(buffer), &[][..]),
        };

        let head = std::str::from_utf8(head)
            .map_err(|_| ParseError::InvalidRequestLine("<non UTF-8>".to_string()))?;

        let mut lines = head.split("\r\n");

        // 1. Request line (split siempre produce al menos un elemento)
        let (method, path, version) = Self::parse_request_line(lines.next().unwrap_or(""))?;

        // 2. Headers
        let headers = Self::parse_headers(lines)?;

        // 3. Body
        let body = Self::parse_body(rest, content_length(head)?)?;

        Ok(Request {
            method,
            path,
            version,
            headers,
            body,
        })
    }

    /// Formato: `GET /path HTTP/1.1`, exactamente tres tokens
    fn parse_request_line(line: &str) -> Result<(Method, String, String), ParseError> {
        let parts: Vec<&str> = line.split(' ').collect();

        if parts.len() != 3 || parts.iter().any(|p| p.is_empty()) {
            return Err(ParseError::InvalidRequestLine(line.to_string()));
        }

        Ok((
            Method::from_token(parts[0]),
            parts[1].to_string(),
            parts[2].to_string(),
        ))
    }

    fn parse_headers<'a>(
        lines: impl Iterator<Item = &'a str>,
    ) -> Result<HashMap<String, String>, ParseError> {
        let mut headers = HashMap::new();

        for line in lines {
            // Solo aparece si el buffer terminó en "\r\n" sin la línea vacía
            if line.is_empty() {
                break;
            }

            match line.split_once(": ") {
                Some(("", _)) => return Err(ParseError::InvalidHeader(line.to_string())),
                Some((name, value)) => {
                    headers.insert(name.to_string(), value.to_string());
                }
                None => tracing::debug!(line = line, "línea sin separador ignorada"),
            }
        }

        Ok(headers)
    }

    fn parse_body(rest: &[u8], declared: Option<usize>) -> Result<Option<Vec<u8>>, ParseError> {
        let body = match declared {
            Some(expected) if rest.len() < expected => {
                return Err(ParseError::IncompleteBody {
                    expected,
                    received: rest.len(),
                });
            }
            Some(expected) => &rest[..expected],
            None => strip_nul_padding(rest),
        };

        Ok((!body.is_empty()).then(|| body.to_vec()))
    }

    // === Métodos públicos para acceder a los campos ===

    /// Obtiene el método HTTP del request
    pub fn method(&self) -> Method {
        self.method
    }

    /// Obtiene el path del request
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Obtiene la versión del protocolo, tal como llegó
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Obtiene todos los headers
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Obtiene un header específico (el nombre distingue mayúsculas)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(|s| s.as_str())
    }

    /// Obtiene el body del request, si lo hay
    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    /// Obtiene el body del request como String
    pub fn body_string(&self) -> Option<String> {
        self.body
            .as_ref()
            .and_then(|b| String::from_utf8(b.clone()).ok())
    }
}

/// Posición donde empieza `\r\n\r\n`, si ya llegó
pub fn find_head_end(buffer: &[u8]) -> Option<usize> {
    buffer
        .windows(HEAD_TERMINATOR.len())
        .position(|w| w == HEAD_TERMINATOR)
}

/// Lee `Content-Length` de un bloque de headers crudo (sin parsearlo entero).
///
/// Lo usa la conexión para saber cuántos bytes de body faltan por leer.
/// Retorna 0 si el header no está.
pub fn declared_body_len(head: &[u8]) -> Result<usize, ParseError> {
    Ok(content_length(&String::from_utf8_lossy(head))?.unwrap_or(0))
}

/// Último `Content-Length` del head en orden de llegada, sin importar
/// mayúsculas (igual que "el último duplicado gana" en los headers)
fn content_length(head: &str) -> Result<Option<usize>, ParseError> {
    head.split("\r\n")
        .skip(1)
        .filter_map(|line| line.split_once(": "))
        .filter(|(name, _)| name.eq_ignore_ascii_case("Content-Length"))
        .last()
        .map(|(_, value)| parse_content_length(value))
        .transpose()
}

fn parse_content_length(value: &str) -> Result<usize, ParseError> {
    value
        .trim()
        .parse::<usize>()
        .map_err(|_| ParseError::InvalidContentLength(value.to_string()))
}

fn strip_nul_padding(buffer: &[u8]) -> &[u8] {
    let end = buffer
        .iter()
        .rposition(|&b| b != 0)
        .map_or(0, |last| last + 1);
    &buffer[..end]
}
