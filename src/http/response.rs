//! # Construcción de Respuestas HTTP
//! src/http/response.rs
//!
//! API para construir respuestas y serializarlas a bytes.
//!
//! ## Formato de una respuesta
//!
//! ```text
//! HTTP/1.1 200 OK\r\n
//! Content-Type: text/plain\r\n
//! Content-Length: 3\r\n
//! \r\n
//! abc
//! ```
//!
//! El orden de los headers no está definido.
//!
//! ## Ejemplo de uso
//!
//! ```
//! use minihttpd::http::{Response, StatusCode};
//!
//! let mut response = Response::ok("HTTP/1.1");
//! response.add_header("Content-Type", "text/plain");
//! response.set_body("abc");
//!
//! let bytes = response.to_bytes();
//! assert!(bytes.ends_with(b"\r\n\r\nabc"));
//! ```

use super::StatusCode;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;

/// Protocolo usado cuando no hay un request del cual copiarlo
pub const DEFAULT_PROTOCOL: &str = "HTTP/1.1";

const CONTENT_LENGTH: &str = "Content-Length";

/// Representa una respuesta HTTP completa
#[derive(Debug, Clone)]
pub struct Response {
    /// Protocolo de la status line, normalmente el del request
    protocol: String,

    /// Código de estado HTTP (200, 404, etc.)
    status: StatusCode,

    /// Headers HTTP; un nombre repetido reemplaza al anterior
    headers: HashMap<String, String>,

    /// Cuerpo de la respuesta (texto o bytes de un archivo)
    body: Vec<u8>,
}

impl Response {
    /// Crea una respuesta sin headers ni body
    pub fn new(protocol: &str, status: StatusCode) -> Self {
        Self {
            protocol: protocol.to_string(),
            status,
            headers: HashMap::new(),
            body: Vec::new(),
        }
    }

    /// 200 OK vacía
    pub fn ok(protocol: &str) -> Self {
        Self::new(protocol, StatusCode::Ok)
    }

    /// 201 Created vacía
    pub fn created(protocol: &str) -> Self {
        Self::new(protocol, StatusCode::Created)
    }

    /// 404 genérico: `Content-Type: text/plain`, sin body
    ///
    /// # Ejemplo
    /// ```
    /// use minihttpd::http::{Response, StatusCode};
    ///
    /// let response = Response::not_found("HTTP/1.0");
    /// assert_eq!(response.status(), StatusCode::NotFound);
    /// assert_eq!(response.protocol(), "HTTP/1.0");
    /// ```
    pub fn not_found(protocol: &str) -> Self {
        let mut response = Self::new(protocol, StatusCode::NotFound);
        response.add_header("Content-Type", "text/plain");
        response
    }

    /// 400 con el motivo como texto plano. Se usa cuando el request no se
    /// pudo parsear, así que el protocolo es siempre el por defecto.
    pub fn bad_request(message: &str) -> Self {
        let mut response = Self::new(DEFAULT_PROTOCOL, StatusCode::BadRequest);
        response.add_header("Content-Type", "text/plain");
        response.set_body(message);
        response
    }

    /// 500 vacía con `Content-Type: text/plain`
    pub fn internal_error(protocol: &str) -> Self {
        let mut response = Self::new(protocol, StatusCode::InternalServerError);
        response.add_header("Content-Type", "text/plain");
        response
    }

    /// Cambia el código de estado
    pub fn set_status(&mut self, status: StatusCode) {
        self.status = status;
    }

    /// Agrega un header; si ya existe, se sobrescribe
    pub fn add_header(&mut self, name: &str, value: &str) {
        self.headers.insert(name.to_string(), value.to_string());
    }

    /// Quita un header, retornando su valor anterior
    pub fn remove_header(&mut self, name: &str) -> Option<String> {
        self.headers.remove(name)
    }

    /// Obtiene un header específico
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(|s| s.as_str())
    }

    /// Establece el cuerpo desde un string y actualiza `Content-Length`
    pub fn set_body(&mut self, body: &str) {
        self.set_body_bytes(body.as_bytes().to_vec());
    }

    /// Establece el cuerpo desde bytes y actualiza `Content-Length`
    pub fn set_body_bytes(&mut self, body: Vec<u8>) {
        let length = body.len().to_string();
        self.body = body;
        self.add_header(CONTENT_LENGTH, &length);
    }

    /// Carga un archivo completo en memoria como body de descarga.
    ///
    /// Agrega `Content-Disposition: attachment; filename="<nombre>"` y
    /// `Content-Length`. El `Content-Type` lo decide quien llama.
    pub fn set_body_file(&mut self, path: impl AsRef<Path>) -> io::Result<()> {
        let path = path.as_ref();
        let contents = fs::read(path)?;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        self.add_header(
            "Content-Disposition",
            &format!("attachment; filename=\"{}\"", name),
        );
        self.set_body_bytes(contents);
        Ok(())
    }

    /// Convierte la respuesta a bytes listos para enviar por el socket
    ///
    /// - Status line: `<protocolo> <código> <texto>\r\n`
    /// - Headers: `Name: Value\r\n`
    /// - Línea vacía: `\r\n`
    /// - Body
    ///
    /// `Content-Length` se escribe siempre a partir del body real, aunque un
    /// handler haya dejado un valor viejo o lo haya borrado.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut result = Vec::with_capacity(128 + self.body.len());

        let status_line = format!("{} {}\r\n", self.protocol, self.status);
        result.extend_from_slice(status_line.as_bytes());

        let mut has_length = false;
        for (name, value) in &self.headers {
            if name.eq_ignore_ascii_case(CONTENT_LENGTH) {
                has_length = true;
                continue;
            }
            result.extend_from_slice(format!("{}: {}\r\n", name, value).as_bytes());
        }

        if has_length || !self.body.is_empty() {
            let line = format!("{}: {}\r\n", CONTENT_LENGTH, self.body.len());
            result.extend_from_slice(line.as_bytes());
        }

        result.extend_from_slice(b"\r\n");
        result.extend_from_slice(&self.body);

        result
    }

    /// Obtiene el protocolo de la status line
    pub fn protocol(&self) -> &str {
        &self.protocol
    }

    /// Obtiene el código de estado de la respuesta
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Obtiene una referencia a los headers
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Obtiene una referencia al body
    pub fn body(&self) -> &[u8] {
        &self.body
    }
}
