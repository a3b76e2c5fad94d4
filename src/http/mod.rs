//! # Módulo HTTP
//! src/http/mod.rs
//!
//! Codec de wire: convierte bytes crudos en un [`Request`] tipado y un
//! [`Response`] tipado de vuelta en bytes.
//!
//! - Parsing de requests HTTP/1.1 (request line, headers, body por `Content-Length`)
//! - Construcción y serialización de responses
//! - Status codes
//!
//! Fuera de alcance: keep-alive, chunked transfer encoding, headers
//! multi-línea y query strings.

pub mod request;   // Parsing de HTTP requests
pub mod response;  // Construcción de HTTP responses
pub mod status;    // Códigos de estado HTTP

// Permite usar `http::Request` en vez de `http::request::Request`
pub use request::{Method, ParseError, Request};
pub use response::Response;
pub use status::StatusCode;
