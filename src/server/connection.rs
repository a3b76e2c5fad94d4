//! # Manejo de una Conexión
//! src/server/connection.rs
//!
//! Una conexión atiende exactamente un request y se cierra:
//!
//! ```text
//! Accepted → Reading → Parsed → Dispatching → Responding → Closed
//! ```
//!
//! La lectura acumula bytes hasta ver `\r\n\r\n` y después lee exactamente
//! `Content-Length` bytes más. Cualquier error se queda en esta conexión:
//! el stream se suelta (y se cierra) al salir de [`handle`] por cualquier
//! camino.

use crate::config::Config;
use crate::error::ServerError;
use crate::http::request::{declared_body_len, find_head_end, HEAD_TERMINATOR};
use crate::http::{Request, Response};
use crate::router::Router;
use std::io::{ErrorKind, Read, Write};
use std::net::TcpStream;
use std::time::{Duration, Instant};

/// Tamaño de cada lectura del socket
const READ_CHUNK: usize = 1024;

/// Parámetros por conexión, copiados de [`Config`] al arrancar
#[derive(Debug, Clone, Copy)]
pub struct ConnectionSettings {
    pub read_timeout: Option<Duration>,
    pub write_timeout: Option<Duration>,
    pub max_request_bytes: usize,
}

impl From<&Config> for ConnectionSettings {
    fn from(config: &Config) -> Self {
        Self {
            read_timeout: config.read_timeout(),
            write_timeout: config.write_timeout(),
            max_request_bytes: config.max_request_bytes,
        }
    }
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

/// Atiende una conexión TCP completa: timeouts, un intercambio y cierre
pub fn handle(
    mut stream: TcpStream,
    router: &Router,
    settings: &ConnectionSettings,
) -> Result<(), ServerError> {
    stream
        .set_read_timeout(settings.read_timeout)
        .map_err(ServerError::Read)?;
    stream
        .set_write_timeout(settings.write_timeout)
        .map_err(ServerError::Write)?;

    exchange(&mut stream, router, settings.max_request_bytes)
}

/// Lee un request, lo despacha y escribe una única respuesta
///
/// Es genérico sobre el stream para poder probarlo sin sockets.
pub fn exchange<S: Read + Write>(
    stream: &mut S,
    router: &Router,
    max_request_bytes: usize,
) -> Result<(), ServerError> {
    let start = Instant::now();

    tracing::debug!("leyendo request");
    let raw = match read_request(stream, max_request_bytes) {
        Ok(raw) => raw,
        Err(e @ (ServerError::RequestTooLarge { .. } | ServerError::Parse(_))) => {
            write_response(stream, &Response::bad_request(&e.to_string()))?;
            return Err(e);
        }
        Err(e) => return Err(e),
    };

    if raw.is_empty() {
        tracing::debug!("peer cerró sin enviar datos");
        return Ok(());
    }

    let request = match Request::parse(&raw) {
        Ok(request) => request,
        Err(e) => {
            write_response(stream, &Response::bad_request(&e.to_string()))?;
            return Err(e.into());
        }
    };
    tracing::debug!(method = %request.method(), path = request.path(), "request parseado");

    let response = router.route(&request);

    let written = write_response(stream, &response)?;

    tracing::info!(
        method = %request.method(),
        path = request.path(),
        status = response.status().as_u16(),
        bytes = written,
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "request atendido"
    );

    if response.status().is_server_error() {
        tracing::warn!(
            path = request.path(),
            status = %response.status(),
            "el handler respondió con error"
        );
    }

    Ok(())
}

/// Acumula bytes hasta el fin de los headers y luego el body declarado
///
/// Retorna un buffer vacío si el peer cerró sin mandar nada. Si el peer
/// cierra antes de completar el request, retorna lo recibido y el parser
/// decide si alcanza.
pub fn read_request<R: Read>(reader: &mut R, max_bytes: usize) -> Result<Vec<u8>, ServerError> {
    let mut buffer = Vec::with_capacity(READ_CHUNK);
    let mut chunk = [0u8; READ_CHUNK];

    // 1. Headers
    let head_end = loop {
        if let Some(end) = find_head_end(&buffer) {
            break end;
        }
        if read_chunk(reader, &mut chunk, &mut buffer)? == 0 {
            return Ok(buffer);
        }
        if buffer.len() > max_bytes {
            return Err(ServerError::RequestTooLarge { limit: max_bytes });
        }
    };

    // 2. Body
    // Un Content-Length enorme no debe desbordar la suma
    let declared = declared_body_len(&buffer[..head_end])?;
    let total = (head_end + HEAD_TERMINATOR.len())
        .checked_add(declared)
        .filter(|&total| total <= max_bytes)
        .ok_or(ServerError::RequestTooLarge { limit: max_bytes })?;

    while buffer.len() < total {
        if read_chunk(reader, &mut chunk, &mut buffer)? == 0 {
            break;
        }
    }

    // Sin keep-alive: lo que venga después del body se descarta
    buffer.truncate(total);
    Ok(buffer)
}

fn read_chunk<R: Read>(
    reader: &mut R,
    chunk: &mut [u8],
    buffer: &mut Vec<u8>,
) -> Result<usize, ServerError> {
    loop {
        match reader.read(chunk) {
            Ok(n) => {
                buffer.extend_from_slice(&chunk[..n]);
                return Ok(n);
            }
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(ServerError::Read(e)),
        }
    }
}

fn write_response<W: Write>(stream: &mut W, response: &Response) -> Result<usize, ServerError> {
    tracing::debug!(status = response.status().as_u16(), "respondiendo");

    let bytes = response.to_bytes();
    stream.write_all(&bytes).map_err(ServerError::Write)?;
    stream.flush().map_err(ServerError::Write)?;

    Ok(bytes.len())
}
