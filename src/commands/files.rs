//! # Comandos de Archivos
//! src/commands/files.rs
//!
//! - `GET /files/<nombre>`: descarga un archivo del directorio configurado
//! - `POST /files/<nombre>`: crea (o sobrescribe) el archivo con el body
//!
//! Los nombres con `..`, `/` o `\` se rechazan para no salir del directorio.

use crate::http::{Request, Response, StatusCode};
use std::fs;
use std::path::Path;

/// Prefijo registrado para los comandos de archivos
pub const FILES_PREFIX: &str = "/files/";

/// Handler para GET /files/<nombre>
///
/// # Respuestas
/// - 200 con `Content-Type: application/octet-stream` y el archivo como body
/// - 400 si el nombre es inválido
/// - 404 si el archivo no existe
/// - 500 si no se pudo leer
pub fn get_file(req: &Request, directory: &Path) -> Response {
    let name = match file_name(req) {
        Some(name) => name,
        None => return invalid_name(req),
    };

    let path = directory.join(name);
    if !path.is_file() {
        return Response::not_found(req.version());
    }

    let mut response = Response::ok(req.version());
    response.add_header("Content-Type", "application/octet-stream");

    match response.set_body_file(&path) {
        Ok(()) => response,
        Err(e) => {
            tracing::warn!(file = %path.display(), error = %e, "no se pudo leer el archivo");
            Response::internal_error(req.version())
        }
    }
}

/// Handler para POST /files/<nombre>
///
/// Escribe el body tal cual (un body ausente crea un archivo vacío).
pub fn post_file(req: &Request, directory: &Path) -> Response {
    let name = match file_name(req) {
        Some(name) => name,
        None => return invalid_name(req),
    };

    let path = directory.join(name);
    match fs::write(&path, req.body().unwrap_or_default()) {
        Ok(()) => {
            tracing::debug!(file = %path.display(), "archivo creado");
            Response::created(req.version())
        }
        Err(e) => {
            tracing::warn!(file = %path.display(), error = %e, "no se pudo crear el archivo");
            Response::internal_error(req.version())
        }
    }
}

/// Extrae y valida el nombre de archivo del path
fn file_name(req: &Request) -> Option<&str> {
    let name = req.path().strip_prefix(FILES_PREFIX)?;

    if name.is_empty() || name.contains("..") || name.contains('/') || name.contains('\\') {
        return None;
    }

    Some(name)
}

fn invalid_name(req: &Request) -> Response {
    let mut response = Response::new(req.version(), StatusCode::BadRequest);
    response.add_header("Content-Type", "text/plain");
    response.set_body("Invalid filename");
    response
}
