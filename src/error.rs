//! # Errores del Servidor
//! src/error.rs
//!
//! Solo `Bind` es fatal. Los demás afectan a una única conexión (o a un
//! único `accept`) y el servidor sigue atendiendo.

use crate::http::ParseError;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    /// No se pudo abrir el socket de escucha
    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to accept connection: {0}")]
    Accept(#[source] io::Error),

    #[error("failed to read request: {0}")]
    Read(#[source] io::Error),

    #[error("failed to write response: {0}")]
    Write(#[source] io::Error),

    /// El cliente mandó más bytes que `max_request_bytes`
    #[error("request exceeds {limit} bytes")]
    RequestTooLarge { limit: usize },

    #[error(transparent)]
    Parse(#[from] ParseError),
}
