//! # Módulo del Servidor HTTP
//! src/server/mod.rs
//!
//! 1. `tcp`: escucha en un puerto y acepta conexiones (un thread por conexión)
//! 2. `connection`: lee y parsea el request, lo despacha y escribe la respuesta

pub mod connection;
pub mod tcp;

// Re-exportar para facilitar el uso
pub use connection::ConnectionSettings;
pub use tcp::Server;
