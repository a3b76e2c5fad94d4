//! # minihttpd
//! src/lib.rs
//!
//! Servidor HTTP/1.1 mínimo implementado desde cero: convierte bytes crudos
//! en requests tipados, los despacha a handlers por método y path, y
//! serializa la respuesta de vuelta a bytes.
//!
//! ## Arquitectura
//!
//! - `http`: codec de wire (parsing de requests, serialización de responses)
//! - `router`: tabla de rutas con coincidencia exacta o por prefijo
//! - `server`: loop de aceptación y manejo de cada conexión
//! - `commands`: endpoints `/`, `/echo/`, `/user-agent` y `/files/`
//! - `config`: argumentos CLI y variables de entorno
//! - `error`: errores del servidor
//!
//! ## Ejemplo de uso
//!
//! ```no_run
//! use minihttpd::config::Config;
//! use minihttpd::server::Server;
//!
//! let config = Config::default();
//! let router = minihttpd::commands::router(&config.directory);
//! let server = Server::new(config, router);
//! server.run().expect("Error al iniciar servidor");
//! ```

pub mod commands;
pub mod config;
pub mod error;
pub mod http;
pub mod router;
pub mod server;
