//! # Comandos del Servidor
//! src/commands/mod.rs
//!
//! Handlers de los endpoints y la tabla de rutas que los registra.
//!
//! | Método | Patrón        | Modo    | Handler              |
//! |--------|---------------|---------|----------------------|
//! | GET    | `/`           | exacto  | `root_handler`       |
//! | GET    | `/echo/`      | prefijo | `echo_handler`       |
//! | GET    | `/user-agent` | prefijo | `user_agent_handler` |
//! | GET    | `/files/`     | prefijo | `files::get_file`    |
//! | POST   | `/files/`     | prefijo | `files::post_file`   |

pub mod basic;
pub mod files;

// Re-exportar funciones útiles
pub use basic::*;

use crate::http::{Method, Request};
use crate::router::Router;
use std::path::PathBuf;
use std::sync::Arc;

/// Arma la tabla de rutas del servidor
///
/// `directory` es desde donde se sirven y guardan los archivos de `/files/`.
pub fn router(directory: impl Into<PathBuf>) -> Router {
    let directory = Arc::new(directory.into());
    let mut router = Router::new();

    router.handle_strict(Method::GET, "/", root_handler);
    router.handle(Method::GET, ECHO_PREFIX, echo_handler);
    router.handle(Method::GET, "/user-agent", user_agent_handler);

    let dir = Arc::clone(&directory);
    router.handle(Method::GET, files::FILES_PREFIX, move |req: &Request| {
        files::get_file(req, &dir)
    });
    router.handle(Method::POST, files::FILES_PREFIX, move |req: &Request| {
        files::post_file(req, &directory)
    });

    router
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_router_registers_all_endpoints() {
        let router = router("/tmp");

        assert_eq!(router.len(), 5);
        assert_eq!(router.resolve(Method::GET, "/"), Some("/"));
        assert_eq!(router.resolve(Method::GET, "/index.html"), None);
        assert_eq!(router.resolve(Method::GET, "/echo/x/y"), Some("/echo/"));
        assert_eq!(router.resolve(Method::GET, "/user-agent"), Some("/user-agent"));
        assert_eq!(router.resolve(Method::POST, "/files/a"), Some("/files/"));
        assert_eq!(router.resolve(Method::POST, "/echo/a"), None);
    }
}
