//! # Sistema de Routing
//! src/router/mod.rs
//!
//! Mapea (método, patrón de path) a un handler.
//!
//! ## Arquitectura
//!
//! ```text
//! Request → Router → Handler → Response
//! ```
//!
//! Cada patrón se registra en modo exacto (`handle_strict`) o por prefijo
//! (`handle`). Si varios patrones coinciden con el path, gana el más largo
//! que tenga handler para el método del request; así cada request produce
//! exactamente una respuesta. Sin coincidencias se responde 404.
//!
//! La tabla se arma una vez al arrancar y el servidor la comparte en un
//! `Arc` sin locks: nadie la modifica mientras se atienden conexiones.

use crate::http::{Method, Request, Response};
use std::collections::HashMap;
use std::fmt;

/// Tipo de función handler
///
/// Un handler recibe un Request y retorna una Response. Puede capturar
/// estado de solo lectura (ej: el directorio de archivos).
pub type Handler = Box<dyn Fn(&Request) -> Response + Send + Sync>;

/// Cómo se compara un patrón contra el path del request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// El path debe ser igual al patrón
    Exact,

    /// El path debe empezar con el patrón
    Prefix,
}

impl MatchMode {
    fn matches(self, pattern: &str, path: &str) -> bool {
        match self {
            MatchMode::Exact => path == pattern,
            MatchMode::Prefix => path.starts_with(pattern),
        }
    }
}

struct Route {
    mode: MatchMode,
    handler: Handler,
}

/// Router que mapea patrones de path y métodos a handlers
pub struct Router {
    /// patrón → método → handler
    routes: HashMap<String, HashMap<Method, Route>>,
}

impl Router {
    /// Crea un nuevo router vacío
    pub fn new() -> Self {
        Self {
            routes: HashMap::new(),
        }
    }

    /// Registra un handler que coincide por prefijo
    ///
    /// Registrar otra vez el mismo (patrón, método) reemplaza el handler.
    ///
    /// # Ejemplo
    /// ```
    /// use minihttpd::http::{Method, Request, Response};
    /// use minihttpd::router::Router;
    ///
    /// let mut router = Router::new();
    /// router.handle(Method::GET, "/echo/", |req: &Request| {
    ///     let mut response = Response::ok(req.version());
    ///     response.set_body(&req.path()["/echo/".len()..]);
    ///     response
    /// });
    ///
    /// let request = Request::parse(b"GET /echo/abc HTTP/1.1\r\n\r\n").unwrap();
    /// assert_eq!(router.route(&request).body(), b"abc");
    /// ```
    pub fn handle<F>(&mut self, method: Method, pattern: &str, handler: F)
    where
        F: Fn(&Request) -> Response + Send + Sync + 'static,
    {
        self.insert(method, pattern, MatchMode::Prefix, Box::new(handler));
    }

    /// Registra un handler que solo coincide con el path exacto
    pub fn handle_strict<F>(&mut self, method: Method, pattern: &str, handler: F)
    where
        F: Fn(&Request) -> Response + Send + Sync + 'static,
    {
        self.insert(method, pattern, MatchMode::Exact, Box::new(handler));
    }

    fn insert(&mut self, method: Method, pattern: &str, mode: MatchMode, handler: Handler) {
        self.routes
            .entry(pattern.to_string())
            .or_default()
            .insert(method, Route { mode, handler });
    }

    /// Patrón que atendería un request con este método y path, si hay alguno
    pub fn resolve(&self, method: Method, path: &str) -> Option<&str> {
        self.select(method, path).map(|(pattern, _)| pattern)
    }

    fn select(&self, method: Method, path: &str) -> Option<(&str, &Route)> {
        self.routes
            .iter()
            .filter_map(|(pattern, by_method)| {
                by_method
                    .get(&method)
                    .filter(|route| route.mode.matches(pattern, path))
                    .map(|route| (pattern.as_str(), route))
            })
            // Dos patrones distintos que coinciden con el mismo path no
            // pueden tener el mismo largo, así que el máximo es único.
            .max_by_key(|(pattern, _)| pattern.len())
    }

    /// Encuentra y ejecuta el handler apropiado para un request
    ///
    /// Si no hay handler, retorna un 404 con el protocolo del request.
    pub fn route(&self, request: &Request) -> Response {
        match self.select(request.method(), request.path()) {
            Some((pattern, route)) => {
                tracing::debug!(pattern, mode = ?route.mode, "ruta seleccionada");
                (route.handler)(request)
            }
            None => {
                tracing::debug!(path = request.path(), "sin ruta");
                Response::not_found(request.version())
            }
        }
    }

    /// Cantidad de pares (patrón, método) registrados
    pub fn len(&self) -> usize {
        self.routes.values().map(HashMap::len).sum()
    }

    /// Indica si no hay rutas registradas
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut entries: Vec<(&str, Method, MatchMode)> = self
            .routes
            .iter()
            .flat_map(|(pattern, by_method)| {
                by_method
                    .iter()
                    .map(move |(method, route)| (pattern.as_str(), *method, route.mode))
            })
            .collect();
        entries.sort_by(|a, b| a.0.cmp(b.0).then(a.1.as_str().cmp(b.1.as_str())));

        f.debug_struct("Router").field("routes", &entries).finish()
    }
}
