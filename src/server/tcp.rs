//! # Servidor TCP Concurrente
//! src/server/tcp.rs
//!
//! Loop de aceptación: cada conexión aceptada se entrega a su propio thread
//! y el loop vuelve inmediatamente a `accept`, así un handler lento no
//! frena a las conexiones nuevas.

use super::connection::{self, ConnectionSettings};
use crate::config::Config;
use crate::error::ServerError;
use crate::router::Router;
use std::net::{TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;

/// Servidor HTTP concurrente
#[derive(Debug)]
pub struct Server {
    config: Config,
    router: Arc<Router>,
    settings: ConnectionSettings,
}

impl Server {
    /// Crea el servidor con una tabla de rutas ya armada.
    ///
    /// El router pasa a ser de solo lectura: se comparte entre threads sin
    /// locks.
    pub fn new(config: Config, router: Router) -> Self {
        let settings = ConnectionSettings::from(&config);
        Self {
            config,
            router: Arc::new(router),
            settings,
        }
    }

    /// Abre el socket de escucha en `config.address()`
    pub fn bind(&self) -> Result<TcpListener, ServerError> {
        let address = self.config.address();
        TcpListener::bind(&address).map_err(|source| ServerError::Bind { address, source })
    }

    /// Hace bind y atiende conexiones para siempre.
    ///
    /// Solo retorna si falla el bind.
    pub fn run(&self) -> Result<(), ServerError> {
        let listener = self.bind()?;
        self.serve(listener);
        Ok(())
    }

    /// Atiende conexiones de un listener ya abierto
    pub fn serve(&self, listener: TcpListener) {
        match listener.local_addr() {
            Ok(addr) => tracing::info!(address = %addr, routes = self.router.len(), "servidor escuchando"),
            Err(e) => tracing::warn!(error = %e, "no se pudo leer la dirección local"),
        }

        for stream in listener.incoming() {
            match stream {
                Ok(stream) => self.spawn_connection(stream),
                Err(e) => {
                    // Un accept fallido no afecta a las conexiones en curso
                    tracing::warn!(error = %ServerError::Accept(e), "accept fallido");
                }
            }
        }
    }

    fn spawn_connection(&self, stream: TcpStream) {
        let peer = stream
            .peer_addr()
            .map(|addr| addr.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        tracing::debug!(%peer, "nueva conexión");

        let router = Arc::clone(&self.router);
        let settings = self.settings;
        let span = tracing::info_span!("connection", %peer);

        let spawned = thread::Builder::new()
            .name("connection".to_string())
            .spawn(move || {
                let _entered = span.enter();
                if let Err(e) = connection::handle(stream, &router, &settings) {
                    tracing::warn!(error = %e, "conexión descartada");
                }
            });

        if let Err(e) = spawned {
            tracing::warn!(%peer, error = %e, "no se pudo crear el thread de la conexión");
        }
    }
}
