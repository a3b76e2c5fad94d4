//! # minihttpd - Entry Point
//! src/main.rs
//!
//! Lee la configuración, arma las rutas y arranca el servidor.
//! Solo un fallo al abrir el socket termina el proceso.

use minihttpd::commands;
use minihttpd::config::Config;
use minihttpd::server::Server;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "minihttpd=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Crear configuración (CLI o env)
    let config = Config::new();

    if let Err(e) = config.validate() {
        tracing::error!(error = %e, "configuración inválida");
        std::process::exit(2);
    }

    tracing::info!(
        address = %config.address(),
        directory = %config.directory,
        read_timeout_ms = config.read_timeout_ms,
        write_timeout_ms = config.write_timeout_ms,
        "configuración cargada"
    );

    let router = commands::router(&config.directory);
    let server = Server::new(config, router);

    // Bloquea el thread; solo retorna si falla el bind
    if let Err(e) = server.run() {
        tracing::error!(error = %e, "error fatal");
        std::process::exit(1);
    }
}
