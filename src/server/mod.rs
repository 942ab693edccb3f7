pub mod api;
pub mod page;

use crate::cli::Args;
use std::error::Error;
use std::net::SocketAddr;
use std::time::Duration;
use axum::Router;
use log::{ info, error };

use self::api::{ build_router, AppState };

const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

pub struct Server {
    addr: String,
    state: AppState,
    args: Args,
}

impl Server {
    pub fn new(addr: String, state: AppState, args: Args) -> Self {
        Self { addr, state, args }
    }

    pub fn router(&self) -> Router {
        build_router(self.state.clone(), self.args.max_upload_bytes)
    }

    pub async fn run(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        let addr = self.addr.parse::<SocketAddr>()?;
        let app = self.router();

        match (&self.args.tls_cert_path, &self.args.tls_key_path) {
            (Some(cert_path), Some(key_path)) if self.args.enable_tls => {
                info!(
                    "TLS enabled. Loading certificate from '{}' and key from '{}'",
                    cert_path,
                    key_path
                );
                if rustls::crypto::ring::default_provider().install_default().is_err() {
                    info!("rustls crypto provider already installed");
                }
                let tls_config = axum_server::tls_rustls::RustlsConfig::from_pem_file(
                    cert_path,
                    key_path
                ).await?;

                let handle = axum_server::Handle::new();
                let shutdown_handle = handle.clone();
                tokio::spawn(async move {
                    shutdown_signal().await;
                    shutdown_handle.graceful_shutdown(Some(SHUTDOWN_GRACE));
                });

                info!("Starting HTTPS server on: https://{}", addr);
                axum_server::bind_rustls(addr, tls_config)
                    .handle(handle)
                    .serve(app.into_make_service()).await?;
            }
            _ => {
                let listener = match tokio::net::TcpListener::bind(addr).await {
                    Ok(listener) => listener,
                    Err(e) => {
                        error!("Failed to bind HTTP server to {}: {}. Try a different port.", addr, e);
                        return Err(e.into());
                    }
                };
                info!("Starting HTTP server on: http://{}", addr);
                axum::serve(listener, app.into_make_service())
                    .with_graceful_shutdown(shutdown_signal()).await?;
            }
        }

        info!("Server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
