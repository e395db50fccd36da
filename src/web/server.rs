//! Web server bootstrap

use axum::Router;
use axum_server::tls_rustls::RustlsConfig;
use std::{net::SocketAddr, path::PathBuf};
use tower_http::cors::CorsLayer;
use tracing::info;

use super::api::{api_router, ApiState};
use crate::managers::SharedRegistrationManager;

/// Certificate and key for serving HTTPS
#[derive(Debug, Clone)]
pub struct TlsPaths {
    /// Path to certificate PEM file (cert + CA bundle)
    pub cert_path: PathBuf,
    /// Path to private key PEM file
    pub key_path: PathBuf,
}

/// Web server configuration
#[derive(Debug, Clone)]
pub struct WebServerConfig {
    pub port: u16,
    /// Serve HTTPS when set, plain HTTP otherwise
    pub tls: Option<TlsPaths>,
}

impl Default for WebServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            tls: None,
        }
    }
}

impl WebServerConfig {
    /// Create config from environment variables
    pub fn from_env() -> Self {
        let tls = match (std::env::var("TLS_CERT_PATH"), std::env::var("TLS_KEY_PATH")) {
            (Ok(cert), Ok(key)) => Some(TlsPaths {
                cert_path: PathBuf::from(cert),
                key_path: PathBuf::from(key),
            }),
            _ => None,
        };

        Self {
            port: std::env::var("PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(3000),
            tls,
        }
    }
}

/// Full application router with CORS
pub fn build_app(registration_manager: SharedRegistrationManager) -> Router {
    api_router(ApiState {
        registration_manager,
    })
    .layer(CorsLayer::permissive())
}

/// Start the signup API server
pub async fn start_web_server(
    config: WebServerConfig,
    registration_manager: SharedRegistrationManager,
) -> anyhow::Result<()> {
    let app = build_app(registration_manager);
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));

    match config.tls {
        Some(tls) => {
            info!("Loading TLS certificates:");
            info!("  Certificate: {}", tls.cert_path.display());
            info!("  Private key: {}", tls.key_path.display());

            if !tls.cert_path.exists() {
                return Err(anyhow::anyhow!(
                    "Certificate file not found: {}",
                    tls.cert_path.display()
                ));
            }
            if !tls.key_path.exists() {
                return Err(anyhow::anyhow!(
                    "Private key file not found: {}",
                    tls.key_path.display()
                ));
            }

            let tls_config = RustlsConfig::from_pem_file(&tls.cert_path, &tls.key_path)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to load TLS certificates: {}", e))?;

            info!("Server running on port {} (HTTPS)", config.port);
            info!("API endpoint: https://localhost:{}/api/alpha-signup", config.port);

            axum_server::bind_rustls(addr, tls_config)
                .serve(app.into_make_service())
                .await?;
        }
        None => {
            let listener = tokio::net::TcpListener::bind(addr).await?;

            info!("Server running on port {}", config.port);
            info!("API endpoint: http://localhost:{}/api/alpha-signup", config.port);

            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::managers::registration_manager::tests::{manager_with, RecordingMailer};
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use std::sync::Arc;
    use std::time::Duration;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_cors_allows_any_origin() {
        let manager = manager_with(
            &["A1"],
            Arc::new(RecordingMailer::default()),
            Duration::from_secs(1),
        );
        let app = build_app(Arc::new(manager));

        let response = app
            .oneshot(
                Request::get("/api/health")
                    .header(header::ORIGIN, "https://celestialchaos.example")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let allow_origin = response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|v| v.to_str().ok());
        assert_eq!(allow_origin, Some("*"));
    }

    #[test]
    fn test_default_config() {
        let config = WebServerConfig::default();
        assert_eq!(config.port, 3000);
        assert!(config.tls.is_none());
    }
}
