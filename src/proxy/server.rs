use crate::proxy::config::ProxyConfig;
use crate::proxy::handlers;
use crate::proxy::upstream::UpstreamClient;
use axum::{
    extract::DefaultBodyLimit,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::oneshot;
use tower_http::trace::TraceLayer;
use tracing::{debug, error};

/// Axum application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ProxyConfig>,
    pub upstream: Arc<UpstreamClient>,
}

/// Health-check payload for `GET /`
#[derive(Debug, Serialize)]
struct ServiceStatus {
    status: &'static str,
    endpoint: &'static str,
}

/// Axum server instance
pub struct AxumServer {
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl AxumServer {
    /// Start Axum server
    pub async fn start(
        config: ProxyConfig,
    ) -> Result<(Self, tokio::task::JoinHandle<()>), String> {
        let addr = format!("{}:{}", config.bind_address(), config.port);
        let port = config.port;

        let state = AppState {
            upstream: Arc::new(UpstreamClient::new(config.upstream_url.clone())),
            config: Arc::new(config),
        };

        let app = router(state);

        // Bind address
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| format!("Failed to bind address {}: {}", addr, e))?;

        tracing::info!("NVIDIA NIM Proxy running on port {}", port);

        // Create shutdown channel
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();

        let server_instance = Self {
            shutdown_tx: Some(shutdown_tx),
        };

        // Start server in new task; each accepted connection is served on its
        // own task
        let handle = tokio::spawn(async move {
            use hyper::server::conn::http1;
            use hyper_util::rt::TokioIo;
            use hyper_util::service::TowerToHyperService;

            loop {
                tokio::select! {
                    res = listener.accept() => {
                        match res {
                            Ok((stream, _)) => {
                                let io = TokioIo::new(stream);
                                let service = TowerToHyperService::new(app.clone());

                                tokio::task::spawn(async move {
                                    if let Err(err) = http1::Builder::new()
                                        .serve_connection(io, service)
                                        .await
                                    {
                                        debug!("Connection handling finished or errored: {:?}", err);
                                    }
                                });
                            }
                            Err(e) => {
                                error!("Failed to accept connection: {:?}", e);
                            }
                        }
                    }
                    _ = &mut shutdown_rx => {
                        tracing::info!("Proxy server stopped listening");
                        break;
                    }
                }
            }
        });

        Ok((server_instance, handle))
    }

    /// Stop server
    pub fn stop(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

/// Build the application router
fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health_check_handler))
        .route(
            "/v1/chat/completions",
            post(handlers::openai::handle_chat_completions),
        )
        .layer(DefaultBodyLimit::max(10 * 1024 * 1024))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check handler
async fn health_check_handler() -> Response {
    Json(ServiceStatus {
        status: "NVIDIA NIM Proxy is running",
        endpoint: "/v1/chat/completions",
    })
    .into_response()
}
