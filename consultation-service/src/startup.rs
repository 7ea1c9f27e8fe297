use crate::config::ConsultationConfig;
use crate::handlers;
use crate::services::providers;
use crate::services::{ConsultationOrchestrator, HistoryStore, ModelInvoker};
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use std::future::IntoFuture;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Attachments are read fully into memory; bound the request body.
const MAX_BODY_BYTES: usize = 20 * 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub config: ConsultationConfig,
    pub history: HistoryStore,
    pub orchestrator: ConsultationOrchestrator,
}

pub struct Application {
    port: u16,
    server: Box<dyn std::future::Future<Output = std::io::Result<()>> + Send + Unpin>,
    state: AppState,
}

impl Application {
    pub async fn build(config: ConsultationConfig) -> Result<Self, AppError> {
        let provider = providers::build(&config).map_err(|e| {
            tracing::error!("Failed to build text provider: {}", e);
            AppError::ConfigError(anyhow::Error::new(e))
        })?;

        tracing::info!(
            provider = %config.provider.name,
            model = %config.google.model,
            "Initialized text provider"
        );

        let history = HistoryStore::new(config.history.file_path.clone())
            .await
            .map_err(|e| {
                tracing::error!(
                    "Failed to initialize history store at {}: {}",
                    config.history.file_path,
                    e
                );
                e
            })?;

        let invoker = ModelInvoker::new(provider, config.invocation.deadline());
        let orchestrator = ConsultationOrchestrator::new(invoker, history.clone());

        let state = AppState {
            config: config.clone(),
            history,
            orchestrator,
        };

        let app = Router::new()
            .route("/health", get(handlers::health_check))
            .route("/metrics", get(handlers::metrics_endpoint))
            .route("/consultations", post(handlers::submit_consultation))
            .route("/consultations/history", get(handlers::read_history))
            .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
            .layer(TraceLayer::new_for_http())
            .with_state(state.clone());

        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Listening on {}", port);

        let server = axum::serve(listener, app);

        Ok(Self {
            port,
            server: Box::new(server.into_future()),
            state,
        })
    }

    pub fn history(&self) -> &HistoryStore {
        &self.state.history
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.server.await
    }
}
