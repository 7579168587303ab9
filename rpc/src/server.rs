//! Axum-based HTTP server.

use crate::error::RpcError;
use crate::handlers::{self, AppState};
use axum::routing::{get, patch, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tracing::info;

pub struct RpcServer {
    pub port: u16,
}

impl RpcServer {
    pub fn new(port: u16) -> Self {
        Self { port }
    }

    /// Build the full route table over the given state.
    pub fn router(state: AppState) -> Router {
        Router::new()
            .route(
                "/reports",
                get(handlers::list_reports).post(handlers::submit_report),
            )
            .route(
                "/reports/:id",
                get(handlers::get_report).delete(handlers::delete_report),
            )
            .route("/reports/:id/verify", post(handlers::verify_report))
            .route(
                "/reports/:id/undo-verify",
                post(handlers::undo_verify_report),
            )
            .route("/reports/:id/status", patch(handlers::set_report_status))
            .route("/statistics", get(handlers::statistics))
            .route("/sms", post(handlers::inbound_sms))
            .layer(CorsLayer::permissive())
            .with_state(state)
    }

    /// Bind and serve until the process exits.
    pub async fn start(&self, state: AppState) -> Result<(), RpcError> {
        let router = Self::router(state);
        let listener = tokio::net::TcpListener::bind(("0.0.0.0", self.port))
            .await
            .map_err(|e| RpcError::Server(e.to_string()))?;
        info!(port = self.port, "rpc server listening");
        axum::serve(listener, router)
            .await
            .map_err(|e| RpcError::Server(e.to_string()))?;
        Ok(())
    }
}
