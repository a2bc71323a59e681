pub mod cache;
pub mod config;
pub mod contact;
pub mod error;
pub mod handlers;
pub mod lastfm;
pub mod logging;
pub mod mailer;
pub mod models;
pub mod now_playing;
pub mod render;
pub mod state;
pub mod upstream;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use state::AppState;
use std::future::Future;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/contact", post(handlers::submit_contact))
        .fallback(handlers::serve_page)
        .layer(CatchPanicLayer::custom(handlers::panic_marker))
        .layer(middleware::from_fn_with_state(state.clone(), handlers::render_panics))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Resolves on ctrl-c or, on unix, SIGTERM. The SIGTERM listener is installed
/// before this returns.
pub fn shutdown_signal() -> impl Future<Output = ()> + Send + 'static {
    #[cfg(unix)]
    let terminate = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
        .map_err(|e| tracing::error!("Failed to listen for SIGTERM: {}", e))
        .ok();

    async move {
        let ctrl_c = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for ctrl-c: {}", e);
                std::future::pending::<()>().await;
            }
        };

        #[cfg(unix)]
        let terminate = async move {
            match terminate {
                Some(mut stream) => {
                    stream.recv().await;
                }
                None => std::future::pending::<()>().await,
            }
        };
        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => tracing::info!("Received ctrl-c, shutting down"),
            _ = terminate => tracing::info!("Received SIGTERM, shutting down"),
        }
    }
}
