use site_web::config::Config;
use site_web::logging::init_logging;
use site_web::state::AppState;
use std::net::SocketAddr;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    init_logging(config.debug);

    let app_state = Arc::new(AppState::new(&config).await?);
    let writer = app_state.cache.start_periodic_writes();

    let app = site_web::router(app_state.clone());
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;

    tracing::info!(env = %config.app_env, "Server running on http://{}", config.bind_addr);

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(site_web::shutdown_signal())
        .await?;

    writer.abort();
    app_state.cache.flush().await?;
    tracing::info!("Cache flushed to {:?}", app_state.cache.file_path());
    Ok(())
}
