mod api;
mod state;

use axum::{
    Router,
    routing::{get, post},
};
use std::{
    net::{Ipv4Addr, SocketAddrV4},
    path::Path,
};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt as _, util::SubscriberInitExt as _};

use state::AppState;

pub const DEFAULT_PORT: u16 = 8452;

pub async fn run(roster_path: &Path, script_url: &str, port: u16) -> anyhow::Result<()> {
    // Initialize tracing if not already initialized
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cuenta_corriente_web=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();

    let state = AppState::new(roster_path, script_url);

    let app = Router::new()
        .route("/api/init", get(api::init_handler))
        .route("/api/afiliado", get(api::search_member))
        .route("/api/movimiento", post(api::save_movement))
        .route("/api/export", get(api::export_movements))
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    let listen = SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, port);
    let listener = tokio::net::TcpListener::bind(listen).await?;
    tracing::info!("Server listening on http://{}", listen);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {err}");
    }
}
