pub mod api;
pub mod banner;
pub mod config;
pub mod error;
pub mod models;
pub mod openapi;
pub mod services;
pub mod state;

use std::net::SocketAddr;

use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use utoipa_scalar::{Scalar, Servable};

pub use api::create_router;
pub use banner::print_banner;
pub use config::{Config, ConfigError, Environment};
pub use error::{AppError, AppResult};
pub use state::AppState;

pub async fn run_server(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    // Ensure the data directory exists
    std::fs::create_dir_all(&config.data_path)?;
    tracing::info!("Using data directory {}", config.data_path.display());

    let state = AppState::new(config).await?;
    let addr = SocketAddr::from(([0, 0, 0, 0], state.config.port));
    let static_dir = state.config.static_dir.clone();

    if state.config.backfill_covers {
        services::backfill_covers(&state.users, &state.series, state.metadata.as_ref()).await;
    }

    let (router, api) = create_router(state);
    let app = router.merge(Scalar::with_url("/docs", api));

    // Serve the frontend if its directory exists
    let app = if static_dir.exists() {
        tracing::info!("Serving static files from {}", static_dir.display());
        let serve_dir =
            ServeDir::new(&static_dir).not_found_service(ServeFile::new(static_dir.join("index.html")));
        app.fallback_service(serve_dir)
    } else {
        app
    };
    let app = app.layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on {}", addr);
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
