//! Tomato classifier HTTP server
//!
//! Loads the model once, then serves predictions until SIGINT/SIGTERM.

use std::{sync::Arc, time::Duration};

use application::PredictionService;
use infrastructure::{AppConfig, ClassifierAdapter, config::MODEL_PATH_ENV, init_tracing};
use presentation_http::{routes, server, state::AppState};
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logging depends on the configuration, so any load error is reported after init
    let (config, load_error) = match AppConfig::load() {
        Ok(config) => (config, None),
        Err(e) => {
            let mut config = AppConfig::default();
            config.apply_model_path_override(std::env::var(MODEL_PATH_ENV).ok());
            (config, Some(e))
        },
    };

    init_tracing(&config.logging)?;

    info!("Tomato classifier v{} starting...", env!("CARGO_PKG_VERSION"));
    if let Some(e) = load_error {
        warn!("Failed to load config, using defaults: {}", e);
    }

    info!(
        host = %config.server.host,
        port = %config.server.port,
        model = %config.classifier.model_path,
        "Configuration loaded"
    );

    // Without a model there is nothing to serve
    let adapter = ClassifierAdapter::load(&config.classifier)
        .map_err(|e| anyhow::anyhow!("Failed to load model: {e}"))?;

    let prediction_service = PredictionService::new(Arc::new(adapter));
    info!(
        model = %prediction_service.model_name(),
        classes = prediction_service.class_count(),
        "Model ready"
    );

    let addr = config.server.bind_address();
    let drain_timeout = config.server.shutdown_timeout_secs.map(Duration::from_secs);

    let app = routes::create_router(AppState::new(prediction_service, config));

    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);

    server::serve(listener, app, server::shutdown_signal(), drain_timeout).await?;

    info!("Server shutdown complete");

    Ok(())
}
