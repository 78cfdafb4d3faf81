use protocol_advisor::{
    api::{build_router, AppState},
    config::Config,
    ml::{factory, Model},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::load().unwrap_or_else(|e| {
        eprintln!("Failed to load configuration: {}", e);
        eprintln!("Using default configuration");
        Config::default()
    });

    // Initialize tracing
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
            "protocol_advisor={},tower_http=info",
            config.observability.log_level
        )
        .into()
    });

    let registry = tracing_subscriber::registry().with(env_filter);
    if config.observability.json_logs {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Starting Protocol Advisor v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Model type: {}", config.model.model_type);

    // Build the configured model variant and load its persisted artifact
    let mut model = factory::create_model_from_config(&config.model)?;

    let artifact_path = &config.model.artifact_path;
    if artifact_path.exists() {
        model.load(artifact_path)?;
        tracing::info!(path = %artifact_path.display(), "Model artifact loaded");
    } else {
        tracing::warn!(
            path = %artifact_path.display(),
            "No model artifact found; serving untrained model"
        );
        tracing::warn!(
            "Train one with: protocol-advisor-cli train --data <csv> --output {}",
            artifact_path.display()
        );
    }

    let state = AppState::new(model);
    let app = build_router(state);

    // Start HTTP server
    let http_addr = format!("{}:{}", config.server.host, config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_addr).await?;

    tracing::info!("HTTP API server listening on http://{}", http_addr);
    tracing::info!("   Health check: http://{}/health", http_addr);
    tracing::info!("   Prediction: http://{}/predict", http_addr);
    tracing::info!("   Protocol catalog: http://{}/protocols", http_addr);

    tokio::select! {
        result = axum::serve(http_listener, app) => {
            if let Err(e) = result {
                tracing::error!("HTTP server error: {}", e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    tracing::info!("Shutting down gracefully...");
    Ok(())
}
