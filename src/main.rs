use anyhow::Result;
use axum::Router;
use std::net::SocketAddr;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use translator_backend::config::Config;
use translator_backend::routes;
use translator_backend::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "translator_backend=debug,tower_http=debug".into()),
        )
        .init();

    let config_paths: Vec<String> = vec![
        std::env::var("CONFIG_PATH").ok(),
        Some("conf.yaml".to_string()),
        Some("conf.json".to_string()),
    ]
    .into_iter()
    .flatten()
    .collect();

    let mut config = None;
    for path in &config_paths {
        match Config::load(path) {
            Ok(cfg) => {
                info!("loaded configuration from {path}");
                config = Some(cfg);
                break;
            }
            Err(e) => {
                tracing::debug!("failed to load config from {path}: {e}");
            }
        }
    }
    let config = config.unwrap_or_else(|| {
        info!("no config file found, using defaults");
        Config::default()
    });

    let app_state = AppState::new(config.clone());

    let app = Router::new()
        .merge(routes::create_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    let addr = SocketAddr::new(
        config.system_config.host.parse()?,
        config.system_config.port,
    );
    info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
