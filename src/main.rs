use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use saree_relay::{api, config, provider, shutdown, status};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration before the filter so RUST_LOG from .env applies
    config::Config::dotenv_load();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("saree_relay=info,tower_http=info")),
        )
        .init();

    let config = config::Config::new()?;
    config.print_env_vars();
    if config.image_api_key.is_none() {
        tracing::warn!("No image provider API key configured; every generation will fall back to placeholders");
    }

    let image_client = provider::GeminiClient::new(
        config.image_api_url.clone(),
        config.image_model.clone(),
        config.image_api_key.clone(),
    );
    let store = status::open_store(&config.database_url).await?;

    let state = Arc::new(api::routes::AppState {
        provider: Arc::new(image_client),
        store: store.clone(),
        policy: config.generation_policy(),
        motif_max_count: config.motif_max_count,
    });
    let app = api::routes::router(state, &config.cors_origins);

    let ip: std::net::IpAddr = config.api_host.parse().unwrap_or_else(|_| {
        tracing::warn!("Invalid API_HOST '{}', falling back to 127.0.0.1", config.api_host);
        std::net::IpAddr::from([127, 0, 0, 1])
    });
    let port: u16 = config.api_port.parse().unwrap_or_else(|_| {
        tracing::warn!("Invalid API_PORT '{}', falling back to 8001", config.api_port);
        8001
    });
    let socket_address = SocketAddr::new(ip, port);
    tracing::info!("listening on {}", socket_address);

    axum::Server::bind(&socket_address)
        .serve(app.into_make_service())
        .with_graceful_shutdown(shutdown::shutdown_signal())
        .await?;

    store.close().await;
    tracing::info!("status store closed, bye");
    Ok(())
}
