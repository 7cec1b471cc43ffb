//! Server binary: loads configuration, connects storage, serves the API.

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use veneer::{AppState, Config};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("veneer=info".parse()?))
        .init();

    let config = Config::from_env()?;
    let storage = veneer::connect(&config)?;
    let listen_addr = config.listen_addr.clone();
    let state = AppState::new(storage, config);

    let listener = TcpListener::bind(&listen_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, veneer::app(state)).await?;
    Ok(())
}
