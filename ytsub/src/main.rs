use anyhow::Result;

use ytsub::{
    logging,
    server::{self, AppState, Configuration},
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    logging::init_tracing();

    // Load configuration
    let configuration = Configuration::new()?;
    tracing::info!(
        environment = ?configuration.server.environment,
        "Configuration loaded successfully"
    );

    let app = server::router(AppState::new(&configuration)?);

    // Start server
    let addr = format!(
        "{}:{}",
        configuration.server.host, configuration.server.port
    );
    tracing::info!("Starting ytsub server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
