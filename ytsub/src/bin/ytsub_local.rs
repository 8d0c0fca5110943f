use anyhow::{Result, anyhow};

use ytsub::{
    local::{self, LocalAuthorizer, LocalSettings, LocalState},
    logging,
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    logging::init_tracing();

    let settings = LocalSettings::new()?;
    settings.validate().map_err(|e| anyhow!(e))?;

    let authorizer = LocalAuthorizer::from_settings(&settings)?;
    let app = local::router(LocalState::new(authorizer, &settings));

    let addr = format!("{}:{}", settings.host, settings.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("ytsub listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
