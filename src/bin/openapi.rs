//! Writes the OpenAPI document to `api.json` without starting the server.

use digital_wallet::bootstrap;
use digital_wallet::config::{env_lookup, resolve_public_url};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    bootstrap::init_base().await;

    let public_url = resolve_public_url(env_lookup);
    digital_wallet::docs::generate_docs(&public_url, "api.json").await?;

    tracing::info!(file = "api.json", "OpenAPI document written");

    Ok(())
}
