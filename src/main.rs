use digital_wallet::bootstrap::{self, DatabaseStorage};
use digital_wallet::config::AppConfig;
use digital_wallet::routes;
use wallet_core::config::ConfigBuilder;

#[tokio::main]
async fn main() {
    bootstrap::init_base().await;

    let config = match AppConfig::build() {
        Ok(config) => config,
        Err(err) => {
            tracing::error!(error = ?err, "invalid configuration");
            std::process::exit(1);
        }
    };

    let storage = DatabaseStorage::from_config(&config);

    if let Err(err) = bootstrap::start_server(config, storage, routes::routes).await {
        if !err.already_logged() {
            tracing::error!(error = ?err, "server failed");
        }
        std::process::exit(1);
    }
}
