use std::time::Duration;

use anyhow::Context;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};

use crate::config::AppConfig;

/// Something that can bring the database up. Resolves once the connection
/// is usable and the schema is current.
pub trait Storage: Send + Sync {
    fn init(&self) -> impl std::future::Future<Output = anyhow::Result<DatabaseConnection>> + Send;
}

#[derive(Clone, Debug)]
pub struct DatabaseStorage {
    url: String,
    max_connections: u32,
}

impl DatabaseStorage {
    pub fn new(url: impl Into<String>, max_connections: u32) -> Self {
        DatabaseStorage {
            url: url.into(),
            max_connections,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        DatabaseStorage::new(config.database_url.clone(), config.database_max_connections)
    }
}

impl Storage for DatabaseStorage {
    async fn init(&self) -> anyhow::Result<DatabaseConnection> {
        let mut options = ConnectOptions::new(self.url.clone());
        options
            .max_connections(self.max_connections)
            .connect_timeout(Duration::from_secs(10))
            .sqlx_logging(false);

        let db = Database::connect(options)
            .await
            .context("cannot connect to database")?;

        Migrator::up(&db, None)
            .await
            .context("cannot run database migrations")?;

        Ok(db)
    }
}
