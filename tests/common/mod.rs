#![allow(dead_code)]

use axum::Router;
use digital_wallet::bootstrap::{self, DatabaseStorage, Sequencer, Storage};
use digital_wallet::config::AppConfig;
use sea_orm::DatabaseConnection;
use tokio::task::JoinHandle;

pub const TEST_ORIGIN: &str = "https://wallet.test";

pub fn test_config(port: u16) -> AppConfig {
    AppConfig {
        port,
        database_url: "sqlite::memory:".into(),
        database_max_connections: 1,
        allowed_origin: TEST_ORIGIN.into(),
        public_url: TEST_ORIGIN.into(),
        body_limit: 100 * 1024,
    }
}

pub fn memory_storage() -> DatabaseStorage {
    DatabaseStorage::new("sqlite::memory:", 1)
}

pub fn find_free_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

pub struct FailingStorage;

impl Storage for FailingStorage {
    async fn init(&self) -> anyhow::Result<DatabaseConnection> {
        anyhow::bail!("connection refused (os error 111)")
    }
}

pub struct TestApp {
    pub addr: String,
    handle: JoinHandle<()>,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.addr, path)
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Serves `api` behind the full middleware stack on a random local port.
pub async fn spawn_with(api: Router) -> TestApp {
    let app = bootstrap::build_app(&test_config(0), api).expect("build app");
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.expect("server run");
    });

    TestApp {
        addr: format!("http://{}", addr),
        handle,
    }
}

/// The real route groups on a fresh in-memory database.
pub async fn spawn_app() -> TestApp {
    let mut sequencer = Sequencer::new(memory_storage());
    let db = sequencer.initialize().await.expect("storage init");

    spawn_with(digital_wallet::routes::routes(db)).await
}

pub async fn wait_until_up(client: &reqwest::Client, base: &str) {
    for _ in 0..100 {
        if client.get(format!("{}/api/product", base)).send().await.is_ok() {
            return;
        }
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    }
    panic!("server at {} never came up", base);
}
