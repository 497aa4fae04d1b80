mod env;
mod error;
mod lifecycle;
mod server;
mod storage;
mod tracing;

pub use error::StartupError;
pub use lifecycle::{Lifecycle, Sequencer};
pub use server::{API_PREFIX, OPENAPI_JSON_PATH, build_app, cors_layer, serve, start_server};
pub use storage::{DatabaseStorage, Storage};

pub async fn init_base() {
    let loaded = env::init_env().await;
    tracing::init_tracing().await;

    if let Some(path) = loaded {
        ::tracing::debug!(path = %path.display(), "loaded environment file");
    }
}
