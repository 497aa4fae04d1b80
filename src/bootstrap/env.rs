use std::path::PathBuf;

/// Loads `.env` when present. Runs before tracing is installed so the file
/// can carry `RUST_LOG`.
pub async fn init_env() -> Option<PathBuf> {
    dotenvy::dotenv().ok()
}
