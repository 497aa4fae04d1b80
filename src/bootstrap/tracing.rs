
pub async fn init_tracing() {
    // RUST_LOG wins; otherwise info for the app and quieter database drivers
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new("info,sqlx=warn,sea_orm=warn,tower_http=info")
    });

    // `try_init` so a second call (tests, tools) keeps the first subscriber.
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
