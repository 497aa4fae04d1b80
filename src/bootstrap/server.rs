use std::net::SocketAddr;
use std::time::Duration;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
};
use sea_orm::DatabaseConnection;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use utoipa_swagger_ui::SwaggerUi;
use uuid::Uuid;

use super::{Sequencer, StartupError, Storage};
use crate::config::AppConfig;

pub const API_PREFIX: &str = "/api";
pub const OPENAPI_JSON_PATH: &str = "/api-docs/openapi.json";

/// Exact-match allow-list: the configured origin and nothing else. Other
/// origins get no `access-control-allow-origin` at all.
pub fn cors_layer(config: &AppConfig) -> Result<CorsLayer, StartupError> {
    let origin = HeaderValue::from_str(&config.allowed_origin).map_err(|err| {
        StartupError::Config(anyhow::anyhow!(
            "`{}` is not a valid origin: {:?}",
            config.allowed_origin,
            err
        ))
    })?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list([origin]))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ]))
}

/// Mounts `api` under `/api`, the Swagger UI at `/`, then wraps everything
/// in the error boundary, request tracing and CORS.
pub fn build_app(config: &AppConfig, api: Router) -> Result<Router, StartupError> {
    let cors = cors_layer(config)?;

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &axum::extract::Request<_>| {
            let request_id = Uuid::new_v4();
            tracing::info_span!(
                "http_request",
                %request_id,
                method = %request.method(),
                uri = %request.uri(),
            )
        })
        .on_response(
            |response: &axum::response::Response, latency: Duration, _span: &tracing::Span| {
                tracing::info!(
                    status = %response.status(),
                    latency_ms = %latency.as_millis(),
                    "response"
                );
            },
        );

    let docs = SwaggerUi::new("/").url(
        OPENAPI_JSON_PATH,
        crate::docs::openapi(&config.public_url),
    );

    let app = Router::new()
        .nest(API_PREFIX, api)
        .merge(docs)
        .layer(DefaultBodyLimit::max(config.body_limit))
        // Installed after every route so it sees all of them.
        .layer(CatchPanicLayer::custom(wallet_core::error::handle_panic))
        .layer(trace_layer)
        .layer(cors);

    Ok(app)
}

/// Storage first, then routes, docs and error handling, then the socket.
/// `mount` only runs once storage is ready.
pub async fn start_server<S, F>(config: AppConfig, storage: S, mount: F) -> Result<(), StartupError>
where
    S: Storage,
    F: FnOnce(DatabaseConnection) -> Router,
{
    let mut sequencer = Sequencer::new(storage);
    let db = sequencer.initialize().await?;

    let app = build_app(&config, mount(db))?;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| StartupError::Bind { addr, source })?;

    serve(listener, app, &config).await
}

pub async fn serve(
    listener: tokio::net::TcpListener,
    app: Router,
    config: &AppConfig,
) -> Result<(), StartupError> {
    let addr = listener.local_addr().map_err(StartupError::Serve)?;
    tracing::info!("Server running on {}", addr);
    tracing::info!("Swagger docs at: {}", config.docs_url());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(StartupError::Serve)?;

    tracing::info!("server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = ?err, "cannot listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = ?err, "cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
