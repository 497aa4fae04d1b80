mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use digital_wallet::bootstrap::{self, StartupError};
use digital_wallet::routes;

#[tokio::test]
async fn storage_failure_never_mounts_routes_or_binds() {
    let port = common::find_free_port();
    let mounted = Arc::new(AtomicBool::new(false));
    let flag = mounted.clone();

    let result = bootstrap::start_server(
        common::test_config(port),
        common::FailingStorage,
        move |db| {
            flag.store(true, Ordering::SeqCst);
            routes::routes(db)
        },
    )
    .await;

    let err = result.unwrap_err();
    assert!(matches!(err, StartupError::Storage(_)));
    assert!(err.already_logged());
    assert!(!mounted.load(Ordering::SeqCst));
    assert!(std::net::TcpStream::connect(("127.0.0.1", port)).is_err());
}

#[tokio::test]
async fn ready_storage_serves_every_route_group_and_the_docs() {
    let port = common::find_free_port();
    let handle = tokio::spawn(async move {
        bootstrap::start_server(
            common::test_config(port),
            common::memory_storage(),
            routes::routes,
        )
        .await
        .expect("server run");
    });

    let base = format!("http://127.0.0.1:{}", port);
    let client = reqwest::Client::new();
    common::wait_until_up(&client, &base).await;

    let res = client.get(format!("{}/", base)).send().await.unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::OK);

    // auth
    let res = client
        .post(format!("{}/api/register", base))
        .json(&serde_json::json!({ "username": "dana", "password": "pw" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::CREATED);

    // wallet
    let res = client
        .get(format!("{}/api/bal", base))
        .basic_auth("dana", Some("pw"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::OK);

    // product
    let res = client.get(format!("{}/api/product", base)).send().await.unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::OK);

    handle.abort();
}

#[tokio::test]
async fn invalid_origin_is_a_startup_error() {
    let mut config = common::test_config(common::find_free_port());
    config.allowed_origin = "https://bad\norigin".into();

    let result = bootstrap::start_server(config, common::memory_storage(), routes::routes).await;

    assert!(matches!(result, Err(StartupError::Config(_))));
}
