mod common;

use reqwest::header::{
    ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_REQUEST_METHOD,
    ORIGIN,
};

#[tokio::test]
async fn preflight_from_the_allowed_origin_is_accepted() {
    let app = common::spawn_app().await;
    let client = reqwest::Client::new();

    let res = client
        .request(reqwest::Method::OPTIONS, app.url("/api/product"))
        .header(ORIGIN, common::TEST_ORIGIN)
        .header(ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .send()
        .await
        .unwrap();

    assert_eq!(
        res.headers().get(ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        common::TEST_ORIGIN
    );
    let methods = res
        .headers()
        .get(ACCESS_CONTROL_ALLOW_METHODS)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    for method in ["GET", "POST", "PUT", "DELETE", "OPTIONS"] {
        assert!(methods.contains(method), "{method} missing from {methods}");
    }
    assert!(!methods.contains("PATCH"));
}

#[tokio::test]
async fn other_origins_get_no_cors_grant() {
    let app = common::spawn_app().await;
    let client = reqwest::Client::new();

    let preflight = client
        .request(reqwest::Method::OPTIONS, app.url("/api/product"))
        .header(ORIGIN, "https://evil.example")
        .header(ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .send()
        .await
        .unwrap();
    assert!(preflight.headers().get(ACCESS_CONTROL_ALLOW_ORIGIN).is_none());

    let res = client
        .get(app.url("/api/product"))
        .header(ORIGIN, "https://evil.example")
        .send()
        .await
        .unwrap();
    assert!(res.headers().get(ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
}

#[tokio::test]
async fn simple_request_from_the_allowed_origin_is_granted() {
    let app = common::spawn_app().await;

    let res = reqwest::Client::new()
        .get(app.url("/api/product"))
        .header(ORIGIN, common::TEST_ORIGIN)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), reqwest::StatusCode::OK);
    assert_eq!(
        res.headers().get(ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        common::TEST_ORIGIN
    );
}
