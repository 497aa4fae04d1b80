mod common;

use digital_wallet::bootstrap::OPENAPI_JSON_PATH;
use serde_json::Value;

#[tokio::test]
async fn swagger_ui_is_served_at_root() {
    let app = common::spawn_app().await;
    let client = reqwest::Client::new();

    let res = client.get(app.url("/")).send().await.unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::OK);
    let content_type = res.headers()[reqwest::header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .to_string();
    assert!(content_type.starts_with("text/html"));
    assert!(res.text().await.unwrap().contains("swagger-ui"));

    let initializer = client
        .get(app.url("/swagger-initializer.js"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(initializer.contains(OPENAPI_JSON_PATH));
}

#[tokio::test]
async fn document_targets_the_api_prefix_with_basic_auth() {
    let app = common::spawn_app().await;

    let doc: Value = reqwest::get(app.url(OPENAPI_JSON_PATH))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(
        doc["servers"][0]["url"],
        format!("{}/api", common::TEST_ORIGIN)
    );
    assert_eq!(doc["info"]["title"], "Digital Wallet API");
    assert_eq!(doc["info"]["version"], "1.0.0");

    let scheme = &doc["components"]["securitySchemes"]["basicAuth"];
    assert_eq!(scheme["type"], "http");
    assert_eq!(scheme["scheme"], "basic");

    for path in ["/register", "/me", "/fund", "/pay", "/bal", "/stmt", "/product", "/buy"] {
        assert!(doc["paths"].get(path).is_some(), "missing {path}");
    }
    assert_eq!(doc["paths"]["/bal"]["get"]["security"][0]["basicAuth"], serde_json::json!([]));
}
