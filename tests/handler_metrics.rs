mod common;

use serde_json::json;

#[tokio::test]
async fn test_metrics_empty() {
    let (server, _store) = common::create_test_server();

    let response = server.get("/metrics").await;

    response.assert_status_not_found();
    assert_eq!(response.json::<serde_json::Value>()["error"]["code"], "empty");
}

#[tokio::test]
async fn test_metrics_orders_by_visits() {
    let (server, _store) = common::create_test_server();

    let a = common::shorten(&server, "https://example.com/a").await;
    let b = common::shorten(&server, "https://example.com/b").await;
    common::shorten(&server, "https://example.com/c").await;

    for _ in 0..3 {
        server.get(&format!("/short-url/{b}")).await;
    }
    server.get(&format!("/short-url/{a}")).await;

    let response = server.get("/metrics").add_query_param("limit", 2).await;

    response.assert_status_ok();
    response.assert_json(&json!([
        { "url": "https://example.com/b", "score": 3 },
        { "url": "https://example.com/a", "score": 1 },
    ]));
    assert_eq!(response.header("x-total-count"), "2");
}

#[tokio::test]
async fn test_metrics_default_limit() {
    let (server, _store) = common::create_test_server();
    for path in ["a", "b", "c", "d", "e"] {
        common::shorten(&server, &format!("https://example.com/{path}")).await;
    }

    let response = server.get("/metrics").await;

    response.assert_status_ok();
    assert_eq!(response.json::<Vec<serde_json::Value>>().len(), 3);
}

#[tokio::test]
async fn test_metrics_zero_limit_rejected() {
    let (server, _store) = common::create_test_server();
    common::shorten(&server, "https://example.com/a").await;

    let response = server.get("/metrics").add_query_param("limit", 0).await;

    response.assert_status_bad_request();
    assert_eq!(
        response.json::<serde_json::Value>()["error"]["code"],
        "invalid_input"
    );
}

#[tokio::test]
async fn test_metrics_limit_above_maximum_rejected() {
    let (server, _store) = common::create_test_server();
    common::shorten(&server, "https://example.com/a").await;

    server
        .get("/metrics")
        .add_query_param("limit", 1001)
        .await
        .assert_status_bad_request();
}

#[tokio::test]
async fn test_metrics_non_numeric_limit_rejected() {
    let (server, _store) = common::create_test_server();
    common::shorten(&server, "https://example.com/a").await;

    let response = server
        .get("/metrics")
        .add_query_param("limit", "abc")
        .await;

    response.assert_status_bad_request();
    assert_eq!(
        response.json::<serde_json::Value>()["error"]["code"],
        "invalid_input"
    );
}
