//! E2E tests for health check and basic server functionality

mod common;

use common::TestCluster;
use murmur::ServiceKind;

#[tokio::test]
async fn test_health_check_on_every_service() {
    let cluster = TestCluster::start().await;

    for kind in ServiceKind::ALL {
        let response = tokio_test::assert_ok!(
            cluster.client.get(cluster.url(kind, "/health")).send().await
        );

        assert_eq!(response.status(), 200, "{} health", kind);
        let body = response.text().await.unwrap();
        assert_eq!(body, "OK");
    }
}

#[tokio::test]
async fn test_cors_headers() {
    let cluster = TestCluster::start().await;

    let response = cluster
        .client
        .get(cluster.url(ServiceKind::Posts, "/health"))
        .header("Origin", "https://client.example.com")
        .send()
        .await
        .unwrap();

    assert!(
        response
            .headers()
            .contains_key("access-control-allow-origin")
    );
}

#[tokio::test]
async fn test_404_for_unknown_routes() {
    let cluster = TestCluster::start().await;

    let response = cluster
        .client
        .get(cluster.url(ServiceKind::Identity, "/unknown/route"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_routes_belong_to_their_service() {
    let cluster = TestCluster::start().await;

    // Posts are not served by the identity service.
    let response = cluster
        .client
        .get(cluster.url(ServiceKind::Identity, "/api/users/anyone/posts"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_metrics_endpoint_is_public() {
    let cluster = TestCluster::start().await;

    let response = cluster
        .client
        .get(cluster.url(ServiceKind::Likes, "/metrics"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_string();
    assert!(content_type.starts_with("text/plain"));
}
