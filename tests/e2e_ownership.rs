//! E2E tests for owner-only mutations

mod common;

use common::{TOKEN_HEADER, TestCluster};
use murmur::ServiceKind;
use reqwest::StatusCode;
use serde_json::{Value, json};

#[tokio::test]
async fn test_only_author_deletes_post() {
    let cluster = TestCluster::start().await;
    let (_alice, alice_token) = cluster.sign_up("alice").await;
    let (_bob, bob_token) = cluster.sign_up("bob").await;
    let post_id = cluster.create_post(&alice_token, "mine").await;
    let url = cluster.url(ServiceKind::Posts, &format!("/api/posts/{}", post_id));

    let response = cluster
        .client
        .delete(&url)
        .header(TOKEN_HEADER, &bob_token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body["errors"],
        "You are not allowed to modify this resource."
    );

    let response = cluster
        .client
        .delete(&url)
        .header(TOKEN_HEADER, &alice_token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["data"], "Post deleted successfully.");

    let response = cluster.client.get(&url).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_only_author_deletes_comment() {
    let cluster = TestCluster::start().await;
    let (_alice, alice_token) = cluster.sign_up("alice").await;
    let (_bob, bob_token) = cluster.sign_up("bob").await;
    let post_id = cluster.create_post(&alice_token, "post").await;
    let comment_id = cluster.create_comment(&bob_token, &post_id, "bob says").await;
    let url = cluster.url(
        ServiceKind::Comments,
        &format!("/api/posts/{}/comments/{}", post_id, comment_id),
    );

    // The post author does not own the comment
    let response = cluster
        .client
        .delete(&url)
        .header(TOKEN_HEADER, &alice_token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = cluster
        .client
        .delete(&url)
        .header(TOKEN_HEADER, &bob_token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["data"], "Comment deleted successfully.");
}

#[tokio::test]
async fn test_comment_under_other_post_is_not_found() {
    let cluster = TestCluster::start().await;
    let (_alice, token) = cluster.sign_up("alice").await;
    let first = cluster.create_post(&token, "first").await;
    let second = cluster.create_post(&token, "second").await;
    let comment_id = cluster.create_comment(&token, &first, "on first").await;

    let response = cluster
        .client
        .delete(cluster.url(
            ServiceKind::Comments,
            &format!("/api/posts/{}/comments/{}", second, comment_id),
        ))
        .header(TOKEN_HEADER, &token)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["errors"], "Comment not found.");
}

#[tokio::test]
async fn test_only_owner_updates_profile() {
    let cluster = TestCluster::start().await;
    let (alice, alice_token) = cluster.sign_up("alice").await;
    let (_bob, bob_token) = cluster.sign_up("bob").await;
    let url = cluster.url(ServiceKind::Identity, &format!("/api/users/{}", alice));
    let update = json!({
        "email": "alice@new.example.com",
        "password": "new password",
        "name": "Alice A.",
        "bio": "hello",
    });

    let response = cluster
        .client
        .put(&url)
        .header(TOKEN_HEADER, &bob_token)
        .json(&update)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = cluster
        .client
        .put(&url)
        .header(TOKEN_HEADER, &alice_token)
        .json(&update)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["data"]["email"], "alice@new.example.com");
    assert_eq!(body["data"]["bio"], "hello");

    let relogin = cluster.login("alice", "new password").await;
    assert_eq!(relogin.status(), StatusCode::OK);
}
