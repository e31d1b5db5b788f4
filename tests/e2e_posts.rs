//! E2E tests for post listing, creation and detail

mod common;

use common::{TestServer, ids, placeholder::REMOTE_POSTS};
use placeboard::service::MergePolicy;
use serde_json::{Value, json};

#[tokio::test]
async fn test_create_post_is_stored_locally() {
    let server = TestServer::new().await;
    let token = server.create_logged_in_user("alice").await;

    let post = server.create_post(&token, "  Hello  ", "First local post").await;

    assert_eq!(post["id"], 101);
    assert_eq!(post["title"], "Hello");
    assert_eq!(post["userId"], 1);

    let second = server.create_post(&token, "Again", "Second local post").await;
    assert_eq!(second["id"], 102);
}

#[tokio::test]
async fn test_create_post_rejects_blank_title() {
    let server = TestServer::new().await;
    let token = server.create_logged_in_user("alice").await;

    let response = server
        .client
        .post(server.url("/posts/create"))
        .bearer_auth(&token)
        .json(&json!({ "title": "   ", "body": "text" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("title"));
}

#[tokio::test]
async fn test_post_listing_merges_and_paginates() {
    let server = TestServer::new().await;
    let token = server.create_logged_in_user("alice").await;
    server.create_post(&token, "Local", "Local body").await;

    let response = server.get_authed("/posts?page=1", &token).await;
    assert_eq!(response.status(), 200);
    let page: Value = response.json().await.unwrap();
    assert_eq!(page["page"], 1);
    assert_eq!(page["pageSize"], 10);
    assert_eq!(page["total"], REMOTE_POSTS + 1);
    assert_eq!(page["totalPages"], 2);
    assert_eq!(page["items"].as_array().unwrap().len(), 10);

    let response = server.get_authed("/posts?page=2", &token).await;
    let page: Value = response.json().await.unwrap();
    // Remote 12, then the local post, then the sentinel
    assert_eq!(ids(&page["items"]), vec![12, 101, 1]);
}

#[tokio::test]
async fn test_post_page_past_end_is_empty() {
    let server = TestServer::new().await;
    let token = server.create_logged_in_user("alice").await;

    let response = server.get_authed("/posts?page=99", &token).await;

    assert_eq!(response.status(), 200);
    let page: Value = response.json().await.unwrap();
    assert!(page["items"].as_array().unwrap().is_empty());
    assert_eq!(page["page"], 99);
}

#[tokio::test]
async fn test_post_detail_includes_comments() {
    let server = TestServer::new().await;
    let token = server.create_logged_in_user("alice").await;

    let response = server.get_authed("/posts/3", &token).await;

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["post"]["id"], 3);
    assert_eq!(ids(&body["comments"]), vec![5, 6]);
}

#[tokio::test]
async fn test_local_post_detail_is_found() {
    let server = TestServer::new().await;
    let token = server.create_logged_in_user("alice").await;
    server.create_post(&token, "Mine", "Only here").await;

    let response = server.get_authed("/posts/101", &token).await;

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["post"]["title"], "Mine");
    assert!(body["comments"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_post_is_404() {
    let server = TestServer::new().await;
    let token = server.create_logged_in_user("alice").await;

    let response = server.get_authed("/posts/5000", &token).await;

    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_clear_local_posts() {
    let server = TestServer::new().await;
    let token = server.create_logged_in_user("alice").await;
    server.create_post(&token, "One", "1").await;
    server.create_post(&token, "Two", "2").await;

    let response = server
        .client
        .delete(server.url("/posts/local"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["removed"], 2);

    let page: Value = server
        .get_authed("/posts?page=2", &token)
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(page["total"], REMOTE_POSTS);
}

#[tokio::test]
async fn test_local_posts_survive_restart_of_state() {
    let server = TestServer::new().await;
    let token = server.create_logged_in_user("alice").await;
    server.create_post(&token, "Persisted", "On disk").await;

    let path = server.state.config.store.path.clone().unwrap();
    let reopened = placeboard::data::LocalStore::open(&path).await.unwrap();
    let posts: Vec<placeboard::data::Post> = reopened.read_json("posts").await.unwrap();

    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].title, "Persisted");
}

#[tokio::test]
async fn test_comments_by_post() {
    let server = TestServer::new().await;
    let token = server.create_logged_in_user("alice").await;

    let response = server.get_authed("/comments/1", &token).await;

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["postId"], 1);
    assert_eq!(ids(&body["comments"]), vec![1, 2]);
}

#[tokio::test]
async fn test_local_wins_policy_is_configurable() {
    let server = TestServer::with_policy(MergePolicy::LocalWins).await;
    let token = server.create_logged_in_user("alice").await;
    server.create_post(&token, "Local", "Local body").await;

    let page: Value = server
        .get_authed("/posts?page=1", &token)
        .await
        .json()
        .await
        .unwrap();

    // Local records are scanned first
    assert_eq!(page["items"][0]["id"], 101);
}
