//! E2E tests for the dashboard view

mod common;

use common::{TestServer, ids};
use serde_json::Value;

#[tokio::test]
async fn test_dashboard_shows_previews_and_user() {
    let server = TestServer::new().await;
    let token = server.create_logged_in_user("alice").await;

    let response = server.get_authed("/dashboard", &token).await;

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["user"]["username"], "alice");
    assert_eq!(body["posts"].as_array().unwrap().len(), 4);
    assert_eq!(body["albums"].as_array().unwrap().len(), 3);
    assert_eq!(body["photos"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_dashboard_orders_sentinel_post_last() {
    let server = TestServer::new().await;
    let token = server.create_logged_in_user("alice").await;

    let response = server.get_authed("/dashboard", &token).await;
    let body: Value = response.json().await.unwrap();

    // Remote preview is posts 1..=4; post 1 moves behind the others
    assert_eq!(ids(&body["posts"]), vec![2, 3, 4, 1]);
}

#[tokio::test]
async fn test_dashboard_truncates_post_bodies() {
    let server = TestServer::new().await;
    let token = server.create_logged_in_user("alice").await;

    let response = server.get_authed("/dashboard", &token).await;
    let body: Value = response.json().await.unwrap();

    let text = body["posts"][0]["body"].as_str().unwrap();
    assert!(text.ends_with("..."));
    assert_eq!(text.trim_end_matches("...").split(' ').count(), 30);
}

#[tokio::test]
async fn test_dashboard_falls_back_to_local_posts_when_remote_fails() {
    let server = TestServer::new().await;
    let token = server.create_logged_in_user("alice").await;
    for n in 0..6 {
        server
            .create_post(&token, &format!("local {n}"), "written offline")
            .await;
    }

    server.remote.set_failing(true);
    let response = server.get_authed("/dashboard", &token).await;

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(ids(&body["posts"]), vec![101, 102, 103, 104]);
    assert!(body["albums"].as_array().unwrap().is_empty());
    assert!(body["photos"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_dashboard_with_nothing_available_is_empty() {
    let server = TestServer::new().await;
    let token = server.create_logged_in_user("alice").await;
    server.remote.set_failing(true);

    let response = server.get_authed("/dashboard", &token).await;

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert!(body["posts"].as_array().unwrap().is_empty());
}
