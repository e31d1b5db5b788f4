//! In-process stand-in for the JSONPlaceholder API

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::{Value, json};
use tokio::net::TcpListener;

pub const REMOTE_POSTS: u64 = 12;
pub const REMOTE_PHOTOS: u64 = 15;
/// Photo whose album does not exist
pub const ORPHAN_PHOTO_ID: u64 = 15;

#[derive(Clone, Default)]
struct Behaviour {
    failing: Arc<AtomicBool>,
    delay_ms: Arc<AtomicU64>,
}

impl Behaviour {
    /// Apply the configured delay; `false` if the request should fail
    async fn respond(&self) -> bool {
        let delay = self.delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        !self.failing.load(Ordering::SeqCst)
    }
}

#[derive(Clone)]
pub struct FakePlaceholder {
    pub base_url: String,
    behaviour: Behaviour,
}

impl FakePlaceholder {
    pub async fn start() -> Self {
        let behaviour = Behaviour::default();
        let app = Router::new()
            .route("/:resource", get(collection))
            .route("/:resource/:id", get(single))
            .with_state(behaviour.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            behaviour,
        }
    }

    /// Make every request fail with 500 until reset
    pub fn set_failing(&self, failing: bool) {
        self.behaviour.failing.store(failing, Ordering::SeqCst);
    }

    /// Hold every response for `delay` before answering
    pub fn set_delay(&self, delay: Duration) {
        self.behaviour
            .delay_ms
            .store(delay.as_millis() as u64, Ordering::SeqCst);
    }
}

async fn collection(
    State(behaviour): State<Behaviour>,
    Path(resource): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if !behaviour.respond().await {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    let Some(records) = fixtures(&resource) else {
        return StatusCode::NOT_FOUND.into_response();
    };

    let mut records: Vec<Value> = records
        .into_iter()
        .filter(|record| {
            params
                .iter()
                .filter(|(key, _)| !key.starts_with('_'))
                .all(|(key, value)| record[key.as_str()].to_string() == *value)
        })
        .collect();

    if let Some(limit) = params.get("_limit").and_then(|l| l.parse::<usize>().ok()) {
        records.truncate(limit);
    }

    Json(Value::Array(records)).into_response()
}

async fn single(
    State(behaviour): State<Behaviour>,
    Path((resource, id)): Path<(String, u64)>,
) -> Response {
    if !behaviour.respond().await {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    fixtures(&resource)
        .and_then(|records| records.into_iter().find(|record| record["id"] == id))
        .map(|record| Json(record).into_response())
        .unwrap_or_else(|| (StatusCode::NOT_FOUND, Json(json!({}))).into_response())
}

fn fixtures(resource: &str) -> Option<Vec<Value>> {
    let records = match resource {
        "users" => vec![
            user(1, "Leanne Graham", "Bret"),
            user(2, "Ervin Howell", "Antonette"),
            user(3, "Clementine Bauch", "Samantha"),
        ],
        "posts" => (1..=REMOTE_POSTS)
            .map(|id| {
                json!({
                    "id": id,
                    "userId": (id - 1) / 4 + 1,
                    "title": format!("remote post {id}"),
                    "body": long_body(id),
                })
            })
            .collect(),
        "albums" => (1..=3)
            .map(|id| json!({ "id": id, "userId": id, "title": format!("album {id}") }))
            .collect(),
        "photos" => (1..=REMOTE_PHOTOS)
            .map(|id| {
                let album_id = if id == ORPHAN_PHOTO_ID { 42 } else { (id - 1) / 5 + 1 };
                json!({
                    "id": id,
                    "albumId": album_id,
                    "title": format!("photo {id}"),
                    "url": format!("https://via.placeholder.com/600/{id}"),
                    "thumbnailUrl": format!("https://via.placeholder.com/150/{id}"),
                })
            })
            .collect(),
        "comments" => (1..=20)
            .map(|id| {
                json!({
                    "id": id,
                    "postId": (id - 1) / 2 + 1,
                    "name": format!("comment {id}"),
                    "email": format!("commenter{id}@example.com"),
                    "body": format!("comment body {id}"),
                })
            })
            .collect(),
        _ => return None,
    };
    Some(records)
}

fn user(id: u64, name: &str, username: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "username": username,
        "email": format!("{}@april.biz", username.to_lowercase()),
        "address": {
            "street": "Kulas Light",
            "suite": "Apt. 556",
            "city": "Gwenborough",
            "zipcode": "92998-3874",
            "geo": { "lat": "-37.3159", "lng": "81.1496" }
        },
        "phone": "1-770-736-8031 x56442",
        "website": "hildegard.org",
        "company": {
            "name": "Romaguera-Crona",
            "catchPhrase": "Multi-layered client-server neural-net",
            "bs": "harness real-time e-markets"
        }
    })
}

/// Body of 40 words so previews get truncated
fn long_body(id: u64) -> String {
    (0..40)
        .map(|n| format!("w{id}x{n}"))
        .collect::<Vec<_>>()
        .join(" ")
}
