//! Mock search endpoint for testing the partitioned fetcher.

#![allow(dead_code)]

use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, Response, StatusCode};
use axum::routing::any;
use axum::Router;
use std::collections::{HashMap, VecDeque};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

/// A captured request for assertions.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub path: String,
    pub query: String,
    /// Value of the `f` parameter, if present.
    pub partition: Option<String>,
}

/// A mock response to return.
#[derive(Debug, Clone)]
pub struct MockResponse {
    pub status: u16,
    pub body: Vec<u8>,
    pub delay_ms: u64,
}

impl Default for MockResponse {
    fn default() -> Self {
        Self::json(r#"{"meals": null}"#)
    }
}

impl MockResponse {
    pub fn json(body: &str) -> Self {
        Self {
            status: 200,
            body: body.as_bytes().to_vec(),
            delay_ms: 0,
        }
    }

    /// A search hit list built from `(idMeal, strMeal)` pairs.
    pub fn meals(meals: &[(&str, &str)]) -> Self {
        let records: Vec<serde_json::Value> = meals
            .iter()
            .map(|(id, title)| {
                serde_json::json!({
                    "idMeal": id,
                    "strMeal": title,
                    "strInstructions": format!("Cook the {} slowly.", title),
                    "strMealThumb": format!("https://img.example/{}.jpg", id),
                    "strArea": "Unknown",
                })
            })
            .collect();
        Self::json(&serde_json::json!({ "meals": records }).to_string())
    }

    pub fn error(status: u16, message: &str) -> Self {
        Self {
            status,
            body: format!(r#"{{"error": "{}"}}"#, message).into_bytes(),
            delay_ms: 0,
        }
    }

    pub fn with_delay(mut self, ms: u64) -> Self {
        self.delay_ms = ms;
        self
    }
}

#[derive(Clone, Default)]
struct MockState {
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
    /// One-shot responses per partition, served before `fixed`.
    queued: Arc<Mutex<HashMap<String, VecDeque<MockResponse>>>>,
    fixed: Arc<Mutex<HashMap<String, MockResponse>>>,
}

/// Mock search server. Unconfigured partitions answer `{"meals": null}`.
pub struct MockMealDb {
    pub addr: SocketAddr,
    state: MockState,
    shutdown: tokio::sync::watch::Sender<bool>,
}

impl MockMealDb {
    /// Start a new mock server.
    pub async fn start() -> Self {
        let state = MockState::default();

        let (shutdown_tx, mut shutdown_rx) = tokio::sync::watch::channel(false);

        let app = Router::new()
            .route("/{*path}", any(handle_request))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock server");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.changed().await;
                })
                .await
                .ok();
        });

        // Wait for server to be ready
        tokio::time::sleep(tokio::time::Duration::from_millis(10)).await;

        Self {
            addr,
            state,
            shutdown: shutdown_tx,
        }
    }

    /// Answer every request for `partition` with `resp`.
    pub async fn set_partition(&self, partition: &str, resp: MockResponse) {
        self.state
            .fixed
            .lock()
            .await
            .insert(partition.to_string(), resp);
    }

    /// Answer the next request for `partition` with `resp`.
    pub async fn enqueue(&self, partition: &str, resp: MockResponse) {
        self.state
            .queued
            .lock()
            .await
            .entry(partition.to_string())
            .or_default()
            .push_back(resp);
    }

    /// Get all captured requests.
    pub async fn captured_requests(&self) -> Vec<CapturedRequest> {
        self.state.requests.lock().await.clone()
    }

    /// How many requests asked for `partition`.
    pub async fn hits(&self, partition: &str) -> usize {
        self.state
            .requests
            .lock()
            .await
            .iter()
            .filter(|r| r.partition.as_deref() == Some(partition))
            .count()
    }

    /// Search endpoint URL served by this mock.
    pub fn base_url(&self) -> String {
        format!("http://{}/api/json/v1/1/search.php", self.addr)
    }
}

impl Drop for MockMealDb {
    fn drop(&mut self) {
        let _ = self.shutdown.send(true);
    }
}

fn partition_of(query: &str) -> Option<String> {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == "f")
        .map(|(_, value)| value.to_string())
}

async fn handle_request(State(state): State<MockState>, req: Request<Body>) -> Response<Body> {
    let path = req.uri().path().to_string();
    let query = req.uri().query().unwrap_or("").to_string();
    let partition = partition_of(&query);

    state.requests.lock().await.push(CapturedRequest {
        path,
        query,
        partition: partition.clone(),
    });

    let key = partition.unwrap_or_default();
    let queued = state
        .queued
        .lock()
        .await
        .get_mut(&key)
        .and_then(|q| q.pop_front());
    let mock_resp = match queued {
        Some(resp) => resp,
        None => state
            .fixed
            .lock()
            .await
            .get(&key)
            .cloned()
            .unwrap_or_default(),
    };

    if mock_resp.delay_ms > 0 {
        tokio::time::sleep(tokio::time::Duration::from_millis(mock_resp.delay_ms)).await;
    }

    Response::builder()
        .status(StatusCode::from_u16(mock_resp.status).unwrap())
        .header("content-type", "application/json")
        .body(Body::from(mock_resp.body))
        .unwrap()
}
