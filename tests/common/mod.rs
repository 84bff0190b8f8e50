//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`], which stands in for the external overlay store
//! and relay/transcode backend: an in-memory Axum app bound to a random
//! port, speaking the same wire format (Mongo-style `_id` keys, `{overlay}`
//! and `{message}` envelopes), with failure injection and per-endpoint call
//! counters.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, put};
use axum::{Json, Router};
use parking_lot::Mutex;
use serde_json::{json, Value};

use overcast::config::{RelayConfig, StoreConfig};
use overcast::overlay::{HttpOverlayStore, Overlay, OverlayCollection, Position, Size};
use overcast::playback::HttpRelayClient;

/// In-memory stand-in for the overlay store and relay service.
#[derive(Default)]
pub struct FakeBackend {
    overlays: Mutex<Vec<Overlay>>,
    next_id: AtomicU64,
    fail: AtomicBool,
    pub create_calls: AtomicUsize,
    pub update_calls: AtomicUsize,
    pub delete_calls: AtomicUsize,
    relay_urls: Mutex<Vec<String>>,
}

impl FakeBackend {
    /// Insert a record directly, bypassing the HTTP surface.
    pub fn seed(&self, text: &str, position: Position, size: Size) -> Overlay {
        let overlay = Overlay {
            id: self.fresh_id(),
            text: text.to_string(),
            position,
            size,
        };
        self.overlays.lock().push(overlay.clone());
        overlay
    }

    /// Snapshot of the stored records.
    pub fn records(&self) -> Vec<Overlay> {
        self.overlays.lock().clone()
    }

    /// Get one stored record by id.
    pub fn record(&self, id: &str) -> Option<Overlay> {
        self.overlays.lock().iter().find(|o| o.id == id).cloned()
    }

    /// When set, every endpoint answers 500.
    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// RTSP URLs received by the relay endpoint, in order.
    pub fn relay_urls(&self) -> Vec<String> {
        self.relay_urls.lock().clone()
    }

    fn fresh_id(&self) -> String {
        format!("ovl-{}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1)
    }

    fn failing(&self) -> bool {
        self.fail.load(Ordering::SeqCst)
    }
}

/// Serialize a record the way the real store does, with an `_id` key.
fn to_wire(overlay: &Overlay) -> Value {
    json!({
        "_id": overlay.id,
        "text": overlay.text,
        "position": { "x": overlay.position.x, "y": overlay.position.y },
        "size": { "width": overlay.size.width, "height": overlay.size.height },
    })
}

fn store_offline() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "store offline" })),
    )
        .into_response()
}

async fn list_overlays(State(backend): State<Arc<FakeBackend>>) -> Response {
    if backend.failing() {
        return store_offline();
    }
    let records: Vec<Value> = backend.overlays.lock().iter().map(to_wire).collect();
    Json(Value::Array(records)).into_response()
}

async fn create_overlay(
    State(backend): State<Arc<FakeBackend>>,
    Json(payload): Json<Value>,
) -> Response {
    backend.create_calls.fetch_add(1, Ordering::SeqCst);
    if backend.failing() {
        return store_offline();
    }

    // The real store requires full geometry on creation.
    for field in ["text", "position", "size"] {
        if payload.get(field).is_none() {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": format!("Missing field: {}", field) })),
            )
                .into_response();
        }
    }

    let overlay = Overlay {
        id: backend.fresh_id(),
        text: payload["text"].as_str().unwrap_or_default().to_string(),
        position: serde_json::from_value(payload["position"].clone()).unwrap(),
        size: serde_json::from_value(payload["size"].clone()).unwrap(),
    };
    backend.overlays.lock().push(overlay.clone());

    (
        StatusCode::CREATED,
        Json(json!({ "message": "Overlay created!", "overlay": to_wire(&overlay) })),
    )
        .into_response()
}

async fn update_overlay(
    State(backend): State<Arc<FakeBackend>>,
    Path(id): Path<String>,
    Json(payload): Json<Value>,
) -> Response {
    backend.update_calls.fetch_add(1, Ordering::SeqCst);
    if backend.failing() {
        return store_offline();
    }

    let mut overlays = backend.overlays.lock();
    let Some(slot) = overlays.iter_mut().find(|o| o.id == id) else {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Overlay not found" })),
        )
            .into_response();
    };

    slot.text = payload["text"].as_str().unwrap_or_default().to_string();
    slot.position = serde_json::from_value(payload["position"].clone()).unwrap();
    slot.size = serde_json::from_value(payload["size"].clone()).unwrap();

    Json(json!({ "message": "Overlay updated!" })).into_response()
}

async fn delete_overlay(
    State(backend): State<Arc<FakeBackend>>,
    Path(id): Path<String>,
) -> Response {
    backend.delete_calls.fetch_add(1, Ordering::SeqCst);
    if backend.failing() {
        return store_offline();
    }

    let mut overlays = backend.overlays.lock();
    let before = overlays.len();
    overlays.retain(|o| o.id != id);
    if overlays.len() == before {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Overlay not found" })),
        )
            .into_response();
    }

    Json(json!({ "message": "Overlay deleted!" })).into_response()
}

async fn start_stream(
    State(backend): State<Arc<FakeBackend>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if backend.failing() {
        return store_offline();
    }

    let Some(url) = params.get("url") else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "RTSP URL is required" })),
        )
            .into_response();
    };

    backend.relay_urls.lock().push(url.clone());
    Json(json!({ "message": "Streaming started" })).into_response()
}

/// Test harness wrapping the fake backend and the engine clients pointed at
/// it.
pub struct TestHarness {
    pub addr: SocketAddr,
    pub backend: Arc<FakeBackend>,
}

impl TestHarness {
    /// Boot the fake backend on a random port.
    pub async fn start() -> Self {
        let backend = Arc::new(FakeBackend::default());

        let app = Router::new()
            .route("/api/overlays", get(list_overlays).post(create_overlay))
            .route(
                "/api/overlays/:id",
                put(update_overlay).delete(delete_overlay),
            )
            .route("/api/stream", get(start_stream))
            .with_state(backend.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind random port");
        let addr = listener.local_addr().expect("failed to get local addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Self { addr, backend }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            base_url: self.base_url(),
            timeout_secs: 5,
        }
    }

    pub fn relay_config(&self) -> RelayConfig {
        RelayConfig {
            base_url: self.base_url(),
            manifest_path: "/static/stream.m3u8".to_string(),
            timeout_secs: 5,
        }
    }

    /// Store client pointed at the fake backend.
    pub fn store(&self) -> HttpOverlayStore {
        HttpOverlayStore::new(&self.store_config())
    }

    /// Collection manager backed by the fake backend.
    pub fn collection(&self) -> Arc<OverlayCollection> {
        Arc::new(OverlayCollection::new(Arc::new(self.store())))
    }

    /// Relay client pointed at the fake backend.
    pub fn relay(&self) -> HttpRelayClient {
        HttpRelayClient::new(&self.relay_config())
    }

    /// The fixed manifest URL the relay publishes to.
    pub fn manifest_url(&self) -> String {
        self.relay_config().manifest_url()
    }
}
