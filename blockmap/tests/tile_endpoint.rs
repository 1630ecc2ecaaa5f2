//! Integration tests for the HTTP tile endpoint.
//!
//! These tests run the real router on a loopback port with a mock renderer
//! standing in for uNmINeD, and cover:
//! - parameter validation and its literal error messages
//! - render-once caching on disk
//! - configuration and world list endpoints
//!
//! Run with: `cargo test --test tile_endpoint`

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use serde_json::{json, Value};
use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use blockmap::cache::TileStore;
use blockmap::config::ConfigFile;
use blockmap::coord::{Dimension, TileId};
use blockmap::render::{BoxFuture, RenderOutcome, RenderRequest, TileRenderer};
use blockmap::server::{serve_listener, AppState};
use blockmap::world::WorldRegistry;

// ============================================================================
// Helper Types
// ============================================================================

const FAKE_PNG: &[u8] = b"\x89PNG\r\n\x1a\nfake";

const CONFIG: &str = r#"
port = 3000

[imageGeneration]
unmined = "unmined-cli"

[imageGeneration.tileSize]
x = 256
y = 256
unit = "b"
"#;

/// Renderer that writes a fixed image and records each request.
#[derive(Default)]
struct MockRenderer {
    calls: AtomicUsize,
    requests: Mutex<Vec<RenderRequest>>,
    produce_file: bool,
}

impl MockRenderer {
    fn writing() -> Arc<Self> {
        Arc::new(Self {
            produce_file: true,
            ..Default::default()
        })
    }

    fn silent_failure() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl TileRenderer for MockRenderer {
    fn render<'a>(&'a self, request: &'a RenderRequest) -> BoxFuture<'a, RenderOutcome> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.requests.lock().unwrap().push(request.clone());
            if self.produce_file {
                tokio::fs::write(&request.output, FAKE_PNG).await.unwrap();
                RenderOutcome::Success
            } else {
                RenderOutcome::Failure("mock renderer wrote nothing".to_string())
            }
        })
    }
}

struct TestServer {
    addr: SocketAddr,
    store: TileStore,
    shutdown: Option<oneshot::Sender<()>>,
    _temp: TempDir,
}

impl TestServer {
    async fn start(worlds: Vec<(&str, Arc<MockRenderer>)>) -> Self {
        let temp = TempDir::new().unwrap();
        let store = TileStore::new(temp.path().join("tiles"));
        let config = ConfigFile::parse(CONFIG, temp.path()).unwrap();

        let registry = WorldRegistry::from_renderers(worlds.into_iter().map(|(name, renderer)| {
            let renderer: Arc<dyn TileRenderer> = renderer;
            (name.to_string(), renderer)
        }));
        let state = Arc::new(AppState::new(registry, store.clone(), config.tree().clone()));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = oneshot::channel::<()>();
        tokio::spawn(serve_listener(listener, state, async move {
            let _ = rx.await;
        }));

        Self {
            addr,
            store,
            shutdown: Some(tx),
            _temp: temp,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    async fn get(&self, path: &str) -> reqwest::Response {
        reqwest::get(self.url(path)).await.unwrap()
    }

    async fn get_json(&self, path: &str) -> Value {
        let text = self.get(path).await.text().await.unwrap();
        serde_json::from_str(&text).unwrap()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

async fn assert_bad_request(server: &TestServer, path: &str, message: &str) {
    let response = server.get(path).await;
    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST, "{}", path);
    assert_eq!(response.text().await.unwrap(), message, "{}", path);
}

// ============================================================================
// Validation
// ============================================================================

#[tokio::test]
async fn test_missing_parameters() {
    let renderer = MockRenderer::writing();
    let server = TestServer::start(vec![("survival", renderer.clone())]).await;

    assert_bad_request(&server, "/tile?y=0&world=survival", "Missing parameters.").await;
    assert_bad_request(&server, "/tile?x=0&world=survival", "Missing parameters.").await;
    assert_bad_request(&server, "/tile?x=0&y=0", "Missing parameters.").await;
    assert_bad_request(&server, "/tile", "Missing parameters.").await;
    assert_eq!(renderer.calls(), 0);
}

#[tokio::test]
async fn test_invalid_id() {
    let renderer = MockRenderer::writing();
    let server = TestServer::start(vec![("survival", renderer.clone())]).await;

    assert_bad_request(&server, "/tile?x=abc&y=0&world=survival", "Invalid id.").await;
    assert_bad_request(&server, "/tile?x=0&y=1.5&world=survival", "Invalid id.").await;
    assert_eq!(renderer.calls(), 0);
}

#[tokio::test]
async fn test_invalid_world() {
    let renderer = MockRenderer::writing();
    let server = TestServer::start(vec![("survival", renderer.clone())]).await;

    assert_bad_request(&server, "/tile?x=0&y=0&world=creative", "Invalid world.").await;
    assert_eq!(renderer.calls(), 0);
    assert!(!server.store.world_dir("creative").exists());
}

#[tokio::test]
async fn test_repeated_parameters_use_first_value() {
    let renderer = MockRenderer::writing();
    let server = TestServer::start(vec![("survival", renderer.clone())]).await;

    assert_bad_request(&server, "/tile?x=1&x=2&y=0&world=creative", "Invalid world.").await;
    assert_bad_request(&server, "/tile?x=abc&x=1&y=0&world=survival", "Invalid id.").await;
    assert_eq!(renderer.calls(), 0);

    let response = server.get("/tile?x=1&x=2&y=0&world=survival&world=creative").await;
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    assert!(server.store.tile_path("survival", TileId::new(1, 0)).exists());
    assert!(!server.store.tile_path("survival", TileId::new(2, 0)).exists());
}

// ============================================================================
// Rendering and caching
// ============================================================================

#[tokio::test]
async fn test_second_request_is_served_from_disk() {
    let renderer = MockRenderer::writing();
    let server = TestServer::start(vec![("survival", renderer.clone())]).await;

    let first = server.get("/tile?x=2&y=-3&world=survival").await;
    assert_eq!(first.status(), reqwest::StatusCode::OK);
    assert_eq!(
        first.headers()["content-type"].to_str().unwrap(),
        "image/png"
    );
    assert_eq!(
        first.headers()["cache-control"].to_str().unwrap(),
        "public, max-age=500"
    );
    assert_eq!(first.bytes().await.unwrap().as_ref(), FAKE_PNG);

    let second = server.get("/tile?x=2&y=-3&world=survival").await;
    assert_eq!(second.status(), reqwest::StatusCode::OK);
    assert!(second.headers().get("cache-control").is_none());
    assert_eq!(second.bytes().await.unwrap().as_ref(), FAKE_PNG);

    assert_eq!(renderer.calls(), 1, "a stored tile must not be re-rendered");
    assert!(server.store.tile_path("survival", TileId::new(2, -3)).is_file());
}

#[tokio::test]
async fn test_render_uses_default_lod_and_overworld() {
    let renderer = MockRenderer::writing();
    let server = TestServer::start(vec![("survival", renderer.clone())]).await;

    server.get("/tile?x=7&y=8&world=survival").await;

    let requests = renderer.requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].id, TileId::new(7, 8));
    assert_eq!(requests[0].lod, -1);
    assert_eq!(requests[0].dimension, Dimension::Overworld);
    assert_eq!(
        requests[0].output,
        server.store.tile_path("survival", TileId::new(7, 8))
    );
}

#[tokio::test]
async fn test_worlds_render_independently() {
    let survival = MockRenderer::writing();
    let creative = MockRenderer::writing();
    let server = TestServer::start(vec![
        ("survival", survival.clone()),
        ("creative", creative.clone()),
    ])
    .await;

    server.get("/tile?x=0&y=0&world=survival").await;
    server.get("/tile?x=0&y=0&world=creative").await;

    assert_eq!(survival.calls(), 1);
    assert_eq!(creative.calls(), 1);
}

#[tokio::test]
async fn test_failed_render_is_a_generic_server_error() {
    let renderer = MockRenderer::silent_failure();
    let server = TestServer::start(vec![("survival", renderer.clone())]).await;

    let response = server.get("/tile?x=0&y=0&world=survival").await;

    assert_eq!(response.status(), reqwest::StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(renderer.calls(), 1);
    // The world directory is created before rendering is attempted.
    assert!(server.store.world_dir("survival").is_dir());

    // Nothing was stored, so the next request renders again.
    server.get("/tile?x=0&y=0&world=survival").await;
    assert_eq!(renderer.calls(), 2);
}

#[tokio::test]
async fn test_same_id_at_two_lods_shares_one_file() {
    let temp = TempDir::new().unwrap();
    let store = TileStore::new(temp.path());
    let renderer = MockRenderer::writing();
    let id = TileId::new(4, 4);
    store.ensure_world_dir("survival").await.unwrap();

    for lod in [-1, -3] {
        let request = RenderRequest::new(store.tile_path("survival", id), id, lod, Dimension::Overworld);
        renderer.render(&request).await;
    }

    let files: Vec<PathBuf> = std::fs::read_dir(store.world_dir("survival"))
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect();
    assert_eq!(renderer.calls(), 2);
    assert_eq!(files, vec![store.tile_path("survival", id)]);
}

// ============================================================================
// Config, worlds and viewer
// ============================================================================

#[tokio::test]
async fn test_config_passthrough() {
    let server = TestServer::start(vec![("survival", MockRenderer::writing())]).await;

    assert_eq!(
        server.get_json("/config/imageGeneration/tileSize/x").await,
        json!(256)
    );
    assert_eq!(
        server.get_json("/config/imageGeneration.tileSize.unit").await,
        json!("b")
    );
    assert_eq!(
        server.get_json("/config/imageGeneration/tileSize").await,
        json!({"x": 256, "y": 256, "unit": "b"})
    );
    assert_eq!(server.get_json("/config/imageGeneration/nope").await, Value::Null);
}

#[tokio::test]
async fn test_config_root_returns_whole_tree() {
    let server = TestServer::start(vec![("survival", MockRenderer::writing())]).await;

    let response = server.get("/config/").await;
    assert_eq!(response.status(), reqwest::StatusCode::OK);

    let tree: Value = serde_json::from_str(&response.text().await.unwrap()).unwrap();
    assert_eq!(tree["port"], json!(3000));
    assert_eq!(tree["imageGeneration"]["tileSize"]["unit"], json!("b"));
}

#[tokio::test]
async fn test_worlds_list() {
    let server = TestServer::start(vec![
        ("survival", MockRenderer::writing()),
        ("creative", MockRenderer::writing()),
    ])
    .await;

    assert_eq!(
        server.get_json("/worlds").await,
        json!(["creative", "survival"])
    );
}

#[tokio::test]
async fn test_viewer_page_and_script() {
    let server = TestServer::start(vec![]).await;

    let page = server.get("/").await;
    assert_eq!(page.status(), reqwest::StatusCode::OK);
    assert!(page.text().await.unwrap().contains("/index.js"));

    let script = server.get("/index.js").await;
    assert_eq!(script.status(), reqwest::StatusCode::OK);
    assert!(script.text().await.unwrap().contains("/tile?x="));
}
