//! Integration tests for the SkinVault backend.

use std::sync::Arc;

use axum::{routing::get, Json, Router};
use reqwest::Client;
use serde_json::{json, Value};
use tempfile::TempDir;

use crate::config::Config;
use crate::settings::CATALOG_API_URL;
use crate::store::{LocalFileBackend, SqliteBackend, StorageBackend};
use crate::{build_state, create_router};

/// Unreachable endpoint so tests never touch the real catalog host.
const DEAD_CATALOG_URL: &str = "http://127.0.0.1:9/skins.json";

/// Test fixture for integration tests. Boots the full router on an
/// ephemeral port and opens one registered session.
struct TestFixture {
    client: Client,
    base_url: String,
    token: String,
    _temp_dir: TempDir,
}

impl TestFixture {
    /// Database-backed fixture with the catalog endpoint pointed at a
    /// closed port, so the fetch chain ends in the fallback dataset.
    async fn sqlite() -> Self {
        Self::sqlite_with_catalog(DEAD_CATALOG_URL).await
    }

    async fn sqlite_with_catalog(catalog_url: &str) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let backend = SqliteBackend::connect(&temp_dir.path().join("test.sqlite"))
            .await
            .expect("Failed to init DB");

        Self::start(temp_dir, Arc::new(backend), false, catalog_url).await
    }

    /// Fallback-mode fixture: no database at all, everything routes
    /// through the local file store.
    async fn local_only() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let backend = LocalFileBackend::new(temp_dir.path());

        Self::start(temp_dir, Arc::new(backend), true, DEAD_CATALOG_URL).await
    }

    async fn start(
        temp_dir: TempDir,
        backend: Arc<dyn StorageBackend>,
        fallback_mode: bool,
        catalog_url: &str,
    ) -> Self {
        backend
            .config_set(CATALOG_API_URL, catalog_url)
            .await
            .expect("Failed to seed catalog URL");

        let config = Config {
            database_path: None,
            data_dir: temp_dir.path().to_path_buf(),
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            log_level: "warn".to_string(),
        };

        let state = build_state(config, backend, fallback_mode);
        let app = create_router(state);

        // Bind to random port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind");
        let addr = listener.local_addr().expect("Failed to get addr");
        let base_url = format!("http://{}", addr);

        // Spawn server
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Wait for server to start
        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

        let client = Client::new();

        // Open a session for the authenticated routes
        let resp = client
            .post(format!("{}/api/auth/register", base_url))
            .json(&json!({"email": "tester@example.com", "password": "hunter22"}))
            .send()
            .await
            .expect("Failed to register");
        let body: Value = resp.json().await.expect("Bad register body");
        let token = body["data"]["token"]
            .as_str()
            .expect("No session token")
            .to_string();

        TestFixture {
            client,
            base_url,
            token,
            _temp_dir: temp_dir,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(self.url(path))
            .bearer_auth(&self.token)
            .send()
            .await
            .unwrap()
    }

    async fn post(&self, path: &str, body: Value) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await
            .unwrap()
    }

    async fn delete(&self, path: &str) -> reqwest::Response {
        self.client
            .delete(self.url(path))
            .bearer_auth(&self.token)
            .send()
            .await
            .unwrap()
    }
}

/// Spawn a one-route HTTP server that serves `body` as the skins dataset.
async fn spawn_stub_catalog(body: Value) -> String {
    let app = Router::new().route(
        "/skins.json",
        get(move || {
            let body = body.clone();
            async move { Json(body) }
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind stub");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}/skins.json", addr)
}

#[tokio::test]
async fn test_health_check() {
    let fixture = TestFixture::sqlite().await;

    let resp = fixture
        .client
        .get(fixture.url("/health"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), "OK");
}

#[tokio::test]
async fn test_session_required() {
    let fixture = TestFixture::sqlite().await;

    // No token at all
    let resp = fixture
        .client
        .get(fixture.url("/api/inventory"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"]["code"], json!("UNAUTHORIZED"));

    // Garbage token
    let resp = fixture
        .client
        .get(fixture.url("/api/inventory"))
        .bearer_auth("not-a-real-token")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);
}

#[tokio::test]
async fn test_register_login_and_me() {
    let fixture = TestFixture::sqlite().await;

    let resp = fixture.get("/api/auth/me").await;
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["email"], json!("tester@example.com"));
    assert_eq!(body["data"]["displayName"], json!("tester"));

    // Fresh login issues a new token for the same user
    let resp = fixture
        .client
        .post(fixture.url("/api/auth/login"))
        .json(&json!({"email": "tester@example.com", "password": "hunter22"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["user"]["email"], json!("tester@example.com"));
    assert_ne!(body["data"]["token"].as_str().unwrap(), fixture.token);

    // Wrong password
    let resp = fixture
        .client
        .post(fixture.url("/api/auth/login"))
        .json(&json!({"email": "tester@example.com", "password": "wrong-pass"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);
}

#[tokio::test]
async fn test_duplicate_registration_rejected() {
    let fixture = TestFixture::sqlite().await;

    let resp = fixture
        .client
        .post(fixture.url("/api/auth/register"))
        .json(&json!({"email": "tester@example.com", "password": "hunter22"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], json!("VALIDATION_ERROR"));
}

#[tokio::test]
async fn test_logout_invalidates_session() {
    let fixture = TestFixture::sqlite().await;

    let resp = fixture.post("/api/auth/logout", json!({})).await;
    assert_eq!(resp.status(), 200);

    let resp = fixture.get("/api/auth/me").await;
    assert_eq!(resp.status(), 401);
}

#[tokio::test]
async fn test_add_then_list_round_trip() {
    let fixture = TestFixture::sqlite().await;

    let resp = fixture
        .post(
            "/api/inventory",
            json!({
                "name": "AK-47 | Redline",
                "weapon": "AK-47",
                "category": "Rifle",
                "rarity": "Classified",
                "float": 0.25,
                "stattrak": true
            }),
        )
        .await;
    assert_eq!(resp.status(), 200);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], json!(true));
    assert!(body.get("warning").is_none());

    let added = &body["data"];
    assert_eq!(added["condition"], json!("Field-Tested"));
    assert_eq!(added["provenance"], json!("own-collection"));
    assert_eq!(added["stattrak"], json!(true));
    let id = added["id"].as_str().unwrap().to_string();

    let resp = fixture.get("/api/inventory").await;
    let body: Value = resp.json().await.unwrap();
    let items = body["data"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], json!(id));
    assert_eq!(items[0]["condition"], json!("Field-Tested"));
    assert_eq!(items[0]["float"], json!(0.25));
}

#[tokio::test]
async fn test_add_rejects_invalid_input() {
    let fixture = TestFixture::sqlite().await;

    let resp = fixture
        .post("/api/inventory", json!({"name": "AWP | Asiimov", "float": 1.5}))
        .await;
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], json!("VALIDATION_ERROR"));

    let resp = fixture
        .post("/api/inventory", json!({"name": "   "}))
        .await;
    assert_eq!(resp.status(), 400);

    // Nothing was stored
    let resp = fixture.get("/api/inventory").await;
    let body: Value = resp.json().await.unwrap();
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_add_enriches_from_catalog() {
    let fixture = TestFixture::sqlite().await;

    // Name matches the fallback dataset; everything else is left blank
    let resp = fixture
        .post("/api/inventory", json!({"name": "AWP | Asiimov"}))
        .await;
    assert_eq!(resp.status(), 200);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["weapon"], json!("AWP"));
    assert_eq!(body["data"]["category"], json!("Sniper Rifle"));
    assert_eq!(body["data"]["rarity"], json!("Covert"));
    assert_ne!(body["data"]["imageUrl"], json!("/placeholder.svg"));
}

#[tokio::test]
async fn test_add_unknown_name_gets_defaults() {
    let fixture = TestFixture::sqlite().await;

    let resp = fixture
        .post("/api/inventory", json!({"name": "Totally Custom Skin"}))
        .await;
    assert_eq!(resp.status(), 200);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["weapon"], json!("Unknown"));
    assert_eq!(body["data"]["category"], json!("Unknown"));
    assert_eq!(body["data"]["rarity"], json!("Common"));
    assert_eq!(body["data"]["imageUrl"], json!("/placeholder.svg"));
    assert_eq!(body["data"]["condition"], Value::Null);
}

#[tokio::test]
async fn test_delete_is_idempotent() {
    let fixture = TestFixture::sqlite().await;

    let resp = fixture
        .post("/api/inventory", json!({"name": "M4A4 | Howl", "float": 0.05}))
        .await;
    let body: Value = resp.json().await.unwrap();
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let resp = fixture.delete(&format!("/api/inventory/{}", id)).await;
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["deleted"], json!(true));

    // Deleting the same id again still succeeds
    let resp = fixture.delete(&format!("/api/inventory/{}", id)).await;
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["deleted"], json!(true));

    let resp = fixture.get("/api/inventory").await;
    let body: Value = resp.json().await.unwrap();
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_search_empty_query_returns_nothing() {
    let fixture = TestFixture::sqlite().await;

    for path in ["/api/catalog/search", "/api/catalog/search?q=", "/api/catalog/search?q=%20%20"] {
        let resp = fixture.get(path).await;
        assert_eq!(resp.status(), 200);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["data"], json!([]));
    }
}

#[tokio::test]
async fn test_search_over_fallback_dataset() {
    // Store empty and remote unreachable: search runs over the fallback set
    let fixture = TestFixture::sqlite().await;

    let resp = fixture.get("/api/catalog/search?q=asiimov").await;
    assert_eq!(resp.status(), 200);

    let body: Value = resp.json().await.unwrap();
    let results = body["data"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["name"], json!("AWP | Asiimov"));
    assert_eq!(results[0]["weapon"], json!("AWP"));
    assert_eq!(results[0]["rarity"], json!("Covert"));
    assert_eq!(results[0]["rarityColor"], json!("#EB4B4B"));

    // Weapon-name matching
    let resp = fixture.get("/api/catalog/search?q=karambit").await;
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"][0]["name"], json!("Karambit | Doppler"));
}

#[tokio::test]
async fn test_catalog_refresh_from_remote() {
    // Two valid entries plus one missing its name, which gets filtered
    let url = spawn_stub_catalog(json!([
        {
            "id": "skin-1",
            "name": "Glock-18 | Fade",
            "weapon": {"id": "weapon_glock", "name": "Glock-18"},
            "rarity": {"name": "Restricted", "color": "#8847ff"}
        },
        {"id": "skin-2", "name": "P250 | Sand Dune", "weapon": "P250"},
        {"id": "broken"}
    ]))
    .await;

    let fixture = TestFixture::sqlite_with_catalog(&url).await;

    let resp = fixture.post("/api/catalog/refresh", json!({})).await;
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["count"], json!(2));

    // Structured fields come back normalized in search results
    let resp = fixture.get("/api/catalog/search?q=fade").await;
    let body: Value = resp.json().await.unwrap();
    let results = body["data"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["weapon"], json!("Glock-18"));
    assert_eq!(results[0]["rarityColor"], json!("#8847ff"));
}

#[tokio::test]
async fn test_non_array_remote_falls_back() {
    let url = spawn_stub_catalog(json!({"error": "rate limited"})).await;
    let fixture = TestFixture::sqlite_with_catalog(&url).await;

    let resp = fixture.post("/api/catalog/refresh", json!({})).await;
    assert_eq!(resp.status(), 200);

    // The compiled-in dataset has six entries
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["count"], json!(6));
}

#[tokio::test]
async fn test_find_catalog_entry_by_name() {
    let fixture = TestFixture::sqlite().await;

    // Partial name match
    let resp = fixture.get("/api/catalog/find?name=redline").await;
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["name"], json!("AK-47 | Redline"));

    // Weapon match when no name matches
    let resp = fixture.get("/api/catalog/find?name=Desert%20Eagle").await;
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["name"], json!("Desert Eagle | Blaze"));

    let resp = fixture.get("/api/catalog/find?name=no-such-skin").await;
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn test_status_reports_backend() {
    let fixture = TestFixture::sqlite().await;
    let resp = fixture.get("/api/status").await;
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["backend"], json!("sqlite"));
    assert_eq!(body["data"]["fallbackMode"], json!(false));

    let fixture = TestFixture::local_only().await;
    let resp = fixture.get("/api/status").await;
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["backend"], json!("local-file"));
    assert_eq!(body["data"]["fallbackMode"], json!(true));
}

#[tokio::test]
async fn test_fallback_mode_inventory_round_trip() {
    // No database at all; the local file store carries everything
    let fixture = TestFixture::local_only().await;

    let resp = fixture
        .post(
            "/api/inventory",
            json!({"name": "Karambit | Doppler", "float": 0.02}),
        )
        .await;
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["condition"], json!("Factory New"));

    let resp = fixture.get("/api/inventory").await;
    let body: Value = resp.json().await.unwrap();
    let items = body["data"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["name"], json!("Karambit | Doppler"));
}

#[tokio::test]
async fn test_settings_round_trip() {
    let fixture = TestFixture::sqlite().await;

    // Known key resolves to its compiled-in default before any write
    let resp = fixture.get("/api/settings/steam_api_key").await;
    let body: Value = resp.json().await.unwrap();
    assert_eq!(
        body["data"]["value"],
        json!("2A3C7842A41375B31B81635F6AEB341D")
    );

    let resp = fixture
        .client
        .put(fixture.url("/api/settings/steam_api_key"))
        .bearer_auth(&fixture.token)
        .json(&json!({"value": "MY-OWN-KEY"}))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["saved"], json!(true));

    let resp = fixture.get("/api/settings/steam_api_key").await;
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["value"], json!("MY-OWN-KEY"));

    // Unknown keys have no default
    let resp = fixture.get("/api/settings/unknown_key").await;
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["value"], Value::Null);
}

#[tokio::test]
async fn test_steam_inventory_requires_link() {
    let fixture = TestFixture::sqlite().await;

    let resp = fixture.get("/api/inventory/steam").await;
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], json!("VALIDATION_ERROR"));
}

#[tokio::test]
async fn test_steam_inventory_mirror_is_stable() {
    let fixture = TestFixture::sqlite().await;

    let resp = fixture.post("/api/auth/steam", json!({})).await;
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert!(body["data"]["steamId"].as_str().unwrap().starts_with("demo-steam-"));

    let resp = fixture.get("/api/inventory/steam").await;
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    let items = body["data"].as_array().unwrap();
    assert_eq!(items.len(), 3);
    for item in items {
        assert_eq!(item["provenance"], json!("mirrored-external"));
    }
    let first_ids: Vec<String> = items
        .iter()
        .map(|i| i["id"].as_str().unwrap().to_string())
        .collect();

    // Mirror is served from the cache until an explicit refresh
    let resp = fixture.get("/api/inventory/steam").await;
    let body: Value = resp.json().await.unwrap();
    let again_ids: Vec<String> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(first_ids, again_ids);

    // Refresh rebuilds the mirror with new ids
    let resp = fixture.get("/api/inventory/steam?refresh=true").await;
    let body: Value = resp.json().await.unwrap();
    let refreshed_ids: Vec<String> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["id"].as_str().unwrap().to_string())
        .collect();
    assert_ne!(first_ids, refreshed_ids);
}

#[tokio::test]
async fn test_inventory_export_download() {
    let fixture = TestFixture::sqlite().await;

    fixture
        .post("/api/inventory", json!({"name": "AK-47 | Redline", "float": 0.1}))
        .await;

    let resp = fixture.get("/api/inventory/export").await;
    assert_eq!(resp.status(), 200);

    let disposition = resp
        .headers()
        .get("content-disposition")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.contains("skinvault_inventory_"));
    assert!(disposition.ends_with(".json\""));

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_catalog_export_download() {
    let fixture = TestFixture::sqlite().await;

    let resp = fixture.get("/api/catalog/export").await;
    assert_eq!(resp.status(), 200);

    let disposition = resp
        .headers()
        .get("content-disposition")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.contains("cs2_skins_database_"));

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body.as_array().unwrap().len(), 6);
}
