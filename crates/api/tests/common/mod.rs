#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE, IF_MATCH, IF_NONE_MATCH};
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tokio::sync::Barrier;
use tower::ServiceExt;

use catalog_api::auth::jwt::{generate_access_token, JwtConfig};
use catalog_api::config::{CachePolicy, LogFormat, ServerConfig, StoreBackend};
use catalog_api::router::build_app_router;
use catalog_api::state::AppState;
use catalog_core::error::CoreError;
use catalog_core::listing::{Paginated, QuerySpec};
use catalog_core::mutation::ConditionalStore;
use catalog_core::types::{DbId, Timestamp};
use catalog_db::memory::MemoryStore;
use catalog_db::models::accessory::Accessory;
use catalog_db::models::character::Character;
use catalog_db::store::{CatalogResource, ResourceStore};

/// Build a test `ServerConfig` with safe defaults and the in-memory store.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        store: StoreBackend::Memory,
        database_url: None,
        cache: CachePolicy::default(),
        require_if_match: false,
        log_format: LogFormat::Text,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 15,
        },
    }
}

/// Full application router over empty in-memory tables.
pub fn build_test_app() -> Router {
    build_test_app_with(test_config())
}

pub fn build_test_app_with(config: ServerConfig) -> Router {
    let state = AppState::in_memory(config.clone());
    build_app_router(state, &config)
}

/// In-memory store whose swaps wait until `writers` of them are pending.
///
/// Every writer has loaded the row and passed its `If-Match` check before
/// any swap runs, so only the compare-and-swap can pick the winner.
pub struct SwapGate<R> {
    inner: MemoryStore<R>,
    barrier: Barrier,
    swaps: AtomicUsize,
}

impl<R: CatalogResource> SwapGate<R> {
    pub fn new(writers: usize) -> Self {
        Self {
            inner: MemoryStore::new(),
            barrier: Barrier::new(writers),
            swaps: AtomicUsize::new(0),
        }
    }

    /// Swaps attempted so far.
    pub fn swaps(&self) -> usize {
        self.swaps.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<R: CatalogResource> ConditionalStore<R> for SwapGate<R> {
    async fn load(&self, id: DbId) -> Result<Option<R>, CoreError> {
        self.inner.load(id).await
    }

    async fn compare_and_swap(
        &self,
        id: DbId,
        expected_updated_at: Timestamp,
        next: &R,
    ) -> Result<Option<R>, CoreError> {
        self.swaps.fetch_add(1, Ordering::SeqCst);
        self.barrier.wait().await;
        self.inner.compare_and_swap(id, expected_updated_at, next).await
    }
}

#[async_trait]
impl<R: CatalogResource> ResourceStore<R> for SwapGate<R> {
    async fn insert(&self, input: &R::Create) -> Result<R, CoreError> {
        self.inner.insert(input).await
    }

    async fn list(&self, spec: &QuerySpec) -> Result<Paginated<R>, CoreError> {
        self.inner.list(spec).await
    }

    async fn soft_delete(&self, id: DbId) -> Result<bool, CoreError> {
        self.inner.soft_delete(id).await
    }

    async fn ping(&self) -> Result<(), CoreError> {
        self.inner.ping().await
    }
}

/// App whose character store is a [`SwapGate`] for `writers` concurrent PUTs.
pub fn build_gated_app(writers: usize) -> (Router, Arc<SwapGate<Character>>) {
    let config = test_config();
    let gate = Arc::new(SwapGate::new(writers));
    let state = AppState {
        config: Arc::new(config.clone()),
        characters: gate.clone(),
        accessories: Arc::new(MemoryStore::<Accessory>::new()),
    };
    (build_app_router(state, &config), gate)
}

/// `Authorization` header value accepted by [`test_config`]'s secret.
pub fn bearer() -> String {
    let token = generate_access_token(1, "editor", &test_config().jwt).unwrap();
    format!("Bearer {token}")
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub fn header<'a>(response: &'a Response<Body>, name: &str) -> Option<&'a str> {
    response.headers().get(name).and_then(|v| v.to_str().ok())
}

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn get_if_none_match(app: Router, uri: &str, etag: &str) -> Response<Body> {
    let request = Request::builder()
        .uri(uri)
        .header(IF_NONE_MATCH, etag)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

/// Authenticated POST with a JSON body.
pub async fn post_json(app: Router, uri: &str, body: &Value) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .header(AUTHORIZATION, bearer())
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

/// Authenticated PUT with a JSON body and optional `If-Match`.
pub async fn put_json(
    app: Router,
    uri: &str,
    body: &Value,
    if_match: Option<&str>,
) -> Response<Body> {
    let mut builder = Request::builder()
        .method(Method::PUT)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .header(AUTHORIZATION, bearer());
    if let Some(etag) = if_match {
        builder = builder.header(IF_MATCH, etag);
    }
    send(app, builder.body(Body::from(body.to_string())).unwrap()).await
}

/// Authenticated DELETE.
pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .header(AUTHORIZATION, bearer())
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

/// Create a resource and return `(id, etag)`.
pub async fn create(app: &Router, collection: &str, body: Value) -> (i64, String) {
    let response = post_json(app.clone(), &format!("/api/v1/{collection}"), &body).await;
    assert_eq!(response.status(), 201, "create {collection} failed");
    let etag = header(&response, "etag").unwrap().to_string();
    let json = body_json(response).await;
    (json["data"]["id"].as_i64().unwrap(), etag)
}

pub fn character(name: &str) -> Value {
    serde_json::json!({
        "name": name,
        "job": "dancer",
        "influence": "fame",
        "rarity": 5,
    })
}

pub fn accessory(name: &str, owner: Option<&str>) -> Value {
    serde_json::json!({
        "name": name,
        "owner": owner,
        "effect": "Critical rate +10%",
    })
}
