//! Router harness for scenario tests: the full app over an in-memory store
//! and a clock the test can move.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, HeaderMap, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::{app::build_app, auth::jwt::tests::ManualClock, state::AppState, store::memory::MemoryStore};

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    pub fn set_cookies(&self) -> Vec<String> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok().map(str::to_owned))
            .collect()
    }

    pub fn set_cookie(&self, name: &str) -> Option<String> {
        let prefix = format!("{name}=");
        self.set_cookies().into_iter().find(|c| c.starts_with(&prefix))
    }
}

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub clock: Arc<ManualClock>,
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::default());
        let clock = Arc::new(ManualClock::new());
        let state = AppState::fake(store.clone(), clock.clone());
        Self {
            router: build_app(state),
            store,
            clock,
        }
    }

    pub async fn send(&self, req: Request<Body>) -> TestResponse {
        let res = self.router.clone().oneshot(req).await.unwrap();
        let status = res.status();
        let headers = res.headers().clone();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn post_json(&self, uri: &str, body: Value, access_token: Option<&str>) -> TestResponse {
        let mut req = Request::post(uri).header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = access_token {
            req = req.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        self.send(req.body(Body::from(body.to_string())).unwrap()).await
    }

    pub async fn get(&self, uri: &str, headers: &[(header::HeaderName, String)]) -> TestResponse {
        let mut req = Request::get(uri);
        for (name, value) in headers {
            req = req.header(name, value);
        }
        self.send(req.body(Body::empty()).unwrap()).await
    }

    pub async fn register(&self, email: &str, password: &str) -> TestResponse {
        self.post_json("/register", json!({ "email": email, "password": password }), None)
            .await
    }

    pub async fn login(&self, email: &str, password: &str) -> TestResponse {
        self.post_json("/login", json!({ "email": email, "password": password }), None)
            .await
    }

    /// Registers and logs in, returning `(access_token, refresh_token)`.
    pub async fn signed_in(&self, email: &str) -> (String, String) {
        assert_eq!(self.register(email, "testpassword").await.status, StatusCode::CREATED);
        let res = self.login(email, "testpassword").await;
        assert_eq!(res.status, StatusCode::OK);
        (
            res.body["access_token"].as_str().unwrap().to_owned(),
            res.body["refresh_token"].as_str().unwrap().to_owned(),
        )
    }
}
