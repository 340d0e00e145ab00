//! Integration test harness for Stocklist.
//!
//! Drives the full axum router in-process against an in-memory `SQLite`
//! database: no running server, no network, no shared state between tests.
//!
//! # Usage
//!
//! ```rust,ignore
//! let mut app = TestApp::new().await;
//! app.register("alice", "password1", "password1").await;
//! let response = app.login("alice", "password1").await;
//! assert_eq!(response.status(), StatusCode::SEE_OTHER);
//! ```
//!
//! The harness keeps a cookie jar across requests, so session-based flows
//! (login, flash messages) behave as they would in a browser.

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::collections::BTreeMap;

use axum::Router;
use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, COOKIE, SET_COOKIE};
use axum::http::{Method, Request, Response};
use secrecy::SecretString;
use sqlx::SqlitePool;
use tower::ServiceExt;

use stocklist_server::config::AppConfig;
use stocklist_server::db;
use stocklist_server::state::AppState;

/// In-process application under test.
pub struct TestApp {
    router: Router,
    pool: SqlitePool,
    cookies: BTreeMap<String, String>,
}

impl TestApp {
    /// Build a fresh application over an in-memory database.
    pub async fn new() -> Self {
        let pool = db::in_memory_pool().await.expect("in-memory pool");
        db::MIGRATOR.run(&pool).await.expect("migrations");

        let state = AppState::new(test_config(), pool.clone());
        let router = stocklist_server::app(state).await.expect("build router");

        Self {
            router,
            pool,
            cookies: BTreeMap::new(),
        }
    }

    /// The underlying database pool, for direct assertions.
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Send a GET request, carrying and capturing session cookies.
    pub async fn get(&mut self, path: &str) -> Response<Body> {
        let request = self
            .request_builder(Method::GET, path)
            .body(Body::empty())
            .unwrap();

        self.send(request).await
    }

    /// Send a POST request with a form-encoded body.
    pub async fn post_form(&mut self, path: &str, fields: &[(&str, &str)]) -> Response<Body> {
        let body = encode_form(fields);
        let request = self
            .request_builder(Method::POST, path)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap();

        self.send(request).await
    }

    /// Submit the registration form.
    pub async fn register(
        &mut self,
        username: &str,
        password: &str,
        confirm_password: &str,
    ) -> Response<Body> {
        self.post_form(
            "/register",
            &[
                ("username", username),
                ("password", password),
                ("confirm_password", confirm_password),
            ],
        )
        .await
    }

    /// Submit the login form.
    pub async fn login(&mut self, username: &str, password: &str) -> Response<Body> {
        self.post_form("/login", &[("username", username), ("password", password)])
            .await
    }

    /// Register and log in a default user, ready for authenticated requests.
    pub async fn login_as(&mut self, username: &str, password: &str) {
        let response = self.register(username, password, password).await;
        assert!(
            response.status().is_redirection(),
            "registration should redirect"
        );

        let response = self.login(username, password).await;
        assert!(response.status().is_redirection(), "login should redirect");
    }

    fn request_builder(&self, method: Method, path: &str) -> axum::http::request::Builder {
        let mut builder = Request::builder().method(method).uri(path);

        if !self.cookies.is_empty() {
            let header = self
                .cookies
                .iter()
                .map(|(name, value)| format!("{name}={value}"))
                .collect::<Vec<_>>()
                .join("; ");
            builder = builder.header(COOKIE, header);
        }

        builder
    }

    async fn send(&mut self, request: Request<Body>) -> Response<Body> {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router call is infallible");

        self.capture_cookies(&response);
        response
    }

    /// Record cookies from `Set-Cookie` headers, honoring removals.
    fn capture_cookies(&mut self, response: &Response<Body>) {
        for value in response.headers().get_all(SET_COOKIE) {
            let Ok(raw) = value.to_str() else { continue };
            let Some(pair) = raw.split(';').next() else {
                continue;
            };
            let Some((name, value)) = pair.split_once('=') else {
                continue;
            };

            if value.is_empty() {
                self.cookies.remove(name);
            } else {
                self.cookies.insert(name.to_owned(), value.to_owned());
            }
        }
    }
}

/// Configuration for tests; never read from the environment.
fn test_config() -> AppConfig {
    AppConfig {
        database_url: SecretString::from("sqlite::memory:"),
        host: "127.0.0.1".parse().unwrap(),
        port: 0,
        base_url: "http://localhost:3000".to_string(),
        session_secret: SecretString::from(
            "integration-test-session-secret-0123456789abcdef0123456789abcdef",
        ),
        sentry_dsn: None,
        sentry_environment: None,
    }
}

/// Form-encode key/value pairs.
fn encode_form(fields: &[(&str, &str)]) -> String {
    fields
        .iter()
        .map(|(key, value)| {
            format!(
                "{}={}",
                urlencoding::encode(key),
                urlencoding::encode(value)
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Read a response body to a string.
pub async fn body_string(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}

/// The `Location` header of a redirect response.
#[must_use]
pub fn location(response: &Response<Body>) -> &str {
    response
        .headers()
        .get(axum::http::header::LOCATION)
        .expect("Location header")
        .to_str()
        .expect("ascii Location header")
}
