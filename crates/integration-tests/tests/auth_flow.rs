//! Integration tests for registration, login, and logout.

use axum::http::StatusCode;

use stocklist_server::db::UserRepository;

use stocklist_integration_tests::{TestApp, body_string, location};

async fn user_count(app: &TestApp) -> i64 {
    UserRepository::new(app.pool()).count().await.expect("count")
}

// ============================================================================
// Registration
// ============================================================================

#[tokio::test]
async fn register_then_login_succeeds() {
    let mut app = TestApp::new().await;

    let response = app.register("alice", "password1", "password1").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");
    assert_eq!(user_count(&app).await, 1);

    // The login page shows the queued success flash
    let response = app.get("/login").await;
    let body = body_string(response).await;
    assert!(body.contains("Account created successfully! You can now log in."));

    let response = app.login("alice", "password1").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/products");

    let response = app.get("/products").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("Logged in successfully."));
    assert!(body.contains("alice"));
}

#[tokio::test]
async fn register_rejects_short_username() {
    let mut app = TestApp::new().await;

    let response = app.register("abc", "password1", "password1").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("The username must be at least 4 characters."));
    assert_eq!(user_count(&app).await, 0);
}

#[tokio::test]
async fn register_rejects_empty_username() {
    let mut app = TestApp::new().await;

    let response = app.register("", "password1", "password1").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("The username must be at least 4 characters."));
    assert_eq!(user_count(&app).await, 0);
}

#[tokio::test]
async fn register_rejects_short_password() {
    let mut app = TestApp::new().await;

    let response = app.register("alice", "12345", "12345").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("The password must be at least 6 characters."));
    assert_eq!(user_count(&app).await, 0);
}

#[tokio::test]
async fn register_rejects_mismatched_confirmation() {
    let mut app = TestApp::new().await;

    let response = app.register("alice", "password1", "password2").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("The passwords do not match."));
    assert_eq!(user_count(&app).await, 0);
}

#[tokio::test]
async fn register_rejects_duplicate_username() {
    let mut app = TestApp::new().await;

    let response = app.register("alice", "password1", "password1").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let response = app.register("alice", "different1", "different1").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("That username already exists. Please choose another."));
    assert_eq!(user_count(&app).await, 1);
}

#[tokio::test]
async fn register_page_redirects_when_logged_in() {
    let mut app = TestApp::new().await;
    app.login_as("alice", "password1").await;

    let response = app.get("/register").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/products");
}

// ============================================================================
// Login
// ============================================================================

#[tokio::test]
async fn login_rejects_empty_fields() {
    let mut app = TestApp::new().await;

    let response = app.login("", "").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("Please enter a username and password."));
}

#[tokio::test]
async fn login_failure_is_uniform_for_unknown_user_and_wrong_password() {
    let mut app = TestApp::new().await;
    let response = app.register("alice", "password1", "password1").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    // Unknown user
    let response = app.login("nobody", "password1").await;
    assert_eq!(response.status(), StatusCode::OK);
    let unknown_user_body = body_string(response).await;
    assert!(unknown_user_body.contains("Incorrect credentials. Please try again."));

    // Known user, wrong password
    let response = app.login("alice", "wrong-password").await;
    assert_eq!(response.status(), StatusCode::OK);
    let wrong_password_body = body_string(response).await;
    assert!(wrong_password_body.contains("Incorrect credentials. Please try again."));
}

#[tokio::test]
async fn login_follows_next_parameter() {
    let mut app = TestApp::new().await;
    let response = app.register("alice", "password1", "password1").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let response = app
        .post_form(
            "/login",
            &[
                ("username", "alice"),
                ("password", "password1"),
                ("next", "/products/create"),
            ],
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/products/create");
}

#[tokio::test]
async fn login_rejects_external_next_targets() {
    let mut app = TestApp::new().await;
    let response = app.register("alice", "password1", "password1").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let response = app
        .post_form(
            "/login",
            &[
                ("username", "alice"),
                ("password", "password1"),
                ("next", "//evil.example/phish"),
            ],
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/products");
}

// ============================================================================
// Logout
// ============================================================================

#[tokio::test]
async fn logout_clears_the_session() {
    let mut app = TestApp::new().await;
    app.login_as("alice", "password1").await;

    let response = app.get("/logout").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");

    // The login page shows the logout notice
    let response = app.get("/login").await;
    let body = body_string(response).await;
    assert!(body.contains("You have been logged out."));

    // The session no longer grants access
    let response = app.get("/products").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(location(&response).starts_with("/login"));
}

#[tokio::test]
async fn logout_requires_authentication() {
    let mut app = TestApp::new().await;

    let response = app.get("/logout").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login?next=%2Flogout");
}

// ============================================================================
// Flash semantics
// ============================================================================

#[tokio::test]
async fn flash_messages_render_once() {
    let mut app = TestApp::new().await;

    let response = app.register("alice", "password1", "password1").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let response = app.get("/login").await;
    let body = body_string(response).await;
    assert!(body.contains("Account created successfully!"));

    // A refresh shows nothing
    let response = app.get("/login").await;
    let body = body_string(response).await;
    assert!(!body.contains("Account created successfully!"));
}
