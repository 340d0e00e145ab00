//! Authentication route handlers.
//!
//! Handles registration, login, and logout. Form validation failures are
//! reported as flash messages; only infrastructure failures become an
//! `AppError`.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;

use stocklist_core::Username;

use crate::error::{AppError, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::flash::{Flash, FlashLevel, push_flash, take_flashes};
use crate::middleware::{OptionalAuth, RequireAuth, clear_current_user, set_current_user};
use crate::models::CurrentUser;
use crate::services::auth::{AuthError, AuthService, MIN_PASSWORD_LENGTH};
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Registration form data.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub username: String,
    pub password: String,
    pub confirm_password: String,
}

/// Login form data.
///
/// `next` travels as a hidden field so a failed attempt keeps the
/// post-login destination.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub next: Option<String>,
}

// =============================================================================
// Query Types
// =============================================================================

/// Query parameters carrying the post-login destination.
#[derive(Debug, Deserialize)]
pub struct NextQuery {
    pub next: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Registration page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub flashes: Vec<Flash>,
    pub current_user: Option<CurrentUser>,
}

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub flashes: Vec<Flash>,
    pub current_user: Option<CurrentUser>,
    pub next: Option<String>,
}

// =============================================================================
// Registration Routes
// =============================================================================

/// Display the registration page.
///
/// Logged-in users are sent back to the product list.
pub async fn register_page(OptionalAuth(user): OptionalAuth, session: Session) -> Response {
    if user.is_some() {
        return Redirect::to("/products").into_response();
    }

    RegisterTemplate {
        flashes: take_flashes(&session).await,
        current_user: None,
    }
    .into_response()
}

/// Handle registration form submission.
pub async fn register(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> Response {
    if user.is_some() {
        return Redirect::to("/products").into_response();
    }

    // Field checks in submission order: username, password, confirmation.
    if Username::parse(&form.username).is_err() {
        return register_failure(&session, "The username must be at least 4 characters.").await;
    }
    if form.password.len() < MIN_PASSWORD_LENGTH {
        return register_failure(&session, "The password must be at least 6 characters.").await;
    }
    if form.password != form.confirm_password {
        return register_failure(&session, "The passwords do not match.").await;
    }

    let auth = AuthService::new(state.pool());
    match auth.register(&form.username, &form.password).await {
        Ok(user) => {
            tracing::info!(user_id = %user.id, "user registered");

            if let Err(e) = push_flash(
                &session,
                FlashLevel::Success,
                "Account created successfully! You can now log in.",
            )
            .await
            {
                tracing::error!("Failed to queue flash message: {}", e);
            }

            Redirect::to("/login").into_response()
        }
        Err(AuthError::UserAlreadyExists) => {
            register_failure(
                &session,
                "That username already exists. Please choose another.",
            )
            .await
        }
        Err(e) => {
            tracing::error!("Registration failed: {}", e);
            register_failure(&session, format!("Error creating the account: {e}")).await
        }
    }
}

/// Re-render the registration form with a danger flash.
async fn register_failure(session: &Session, message: impl Into<String>) -> Response {
    let mut flashes = take_flashes(session).await;
    flashes.push(Flash {
        message: message.into(),
        level: FlashLevel::Danger,
    });

    RegisterTemplate {
        flashes,
        current_user: None,
    }
    .into_response()
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
///
/// Logged-in users are sent back to the product list.
pub async fn login_page(
    OptionalAuth(user): OptionalAuth,
    Query(query): Query<NextQuery>,
    session: Session,
) -> Response {
    if user.is_some() {
        return Redirect::to("/products").into_response();
    }

    LoginTemplate {
        flashes: take_flashes(&session).await,
        current_user: None,
        next: query.next,
    }
    .into_response()
}

/// Handle login form submission.
///
/// Unknown usernames and wrong passwords produce the same message, so the
/// form reveals nothing about which accounts exist.
pub async fn login(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    if user.is_some() {
        return Ok(Redirect::to("/products").into_response());
    }

    if form.username.is_empty() || form.password.is_empty() {
        return Ok(login_failure(
            &session,
            "Please enter a username and password.",
            form.next,
        )
        .await);
    }

    let auth = AuthService::new(state.pool());
    match auth.login(&form.username, &form.password).await {
        Ok(user) => {
            let current_user = CurrentUser {
                id: user.id,
                username: user.username.clone(),
            };

            if let Err(e) = set_current_user(&session, &current_user).await {
                tracing::error!("Failed to set session: {}", e);
                return Err(AppError::Internal("session write failed".to_string()));
            }

            set_sentry_user(&user.id, Some(user.username.as_str()));
            tracing::info!(user_id = %user.id, "user logged in");

            if let Err(e) = push_flash(&session, FlashLevel::Success, "Logged in successfully.").await
            {
                tracing::error!("Failed to queue flash message: {}", e);
            }

            Ok(Redirect::to(sanitize_next(form.next.as_deref())).into_response())
        }
        Err(AuthError::InvalidCredentials) => Ok(login_failure(
            &session,
            "Incorrect credentials. Please try again.",
            form.next,
        )
        .await),
        Err(e) => Err(AppError::Auth(e)),
    }
}

/// Re-render the login form with a danger flash.
async fn login_failure(
    session: &Session,
    message: impl Into<String>,
    next: Option<String>,
) -> Response {
    let mut flashes = take_flashes(session).await;
    flashes.push(Flash {
        message: message.into(),
        level: FlashLevel::Danger,
    });

    LoginTemplate {
        flashes,
        current_user: None,
        next,
    }
    .into_response()
}

/// Validate the post-login destination.
///
/// Only same-site absolute paths are accepted; anything else (including
/// protocol-relative `//host` values) falls back to the product list.
fn sanitize_next(next: Option<&str>) -> &str {
    match next {
        Some(path) if path.starts_with('/') && !path.starts_with("//") => path,
        _ => "/products",
    }
}

// =============================================================================
// Logout Route
// =============================================================================

/// Handle logout.
///
/// Clears the session user and sends the visitor back to the login page.
pub async fn logout(RequireAuth(user): RequireAuth, session: Session) -> Response {
    if let Err(e) = clear_current_user(&session).await {
        tracing::error!("Failed to clear session: {}", e);
    }

    clear_sentry_user();
    tracing::info!(user_id = %user.id, "user logged out");

    if let Err(e) = push_flash(&session, FlashLevel::Info, "You have been logged out.").await {
        tracing::error!("Failed to queue flash message: {}", e);
    }

    Redirect::to("/login").into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_next_accepts_site_paths() {
        assert_eq!(sanitize_next(Some("/products/create")), "/products/create");
        assert_eq!(sanitize_next(Some("/")), "/");
    }

    #[test]
    fn test_sanitize_next_rejects_external_targets() {
        assert_eq!(sanitize_next(Some("https://evil.example")), "/products");
        assert_eq!(sanitize_next(Some("//evil.example")), "/products");
        assert_eq!(sanitize_next(Some("evil")), "/products");
        assert_eq!(sanitize_next(None), "/products");
    }
}
