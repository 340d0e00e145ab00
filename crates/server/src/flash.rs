//! One-shot flash messages carried in the session.
//!
//! Messages queued during one request are drained by the next rendered
//! page; rendering consumes them, so a refresh shows nothing.

use std::fmt;

use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::models::session_keys;

/// Severity level of a flash message, rendered as a CSS class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Info,
    Success,
    Danger,
}

impl fmt::Display for FlashLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Danger => "danger",
        };
        write!(f, "{s}")
    }
}

/// A one-shot notification for the next rendered page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flash {
    pub message: String,
    pub level: FlashLevel,
}

/// Queue a flash message in the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn push_flash(
    session: &Session,
    level: FlashLevel,
    message: impl Into<String>,
) -> Result<(), tower_sessions::session::Error> {
    let mut flashes: Vec<Flash> = session
        .get(session_keys::FLASH_MESSAGES)
        .await?
        .unwrap_or_default();

    flashes.push(Flash {
        message: message.into(),
        level,
    });

    session.insert(session_keys::FLASH_MESSAGES, flashes).await
}

/// Drain all queued flash messages from the session.
///
/// Returns an empty list when nothing is queued. The messages are removed
/// from the session, so a second call returns nothing.
pub async fn take_flashes(session: &Session) -> Vec<Flash> {
    session
        .remove::<Vec<Flash>>(session_keys::FLASH_MESSAGES)
        .await
        .ok()
        .flatten()
        .unwrap_or_default()
}
