//! One-shot flash notifications.
//!
//! Flash messages are queued in the session before a redirect and drained
//! exactly once by the next rendered page, so reloading the destination
//! never repeats the message.

use serde::{Deserialize, Serialize};

/// Category of a flash message; drives presentation only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashKind {
    /// Confirmation of a completed action.
    Info,
    /// A user-correctable problem.
    Error,
}

impl FlashKind {
    /// Stable name used as a CSS hook in templates.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Error => "error",
        }
    }
}

/// A queued one-shot notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashMessage {
    /// Message category.
    pub kind: FlashKind,
    /// Text shown to the user.
    pub message: String,
}

impl FlashMessage {
    /// Create an info flash.
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Info,
            message: message.into(),
        }
    }

    /// Create an error flash.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Error,
            message: message.into(),
        }
    }
}
