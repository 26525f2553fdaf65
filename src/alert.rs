//! User-facing alerts built from errors.
//!
//! Only errors exposing a public message are shown verbatim. Anything else is
//! logged and replaced by [`ALERT_MSG_GENERIC`].

use serde::Serialize;
use tracing::error;

use crate::models;

/// Displayed when an error has no public-safe message.
pub const ALERT_MSG_GENERIC: &str =
    "Something went wrong. Please try again, and contact us if the problem persists.";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    #[serde(rename = "danger")]
    Error,
    Warning,
    Info,
    Success,
}

impl AlertLevel {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Error => "danger",
            Self::Warning => "warning",
            Self::Info => "info",
            Self::Success => "success",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Alert {
    pub level: AlertLevel,
    pub message: String,
}

impl Alert {
    #[must_use]
    pub fn new(level: AlertLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    /// Alert for a model error: its public message, or the generic one.
    #[must_use]
    pub fn from_error(err: &models::Error) -> Self {
        let message = err.public().unwrap_or_else(|| {
            error!(error = %err, "internal error");
            ALERT_MSG_GENERIC.to_string()
        });
        Self::new(AlertLevel::Error, message)
    }

    /// Alert for an application error. Only a wrapped [`models::Error`] can
    /// carry a public message.
    #[must_use]
    pub fn from_anyhow(err: &anyhow::Error) -> Self {
        match err.downcast_ref::<models::Error>() {
            Some(model_err) => Self::from_error(model_err),
            None => {
                error!(error = format!("{err:#}"), "internal error");
                Self::new(AlertLevel::Error, ALERT_MSG_GENERIC)
            }
        }
    }
}

impl std::fmt::Display for Alert {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.level.as_str(), self.message)
    }
}
