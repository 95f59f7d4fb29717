//! Failure taxonomy for the invitation page.
//!
//! Nothing here is fatal: every component logs the error and skips the work
//! that depended on it.

use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InvitationError {
    /// The requested side, the document default and the fallback side are all absent.
    DataUnavailable {
        requested: Option<String>,
        tried: Vec<String>,
    },
    /// The page does not carry an element the DOM schema promises.
    ElementNotFound { what: String },
    /// An image failed to decode or audio refused to start.
    MediaUnavailable { what: String, reason: String },
    /// A browser API or page library call threw or refused the request.
    BrowserCall { call: String, reason: String },
    /// The data document is not valid JSON or not shaped as expected.
    Decode(String),
    /// The data document could not be fetched.
    Fetch(String),
}

impl InvitationError {
    pub fn element_not_found(what: impl Into<String>) -> Self {
        Self::ElementNotFound { what: what.into() }
    }

    pub fn media_unavailable(what: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MediaUnavailable {
            what: what.into(),
            reason: reason.into(),
        }
    }

    pub fn browser_call(call: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::BrowserCall {
            call: call.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for InvitationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DataUnavailable { requested, tried } => {
                let requested = requested.as_deref().unwrap_or("<none>");
                write!(
                    f,
                    "no wedding data for '{requested}' (tried: {})",
                    tried.join(", ")
                )
            }
            Self::ElementNotFound { what } => write!(f, "element not found: {what}"),
            Self::MediaUnavailable { what, reason } => {
                write!(f, "media unavailable: {what}: {reason}")
            }
            Self::BrowserCall { call, reason } => write!(f, "{call} failed: {reason}"),
            Self::Decode(message) => write!(f, "invalid wedding data: {message}"),
            Self::Fetch(message) => write!(f, "failed to fetch wedding data: {message}"),
        }
    }
}

impl std::error::Error for InvitationError {}

impl From<serde_json::Error> for InvitationError {
    fn from(error: serde_json::Error) -> Self {
        Self::Decode(error.to_string())
    }
}

pub type Result<T, E = InvitationError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_unavailable_lists_every_key_tried() {
        let error = InvitationError::DataUnavailable {
            requested: Some("ban_be".to_string()),
            tried: vec!["ban_be".to_string(), "chu_re".to_string()],
        };
        assert_eq!(
            error.to_string(),
            "no wedding data for 'ban_be' (tried: ban_be, chu_re)"
        );
    }

    #[test]
    fn browser_call_names_the_call() {
        let error = InvitationError::browser_call("Swal.fire", "TypeError: not a function");
        assert_eq!(error.to_string(), "Swal.fire failed: TypeError: not a function");
        assert!(!matches!(error, InvitationError::ElementNotFound { .. }));
    }

    #[test]
    fn json_errors_become_decode_errors() {
        let error: InvitationError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(matches!(error, InvitationError::Decode(_)));
    }
}
