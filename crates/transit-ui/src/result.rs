//! Result and error types for the calculator harness.
//!
//! Two classes of failure exist and they are handled differently: transient
//! absence during a read-only query is *not* an error (the query returns an
//! empty/false value), while a mutating action that cannot complete within
//! its wait budget always surfaces as a typed error carrying the locator it
//! was aimed at.

use thiserror::Error;

/// Result type for calculator UI operations
pub type UiResult<T> = Result<T, UiError>;

/// Errors that can occur while driving the calculator page
#[derive(Debug, Error)]
pub enum UiError {
    /// Browser could not be launched
    #[error("Failed to launch browser: {message}")]
    BrowserLaunch {
        /// Error message
        message: String,
    },

    /// Navigation failed or the page root never appeared
    #[error("Navigation to {url} failed: {message}")]
    Navigation {
        /// URL that failed
        url: String,
        /// Error message
        message: String,
    },

    /// Underlying browser session fault (transport, closed session, ...)
    #[error("Browser session error: {message}")]
    Session {
        /// Error message
        message: String,
    },

    /// Script evaluation inside the page failed
    #[error("Script evaluation failed: {message}")]
    Script {
        /// Error message
        message: String,
    },

    /// A requested action (click, clear, type) could not be completed
    #[error("{region} ({selector}): {reason}")]
    Interaction {
        /// Human-readable name of the UI region
        region: String,
        /// Selector the action was aimed at
        selector: String,
        /// What went wrong
        reason: String,
    },

    /// A dropdown had no option matching the requested value or label
    #[error("no option matching {value:?} in {region} ({selector})")]
    Selection {
        /// Human-readable name of the dropdown
        region: String,
        /// Selector of the dropdown root
        selector: String,
        /// Value or label that was requested
        value: String,
    },
}

impl UiError {
    /// Shorthand for an [`UiError::Interaction`] aimed at a locator.
    pub fn interaction(
        region: impl Into<String>,
        selector: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Interaction {
            region: region.into(),
            selector: selector.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interaction_error_names_the_region_and_selector() {
        let err = UiError::interaction("submit button", ".c-calculator button", "never clickable");
        let text = err.to_string();
        assert!(text.contains("submit button"));
        assert!(text.contains(".c-calculator button"));
        assert!(text.contains("never clickable"));
    }

    #[test]
    fn selection_error_carries_the_attempted_value() {
        let err = UiError::Selection {
            region: "origin country dropdown".to_string(),
            selector: "#origin-country".to_string(),
            value: "CZ".to_string(),
        };
        assert!(err.to_string().contains("\"CZ\""));
    }
}
