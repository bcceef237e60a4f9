use thiserror::Error;

/// Application-wide error types for vigie.
#[derive(Error, Debug)]
pub enum CheckError {
    /// Navigation to a URL failed (unreachable host, bad response, ...).
    #[error("navigation failed: {0}")]
    Navigation(String),

    /// A selector never appeared within its wait window.
    #[error("timeout waiting for selector '{selector}' after {timeout_ms} ms")]
    SelectorTimeout { selector: String, timeout_ms: u64 },

    /// A click target could not be located.
    #[error("element not found: {0}")]
    ElementNotFound(String),

    /// Capturing or writing a screenshot failed.
    #[error("screenshot failed: {0}")]
    Screenshot(String),

    /// Browser launch or CDP-level failure.
    #[error("browser error: {0}")]
    Browser(String),

    /// Building a page URL from the base URL failed.
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Filesystem error (output directory, screenshot file).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error.
    #[error("{0}")]
    Generic(String),
}

impl CheckError {
    /// Returns true if this error is a wait that ran out of time.
    pub fn is_timeout(&self) -> bool {
        match self {
            CheckError::SelectorTimeout { .. } => true,
            CheckError::Navigation(msg) | CheckError::Browser(msg) => msg.contains("timeout"),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_timeout_is_timeout() {
        let err = CheckError::SelectorTimeout {
            selector: ".leaflet-container".into(),
            timeout_ms: 10_000,
        };
        assert!(err.is_timeout());
        // The console line for a timed-out wait must mention the timeout.
        assert!(err.to_string().contains("timeout"));
        assert!(err.to_string().contains(".leaflet-container"));
    }

    #[test]
    fn navigation_timeout_is_classified() {
        assert!(CheckError::Navigation("net::ERR_TIMED_OUT timeout".into()).is_timeout());
        assert!(!CheckError::Navigation("connection refused".into()).is_timeout());
        assert!(!CheckError::ElementNotFound("tile".into()).is_timeout());
    }
}
