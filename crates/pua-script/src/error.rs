//! Error types for pua-script
//!
//! Every failure is resolved inside a single `script_publish` invocation.
//! Nothing escapes to the routing script except the integer from
//! [`PuaScriptError::return_code`] and the log output.

use std::fmt;
use thiserror::Error;

/// Return code for configuration problems, as routing scripts know it
pub const E_CFG: i32 = -6;

/// Generic failure return code
pub const E_FAILURE: i32 = -1;

/// Errors that abort a publication before it reaches the PUA
#[derive(Debug, Error)]
pub enum PuaScriptError {
    /// The presentity URI parameter was not supplied or is empty
    #[error("Invalid uri parameter")]
    MissingUri,

    /// The event code parameter is missing, non-numeric or zero
    #[error("Wrong event parameter: {0:?}")]
    InvalidEventCode(String),

    /// The event code parsed but lies outside 1..=3
    #[error("Unknown event number: {0}")]
    EventOutOfRange(i64),

    /// A required module setting is not configured
    #[error("Missing {0} parameter")]
    MissingSetting(&'static str),

    /// The configured expiry could not be parsed as a signed integer
    #[error("Invalid expires parameter: {0:?}")]
    InvalidExpires(String),

    /// The configuration sources could not be loaded
    #[error("Configuration error: {0}")]
    ConfigLoad(#[from] config::ConfigError),

    /// A URI failed the SIP/SIPS syntax check
    #[error("Invalid URI: {0}")]
    InvalidUri(String),

    /// The tracing subscriber could not be installed
    #[error("Logging setup failed: {0}")]
    Logging(String),

    /// Internal invariant violated
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl PuaScriptError {
    /// True for the `ConfigError` class: missing or malformed parameters and settings
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            PuaScriptError::MissingUri
                | PuaScriptError::InvalidEventCode(_)
                | PuaScriptError::MissingSetting(_)
                | PuaScriptError::InvalidExpires(_)
                | PuaScriptError::ConfigLoad(_)
        )
    }

    /// True when the event code was rejected by the range check
    pub fn is_range_error(&self) -> bool {
        matches!(self, PuaScriptError::EventOutOfRange(_))
    }

    /// Integer status handed back to the routing script
    pub fn return_code(&self) -> i32 {
        match self {
            PuaScriptError::InvalidEventCode(_)
            | PuaScriptError::MissingSetting(_)
            | PuaScriptError::ConfigLoad(_) => E_CFG,
            // The body was already built when the expiry is parsed
            PuaScriptError::InvalidExpires(_) => 0,
            PuaScriptError::MissingUri
            | PuaScriptError::EventOutOfRange(_)
            | PuaScriptError::InvalidUri(_)
            | PuaScriptError::Logging(_)
            | PuaScriptError::InternalError(_) => E_FAILURE,
        }
    }
}

/// Result type for pua-script operations
pub type Result<T> = std::result::Result<T, PuaScriptError>;

/// Anomalies that are logged but do not stop the publication
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationWarning {
    /// The presentity URI is not a syntactically valid SIP/SIPS URI
    BadPresentityUri(String),
    /// The event package name is not known to the event registry
    UnknownEvent(String),
    /// A required setting is present but empty
    EmptySetting(&'static str),
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationWarning::BadPresentityUri(uri) => write!(f, "bad presentity uri '{}'", uri),
            ValidationWarning::UnknownEvent(name) => write!(f, "unknown event '{}'", name),
            ValidationWarning::EmptySetting(key) => write!(f, "empty {} parameter", key),
        }
    }
}
