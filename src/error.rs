use log::warn;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for the pipeline
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the pipeline
#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse model file {file}: {message}")]
    ParseError { file: PathBuf, message: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Fatal(#[from] FatalError),

    #[error("serialization error: {0}")]
    SerializationError(String),
}

/// Conditions that abort the whole run.
///
/// Every variant names the offending method and its declaring class so the
/// user can find it without re-running in verbose mode.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FatalError {
    #[error("unable to find comment for method {method} in {class}")]
    MissingMethodComment { method: String, class: String },

    #[error("unable to find doc @param for actual param \"{param}\" in method {method} from {class}")]
    MissingParamTag {
        param: String,
        method: String,
        class: String,
    },

    #[error(
        "only one body parameter per method: method {method} in {class} binds both \"{first}\" and \"{second}\""
    )]
    MultipleBodyParams {
        method: String,
        class: String,
        first: String,
        second: String,
    },

    #[error("can't support binding collection parameter \"{param}\" on method {method} in {class}")]
    UnsupportedCollectionBinding {
        param: String,
        method: String,
        class: String,
    },
}

/// A recoverable problem found while documenting a class.
///
/// Diagnostics never stop the run; they are logged when raised and carried
/// in the final output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub class: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    pub message: String,
}

impl Diagnostic {
    /// Create a diagnostic and emit it as a warning.
    pub fn warn(class: &str, method: Option<&str>, message: impl Into<String>) -> Self {
        let diagnostic = Self {
            class: class.to_string(),
            method: method.map(str::to_string),
            message: message.into(),
        };
        match &diagnostic.method {
            Some(method) => warn!("{}#{}: {}", diagnostic.class, method, diagnostic.message),
            None => warn!("{}: {}", diagnostic.class, diagnostic.message),
        }
        diagnostic
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::SerializationError(format!("JSON: {}", err))
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::SerializationError(format!("YAML: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_error_names_method_and_class() {
        let err = Error::from(FatalError::MultipleBodyParams {
            method: "create".to_string(),
            class: "com.example.UserController".to_string(),
            first: "user".to_string(),
            second: "extra".to_string(),
        });

        let message = err.to_string();
        assert!(message.contains("create"));
        assert!(message.contains("com.example.UserController"));
        assert!(message.contains("only one body parameter"));
    }

    #[test]
    fn test_diagnostic_keeps_method() {
        let diagnostic = Diagnostic::warn("com.example.A", Some("list"), "map used as body");
        assert_eq!(diagnostic.method.as_deref(), Some("list"));
        assert_eq!(diagnostic.message, "map used as body");
    }
}
