//! Errors raised while locating, reading or checking a cbqueue configuration

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// A file named with `--config` could not be read.
    #[error("Failed to read config file at {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A file named with `--config` is not valid TOML for the schema.
    #[error("Failed to parse TOML config at {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// The merged settings describe a run that cannot finish, such as a zero
    /// capacity or a producer/consumer count mismatch.
    #[error("Invalid configuration: {0}")]
    ValidationError(String),

    /// No platform config directory for the user layer.
    #[error("XDG directory error: {0}")]
    XdgError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_file() {
        let err = ConfigError::ReadError {
            path: PathBuf::from("runs/stress.toml"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert!(err.to_string().starts_with("Failed to read config file at runs/stress.toml"));

        let source = toml::from_str::<crate::CbqueueConfig>("[queue]\ncapacity = -1\n").unwrap_err();
        let err = ConfigError::ParseError {
            path: PathBuf::from("cbqueue.toml"),
            source,
        };
        assert!(err.to_string().contains("cbqueue.toml"));
    }

    #[test]
    fn test_validation_message() {
        let err = crate::CbqueueConfig {
            demo: crate::DemoConfig {
                consumers: 3,
                ..crate::DemoConfig::default()
            },
            ..crate::CbqueueConfig::default()
        }
        .validate()
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid configuration: demo writes 20 values but reads 15"
        );
    }
}
