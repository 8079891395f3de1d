use std::path::PathBuf;

use thiserror::Error;

use crate::session::SessionPhase;

/// Errors raised by the typing test engine and its collaborators
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("corpus '{0}' has no usable words")]
    EmptyCorpus(String),

    #[error("corpus '{0}' not found")]
    CorpusNotFound(String),

    #[error("cannot {operation} while the session is {phase}")]
    InvalidState {
        operation: &'static str,
        phase: SessionPhase,
    },

    #[error("i/o error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl EngineError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        EngineError::Io {
            path: path.into(),
            source,
        }
    }

    /// Human readable message for the alerting collaborator
    pub fn alert_message(&self) -> String {
        match self {
            EngineError::InvalidConfig(_) => "Please select a language and time.".to_string(),
            EngineError::EmptyCorpus(_) => {
                "No words available for the selected language.".to_string()
            }
            EngineError::CorpusNotFound(name) => format!("Error reading file: {name}"),
            EngineError::InvalidState { .. } => self.to_string(),
            EngineError::Io { path, .. } => {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string());
                format!("Error reading or writing file: {name}")
            }
        }
    }
}

/// Result type alias for the typing test engine
pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_state_names_operation_and_phase() {
        let err = EngineError::InvalidState {
            operation: "submit",
            phase: SessionPhase::Finished,
        };
        assert_eq!(err.to_string(), "cannot submit while the session is finished");
    }

    #[test]
    fn alert_messages_match_menu_wording() {
        assert_eq!(
            EngineError::InvalidConfig("no corpus".into()).alert_message(),
            "Please select a language and time."
        );
        assert_eq!(
            EngineError::EmptyCorpus("english".into()).alert_message(),
            "No words available for the selected language."
        );
        assert_eq!(
            EngineError::CorpusNotFound("klingon".into()).alert_message(),
            "Error reading file: klingon"
        );
    }

    #[test]
    fn io_alert_uses_file_name() {
        let err = EngineError::io(
            "/tmp/results/2024-01-01_10-00-00.txt",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(
            err.alert_message(),
            "Error reading or writing file: 2024-01-01_10-00-00.txt"
        );
    }
}
