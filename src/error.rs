use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("I/O error while {context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON parse error while {context}: {source}")]
    Json {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("phonemizer {backend} failed: {message}")]
    Phonemizer {
        backend: &'static str,
        message: String,
    },
    #[error("phoneme recognizer failed: {message}")]
    Recognizer { message: String },
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
}

impl ScoringError {
    pub(crate) fn io(context: &'static str, source: std::io::Error) -> Self {
        Self::Io { context, source }
    }

    pub(crate) fn json(context: &'static str, source: serde_json::Error) -> Self {
        Self::Json { context, source }
    }

    pub fn phonemizer(backend: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Phonemizer {
            backend,
            message: err.to_string(),
        }
    }

    pub fn recognizer(err: impl std::fmt::Display) -> Self {
        Self::Recognizer {
            message: err.to_string(),
        }
    }

    pub(crate) fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }
}
