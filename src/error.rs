//! Error types for emotapal

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for emotapal operations
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Malformed hex string or out-of-range / wrong-length RGB components
    #[error("invalid color format: {message}")]
    InvalidColorFormat { message: String },

    /// Input shape that is not a hex string or an RGB sequence
    #[error("unsupported color type: {found}")]
    UnsupportedColorType { found: String },

    /// The ranker was handed zero matches
    #[error("cannot rank an empty set of matches")]
    EmptyInput,

    /// Nothing usable was left to build a palette from
    #[error("no valid colors to build a palette from")]
    NoValidColors,

    /// topn must be at least 1
    #[error("invalid topn {0}: a palette keeps at least one match")]
    InvalidTopN(usize),

    /// The classifier model could not be read or is not a usable model
    #[error("failed to load emotion model: {message}")]
    ModelLoad {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A sentiment lexicon could not be read or has a malformed line
    #[error("failed to load lexicon: {message}")]
    LexiconLoad {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A palette config file could not be read or is not valid JSON
    #[error("failed to load config {}: {message}", .path.display())]
    ConfigLoad {
        path: PathBuf,
        message: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// An image file could not be opened or decoded
    #[error("{message}: {}", .path.display())]
    ImageLoad {
        path: PathBuf,
        message: String,
        #[source]
        source: image::ImageError,
    },
}

impl Error {
    pub(crate) fn invalid_color(message: impl Into<String>) -> Self {
        Self::InvalidColorFormat {
            message: message.into(),
        }
    }

    pub(crate) fn model_load(message: impl Into<String>) -> Self {
        Self::ModelLoad {
            message: message.into(),
            source: None,
        }
    }

    pub(crate) fn lexicon_load(message: impl Into<String>) -> Self {
        Self::LexiconLoad {
            message: message.into(),
            source: None,
        }
    }

    pub(crate) fn lexicon_load_with<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::LexiconLoad {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub(crate) fn model_load_with<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::ModelLoad {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}
