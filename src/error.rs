use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TypemasterError {
    #[error("word target must be at least 1")]
    EmptyWordTarget,

    #[error("countdown must be at least 1 second")]
    ZeroCountdown,

    #[error("word corpus `{0}` contains no words")]
    EmptyCorpus(String),

    #[error("word corpus `{0}` is not embedded in this build")]
    UnknownCorpus(String),

    #[error("failed to parse word corpus `{name}`: {source}")]
    CorpusFormat {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to access config at {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode config: {0}")]
    ConfigEncode(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TypemasterError>;
