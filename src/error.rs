use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuilderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config {}: {reason}", path.display())]
    Parse { path: PathBuf, reason: String },

    #[error("Unknown project type: {0:?} (expected \"c\" or \"cpp\")")]
    UnknownType(String),

    #[error("Cannot read directory {}: {source}", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Failed to execute {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{phase} failed with {status}")]
    Toolchain { phase: &'static str, status: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type BuilderResult<T> = Result<T, BuilderError>;
