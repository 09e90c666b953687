use std::path::PathBuf;
use thiserror::Error;

// Higher level errors: PipelineError
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("{0}")]
    Config(#[from] ConfigError),
    #[error("error loading registry documents: {0}")]
    Loader(#[from] LoaderError),
    #[error("error refreshing registry snapshot: {0}")]
    Snapshot(#[from] SnapshotError),
    #[error("error exporting results: {0}")]
    Export(#[from] ExportError),
}

// Lower level errors; should be used by higher level errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("error reading config file {path}: {source}")]
    FileIO {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("error parsing toml: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("registry directory {0} does not exist")]
    MissingDirectory(PathBuf),
    #[error("error walking registry directory: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("error reading {path}: {source}")]
    FileIO {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid document {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("error during registry request: {0}")]
    Request(#[from] reqwest::Error),
    #[error("invalid registry url: {0}")]
    Url(#[from] url::ParseError),
    #[error("unexpected registry response: {0}")]
    Response(String),
    #[error("git {command} failed: {message}")]
    Git { command: String, message: String },
    #[error("error accessing revision file {path}: {source}")]
    RevisionFile {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("error parsing revision file: {0}")]
    RevisionFormat(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("error writing {path}: {source}")]
    FileIO {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
