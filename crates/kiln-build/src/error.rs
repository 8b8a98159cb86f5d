use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// イメージ操作（build / push / tag）の失敗
#[derive(Debug, Error)]
pub enum OpError {
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    Exit(ExitStatus),

    #[error("{0}")]
    Failed(String),
}

/// テスト用ワークスペースの準備に失敗
#[derive(Debug, Error)]
pub enum StageError {
    #[error("could not reset workspace {path}: {source}")]
    Reset {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not copy {from} to {to}: {source}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not prepend base image to {path}: {source}")]
    Prepend {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("staging task aborted: {0}")]
    Aborted(String),
}
