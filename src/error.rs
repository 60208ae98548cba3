use std::{io, path::PathBuf};

use thiserror::Error;

/// 初期化と設定の読み込みで発生するエラー。
///
/// ログの書き込み自体はエラーを返さない。シンクの書き込みエラーは
/// `io::Error`としてシンク境界で処理される。
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid logger name: `{0}`")]
    InvalidName(String),

    #[error("max_bytes_per_file must be greater than zero")]
    ZeroMaxBytes,

    #[error("log directory must not be empty when logging to a file")]
    EmptyDirectory,

    #[error("failed to prepare log directory {path}: {source}")]
    Directory { path: PathBuf, source: io::Error },

    #[error("failed to open log file {path}: {source}")]
    OpenLogFile { path: PathBuf, source: io::Error },

    #[error("unknown severity: `{0}`")]
    UnknownSeverity(String),

    #[error("failed to read config file {path}: {source}")]
    ReadConfig { path: PathBuf, source: io::Error },

    #[error("invalid logger configuration: {0}")]
    Config(#[from] toml::de::Error),
}

/// `Error`を使う`Result`。
pub type Result<T> = std::result::Result<T, Error>;
