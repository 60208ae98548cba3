use std::{
    fs,
    path::{Path, PathBuf},
    sync::OnceLock,
};

use regex::Regex;
use serde::Deserialize;

use crate::{
    error::{Error, Result},
    severity::Severity,
};

pub const DEFAULT_ROOT_NAME: &str = "app";
pub const DEFAULT_DIRECTORY: &str = "logs";
pub const DEFAULT_MAX_BYTES_PER_FILE: u64 = 2000;
pub const DEFAULT_NUM_ROTATIONS: u32 = 5;

/// コンソールシンクの出力先
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsoleTarget {
    Stdout,
    #[default]
    Stderr,
}

/// ルートロガーの設定。
///
/// 最初に`get_or_create_root_logger`へ渡した設定だけが使われる。同じルート名で
/// 2回目以降に渡した設定は無視される。
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggerConfig {
    /// ルートロガーの名前。子ロガーは`<root_name>.<child>`になる。
    pub root_name: String,
    /// ログファイルを作成するディレクトリ。
    pub directory: PathBuf,
    /// `false`の場合はファイルシンクを取り付けない。
    pub log_to_file: bool,
    /// これより低い重要度のログは捨てる。
    pub minimum_severity: Severity,
    /// ローテーションするファイルサイズ(バイト)。
    pub max_bytes_per_file: u64,
    /// 残すバックアップの数。
    pub num_rotations: u32,
    /// ファイル名から`.log`を除いた部分。省略した場合はルート名を使う。
    pub file_name: Option<String>,
    pub console: ConsoleTarget,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            root_name: DEFAULT_ROOT_NAME.to_string(),
            directory: PathBuf::from(DEFAULT_DIRECTORY),
            log_to_file: true,
            minimum_severity: Severity::Debug,
            max_bytes_per_file: DEFAULT_MAX_BYTES_PER_FILE,
            num_rotations: DEFAULT_NUM_ROTATIONS,
            file_name: None,
            console: ConsoleTarget::Stderr,
        }
    }
}

impl LoggerConfig {
    pub fn new(root_name: impl Into<String>) -> Self {
        Self {
            root_name: root_name.into(),
            ..Self::default()
        }
    }

    pub fn with_directory(mut self, directory: impl AsRef<Path>) -> Self {
        self.directory = directory.as_ref().to_path_buf();
        self
    }

    pub fn with_log_to_file(mut self, log_to_file: bool) -> Self {
        self.log_to_file = log_to_file;
        self
    }

    pub fn with_minimum_severity(mut self, severity: Severity) -> Self {
        self.minimum_severity = severity;
        self
    }

    pub fn with_max_bytes_per_file(mut self, max_bytes: u64) -> Self {
        self.max_bytes_per_file = max_bytes;
        self
    }

    pub fn with_num_rotations(mut self, num_rotations: u32) -> Self {
        self.num_rotations = num_rotations;
        self
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    pub fn with_console(mut self, console: ConsoleTarget) -> Self {
        self.console = console;
        self
    }

    /// TOML文字列から設定を読み込む。省略したキーは既定値になる。
    ///
    /// ```
    /// use rolling_log_sink::{LoggerConfig, Severity};
    ///
    /// let config = LoggerConfig::from_toml_str(
    ///     r#"
    ///     root_name = "my_logger"
    ///     minimum_severity = "info"
    ///     max_bytes_per_file = 4096
    ///     "#,
    /// )
    /// .unwrap();
    /// assert_eq!(config.minimum_severity, Severity::Info);
    /// assert_eq!(config.num_rotations, 5);
    /// ```
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// TOMLファイルから設定を読み込む。
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| Error::ReadConfig {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// ログファイル名から`.log`を除いた部分。
    pub fn file_stem(&self) -> &str {
        self.file_name.as_deref().unwrap_or(&self.root_name)
    }

    /// 設定を検証する。
    ///
    /// ディレクトリが作成できるかどうかは、ファイルシンクを開くときに確認する。
    pub fn validate(&self) -> Result<()> {
        validate_name(&self.root_name)?;
        if self.max_bytes_per_file == 0 {
            return Err(Error::ZeroMaxBytes);
        }
        if self.log_to_file {
            if self.directory.as_os_str().is_empty() {
                return Err(Error::EmptyDirectory);
            }
            if let Some(file_name) = &self.file_name {
                validate_name(file_name)?;
            }
        }
        Ok(())
    }
}

/// ロガー名を検証する。
///
/// 英数字、`_`、`-`からなる要素を`.`で区切ったものだけを受け付ける。
pub(crate) fn validate_name(name: &str) -> Result<()> {
    static NAME_PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = NAME_PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9_-]+(\.[A-Za-z0-9_-]+)*$")
            .expect("Unable to create a logger name pattern; this is a bug in rolling-log-sink")
    });
    if pattern.is_match(name) {
        Ok(())
    } else {
        Err(Error::InvalidName(name.to_string()))
    }
}

/// 子ロガー名を検証する。
///
/// `.`を含まない1要素だけを受け付ける。深い階層は子ロガーから順に作成する。
pub(crate) fn validate_segment(name: &str) -> Result<()> {
    static SEGMENT_PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = SEGMENT_PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9_-]+$")
            .expect("Unable to create a logger name pattern; this is a bug in rolling-log-sink")
    });
    if pattern.is_match(name) {
        Ok(())
    } else {
        Err(Error::InvalidName(name.to_string()))
    }
}
