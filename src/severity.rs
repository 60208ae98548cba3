use std::{fmt, str::FromStr};

use serde::Deserialize;

use crate::error::Error;

/// ログの重要度。
///
/// 宣言順に大小関係を持つので、しきい値との比較には`>=`をそのまま使える。
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum Severity {
    /// 開発時の詳細な情報
    #[default]
    Debug,
    /// 処理の進行を示す情報
    Info,
    /// 問題になり得る状況
    Warning,
    /// 処理を継続できるエラー
    Error,
    /// 処理を継続できない致命的なエラー
    Critical,
}

impl Severity {
    /// すべての重要度を昇順で返却する。
    pub const ALL: [Severity; 5] = [
        Severity::Debug,
        Severity::Info,
        Severity::Warning,
        Severity::Error,
        Severity::Critical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
            Severity::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = Error;

    /// 大文字と小文字を区別せずに重要度を解析する。
    ///
    /// `WARN`は`WARNING`、`FATAL`は`CRITICAL`の別名として受け付ける。
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DEBUG" => Ok(Severity::Debug),
            "INFO" => Ok(Severity::Info),
            "WARNING" | "WARN" => Ok(Severity::Warning),
            "ERROR" => Ok(Severity::Error),
            "CRITICAL" | "FATAL" => Ok(Severity::Critical),
            _ => Err(Error::UnknownSeverity(s.to_string())),
        }
    }
}

impl TryFrom<String> for Severity {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Error> {
        value.parse()
    }
}
