//! Rolling Log Sink
//!
//! ----------------------------------------------------------------------------
//!
//! このクレートは、名前付きのロガーにコンソールシンクとサイズでローテーションする
//! ファイルシンクを取り付けて管理する。
//!
//! - `LoggingContext`は、ロガー名ごとに1つの`LoggerHandle`を保持する登録簿である。
//!   同じルート名で何度初期化しても、シンクは最初の1回だけ取り付けられる。
//! - 子ロガー(`<root>.<child>`)はシンクを持たず、ルートロガーのシンクに書き込む。
//! - `RotatingFileSink`は、書き込むとファイルが指定されたサイズを超える場合に、
//!   現在のファイルを`.1`に移動し、既存のファイルを`.2`、`.3`、…とずらす。
//!   残しておく最大ファイル数を超えたファイルは、最も古いものから削除する。
//! - `install_unhandled_error_hook`は、捕捉されなかったパニックを`CRITICAL`で記録する。
//!
//! ログの書き込みは失敗しても呼び出し側にエラーを返さない。

pub mod appenders;
pub mod config;
pub mod context;
pub mod entry;
pub mod error;
pub mod hook;
mod macros;
pub mod severity;

#[cfg(test)]
mod test_support;

pub use appenders::{ConsoleSink, RollingWriter, RotatingFileSink, Sink, SinkRole};
pub use config::{ConsoleTarget, LoggerConfig};
pub use context::{LoggerHandle, LoggingContext, ScopeGuard, SinkSet};
pub use entry::LogEntry;
pub use error::{Error, Result};
pub use hook::{install_unhandled_error_hook, PanicHook, UserInterrupt};
pub use severity::Severity;
