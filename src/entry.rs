use time::{format_description::BorrowedFormatItem, macros::format_description, OffsetDateTime};

use crate::severity::Severity;

/// タイムスタンプの書式。`2024-05-26 15:25:32,123`の形式になる。
const TIMESTAMP_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second],[subsecond digits:3]");

/// 1件のログ。
///
/// 作成後は変更できない。
#[derive(Debug, Clone)]
pub struct LogEntry {
    severity: Severity,
    timestamp: OffsetDateTime,
    component: String,
    origin: String,
    message: String,
}

impl LogEntry {
    /// 現在時刻で`LogEntry`を作成する。
    ///
    /// # 引数
    ///
    /// - severity: 重要度。
    /// - component: ログを出力したロガーの名前。
    /// - origin: ログを出力した場所。
    /// - message: メッセージ。
    pub fn new(
        severity: Severity,
        component: impl Into<String>,
        origin: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::with_timestamp(severity, now(), component, origin, message)
    }

    /// タイムスタンプを指定して`LogEntry`を作成する。
    pub fn with_timestamp(
        severity: Severity,
        timestamp: OffsetDateTime,
        component: impl Into<String>,
        origin: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            timestamp,
            component: component.into(),
            origin: origin.into(),
            message: message.into(),
        }
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn timestamp(&self) -> OffsetDateTime {
        self.timestamp
    }

    pub fn component(&self) -> &str {
        &self.component
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// コンソールとファイルに出力する1行を作成する。改行は含まない。
    ///
    /// 書式は`<timestamp> [<SEVERITY>] <component>.<origin>: <message>`。
    pub fn format(&self) -> String {
        format!(
            "{} [{}] {}.{}: {}",
            format_timestamp(&self.timestamp),
            self.severity,
            self.component,
            self.origin,
            self.message
        )
    }
}

/// ローカル時刻を返却する。オフセットが取得できない場合はUTCを返却する。
fn now() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}

fn format_timestamp(timestamp: &OffsetDateTime) -> String {
    timestamp
        .format(TIMESTAMP_FORMAT)
        .unwrap_or_else(|_| timestamp.unix_timestamp().to_string())
}
