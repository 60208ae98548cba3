//! 書式付きでログを書き込むマクロ。
//!
//! 出力元には呼び出したモジュールのパス(`module_path!()`)を使う。

#[macro_export]
macro_rules! log_with {
    ($handle:expr, $severity:expr, $($arg:tt)*) => {{
        let __handle = &$handle;
        if __handle.is_enabled($severity) {
            __handle.log_at($severity, module_path!(), format!($($arg)*));
        }
    }};
}

#[macro_export]
macro_rules! log_debug    { ($handle:expr, $($arg:tt)*) => { $crate::log_with!($handle, $crate::Severity::Debug, $($arg)*) } }
#[macro_export]
macro_rules! log_info     { ($handle:expr, $($arg:tt)*) => { $crate::log_with!($handle, $crate::Severity::Info, $($arg)*) } }
#[macro_export]
macro_rules! log_warning  { ($handle:expr, $($arg:tt)*) => { $crate::log_with!($handle, $crate::Severity::Warning, $($arg)*) } }
#[macro_export]
macro_rules! log_error    { ($handle:expr, $($arg:tt)*) => { $crate::log_with!($handle, $crate::Severity::Error, $($arg)*) } }
#[macro_export]
macro_rules! log_critical { ($handle:expr, $($arg:tt)*) => { $crate::log_with!($handle, $crate::Severity::Critical, $($arg)*) } }
