//! 捕捉されなかったパニックの記録
//!
//! Ctrl-Cなどのシグナルはパニックフックを通らないので、既定の動作のまま終了する。
//! プロセス内で割り込みをパニックとして伝える場合は、`UserInterrupt`を
//! `std::panic::panic_any`に渡すと記録せずに以前のフックに渡す。
//!
//! パニックフックは、パニックしたスレッドがロックを保持したまま呼ばれる。シンクへの
//! 書き込みの途中でパニックした場合に止まらないよう、フックはシンクのロックを待たない。
//! 書き込めなかったシンクがあった場合は、以前のフックにも渡す。

use std::{
    panic::{self, PanicHookInfo},
    sync::Arc,
};

use crate::{context::LoggerHandle, severity::Severity};

/// 利用者による割り込みを表すパニックの値。
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UserInterrupt;

/// パニックフック。
pub type PanicHook = Box<dyn Fn(&PanicHookInfo<'_>) + Sync + Send + 'static>;

/// パニックを`CRITICAL`で記録するフックを設定する。
///
/// 既定のフックの代わりに`handle`のシンクへ出力する。プロセスの終了はランタイムに任せる。
/// 使用中のシンクがあった場合は、以前のフックにも渡す。
///
/// # 戻り値
///
/// 以前に設定されていたフック。`std::panic::set_hook`で元に戻せる。
pub fn install_unhandled_error_hook(handle: &LoggerHandle) -> PanicHook {
    let handle = handle.clone();
    let previous: Arc<PanicHook> = Arc::new(panic::take_hook());

    let forward = Arc::clone(&previous);
    panic::set_hook(Box::new(move |info: &PanicHookInfo<'_>| {
        if info.payload().is::<UserInterrupt>() {
            (*forward)(info);
            return;
        }
        if !handle.try_log_at(Severity::Critical, "panic", describe(info)) {
            (*forward)(info);
        }
    }));

    Box::new(move |info: &PanicHookInfo<'_>| (*previous)(info))
}

fn describe(info: &PanicHookInfo<'_>) -> String {
    let payload = info.payload();
    let message = if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Box<dyn Any>".to_string()
    };
    match info.location() {
        Some(location) => format!(
            "unhandled panic at {}:{}: {}",
            location.file(),
            location.line(),
            message
        ),
        None => format!("unhandled panic: {}", message),
    }
}
