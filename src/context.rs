use std::{
    collections::HashMap,
    fmt,
    io::{self, Write},
    panic::Location,
    path::Path,
    sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock},
};

use crate::{
    appenders::{ConsoleSink, RotatingFileSink, Sink, SinkRole},
    config::{validate_segment, ConsoleTarget, LoggerConfig},
    entry::LogEntry,
    error::Result,
    severity::Severity,
};

type ConsoleFactory = Box<dyn Fn() -> Box<dyn Write + Send> + Send + Sync>;

/// ロガーの登録簿。
///
/// プロセスの開始時に1つ作成し、ロガーを必要とするコンポーネントに渡す。
/// 名前ごとに`LoggerHandle`は高々1つで、同じ名前で取得すると同じハンドルを返却する。
///
/// ```
/// use rolling_log_sink::{LoggerConfig, LoggingContext};
///
/// let dir = tempfile::tempdir().unwrap();
/// let context = LoggingContext::new();
/// let root = context
///     .get_or_create_root_logger(&LoggerConfig::new("my_logger").with_directory(dir.path()))
///     .unwrap();
/// let child = context.get_child_logger(&root, "module1").unwrap();
///
/// child.info("Doing stuff");
/// assert_eq!("my_logger.module1", child.name());
/// ```
pub struct LoggingContext {
    registry: Mutex<HashMap<String, LoggerHandle>>,
    console: Option<ConsoleFactory>,
}

impl LoggingContext {
    /// コンソールシンクが設定どおり標準出力か標準エラー出力に書き込む登録簿を作成する。
    pub fn new() -> Self {
        Self {
            registry: Mutex::new(HashMap::new()),
            console: None,
        }
    }

    /// コンソールシンクの出力先を差し替えた登録簿を作成する。
    ///
    /// `make_writer`はルートロガーを初期化するたびに1回呼ばれる。設定の
    /// `console`は無視される。
    pub fn with_console_writer<F, W>(make_writer: F) -> Self
    where
        F: Fn() -> W + Send + Sync + 'static,
        W: Write + Send + 'static,
    {
        Self {
            registry: Mutex::new(HashMap::new()),
            console: Some(Box::new(move || -> Box<dyn Write + Send> {
                Box::new(make_writer())
            })),
        }
    }

    /// ルートロガーを取得する。存在しない場合は初期化して登録する。
    ///
    /// 初期化は登録簿のロックを保持したまま行うので、同じ名前で同時に呼ばれても
    /// シンクを取り付けるのは1つのスレッドだけで、他のスレッドは初期化の完了を待って
    /// 同じハンドルを受け取る。2回目以降の呼び出しでは`config`を無視する。
    ///
    /// # Errors
    ///
    /// 設定が不正な場合、またはログファイルを開けない場合はエラーを返却し、
    /// ハンドルは登録しない。
    pub fn get_or_create_root_logger(&self, config: &LoggerConfig) -> Result<LoggerHandle> {
        let mut registry = lock(&self.registry);
        if let Some(handle) = registry.get(&config.root_name) {
            return Ok(handle.clone());
        }

        config.validate()?;
        let file = if config.log_to_file {
            Some(RotatingFileSink::open(
                &config.directory,
                config.file_stem(),
                config.max_bytes_per_file,
                config.num_rotations,
            )?)
        } else {
            None
        };
        let sinks = SinkSet {
            console: self.console_sink(config.console),
            file,
        };

        let handle = LoggerHandle::root(&config.root_name, config.minimum_severity, sinks);
        if let Some(file) = handle.sinks().and_then(SinkSet::file) {
            if file.created_directory() {
                handle.log_at(
                    Severity::Debug,
                    "init",
                    format!("created log directory {}", file.directory().display()),
                );
            }
        }
        handle.log_at(Severity::Debug, "init", "logger initialized");

        registry.insert(config.root_name.clone(), handle.clone());
        Ok(handle)
    }

    /// `<parent>.<child_name>`という名前の子ロガーを取得する。存在しない場合は作成する。
    ///
    /// 子ロガーはシンクを持たず、最も近い初期化済みの祖先のシンクに書き込む。
    ///
    /// # Errors
    ///
    /// `child_name`が`.`を含む場合、またはロガー名として不正な場合は
    /// `Error::InvalidName`を返却する。
    pub fn get_child_logger(&self, parent: &LoggerHandle, child_name: &str) -> Result<LoggerHandle> {
        validate_segment(child_name)?;
        let name = format!("{}.{}", parent.name(), child_name);

        let mut registry = lock(&self.registry);
        let handle = registry
            .entry(name)
            .or_insert_with_key(|name| LoggerHandle::child(name, parent))
            .clone();
        Ok(handle)
    }

    /// 登録済みのロガーを名前で探す。
    pub fn get(&self, name: &str) -> Option<LoggerHandle> {
        lock(&self.registry).get(name).cloned()
    }

    fn console_sink(&self, target: ConsoleTarget) -> ConsoleSink {
        match &self.console {
            Some(make_writer) => ConsoleSink::from_boxed(make_writer()),
            None => ConsoleSink::new(target),
        }
    }
}

impl Default for LoggingContext {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for LoggingContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<String> = lock(&self.registry).keys().cloned().collect();
        names.sort();
        f.debug_struct("LoggingContext")
            .field("loggers", &names)
            .finish_non_exhaustive()
    }
}

/// ルートロガーに取り付けたシンク。
///
/// 役割ごとにフィールドを持ち、取り付けた順序には依存しない。
#[derive(Debug)]
pub struct SinkSet {
    console: ConsoleSink,
    file: Option<RotatingFileSink>,
}

impl SinkSet {
    pub fn console(&self) -> &ConsoleSink {
        &self.console
    }

    pub fn file(&self) -> Option<&RotatingFileSink> {
        self.file.as_ref()
    }

    pub fn get(&self, role: SinkRole) -> Option<&dyn Sink> {
        match role {
            SinkRole::Console => Some(&self.console),
            SinkRole::File => self.file.as_ref().map(|f| f as &dyn Sink),
        }
    }

    /// 取り付けたシンクの役割。
    pub fn roles(&self) -> Vec<SinkRole> {
        self.entries().into_iter().map(|(role, _)| role).collect()
    }

    fn entries(&self) -> Vec<(SinkRole, &dyn Sink)> {
        [SinkRole::Console, SinkRole::File]
            .into_iter()
            .filter_map(|role| self.get(role).map(|sink| (role, sink)))
            .collect()
    }
}

/// ロガーへのハンドル。
///
/// 複製しても同じロガーを指す。しきい値の変更はすべての複製に反映される。
#[derive(Clone)]
pub struct LoggerHandle {
    inner: Arc<LoggerInner>,
}

struct LoggerInner {
    name: String,
    threshold: RwLock<Option<Severity>>,
    sinks: Option<SinkSet>,
    parent: Option<LoggerHandle>,
}

impl LoggerHandle {
    fn root(name: &str, threshold: Severity, sinks: SinkSet) -> Self {
        Self {
            inner: Arc::new(LoggerInner {
                name: name.to_string(),
                threshold: RwLock::new(Some(threshold)),
                sinks: Some(sinks),
                parent: None,
            }),
        }
    }

    fn child(name: &str, parent: &LoggerHandle) -> Self {
        Self {
            inner: Arc::new(LoggerInner {
                name: name.to_string(),
                threshold: RwLock::new(None),
                sinks: None,
                parent: Some(parent.clone()),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// 2つのハンドルが同じロガーを指している場合は`true`。
    pub fn ptr_eq(&self, other: &LoggerHandle) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// 有効なしきい値。
    ///
    /// 自身に設定されていない場合は、設定されている最も近い祖先のしきい値を使う。
    pub fn threshold(&self) -> Severity {
        let own = *self
            .inner
            .threshold
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        match (own, &self.inner.parent) {
            (Some(threshold), _) => threshold,
            (None, Some(parent)) => parent.threshold(),
            (None, None) => Severity::Debug,
        }
    }

    pub fn set_threshold(&self, threshold: Severity) {
        *self
            .inner
            .threshold
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(threshold);
    }

    /// 自身のしきい値を外し、祖先のしきい値に従うようにする。
    /// ルートロガーでは`DEBUG`になる。
    pub fn clear_threshold(&self) {
        *self
            .inner
            .threshold
            .write()
            .unwrap_or_else(PoisonError::into_inner) = None;
    }

    pub fn is_enabled(&self, severity: Severity) -> bool {
        severity >= self.threshold()
    }

    /// 自身に取り付けたシンク。子ロガーでは`None`。
    pub fn sinks(&self) -> Option<&SinkSet> {
        self.inner.sinks.as_ref()
    }

    /// 親ロガー。ルートロガーでは`None`。
    pub fn parent(&self) -> Option<&LoggerHandle> {
        self.inner.parent.as_ref()
    }

    /// 書き込み先のシンク。最も近い初期化済みの祖先のものを使う。
    fn effective_sinks(&self) -> Option<&SinkSet> {
        match &self.inner.sinks {
            Some(sinks) => Some(sinks),
            None => self.inner.parent.as_ref()?.effective_sinks(),
        }
    }

    /// 出力元を指定してログを書き込む。
    ///
    /// しきい値より低い重要度のログは捨てる。シンクの書き込みエラーは呼び出し側に
    /// 返却せず、他のシンクに報告する。
    pub fn log_at(&self, severity: Severity, origin: &str, message: impl AsRef<str>) {
        if !self.is_enabled(severity) {
            return;
        }
        let Some(sinks) = self.effective_sinks() else {
            return;
        };
        let entry = LogEntry::new(severity, self.name(), origin, message.as_ref());
        dispatch(&sinks.entries(), &entry);
    }

    /// ロックを待たずにログを書き込む。
    ///
    /// 書き込めなかったシンクがあった場合は`false`を返却する。同じスレッドが
    /// シンクへの書き込みの途中でパニックした場合でも止まらない。
    pub(crate) fn try_log_at(
        &self,
        severity: Severity,
        origin: &str,
        message: impl AsRef<str>,
    ) -> bool {
        if !self.is_enabled(severity) {
            return true;
        }
        let Some(sinks) = self.effective_sinks() else {
            return true;
        };
        let entry = LogEntry::new(severity, self.name(), origin, message.as_ref());
        dispatch_with(&sinks.entries(), &entry, |sink, entry| sink.try_write(entry))
    }

    /// ログを書き込む。出力元は呼び出し元のファイル名と行番号になる。
    #[track_caller]
    pub fn log(&self, severity: Severity, message: impl AsRef<str>) {
        if !self.is_enabled(severity) {
            return;
        }
        let origin = caller_origin(Location::caller());
        self.log_at(severity, &origin, message);
    }

    #[track_caller]
    pub fn debug(&self, message: impl AsRef<str>) {
        self.log(Severity::Debug, message);
    }

    #[track_caller]
    pub fn info(&self, message: impl AsRef<str>) {
        self.log(Severity::Info, message);
    }

    #[track_caller]
    pub fn warning(&self, message: impl AsRef<str>) {
        self.log(Severity::Warning, message);
    }

    #[track_caller]
    pub fn error(&self, message: impl AsRef<str>) {
        self.log(Severity::Error, message);
    }

    #[track_caller]
    pub fn critical(&self, message: impl AsRef<str>) {
        self.log(Severity::Critical, message);
    }

    /// 区間の開始と終了を`DEBUG`で記録する。
    ///
    /// 作成時に`entering <name>`を、破棄時に`leaving <name>`を書き込む。
    /// パニックで巻き戻る場合も終了を記録する。
    pub fn scope(&self, name: impl Into<String>) -> ScopeGuard {
        let name = name.into();
        self.log_at(Severity::Debug, &name, format!("entering {}", name));
        ScopeGuard {
            handle: self.clone(),
            name,
        }
    }
}

impl fmt::Debug for LoggerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggerHandle")
            .field("name", &self.name())
            .field("threshold", &self.threshold())
            .finish_non_exhaustive()
    }
}

/// `LoggerHandle::scope`が返却するガード。破棄時に区間の終了を記録する。
#[must_use = "the scope ends as soon as the guard is dropped"]
pub struct ScopeGuard {
    handle: LoggerHandle,
    name: String,
}

impl Drop for ScopeGuard {
    fn drop(&mut self) {
        self.handle
            .log_at(Severity::Debug, &self.name, format!("leaving {}", self.name));
    }
}

/// すべてのシンクに書き込む。
///
/// 失敗したシンクがあっても残りのシンクには書き込み、失敗を他のシンクに報告する。
/// 報告の失敗は無視する。
fn dispatch(sinks: &[(SinkRole, &dyn Sink)], entry: &LogEntry) {
    dispatch_with(sinks, entry, |sink, entry| sink.write(entry));
}

/// `write`で各シンクに書き込む。すべてのシンクに書き込めた場合は`true`。
fn dispatch_with<F>(sinks: &[(SinkRole, &dyn Sink)], entry: &LogEntry, write: F) -> bool
where
    F: Fn(&dyn Sink, &LogEntry) -> io::Result<()>,
{
    let mut written = true;
    for (index, (role, sink)) in sinks.iter().enumerate() {
        if let Err(err) = write(*sink, entry) {
            written = false;
            let report = LogEntry::new(
                Severity::Error,
                entry.component(),
                "sink",
                format!("{} sink failed: {}", role, err),
            );
            for (other_index, (_, other)) in sinks.iter().enumerate() {
                if other_index != index {
                    let _ = write(*other, &report);
                }
            }
        }
    }
    written
}

fn caller_origin(location: &Location<'_>) -> String {
    let file = Path::new(location.file())
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("unknown");
    format!("{}:{}", file, location.line())
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
