use std::{
    fmt,
    fs::{self, File, OpenOptions},
    io::{self, Write},
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard, PoisonError, TryLockError},
};

use regex::Regex;
use tracing_subscriber::fmt::MakeWriter;

use crate::{
    config::ConsoleTarget,
    entry::LogEntry,
    error::{Error, Result},
};

/// ログの出力先。
///
/// 書き込みに失敗した場合は`io::Error`を返却する。呼び出し側はエラーを
/// 握りつぶす前提なので、実装はパニックしてはならない。
pub trait Sink: Send + Sync {
    fn write(&self, entry: &LogEntry) -> io::Result<()>;

    /// ロックを待たずに書き込む。
    ///
    /// 他の書き込みが終わっていない場合は`io::ErrorKind::WouldBlock`を返却する。
    /// 書き込みの途中でパニックしたスレッドからも安全に呼び出せる。
    fn try_write(&self, entry: &LogEntry) -> io::Result<()> {
        self.write(entry)
    }
}

/// ルートロガーに取り付けるシンクの役割
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SinkRole {
    Console,
    File,
}

impl fmt::Display for SinkRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SinkRole::Console => f.write_str("console"),
            SinkRole::File => f.write_str("file"),
        }
    }
}

/// 標準出力、標準エラー出力、または任意のライターに1行ずつ書き込むシンク。
pub struct ConsoleSink {
    out: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleSink {
    pub fn new(target: ConsoleTarget) -> Self {
        match target {
            ConsoleTarget::Stdout => Self::from_writer(io::stdout()),
            ConsoleTarget::Stderr => Self::from_writer(io::stderr()),
        }
    }

    pub fn from_writer(writer: impl Write + Send + 'static) -> Self {
        Self::from_boxed(Box::new(writer))
    }

    pub(crate) fn from_boxed(writer: Box<dyn Write + Send>) -> Self {
        Self {
            out: Mutex::new(writer),
        }
    }
}

impl Sink for ConsoleSink {
    fn write(&self, entry: &LogEntry) -> io::Result<()> {
        write_line(&mut **lock(&self.out), entry)
    }

    fn try_write(&self, entry: &LogEntry) -> io::Result<()> {
        write_line(&mut **try_lock(&self.out)?, entry)
    }
}

fn write_line<W: Write + ?Sized>(out: &mut W, entry: &LogEntry) -> io::Result<()> {
    let line = format!("{}\n", entry.format());
    out.write_all(line.as_bytes())?;
    out.flush()
}

impl fmt::Debug for ConsoleSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsoleSink").finish_non_exhaustive()
    }
}

/// サイズでローテーションするファイルシンク。
///
/// 現在のファイルは`<directory>/<file_stem>.log`で、ローテーションしたファイルには
/// `.1`、`.2`、…、`.<max_count>`の接尾語が付く。`.1`が最も新しい。
///
/// 書き込み前にサイズを確認し、書き込むと`max_bytes`を超える場合は先にローテーション
/// してから書き込む。確認からローテーション、書き込みまでを1つのロックの中で行う。
/// 1件が`max_bytes`より大きい場合でも切り詰めずに書き込み、次の書き込みで
/// ローテーションする。
#[derive(Debug)]
pub struct RotatingFileSink {
    log_directory: PathBuf,
    log_filepath: PathBuf,
    max_bytes: u64,
    max_count: u32,
    backup_pattern: Regex,
    created_directory: bool,
    state: Mutex<RollingState>,
}

#[derive(Debug)]
struct RollingState {
    file: Option<File>,
    size: u64,
}

/// `RotatingFileSink`を`tracing-subscriber`のライターとして使うためのライター。
///
/// `write`の1回の呼び出しを1件のログとして扱う。
#[derive(Debug)]
pub struct RollingWriter<'a>(&'a RotatingFileSink);

impl RotatingFileSink {
    /// `RotatingFileSink`を作成する。
    ///
    /// ディレクトリが存在しない場合は親ディレクトリを含めて作成する。
    /// 現在のファイルが既に存在する場合は追記し、そのサイズをローテーションの判定に含める。
    ///
    /// # 引数
    ///
    /// * directory: ファイルを作成するディレクトリ。
    /// * file_stem: ファイル名から`.log`を除いた部分。
    /// * max_bytes: 1ファイルの最大サイズ(バイト)。
    /// * max_count: 残す最大バックアップ数。
    ///
    /// # 戻り値
    ///
    /// `RotatingFileSink`インスタンス。
    pub fn open(
        directory: impl AsRef<Path>,
        file_stem: &str,
        max_bytes: u64,
        max_count: u32,
    ) -> Result<Self> {
        if max_bytes == 0 {
            return Err(Error::ZeroMaxBytes);
        }
        let log_directory = directory.as_ref().to_path_buf();
        if log_directory.as_os_str().is_empty() {
            return Err(Error::EmptyDirectory);
        }
        let created_directory = ensure_directory(&log_directory)?;

        let filename = create_log_filename(file_stem);
        let log_filepath = log_directory.join(&filename);
        let backup_pattern = create_backup_pattern(&filename);

        let file = create_writer(&log_filepath, false).map_err(|source| Error::OpenLogFile {
            path: log_filepath.clone(),
            source,
        })?;
        let size = file.metadata().map(|m| m.len()).unwrap_or(0);

        Ok(Self {
            log_directory,
            log_filepath,
            max_bytes,
            max_count,
            backup_pattern,
            created_directory,
            state: Mutex::new(RollingState {
                file: Some(file),
                size,
            }),
        })
    }

    /// 現在のファイルのパス。
    pub fn path(&self) -> &Path {
        &self.log_filepath
    }

    pub fn directory(&self) -> &Path {
        &self.log_directory
    }

    /// `n`番目のバックアップのパス。
    pub fn backup_path(&self, n: u32) -> PathBuf {
        backup_filepath(&self.log_filepath, n)
    }

    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    pub fn max_count(&self) -> u32 {
        self.max_count
    }

    /// `open`がディレクトリを作成した場合は`true`。
    pub fn created_directory(&self) -> bool {
        self.created_directory
    }

    /// 現在のファイルのサイズ。
    pub fn current_size(&self) -> u64 {
        lock(&self.state).size
    }

    /// 1件分のバイト列を書き込む。必要であれば書き込む前にローテーションする。
    ///
    /// ローテーションに失敗した場合も、現在のファイルに追記してからエラーを返却する。
    pub fn append(&self, record: &[u8]) -> io::Result<()> {
        self.append_locked(&mut lock(&self.state), record)
    }

    /// ロックを待たずに`append`する。他の書き込みの途中であれば
    /// `io::ErrorKind::WouldBlock`を返却する。
    pub fn try_append(&self, record: &[u8]) -> io::Result<()> {
        self.append_locked(&mut *try_lock(&self.state)?, record)
    }

    fn append_locked(&self, state: &mut RollingState, record: &[u8]) -> io::Result<()> {
        let len = record.len() as u64;
        let rotated = if state.size > 0 && state.size.saturating_add(len) > self.max_bytes {
            self.rotate(state)
        } else {
            Ok(())
        };

        if state.file.is_none() {
            let file = create_writer(&self.log_filepath, false)?;
            state.size = file.metadata().map(|m| m.len()).unwrap_or(0);
            state.file = Some(file);
        }
        if let Some(file) = state.file.as_mut() {
            file.write_all(record)?;
            state.size += len;
        }
        rotated
    }

    /// 現在のファイルをバックアップに移動して、空のファイルを作成する。
    ///
    /// `.1`から`.<max_count - 1>`を1つずつ後ろにずらし、`.<max_count>`は削除する。
    /// `max_count`が0の場合は現在のファイルを空にする。
    fn rotate(&self, state: &mut RollingState) -> io::Result<()> {
        // Windows では開いたままのファイルを移動できない
        state.file = None;

        if let Err(err) = self.shift_backups() {
            if let Ok(file) = create_writer(&self.log_filepath, false) {
                state.size = file.metadata().map(|m| m.len()).unwrap_or(state.size);
                state.file = Some(file);
            }
            return Err(err);
        }

        let file = create_writer(&self.log_filepath, true)?;
        state.file = Some(file);
        state.size = 0;
        Ok(())
    }

    fn shift_backups(&self) -> io::Result<()> {
        if self.max_count > 0 {
            for n in (1..self.max_count).rev() {
                let src = self.backup_path(n);
                if src.exists() {
                    let dst = self.backup_path(n + 1);
                    remove_if_exists(&dst)?;
                    fs::rename(&src, &dst)?;
                }
            }
            let first = self.backup_path(1);
            remove_if_exists(&first)?;
            fs::rename(&self.log_filepath, &first)?;
        }
        self.remove_stale_backups()
    }

    /// `max_count`より大きい番号のバックアップを削除する。
    ///
    /// 以前により大きい`max_count`で実行したときのファイルが残っている場合に備える。
    fn remove_stale_backups(&self) -> io::Result<()> {
        for dir_entry in fs::read_dir(&self.log_directory)? {
            let dir_entry = dir_entry?;
            let name = dir_entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            let Some(index) = backup_index(&self.backup_pattern, name) else {
                continue;
            };
            if index > self.max_count {
                remove_if_exists(&dir_entry.path())?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
impl RotatingFileSink {
    /// 書き込み中の状態を作るためにロックを保持する。
    pub(crate) fn lock_state(&self) -> impl Sized + '_ {
        lock(&self.state)
    }
}

impl Sink for RotatingFileSink {
    fn write(&self, entry: &LogEntry) -> io::Result<()> {
        let line = format!("{}\n", entry.format());
        self.append(line.as_bytes())
    }

    fn try_write(&self, entry: &LogEntry) -> io::Result<()> {
        let line = format!("{}\n", entry.format());
        self.try_append(line.as_bytes())
    }
}

impl<'a> MakeWriter<'a> for RotatingFileSink {
    type Writer = RollingWriter<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        RollingWriter(self)
    }
}

impl io::Write for RollingWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.append(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        match lock(&self.0.state).file.as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

/// ロックを取得する。他のスレッドがパニックしていてもログの出力は続ける。
fn lock<T: ?Sized>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// ロックを待たずに取得する。他の書き込みの途中であれば`WouldBlock`を返却する。
fn try_lock<T: ?Sized>(mutex: &Mutex<T>) -> io::Result<MutexGuard<'_, T>> {
    match mutex.try_lock() {
        Ok(guard) => Ok(guard),
        Err(TryLockError::Poisoned(err)) => Ok(err.into_inner()),
        Err(TryLockError::WouldBlock) => Err(io::ErrorKind::WouldBlock.into()),
    }
}

/// ディレクトリが存在しない場合に作成する。
///
/// # 戻り値
///
/// ディレクトリを作成した場合は`true`。
fn ensure_directory(directory: &Path) -> Result<bool> {
    if directory.is_dir() {
        return Ok(false);
    }
    fs::create_dir_all(directory).map_err(|source| Error::Directory {
        path: directory.to_path_buf(),
        source,
    })?;
    Ok(true)
}

/// ログファイル名を作成して返却する。
///
/// ログファイル名は、`{file_stem}.log`となる。
fn create_log_filename(file_stem: &str) -> String {
    format!("{}.log", file_stem)
}

fn backup_filepath(log_filepath: &Path, n: u32) -> PathBuf {
    let mut path = log_filepath.as_os_str().to_os_string();
    path.push(format!(".{}", n));
    PathBuf::from(path)
}

/// バックアップファイル名に一致する正規表現を作成する。
fn create_backup_pattern(filename: &str) -> Regex {
    let pattern = format!(r"^{}\.(\d+)$", regex::escape(filename));
    Regex::new(&pattern)
        .expect("Unable to create a backup file pattern; this is a bug in rolling-log-sink")
}

/// バックアップファイル名から番号を取り出す。
fn backup_index(pattern: &Regex, name: &str) -> Option<u32> {
    pattern
        .captures(name)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// ライターを作成する。
///
/// # 引数
///
/// * path: ログファイルパス。
/// * truncate: 既存の内容を捨てる場合は`true`、追記する場合は`false`。
///
/// # 戻り値
///
/// `File`インスタンス。
fn create_writer(path: &Path, truncate: bool) -> io::Result<File> {
    let mut open_options = OpenOptions::new();
    if truncate {
        open_options.write(true).truncate(true).create(true);
    } else {
        open_options.append(true).create(true);
    }

    let new_file = open_options.open(path);
    if new_file.is_err() {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
            return open_options.open(path);
        }
    }

    new_file
}

fn remove_if_exists(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use crate::{severity::Severity, test_support::SharedBuf};

    use super::*;

    fn record(c: char, len: usize) -> Vec<u8> {
        let mut line: String = std::iter::repeat(c).take(len - 1).collect();
        line.push('\n');
        line.into_bytes()
    }

    fn read(path: &Path) -> String {
        fs::read_to_string(path).unwrap()
    }

    #[test]
    fn test_create_log_filename() {
        assert_eq!("foo.log", create_log_filename("foo"));
    }

    #[test]
    fn test_backup_filepath() {
        let path = Path::new("logs").join("app.log");
        assert_eq!(Path::new("logs").join("app.log.3"), backup_filepath(&path, 3));
    }

    #[test]
    fn test_backup_index() {
        let pattern = create_backup_pattern("app.log");

        assert_eq!(Some(1), backup_index(&pattern, "app.log.1"));
        assert_eq!(Some(12), backup_index(&pattern, "app.log.12"));
        assert_eq!(None, backup_index(&pattern, "app.log"));
        assert_eq!(None, backup_index(&pattern, "appxlog.1"));
        assert_eq!(None, backup_index(&pattern, "other.log.1"));
        assert_eq!(None, backup_index(&pattern, "app.log.1.bak"));
    }

    #[test]
    fn test_console_sink_writes_formatted_line() {
        let buf = SharedBuf::default();
        let sink = ConsoleSink::from_writer(buf.clone());
        let entry = LogEntry::new(Severity::Error, "app", "main", "boom");

        sink.write(&entry).unwrap();

        assert_eq!(format!("{}\n", entry.format()), buf.contents());
    }

    #[test]
    fn test_open_rejects_zero_max_bytes() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            RotatingFileSink::open(dir.path(), "app", 0, 5),
            Err(Error::ZeroMaxBytes)
        ));
    }

    #[test]
    fn test_open_rejects_empty_directory() {
        assert!(matches!(
            RotatingFileSink::open("", "app", 100, 5),
            Err(Error::EmptyDirectory)
        ));
    }

    #[test]
    fn test_open_fails_when_directory_is_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, b"not a directory").unwrap();

        let result = RotatingFileSink::open(blocker.join("logs"), "app", 100, 5);
        assert!(matches!(result, Err(Error::Directory { .. })));
    }

    #[test]
    fn test_open_creates_directory_once() {
        let dir = tempfile::tempdir().unwrap();
        let log_dir = dir.path().join("nested").join("logs");

        let first = RotatingFileSink::open(&log_dir, "app", 100, 5).unwrap();
        assert!(first.created_directory());
        assert!(log_dir.is_dir());
        assert!(first.path().is_file());

        let second = RotatingFileSink::open(&log_dir, "app", 100, 5).unwrap();
        assert!(!second.created_directory());
    }

    #[test]
    fn test_no_rotation_below_max_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let sink = RotatingFileSink::open(dir.path(), "app", 100, 2).unwrap();

        sink.append(b"first\n").unwrap();
        sink.append(b"second\n").unwrap();
        sink.append(b"third\n").unwrap();

        assert_eq!("first\nsecond\nthird\n", read(sink.path()));
        assert_eq!(19, sink.current_size());
        assert!(!sink.backup_path(1).exists());
    }

    #[test]
    fn test_exact_fit_does_not_rotate() {
        let dir = tempfile::tempdir().unwrap();
        let sink = RotatingFileSink::open(dir.path(), "app", 80, 2).unwrap();

        sink.append(&record('a', 40)).unwrap();
        sink.append(&record('b', 40)).unwrap();

        assert_eq!(80, sink.current_size());
        assert!(!sink.backup_path(1).exists());
    }

    #[test]
    fn test_rotation_keeps_at_most_max_count_backups() {
        let dir = tempfile::tempdir().unwrap();
        let sink = RotatingFileSink::open(dir.path(), "app", 100, 2).unwrap();

        for c in ['a', 'b', 'c', 'd', 'e'] {
            sink.append(&record(c, 40)).unwrap();
        }

        // a b | c d | e
        assert_eq!(String::from_utf8(record('e', 40)).unwrap(), read(sink.path()));
        let newest: Vec<u8> = [record('c', 40), record('d', 40)].concat();
        assert_eq!(String::from_utf8(newest).unwrap(), read(&sink.backup_path(1)));
        let oldest: Vec<u8> = [record('a', 40), record('b', 40)].concat();
        assert_eq!(String::from_utf8(oldest).unwrap(), read(&sink.backup_path(2)));
        assert!(!sink.backup_path(3).exists());

        for c in ['f', 'g', 'h', 'i'] {
            sink.append(&record(c, 40)).unwrap();
        }

        // a b c d は捨てられる
        assert!(read(&sink.backup_path(2)).starts_with('e'));
        assert!(read(&sink.backup_path(1)).starts_with('g'));
        assert!(read(sink.path()).starts_with('i'));
        assert!(!sink.backup_path(3).exists());
    }

    #[test]
    fn test_oversized_record_is_written_whole() {
        let dir = tempfile::tempdir().unwrap();
        let sink = RotatingFileSink::open(dir.path(), "app", 10, 3).unwrap();

        let big = record('x', 25);
        sink.append(&big).unwrap();
        assert_eq!(big, fs::read(sink.path()).unwrap());
        assert!(!sink.backup_path(1).exists());

        sink.append(b"small\n").unwrap();
        assert_eq!(big, fs::read(sink.backup_path(1)).unwrap());
        assert_eq!("small\n", read(sink.path()));
    }

    #[test]
    fn test_zero_max_count_truncates() {
        let dir = tempfile::tempdir().unwrap();
        let sink = RotatingFileSink::open(dir.path(), "app", 50, 0).unwrap();

        sink.append(&record('a', 40)).unwrap();
        sink.append(&record('b', 40)).unwrap();

        assert_eq!(String::from_utf8(record('b', 40)).unwrap(), read(sink.path()));
        assert!(!sink.backup_path(1).exists());
    }

    #[test]
    fn test_existing_file_is_appended_and_counted() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("app.log"), record('a', 40)).unwrap();

        let sink = RotatingFileSink::open(dir.path(), "app", 60, 2).unwrap();
        assert_eq!(40, sink.current_size());

        sink.append(&record('b', 40)).unwrap();
        assert_eq!(String::from_utf8(record('a', 40)).unwrap(), read(&sink.backup_path(1)));
        assert_eq!(String::from_utf8(record('b', 40)).unwrap(), read(sink.path()));
    }

    #[test]
    fn test_stale_backups_are_removed() {
        let dir = tempfile::tempdir().unwrap();
        for n in 1..=4 {
            fs::write(dir.path().join(format!("app.log.{}", n)), b"old\n").unwrap();
        }
        fs::write(dir.path().join("other.log.9"), b"keep\n").unwrap();

        let sink = RotatingFileSink::open(dir.path(), "app", 10, 2).unwrap();
        sink.append(b"0123456789").unwrap();
        sink.append(b"next\n").unwrap();

        assert_eq!("0123456789", read(&sink.backup_path(1)));
        assert_eq!("old\n", read(&sink.backup_path(2)));
        assert!(!sink.backup_path(3).exists());
        assert!(!sink.backup_path(4).exists());
        assert!(dir.path().join("other.log.9").exists());
    }

    #[test]
    fn test_failed_rotation_keeps_logging() {
        let dir = tempfile::tempdir().unwrap();
        let sink = RotatingFileSink::open(dir.path(), "app", 10, 1).unwrap();
        sink.append(b"0123456789").unwrap();

        // `.1`がディレクトリだと削除できない
        fs::create_dir(sink.backup_path(1)).unwrap();
        assert!(sink.append(b"next\n").is_err());
        assert_eq!("0123456789next\n", read(sink.path()));
        assert_eq!(15, sink.current_size());

        fs::remove_dir(sink.backup_path(1)).unwrap();
        sink.append(b"again\n").unwrap();
        assert_eq!("0123456789next\n", read(&sink.backup_path(1)));
        assert_eq!("again\n", read(sink.path()));
    }

    #[test]
    fn test_try_append_does_not_wait_for_lock() {
        let dir = tempfile::tempdir().unwrap();
        let sink = RotatingFileSink::open(dir.path(), "app", 100, 1).unwrap();

        {
            let _held = lock(&sink.state);
            let err = sink.try_append(b"busy\n").unwrap_err();
            assert_eq!(io::ErrorKind::WouldBlock, err.kind());
        }

        sink.try_append(b"free\n").unwrap();
        assert_eq!("free\n", read(sink.path()));
    }

    #[test]
    fn test_console_try_write_does_not_wait_for_lock() {
        let buf = SharedBuf::default();
        let sink = ConsoleSink::from_writer(buf.clone());
        let entry = LogEntry::new(Severity::Critical, "app", "panic", "boom");

        {
            let _held = lock(&sink.out);
            let err = sink.try_write(&entry).unwrap_err();
            assert_eq!(io::ErrorKind::WouldBlock, err.kind());
        }
        assert_eq!("", buf.contents());

        sink.try_write(&entry).unwrap();
        assert_eq!(format!("{}\n", entry.format()), buf.contents());
    }

    #[test]
    fn test_sink_write_appends_formatted_entry() {
        let dir = tempfile::tempdir().unwrap();
        let sink = RotatingFileSink::open(dir.path(), "app", 2000, 5).unwrap();
        let entry = LogEntry::new(Severity::Info, "app.module1", "my_func", "Doing stuff");

        Sink::write(&sink, &entry).unwrap();

        assert_eq!(format!("{}\n", entry.format()), read(sink.path()));
    }

    #[test]
    fn test_concurrent_appends_are_not_interleaved() {
        let dir = tempfile::tempdir().unwrap();
        let sink = RotatingFileSink::open(dir.path(), "app", 400, 50).unwrap();

        std::thread::scope(|s| {
            for c in ['a', 'b', 'c', 'd'] {
                let sink = &sink;
                s.spawn(move || {
                    for _ in 0..25 {
                        sink.append(&record(c, 40)).unwrap();
                    }
                });
            }
        });

        let mut lines = 0;
        let mut paths = vec![sink.path().to_path_buf()];
        paths.extend((1..=50).map(|n| sink.backup_path(n)).filter(|p| p.exists()));
        for path in paths {
            let content = read(&path);
            assert!(content.len() <= 400);
            for line in content.lines() {
                assert_eq!(39, line.len());
                let first = line.chars().next().unwrap();
                assert!(line.chars().all(|c| c == first));
                lines += 1;
            }
        }
        assert_eq!(100, lines);
    }

    #[test]
    fn test_make_writer_for_tracing_subscriber() {
        let dir = tempfile::tempdir().unwrap();
        let sink = RotatingFileSink::open(dir.path(), "traced", 2000, 2).unwrap();
        let path = sink.path().to_path_buf();

        let subscriber = tracing_subscriber::fmt()
            .with_writer(sink)
            .with_ansi(false)
            .finish();
        tracing::subscriber::with_default(subscriber, || {
            tracing::info!("hello from tracing");
        });

        let content = read(&path);
        assert!(content.contains("INFO"));
        assert!(content.contains("hello from tracing"));
    }
}
