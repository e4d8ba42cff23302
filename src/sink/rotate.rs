//! Time-based rotating log files.
//!
//! Files are named `<base><suffix>`, the suffix being the strftime pattern
//! rendered at the start of the current rotation period (`app.log.20240309`).
//! An optional link always points at the file being written, and files older
//! than the retention window are pruned whenever a new file is opened.

use std::ffi::OsString;
use std::fmt::Write as _;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};

use crate::error::{LogError, LogResult};

/// Suffix appended to the base file name, one file per day.
pub const DEFAULT_PATTERN: &str = ".%Y%m%d";

pub const DAY: Duration = Duration::from_secs(24 * 60 * 60);

/// Wall clock used to cut periods and render file names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Clock {
    #[default]
    Local,
    Utc,
}

impl Clock {
    fn offset_secs(self, at: DateTime<Utc>) -> i64 {
        match self {
            Clock::Utc => 0,
            Clock::Local => i64::from(
                Local
                    .offset_from_utc_datetime(&at.naive_utc())
                    .local_minus_utc(),
            ),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RotateOptions {
    /// strftime suffix appended to the base name.
    pub pattern: String,
    /// Link kept pointing at the current file.
    pub link_name: Option<PathBuf>,
    /// Files older than this are removed; `None` keeps everything.
    pub max_age: Option<Duration>,
    /// Length of one period.
    pub rotation_time: Duration,
    pub clock: Clock,
}

impl Default for RotateOptions {
    fn default() -> Self {
        Self {
            pattern: DEFAULT_PATTERN.to_string(),
            link_name: None,
            max_age: Some(DAY * 7),
            rotation_time: DAY,
            clock: Clock::Local,
        }
    }
}

/// Retention window for a day count; zero disables pruning.
pub fn retention(max_days: u32) -> Option<Duration> {
    (max_days > 0).then(|| DAY * max_days)
}

/// Daily-rotating writer for `filename`.
///
/// Files are named `filename.YYYYMMDD`, `filename` itself becomes a link to
/// the current file, and files older than `max_days` days are pruned
/// (`0` keeps them all).
///
/// # Errors
///
/// Returns an error if the first file cannot be created or linked.
pub fn get_writer(filename: impl AsRef<Path>, max_days: u32) -> LogResult<RotatingFileWriter> {
    let filename = filename.as_ref();
    RotatingFileWriter::new(
        filename,
        RotateOptions {
            link_name: Some(filename.to_path_buf()),
            max_age: retention(max_days),
            ..RotateOptions::default()
        },
    )
}

struct CurrentFile {
    path: PathBuf,
    period: i64,
    file: File,
}

pub struct RotatingFileWriter {
    base: PathBuf,
    options: RotateOptions,
    current: Option<CurrentFile>,
}

impl RotatingFileWriter {
    /// Create the writer and open the file for the current period.
    pub fn new(base: impl Into<PathBuf>, options: RotateOptions) -> LogResult<Self> {
        validate_pattern(&options.pattern)?;
        if options.rotation_time < Duration::from_secs(1) {
            return Err(LogError::InvalidRotation);
        }

        let mut writer = Self {
            base: base.into(),
            options,
            current: None,
        };
        writer.rotate(Utc::now())?;
        Ok(writer)
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    pub fn options(&self) -> &RotateOptions {
        &self.options
    }

    pub fn max_age(&self) -> Option<Duration> {
        self.options.max_age
    }

    pub fn link_name(&self) -> Option<&Path> {
        self.options.link_name.as_deref()
    }

    /// Path of the file currently written to.
    pub fn current_path(&self) -> Option<&Path> {
        self.current.as_ref().map(|c| c.path.as_path())
    }

    /// File name used for the period containing `at`.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::InvalidPattern`] if the pattern cannot be rendered.
    pub fn filename_for(&self, at: DateTime<Utc>) -> LogResult<PathBuf> {
        self.path_for_period(self.period_start(at))
    }

    /// Start of the period containing `at`, in wall-clock seconds.
    fn period_start(&self, at: DateTime<Utc>) -> i64 {
        let period = i64::try_from(self.options.rotation_time.as_secs())
            .unwrap_or(i64::MAX)
            .max(1);
        let wall = at.timestamp() + self.options.clock.offset_secs(at);
        wall.div_euclid(period) * period
    }

    fn path_for_period(&self, start: i64) -> LogResult<PathBuf> {
        let wall = DateTime::from_timestamp(start, 0)
            .unwrap_or_default()
            .naive_utc();
        let suffix =
            render_suffix(&self.options.pattern, &wall).ok_or_else(|| LogError::InvalidPattern {
                pattern: self.options.pattern.clone(),
            })?;
        let mut name = OsString::from(self.base.as_os_str());
        name.push(suffix);
        Ok(PathBuf::from(name))
    }

    fn rotate(&mut self, now: DateTime<Utc>) -> LogResult<()> {
        let period = self.period_start(now);
        let path = self.path_for_period(period)?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| LogError::Open {
                path: path.clone(),
                source,
            })?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| LogError::Open {
                path: path.clone(),
                source,
            })?;

        if let Some(link) = &self.options.link_name {
            link_current(&path, link)?;
        }
        self.current = Some(CurrentFile { path, period, file });

        // Pruning is best effort; a failure must not lose the new file.
        let _ = self.prune(now);
        Ok(())
    }

    /// Remove rotated files last modified before `now - max_age`.
    ///
    /// Only names starting with the base file name plus the literal part of
    /// the pattern are considered. Links and the current file are kept.
    pub fn prune(&self, now: DateTime<Utc>) -> io::Result<Vec<PathBuf>> {
        let Some(max_age) = self.options.max_age else {
            return Ok(Vec::new());
        };
        let cutoff = SystemTime::from(now)
            .checked_sub(max_age)
            .unwrap_or(UNIX_EPOCH);

        let dir = match self.base.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let prefix = self.file_prefix();
        let current = self
            .current
            .as_ref()
            .and_then(|c| c.path.file_name())
            .map(|n| n.to_os_string());

        let mut removed = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let Ok(entry) = entry else { continue };
            let name = entry.file_name();
            let matches = name.to_str().is_some_and(|n| n.starts_with(&prefix));
            if !matches || current.as_ref() == Some(&name) {
                continue;
            }

            let path = entry.path();
            let Ok(meta) = path.symlink_metadata() else { continue };
            if !meta.file_type().is_file() {
                continue;
            }
            let expired = meta.modified().is_ok_and(|modified| modified < cutoff);
            if expired && fs::remove_file(&path).is_ok() {
                removed.push(path);
            }
        }
        removed.sort();
        Ok(removed)
    }

    fn file_prefix(&self) -> String {
        let base = self
            .base
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        let literal = self.options.pattern.split('%').next().unwrap_or_default();
        format!("{base}{literal}")
    }

    /// Write `buf` to the file for the period containing `now`, rotating
    /// first if that period has no open file yet.
    fn write_at(&mut self, now: DateTime<Utc>, buf: &[u8]) -> io::Result<usize> {
        let due = self
            .current
            .as_ref()
            .map_or(true, |c| c.period != self.period_start(now));
        if due {
            self.rotate(now).map_err(io::Error::other)?;
        }
        match self.current.as_mut() {
            Some(current) => current.file.write(buf),
            None => Err(io::Error::other("no open log file")),
        }
    }
}

impl Write for RotatingFileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_at(Utc::now(), buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.current.as_mut() {
            Some(current) => current.file.flush(),
            None => Ok(()),
        }
    }
}

impl std::fmt::Debug for RotatingFileWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RotatingFileWriter")
            .field("base", &self.base)
            .field("options", &self.options)
            .field("current", &self.current_path())
            .finish()
    }
}

/// Render `pattern` for a wall-clock time.
///
/// `None` when the pattern is malformed or asks for an offset or time zone,
/// which a naive wall time cannot supply.
fn render_suffix(pattern: &str, wall: &NaiveDateTime) -> Option<String> {
    let mut suffix = String::new();
    write!(suffix, "{}", wall.format_with_items(StrftimeItems::new(pattern))).ok()?;
    Some(suffix)
}

/// Check that `pattern` can name rotated files.
///
/// # Errors
///
/// Returns [`LogError::InvalidPattern`] for malformed patterns and for
/// offset or time zone specifiers (`%z`, `%Z`, `%:z`).
pub fn validate_pattern(pattern: &str) -> LogResult<()> {
    let malformed = StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error));
    if malformed || render_suffix(pattern, &NaiveDateTime::default()).is_none() {
        return Err(LogError::InvalidPattern {
            pattern: pattern.to_string(),
        });
    }
    Ok(())
}

/// Point `link` at `target` by renaming a fresh link over the old one.
fn link_current(target: &Path, link: &Path) -> LogResult<()> {
    let pointee = match (target.parent(), link.parent()) {
        (Some(t), Some(l)) if t == l => target
            .file_name()
            .map(PathBuf::from)
            .unwrap_or_else(|| target.to_path_buf()),
        _ => target.to_path_buf(),
    };

    let mut tmp = OsString::from(link.as_os_str());
    tmp.push("_symlink");
    let tmp = PathBuf::from(tmp);

    let link_error = |source: io::Error| LogError::Link {
        link: link.to_path_buf(),
        target: target.to_path_buf(),
        source,
    };
    if tmp.symlink_metadata().is_ok() {
        fs::remove_file(&tmp).map_err(link_error)?;
    }
    symlink(&pointee, &tmp).map_err(link_error)?;
    fs::rename(&tmp, link).map_err(link_error)?;
    Ok(())
}

#[cfg(unix)]
fn symlink(original: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(original, link)
}

#[cfg(windows)]
fn symlink(original: &Path, link: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_file(original, link)
}

#[cfg(not(any(unix, windows)))]
fn symlink(_original: &Path, _link: &Path) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "symlinks are not supported on this platform",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        NaiveDate::from_ymd_opt(y, m, d)
            .and_then(|date| date.and_hms_opt(h, min, s))
            .unwrap()
            .and_utc()
    }

    fn utc_writer(dir: &TempDir, options: RotateOptions) -> RotatingFileWriter {
        RotatingFileWriter::new(
            dir.path().join("app.log"),
            RotateOptions {
                clock: Clock::Utc,
                ..options
            },
        )
        .unwrap()
    }

    fn age(path: &Path, days: u64) {
        let file = File::options().write(true).open(path).unwrap();
        file.set_modified(SystemTime::now() - DAY * days as u32)
            .unwrap();
    }

    #[test]
    fn test_get_writer_names_files_by_day() {
        let dir = TempDir::new().unwrap();
        let base = dir.path().join("app.log");
        let writer = get_writer(&base, 7).unwrap();

        let name = writer
            .current_path()
            .and_then(|p| p.file_name())
            .and_then(|n| n.to_str())
            .unwrap()
            .to_string();
        let suffix = name.strip_prefix("app.log.").unwrap();
        assert_eq!(suffix.len(), 8, "{name}");
        assert!(suffix.chars().all(|c| c.is_ascii_digit()), "{name}");

        assert_eq!(writer.max_age(), Some(Duration::from_secs(7 * 24 * 60 * 60)));
        assert_eq!(writer.link_name(), Some(base.as_path()));
    }

    #[test]
    fn test_zero_days_keeps_everything() {
        let dir = TempDir::new().unwrap();
        let writer = get_writer(dir.path().join("app.log"), 0).unwrap();
        assert_eq!(writer.max_age(), None);
        assert!(writer.prune(Utc::now()).unwrap().is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_link_follows_current_file() {
        let dir = TempDir::new().unwrap();
        let base = dir.path().join("app.log");
        let mut writer = get_writer(&base, 7).unwrap();

        writer.write_all(b"hello\n").unwrap();
        writer.flush().unwrap();

        let pointee = fs::read_link(&base).unwrap();
        assert_eq!(Some(pointee.as_os_str()), writer.current_path().and_then(|p| p.file_name()));
        assert_eq!(fs::read_to_string(&base).unwrap(), "hello\n");
    }

    #[test]
    fn test_period_boundaries() {
        let dir = TempDir::new().unwrap();
        let writer = utc_writer(&dir, RotateOptions::default());

        let before = writer.filename_for(utc(2024, 3, 9, 23, 59, 59)).unwrap();
        let after = writer.filename_for(utc(2024, 3, 10, 0, 0, 0)).unwrap();
        assert_eq!(before, dir.path().join("app.log.20240309"));
        assert_eq!(after, dir.path().join("app.log.20240310"));
    }

    #[test]
    fn test_hourly_pattern() {
        let dir = TempDir::new().unwrap();
        let writer = utc_writer(
            &dir,
            RotateOptions {
                pattern: "-%Y%m%d%H.log".into(),
                rotation_time: Duration::from_secs(3600),
                ..RotateOptions::default()
            },
        );
        assert_eq!(
            writer.filename_for(utc(2024, 3, 9, 14, 35, 0)).unwrap(),
            dir.path().join("app.log-2024030914.log")
        );
    }

    #[test]
    fn test_prune_removes_only_expired_rotations() {
        let dir = TempDir::new().unwrap();
        let old = dir.path().join("app.log.20000101");
        let fresh = dir.path().join("app.log.20990101");
        let unrelated = dir.path().join("other.txt");
        for path in [&old, &fresh, &unrelated] {
            fs::write(path, "x").unwrap();
        }
        age(&old, 30);
        age(&unrelated, 30);

        let writer = utc_writer(
            &dir,
            RotateOptions {
                max_age: retention(7),
                ..RotateOptions::default()
            },
        );

        assert!(!old.exists(), "expired rotation is pruned on open");
        assert!(fresh.exists());
        assert!(unrelated.exists());
        assert!(writer.current_path().unwrap().exists());
        assert!(writer.prune(Utc::now()).unwrap().is_empty());
    }

    #[test]
    fn test_prune_reports_removed_files() {
        let dir = TempDir::new().unwrap();
        let writer = utc_writer(&dir, RotateOptions::default());

        let old = dir.path().join("app.log.19990101");
        fs::write(&old, "x").unwrap();
        age(&old, 8);

        assert_eq!(writer.prune(Utc::now()).unwrap(), vec![old]);
    }

    #[test]
    fn test_creates_missing_directories() {
        let dir = TempDir::new().unwrap();
        let base = dir.path().join("nested").join("deeper").join("app.log");
        let writer = get_writer(&base, 1).unwrap();
        assert!(writer.current_path().unwrap().starts_with(dir.path().join("nested/deeper")));
    }

    #[test]
    fn test_open_failure_is_an_error() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();

        let err = get_writer(blocker.join("app.log"), 7).unwrap_err();
        assert!(matches!(err, LogError::Open { .. }), "{err}");
    }

    #[test]
    fn test_invalid_options() {
        let dir = TempDir::new().unwrap();
        let err = RotatingFileWriter::new(
            dir.path().join("app.log"),
            RotateOptions {
                pattern: ".%!".into(),
                ..RotateOptions::default()
            },
        )
        .unwrap_err();
        assert!(matches!(err, LogError::InvalidPattern { .. }));

        let err = RotatingFileWriter::new(
            dir.path().join("app.log"),
            RotateOptions {
                rotation_time: Duration::ZERO,
                ..RotateOptions::default()
            },
        )
        .unwrap_err();
        assert!(matches!(err, LogError::InvalidRotation));
    }
    #[rstest::rstest]
    #[case(".%Y%m%d%z")]
    #[case(".%Y%m%d%Z")]
    #[case(".%Y%m%d%:z")]
    fn test_zone_specifiers_are_rejected(#[case] pattern: &str) {
        let dir = TempDir::new().unwrap();
        let err = RotatingFileWriter::new(
            dir.path().join("app.log"),
            RotateOptions {
                pattern: pattern.into(),
                ..RotateOptions::default()
            },
        )
        .unwrap_err();
        assert!(matches!(err, LogError::InvalidPattern { .. }), "{err}");
    }

    #[test]
    fn test_validate_pattern() {
        assert!(validate_pattern(DEFAULT_PATTERN).is_ok());
        assert!(validate_pattern("-%Y-%m-%dT%H").is_ok());
        assert!(validate_pattern(".%").is_err());
        assert!(validate_pattern(".%Y%z").is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_rollover_opens_next_file_and_moves_link() {
        let dir = TempDir::new().unwrap();
        let base = dir.path().join("app.log");
        let mut writer = utc_writer(
            &dir,
            RotateOptions {
                link_name: Some(base.clone()),
                max_age: retention(7),
                ..RotateOptions::default()
            },
        );

        let expired = dir.path().join("app.log.19990101");
        let recent = dir.path().join("app.log.19990102");
        for path in [&expired, &recent] {
            fs::write(path, "x\n").unwrap();
        }
        age(&expired, 30);
        age(&recent, 2);

        let today = Utc::now();
        let tomorrow = today + chrono::Duration::days(1);
        writer.write_at(today, b"first\n").unwrap();
        writer.write_at(tomorrow, b"second\n").unwrap();
        writer.flush().unwrap();

        let first = writer.filename_for(today).unwrap();
        let second = writer.filename_for(tomorrow).unwrap();
        assert_ne!(first, second);
        assert_eq!(fs::read_to_string(&first).unwrap(), "first\n");
        assert_eq!(fs::read_to_string(&second).unwrap(), "second\n");
        assert_eq!(writer.current_path(), Some(second.as_path()));
        assert_eq!(fs::read_link(&base).unwrap(), PathBuf::from(second.file_name().unwrap()));

        assert!(!expired.exists());
        assert!(recent.exists());
    }
}
