//! Log configuration hot reload.
//!
//! The parent directory is watched rather than the file itself, so editors
//! that save by writing a temporary file and renaming it over the original
//! keep triggering reloads.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::load_config;
use crate::config::schema::LogConfig;

/// Forwards every valid, changed version of a log config file.
pub struct ConfigWatcher {
    path: PathBuf,
    update_tx: mpsc::UnboundedSender<LogConfig>,
}

impl ConfigWatcher {
    /// Returns the watcher and the receiving end for reloaded configs.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<LogConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();
        (
            Self {
                path: path.to_path_buf(),
                update_tx,
            },
            update_rx,
        )
    }

    /// Start watching in notify's background thread.
    ///
    /// The config currently on disk is the baseline; identical reloads are
    /// not forwarded. Dropping the returned watcher stops it.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let dir = watched_dir(&self.path);
        let file_name = self.path.file_name().map(OsString::from);
        let reload = Reload {
            path: self.path.clone(),
            last: Mutex::new(load_config(&self.path).ok()),
            tx: self.update_tx,
        };

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    let relevant = event.kind.is_modify() || event.kind.is_create();
                    let ours = event
                        .paths
                        .iter()
                        .any(|p| p.file_name().map(OsString::from) == file_name);
                    if relevant && ours {
                        reload.run();
                    }
                }
                Err(e) => tracing::error!(error = %e, "Config watch error"),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&dir, RecursiveMode::NonRecursive)?;
        tracing::info!(path = ?self.path, "Log config watcher started");
        Ok(watcher)
    }
}

fn watched_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

struct Reload {
    path: PathBuf,
    last: Mutex<Option<LogConfig>>,
    tx: mpsc::UnboundedSender<LogConfig>,
}

impl Reload {
    fn run(&self) {
        let config = match load_config(&self.path) {
            Ok(config) => config,
            Err(e) => {
                tracing::error!(
                    path = ?self.path,
                    error = %e,
                    "Log config reload failed, keeping current settings"
                );
                return;
            }
        };

        let mut last = self.last.lock().unwrap_or_else(|e| e.into_inner());
        if last.as_ref() == Some(&config) {
            return;
        }
        tracing::info!(path = ?self.path, level = %config.level, "Log config changed");
        *last = Some(config.clone());
        let _ = self.tx.send(config);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_watched_dir() {
        assert_eq!(watched_dir(Path::new("log.toml")), PathBuf::from("."));
        assert_eq!(
            watched_dir(Path::new("/etc/app/log.toml")),
            PathBuf::from("/etc/app")
        );
    }

    #[test]
    fn test_reload_skips_unchanged_and_invalid() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("log.toml");
        fs::write(&path, "level = \"info\"\n").unwrap();

        let (tx, mut rx) = mpsc::unbounded_channel();
        let reload = Reload {
            path: path.clone(),
            last: Mutex::new(load_config(&path).ok()),
            tx,
        };

        reload.run();
        assert!(rx.try_recv().is_err());

        fs::write(&path, "level = \"shouting\"\n").unwrap();
        reload.run();
        assert!(rx.try_recv().is_err());

        fs::write(&path, "level = \"debug\"\n").unwrap();
        reload.run();
        assert_eq!(rx.try_recv().unwrap().level, "debug");
    }

    #[tokio::test]
    async fn test_reload_on_change() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("log.toml");
        fs::write(&path, "level = \"info\"\n").unwrap();

        let (watcher, mut updates) = ConfigWatcher::new(&path);
        let _guard = watcher.run().unwrap();

        fs::write(&path, "level = \"error\"\n").unwrap();

        let config = tokio::time::timeout(Duration::from_secs(10), async {
            loop {
                match updates.recv().await {
                    Some(config) if config.level == "error" => break config,
                    Some(_) => continue,
                    None => panic!("watcher closed"),
                }
            }
        })
        .await
        .expect("no reload within timeout");

        assert_eq!(config.level, "error");
    }
}
