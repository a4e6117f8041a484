//! Platform-specific directory paths.
//!
//! Uses XDG on Linux, standard locations on macOS/Windows.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;

const QUALIFIER: &str = "mx";
const ORGANIZATION: &str = "agua";
const APPLICATION: &str = "agua-console";

/// Maximum number of archived log files to keep.
const MAX_OLD_LOGS: usize = 25;

const LATEST_LOG: &str = "latest.log";

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
}

/// Directory for persistent data (settings, stored session).
///
/// - Linux: `$XDG_DATA_HOME/agua-console` or `~/.local/share/agua-console`
/// - macOS: `~/Library/Application Support/mx.agua.agua-console`
/// - Windows: `C:\Users\<User>\AppData\Roaming\agua\agua-console\data`
pub fn data_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.data_dir().to_path_buf())
}

/// Directory for regenerable data such as logs.
pub fn cache_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.cache_dir().to_path_buf())
}

pub fn settings_db() -> Option<PathBuf> {
    data_dir().map(|dir| dir.join("settings.db"))
}

pub fn log_file() -> Option<PathBuf> {
    cache_dir().map(|dir| dir.join(LATEST_LOG))
}

/// Archives `latest.log` under a timestamped name and prunes old logs.
///
/// Call at startup, before the logger opens a new `latest.log`.
pub fn rotate_logs() {
    let Some(cache) = cache_dir() else { return };
    rotate_logs_in(&cache, &chrono::Local::now().format("%Y%m%d_%H%M%S").to_string());
}

fn rotate_logs_in(dir: &Path, timestamp: &str) {
    let latest = dir.join(LATEST_LOG);
    if latest.exists() {
        let _ = fs::rename(&latest, dir.join(format!("{}.log", timestamp)));
    }
    cleanup_old_logs(dir);
}

/// Keeps the newest [`MAX_OLD_LOGS`] archived logs.
fn cleanup_old_logs(dir: &Path) {
    let Ok(entries) = fs::read_dir(dir) else { return };

    let mut logs: Vec<_> = entries
        .filter_map(|e| e.ok())
        .filter(|e| {
            let name = e.file_name();
            let name = name.to_string_lossy();
            name.ends_with(".log") && name != LATEST_LOG
        })
        .collect();

    // Oldest first; archive names sort chronologically.
    logs.sort_by_key(|e| e.file_name());

    if logs.len() > MAX_OLD_LOGS {
        for entry in logs.iter().take(logs.len() - MAX_OLD_LOGS) {
            let _ = fs::remove_file(entry.path());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_archives_and_prunes() {
        let dir = std::env::temp_dir().join(format!("agua-logs-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        for i in 0..MAX_OLD_LOGS + 3 {
            fs::write(dir.join(format!("20240101_0000{:02}.log", i)), "").unwrap();
        }
        fs::write(dir.join(LATEST_LOG), "hoy").unwrap();

        rotate_logs_in(&dir, "20991231_235959");

        assert!(!dir.join(LATEST_LOG).exists());
        assert!(dir.join("20991231_235959.log").exists());
        assert!(!dir.join("20240101_000000.log").exists());
        let remaining = fs::read_dir(&dir).unwrap().count();
        assert_eq!(remaining, MAX_OLD_LOGS);
        let _ = fs::remove_dir_all(dir);
    }
}
