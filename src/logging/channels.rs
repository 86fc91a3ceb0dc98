//! Success and error log channels
//!
//! [`FileOutcomeLog`] appends one line per submission outcome to
//! `success.log` or `errors.log` in the log directory, mirroring each entry
//! as a tracing event. It also truncates the artifacts of the previous run.

use super::structured::INTEGRATION_LOG_FILE;
use crate::adapters::traits::OutcomeLog;
use crate::domain::{PersonId, Result};
use chrono::Local;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Success channel file name
pub const SUCCESS_LOG_FILE: &str = "success.log";

/// Error channel file name
pub const ERROR_LOG_FILE: &str = "errors.log";

/// File-backed success and error channels
#[derive(Debug)]
pub struct FileOutcomeLog {
    dir: PathBuf,
    // Serializes appends from concurrent callers.
    write_lock: Mutex<()>,
}

impl FileOutcomeLog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn success_path(&self) -> PathBuf {
        self.dir.join(SUCCESS_LOG_FILE)
    }

    pub fn error_path(&self) -> PathBuf {
        self.dir.join(ERROR_LOG_FILE)
    }

    fn append(&self, path: &Path, level: &str, person_id: &PersonId, card: &str, message: &str) {
        let line = format!(
            "{} - {level} - person_id={person_id} card_number={card} - {message}",
            Local::now().format("%Y-%m-%d %H:%M:%S")
        );

        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let result = fs::create_dir_all(&self.dir).and_then(|_| {
            let mut file = OpenOptions::new().create(true).append(true).open(path)?;
            writeln!(file, "{line}")
        });

        if let Err(e) = result {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "Failed to write outcome log"
            );
        }
    }
}

impl OutcomeLog for FileOutcomeLog {
    fn success(&self, person_id: &PersonId, card_number: &str, message: &str) {
        tracing::info!(
            person_id = %person_id,
            card_number = %card_number,
            message = %message,
            "Submission succeeded"
        );
        self.append(&self.success_path(), "SUCCESS", person_id, card_number, message);
    }

    fn error(&self, person_id: &PersonId, card_number: &str, message: &str) {
        tracing::error!(
            person_id = %person_id,
            card_number = %card_number,
            message = %message,
            "Submission failed"
        );
        self.append(&self.error_path(), "ERROR", person_id, card_number, message);
    }

    fn reset(&self) -> Result<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());

        if !self.dir.is_dir() {
            return Ok(());
        }

        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            let is_artifact = path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(is_run_artifact);

            if is_artifact && path.is_file() {
                OpenOptions::new().write(true).truncate(true).open(&path)?;
                tracing::debug!(path = %path.display(), "Cleared log file");
            }
        }
        Ok(())
    }
}

/// Whether a file in the log directory belongs to the previous run
///
/// Rotated integration logs carry a date suffix (`integration.log.2024-06-15`).
fn is_run_artifact(name: &str) -> bool {
    name == SUCCESS_LOG_FILE
        || name == ERROR_LOG_FILE
        || name == INTEGRATION_LOG_FILE
        || name
            .strip_prefix(INTEGRATION_LOG_FILE)
            .is_some_and(|suffix| suffix.starts_with('.'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_success_and_error_channels() {
        let dir = TempDir::new().unwrap();
        let log = FileOutcomeLog::new(dir.path());
        let id = PersonId::new("123");

        log.success(&id, "C1", "beneficiary created");
        log.error(&id, "C2", "no response from API");
        log.error(&id, "C3", "HTTP 400");

        let success = fs::read_to_string(log.success_path()).unwrap();
        let errors = fs::read_to_string(log.error_path()).unwrap();

        assert_eq!(success.lines().count(), 1);
        assert!(success.contains("SUCCESS - person_id=123 card_number=C1 - beneficiary created"));
        assert_eq!(errors.lines().count(), 2);
        assert!(errors.contains("card_number=C3 - HTTP 400"));
    }

    #[test]
    fn test_reset_truncates_previous_run() {
        let dir = TempDir::new().unwrap();
        let log = FileOutcomeLog::new(dir.path());
        let id = PersonId::new("123");

        log.success(&id, "C1", "beneficiary updated");
        fs::write(dir.path().join(INTEGRATION_LOG_FILE), "old run\n").unwrap();

        log.reset().unwrap();

        assert_eq!(fs::read_to_string(log.success_path()).unwrap(), "");
        assert_eq!(
            fs::read_to_string(dir.path().join(INTEGRATION_LOG_FILE)).unwrap(),
            ""
        );
        assert!(!log.error_path().exists());
    }

    #[test]
    fn test_reset_truncates_rotated_integration_log() {
        use std::io::Write as _;
        use tracing_appender::rolling::{RollingFileAppender, Rotation};

        let dir = TempDir::new().unwrap();
        let mut appender =
            RollingFileAppender::new(Rotation::DAILY, dir.path(), INTEGRATION_LOG_FILE);
        writeln!(appender, "{{\"message\":\"previous run\"}}").unwrap();
        appender.flush().unwrap();
        drop(appender);

        let rotated: Vec<PathBuf> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .collect();
        assert_eq!(rotated.len(), 1);
        assert_ne!(rotated[0].file_name().unwrap(), INTEGRATION_LOG_FILE);
        assert!(fs::metadata(&rotated[0]).unwrap().len() > 0);

        FileOutcomeLog::new(dir.path()).reset().unwrap();

        assert_eq!(fs::read_to_string(&rotated[0]).unwrap(), "");
    }

    #[test]
    fn test_reset_leaves_unrelated_files() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("falhas.csv"), "00000000123,C1,ts,\"boom\"\n").unwrap();
        fs::write(dir.path().join("integration.logger"), "keep\n").unwrap();

        FileOutcomeLog::new(dir.path()).reset().unwrap();

        assert!(!fs::read_to_string(dir.path().join("falhas.csv"))
            .unwrap()
            .is_empty());
        assert_eq!(
            fs::read_to_string(dir.path().join("integration.logger")).unwrap(),
            "keep\n"
        );
    }

    #[test]
    fn test_run_artifact_names() {
        assert!(is_run_artifact("integration.log"));
        assert!(is_run_artifact("integration.log.2024-06-15"));
        assert!(is_run_artifact("integration.log.2024-06-15-10"));
        assert!(is_run_artifact("success.log"));
        assert!(is_run_artifact("errors.log"));
        assert!(!is_run_artifact("falhas.csv"));
        assert!(!is_run_artifact("integration.logger"));
    }

    #[test]
    fn test_reset_without_artifacts() {
        let dir = TempDir::new().unwrap();
        let log = FileOutcomeLog::new(dir.path().join("missing"));
        assert!(log.reset().is_ok());
    }
}
