//! Elevated-mode authentication guard.
//!
//! Validates the configured password and applies an escalating lockout on
//! repeated failures. State survives restarts via a small JSON file under
//! the data directory. The router never consults this guard; it belongs to
//! the interactive authentication flow.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GuardError {
    #[error("guard state io failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("guard state serialization failure: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
struct GuardState {
    failures: u32,
    blocked_until: Option<DateTime<Utc>>,
}

pub struct ElevatedGuard {
    password: SecretString,
    state_path: PathBuf,
    state: GuardState,
}

impl ElevatedGuard {
    pub fn open(password: SecretString, state_path: impl AsRef<Path>) -> Result<Self, GuardError> {
        let state_path = state_path.as_ref().to_path_buf();
        let state = if state_path.exists() {
            serde_json::from_str(&fs::read_to_string(&state_path)?).unwrap_or_default()
        } else {
            GuardState::default()
        };
        Ok(Self { password, state_path, state })
    }

    pub fn is_blocked(&self) -> bool {
        self.state.blocked_until.map(|until| Utc::now() < until).unwrap_or(false)
    }

    pub fn blocked_until(&self) -> Option<DateTime<Utc>> {
        self.state.blocked_until.filter(|until| Utc::now() < *until)
    }

    /// Checks one attempt. A correct password resets the failure counter; a
    /// wrong one escalates the lockout. While blocked, every attempt fails,
    /// including correct ones.
    pub fn validate(&mut self, attempt: &str) -> Result<bool, GuardError> {
        if self.is_blocked() {
            return Ok(false);
        }

        if attempt == self.password.expose_secret() {
            self.state = GuardState::default();
            self.persist()?;
            return Ok(true);
        }

        self.state.failures += 1;
        let penalty = penalty_seconds(self.state.failures);
        self.state.blocked_until = Some(Utc::now() + Duration::seconds(penalty));
        tracing::warn!(failures = self.state.failures, penalty, "elevated authentication failed");
        self.persist()?;
        Ok(false)
    }

    fn persist(&self) -> Result<(), GuardError> {
        if let Some(parent) = self.state_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.state_path, serde_json::to_string(&self.state)?)?;
        Ok(())
    }
}

fn penalty_seconds(failures: u32) -> i64 {
    match failures {
        0..=4 => 5,
        5..=6 => 60,
        7..=8 => 3_600,
        _ => 86_400,
    }
}

#[cfg(test)]
mod tests {
    use secrecy::SecretString;
    use tempfile::tempdir;

    use super::{penalty_seconds, ElevatedGuard};

    fn guard(dir: &tempfile::TempDir) -> ElevatedGuard {
        ElevatedGuard::open(
            SecretString::from("sesame".to_string()),
            dir.path().join("elevated_state.json"),
        )
        .unwrap()
    }

    #[test]
    fn correct_password_validates_and_resets() {
        let dir = tempdir().unwrap();
        let mut guard = guard(&dir);
        assert!(guard.validate("sesame").unwrap());
        assert!(!guard.is_blocked());
    }

    #[test]
    fn wrong_password_blocks_even_subsequent_correct_attempts() {
        let dir = tempdir().unwrap();
        let mut guard = guard(&dir);
        assert!(!guard.validate("open up").unwrap());
        assert!(guard.is_blocked());
        // Still inside the 5s window: the right password does not help.
        assert!(!guard.validate("sesame").unwrap());
    }

    #[test]
    fn lockout_state_survives_reopen() {
        let dir = tempdir().unwrap();
        {
            let mut guard = guard(&dir);
            guard.validate("wrong").unwrap();
        }
        let reopened = guard(&dir);
        assert!(reopened.is_blocked());
    }

    #[test]
    fn penalties_escalate_with_failures() {
        assert_eq!(penalty_seconds(1), 5);
        assert_eq!(penalty_seconds(5), 60);
        assert_eq!(penalty_seconds(8), 3_600);
        assert_eq!(penalty_seconds(9), 86_400);
    }
}
