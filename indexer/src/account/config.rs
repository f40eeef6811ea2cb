//! # Account configuration
//!
//! Module dedicated to the account configuration: the paths and
//! commands the synchronization layer is driven by.

use process::Command;
use serde::{Deserialize, Serialize};
use shellexpand_utils::shellexpand_path;
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};
use tracing::debug;

use crate::backend::PROTOCOL_VERSION;

use super::{Error, Result};

/// The account configuration.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct AccountConfig {
    /// The path to the indexer backend binary.
    ///
    /// Path is shell-expanded, which means environment variables and
    /// tilde `~` are replaced by their values.
    pub backend_binary: PathBuf,

    /// The path to the root Maildir directory the backend indexes.
    ///
    /// The path should point to the directory containing the `cur`,
    /// `new` and `tmp` subfolders. Path is shell-expanded.
    #[serde(alias = "store-path")]
    pub maildir_path: PathBuf,

    /// Folders that must exist under the mail store root.
    ///
    /// Relative subpaths, ensured (created when missing) before a
    /// session starts.
    #[serde(default)]
    pub folders: Vec<PathBuf>,

    /// The shell command used to fetch new mail into the store.
    ///
    /// Executed verbatim, no arguments are appended by this layer.
    pub retrieve_cmd: Option<Command>,

    /// Seconds between two automatic update cycles.
    ///
    /// Omitted or zero disables scheduling, in which case mail is only
    /// retrieved on demand.
    pub update_interval: Option<u64>,

    /// Seconds to wait for the backend handshake reply.
    ///
    /// Omitted or zero waits forever.
    pub handshake_timeout: Option<u64>,

    /// Override the protocol version expected from the backend.
    ///
    /// Defaults to [`PROTOCOL_VERSION`].
    pub protocol_version: Option<String>,
}

impl AccountConfig {
    /// Get the shell-expanded path to the backend binary.
    pub fn get_backend_binary(&self) -> PathBuf {
        shellexpand_path(&self.backend_binary)
    }

    /// Get the shell-expanded path to the mail store root.
    pub fn get_maildir_path(&self) -> PathBuf {
        shellexpand_path(&self.maildir_path)
    }

    /// Find the mail retrieval command reference.
    pub fn find_retrieve_cmd(&self) -> Option<&Command> {
        self.retrieve_cmd.as_ref()
    }

    /// Get the mail retrieval command reference, or the configuration
    /// error when none is defined.
    pub fn get_retrieve_cmd(&self) -> Result<&Command> {
        self.retrieve_cmd
            .as_ref()
            .ok_or(Error::GetRetrieveCmdMissingError)
    }

    /// Find the update interval. Zero means disabled, like absent.
    pub fn find_update_interval(&self) -> Option<Duration> {
        self.update_interval
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    /// Find the handshake timeout. Zero means wait forever, like absent.
    pub fn find_handshake_timeout(&self) -> Option<Duration> {
        self.handshake_timeout
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    /// Get the expected backend protocol version.
    pub fn get_protocol_version(&self) -> &str {
        self.protocol_version.as_deref().unwrap_or(PROTOCOL_VERSION)
    }

    /// Validate the configuration.
    ///
    /// Runs synchronously before any asynchronous work begins: a
    /// failure here leaves no partial session behind.
    pub fn check_up(&self) -> Result<()> {
        let binary = self.get_backend_binary();
        if !binary.is_file() {
            return Err(Error::GetBackendBinaryNotFoundError(binary));
        }

        let store = self.get_maildir_path();
        for sub in ["cur", "new", "tmp"] {
            if !store.join(sub).is_dir() {
                return Err(Error::GetMaildirInvalidError(store));
            }
        }

        for folder in &self.folders {
            let path = store.join(folder);
            if !ensure_folder_exists(&path) {
                return Err(Error::EnsureFolderError(path));
            }
        }

        if let Some(interval) = self.find_update_interval() {
            if self.retrieve_cmd.is_none() {
                return Err(Error::ScheduleWithoutRetrieveCmdError(interval.as_secs()));
            }
        }

        Ok(())
    }
}

/// Make sure the given mail folder exists, creating all necessary
/// directories when missing.
pub fn ensure_folder_exists(path: &Path) -> bool {
    if path.is_dir() {
        return true;
    }

    debug!(path = %path.display(), "creating missing mail folder");
    fs::create_dir_all(path).is_ok()
}

#[cfg(test)]
mod tests {
    use std::fs::{self, File};

    use super::*;

    fn valid_config(dir: &Path) -> AccountConfig {
        let binary = dir.join("backend");
        File::create(&binary).unwrap();

        let store = dir.join("Mail");
        for sub in ["cur", "new", "tmp"] {
            fs::create_dir_all(store.join(sub)).unwrap();
        }

        AccountConfig {
            backend_binary: binary,
            maildir_path: store,
            ..Default::default()
        }
    }

    #[test]
    fn check_up_valid_config() {
        let dir = tempfile::tempdir().unwrap();
        valid_config(dir.path()).check_up().unwrap();
    }

    #[test]
    fn check_up_missing_binary() {
        let dir = tempfile::tempdir().unwrap();
        let config = AccountConfig {
            backend_binary: dir.path().join("nope"),
            ..valid_config(dir.path())
        };

        assert!(matches!(
            config.check_up().unwrap_err(),
            Error::GetBackendBinaryNotFoundError(_),
        ));
    }

    #[test]
    fn check_up_invalid_store() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = valid_config(dir.path());
        fs::remove_dir(config.maildir_path.join("tmp")).unwrap();

        assert!(matches!(
            config.check_up().unwrap_err(),
            Error::GetMaildirInvalidError(_),
        ));

        config.maildir_path = dir.path().join("missing");
        assert!(config.check_up().is_err());
    }

    #[test]
    fn check_up_creates_missing_folders() {
        let dir = tempfile::tempdir().unwrap();
        let config = AccountConfig {
            folders: vec!["drafts".into(), "sent".into()],
            ..valid_config(dir.path())
        };

        config.check_up().unwrap();

        assert!(config.maildir_path.join("drafts").is_dir());
        assert!(config.maildir_path.join("sent").is_dir());
    }

    #[test]
    fn check_up_interval_needs_retrieve_cmd() {
        let dir = tempfile::tempdir().unwrap();
        let config = AccountConfig {
            update_interval: Some(60),
            ..valid_config(dir.path())
        };

        assert!(matches!(
            config.check_up().unwrap_err(),
            Error::ScheduleWithoutRetrieveCmdError(60),
        ));

        let config = AccountConfig {
            update_interval: Some(60),
            retrieve_cmd: Some("mbsync -a".to_string().into()),
            ..valid_config(dir.path())
        };

        config.check_up().unwrap();
    }
}
