//! [`ModemBackend`] implementation driving the `gammu` command line tool.
//!
//! Gammu keeps no connection between invocations, so "connecting" means
//! getting a successful `identify` answer from the configured phone, and
//! "disconnecting" only drops that state. Every child process is killed if
//! its future is dropped, which is what makes the session's connect timeout
//! effective.

mod parse;
pub mod rc;

use std::path::PathBuf;

use async_trait::async_trait;
use gsmloc_core::RawNetworkInfo;
use tokio::process::Command;

use crate::backend::ModemBackend;
use crate::error::BackendError;

use self::rc::GammuRc;

pub struct GammuCli {
    bin: String,
    explicit_config: Option<PathBuf>,
    search_paths: Vec<PathBuf>,
    config_path: Option<PathBuf>,
    profile_index: Option<u32>,
    connected: bool,
}

impl GammuCli {
    /// Creates a backend running `bin`. When `config` is `None` the standard
    /// gammu configuration locations are searched.
    #[must_use]
    pub fn new(bin: impl Into<String>, config: Option<PathBuf>) -> Self {
        Self::with_search_paths(bin, config, rc::default_search_paths())
    }

    /// Like [`GammuCli::new`] with an explicit search list.
    #[must_use]
    pub fn with_search_paths(
        bin: impl Into<String>,
        config: Option<PathBuf>,
        search_paths: Vec<PathBuf>,
    ) -> Self {
        Self {
            bin: bin.into(),
            explicit_config: config,
            search_paths,
            config_path: None,
            profile_index: None,
            connected: false,
        }
    }

    /// The configuration file picked by the last `find_config` call.
    #[must_use]
    pub fn config_path(&self) -> Option<&PathBuf> {
        self.config_path.as_ref()
    }

    async fn run(&self, subcommand: &str) -> Result<String, BackendError> {
        let (Some(path), Some(profile)) = (&self.config_path, self.profile_index) else {
            return Err(BackendError::NotConfigured);
        };
        let config = path.to_string_lossy();
        let section = profile.to_string();
        run_cmd(
            &self.bin,
            &["-c", config.as_ref(), "-s", section.as_str(), subcommand],
        )
        .await
    }
}

#[async_trait]
impl ModemBackend for GammuCli {
    async fn find_config(&mut self) -> Result<(), BackendError> {
        self.config_path = None;
        self.profile_index = None;
        self.connected = false;

        let candidates = match &self.explicit_config {
            Some(path) => vec![path.clone()],
            None => self.search_paths.clone(),
        };

        for candidate in &candidates {
            if tokio::fs::metadata(candidate)
                .await
                .is_ok_and(|m| m.is_file())
            {
                tracing::debug!(path = %candidate.display(), "using gammu configuration");
                self.config_path = Some(candidate.clone());
                return Ok(());
            }
        }

        let searched = candidates
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        Err(BackendError::NoConfig { searched })
    }

    async fn read_config(&mut self, profile_index: u32) -> Result<(), BackendError> {
        let path = self.config_path.clone().ok_or(BackendError::NotConfigured)?;
        let text = tokio::fs::read_to_string(&path).await?;
        let rc = GammuRc::parse(&text);

        let section = rc::section_name(profile_index);
        if rc.section(&section).is_none() {
            return Err(BackendError::InvalidConfig {
                path,
                reason: format!("no [{section}] section"),
            });
        }
        let Some(device) = rc.device(profile_index) else {
            return Err(BackendError::InvalidConfig {
                path,
                reason: format!("[{section}] does not name a device"),
            });
        };

        tracing::debug!(section = %section, device = %device, "loaded gammu profile");
        self.profile_index = Some(profile_index);
        Ok(())
    }

    async fn connect(&mut self, retries: u32) -> Result<(), BackendError> {
        let attempts = retries.max(1);
        let mut last_err = BackendError::NotConnected;

        for attempt in 1..=attempts {
            match self.run("identify").await {
                Ok(_) => {
                    self.connected = true;
                    return Ok(());
                }
                Err(BackendError::NotConfigured) => return Err(BackendError::NotConfigured),
                Err(e) => {
                    tracing::debug!(attempt, attempts, error = %e, "gammu identify failed");
                    last_err = e;
                }
            }
        }

        Err(last_err)
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    async fn network_info(&mut self) -> Result<RawNetworkInfo, BackendError> {
        if !self.connected {
            return Err(BackendError::NotConnected);
        }
        let output = self.run("networkinfo").await?;
        parse::parse_network_info(&output)
    }

    async fn disconnect(&mut self) -> Result<(), BackendError> {
        self.connected = false;
        Ok(())
    }
}

/// Runs `cmd` to completion and returns its trimmed stdout.
async fn run_cmd(cmd: &str, args: &[&str]) -> Result<String, BackendError> {
    let output = Command::new(cmd)
        .args(args)
        .kill_on_drop(true)
        .output()
        .await?;

    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        Err(BackendError::CommandFailed {
            command: format!("{cmd} {}", args.join(" ")),
            stderr,
        })
    }
}

#[cfg(test)]
#[path = "gammu_test.rs"]
mod tests;
