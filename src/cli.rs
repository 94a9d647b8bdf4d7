use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::app_error::{SyncError, SyncResult};
use crate::devto::DEFAULT_BASE_URL;

#[derive(Debug, Parser)]
#[command(name = "devto-sync")]
#[command(about = "Publish local Markdown posts to dev.to")]
#[command(version)]
pub struct Options {
    /// File containing serialized post metadata
    #[arg(long, value_name = "PATH")]
    pub state: Option<PathBuf>,

    /// Comma-separated list of files to upload
    #[arg(long, alias = "post_files", value_name = "FILES", value_delimiter = ',')]
    pub post_files: Vec<String>,

    /// A directory containing posts to upload
    #[arg(long, alias = "post_dir", value_name = "DIR")]
    pub post_dir: Option<PathBuf>,

    /// dev.to API key (falls back to the OS keychain)
    #[arg(long, env = "DEVTO_API_KEY", hide_env_values = true)]
    pub apikey: Option<String>,

    /// Store the --apikey value in the OS keychain for later runs
    #[arg(long, requires = "apikey")]
    pub save_apikey: bool,

    /// Dump http request and response, for debugging
    #[arg(long)]
    pub debug: bool,

    /// Base URL of the dev.to API
    #[arg(long, value_name = "URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Seconds to wait before each upload in --post-dir mode
    #[arg(long, value_name = "SECONDS", default_value_t = 3)]
    pub delay_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Files(Vec<String>),
    Dir(PathBuf),
    /// Neither flag given: only the state file is rewritten.
    Nothing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub state: Option<PathBuf>,
    pub mode: Mode,
    pub api_key: String,
    pub save_api_key: bool,
    pub debug: bool,
    pub base_url: String,
    pub delay: Duration,
}

impl Options {
    /// Checks flag combinations. `keychain_key` is consulted only when no key
    /// came from the command line or environment.
    pub fn into_config(
        self,
        keychain_key: impl FnOnce() -> SyncResult<Option<String>>,
    ) -> SyncResult<Config> {
        let files: Vec<String> = self
            .post_files
            .into_iter()
            .map(|f| f.trim().to_string())
            .filter(|f| !f.is_empty())
            .collect();

        let mode = match (files.is_empty(), self.post_dir) {
            (false, Some(_)) => {
                return Err(SyncError::Validation(
                    "cannot specify both --post-files and --post-dir".to_string(),
                ))
            }
            (false, None) => Mode::Files(files),
            (true, Some(dir)) => Mode::Dir(dir),
            (true, None) => Mode::Nothing,
        };

        if self.save_apikey && !has_value(self.apikey.as_deref()) {
            return Err(SyncError::Validation(
                "--save-apikey needs a non-empty --apikey".to_string(),
            ));
        }

        let loaded = if has_value(self.apikey.as_deref()) {
            None
        } else {
            keychain_key()?
        };
        let api_key = pick_api_key(self.apikey, loaded)?;

        Ok(Config {
            state: self.state,
            mode,
            api_key,
            save_api_key: self.save_apikey,
            debug: self.debug,
            base_url: self.base_url,
            delay: Duration::from_secs(self.delay_secs),
        })
    }
}

fn has_value(key: Option<&str>) -> bool {
    key.is_some_and(|k| !k.trim().is_empty())
}

fn pick_api_key(given: Option<String>, loaded: Option<String>) -> SyncResult<String> {
    for key in [given, loaded].into_iter().flatten() {
        let trimmed = key.trim();
        if !trimmed.is_empty() {
            return Ok(trimmed.to_string());
        }
    }

    Err(SyncError::Validation("--apikey must be specified".to_string()))
}
