//! Pushes local Markdown posts to dev.to and keeps the state store current.

use std::fs;
use std::path::Path;
use std::thread;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use log::{Level, Log, Record};
use sha2::{Digest, Sha256};

use crate::app_error::{SyncError, SyncResult};
use crate::devto::ArticleApi;
use crate::markdown;
use crate::models::Article;
use crate::state::StateStore;

/// Pause before each upload in directory mode; dev.to throttles bursts.
pub const DEFAULT_DELAY: Duration = Duration::from_secs(3);

#[derive(Debug)]
pub struct SyncedFile {
    pub file: String,
    pub article: Article,
}

#[derive(Debug)]
pub struct FailedFile {
    pub file: String,
    pub error: SyncError,
}

#[derive(Debug, Default)]
pub struct SyncReport {
    pub synced: Vec<SyncedFile>,
    pub failed: Vec<FailedFile>,
}

impl SyncReport {
    /// Failures other than skip and no-change outcomes.
    pub fn errors(&self) -> impl Iterator<Item = &FailedFile> + '_ {
        self.failed.iter().filter(|f| !f.error.is_expected())
    }
}

pub struct Syncer<A> {
    api: A,
    state: StateStore,
    delay: Duration,
}

impl<A: ArticleApi> Syncer<A> {
    pub fn new(api: A, state: StateStore) -> Self {
        Self {
            api,
            state,
            delay: DEFAULT_DELAY,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn state(&self) -> &StateStore {
        &self.state
    }

    pub fn into_state(self) -> StateStore {
        self.state
    }

    /// Uploads `base/file` if its content changed since the last successful
    /// sync. The state key is `file` as given.
    pub fn sync_file(&mut self, base: &Path, file: &str) -> SyncResult<Article> {
        let full_path = base.join(file);
        let body = fs::read_to_string(&full_path).map_err(|e| SyncError::io(&full_path, e))?;

        let mut record = self.state.get(file).cloned().unwrap_or_default();
        if record.is_skipped() {
            return Err(SyncError::Skipped(file.to_string()));
        }

        let checksum = checksum(&body);
        if record.checksum == checksum {
            return Err(SyncError::NoChange(file.to_string()));
        }

        let article = Article::from_body(record.id.max(0), body);
        match self.api.upsert_article(&article) {
            Ok(updated) => {
                record.id = updated.id;
                record.checksum = checksum;
                self.state.set(file, record);
                Ok(updated)
            }
            Err(source) => {
                record.skip = true;
                self.state.set(file, record);
                Err(SyncError::Upstream {
                    path: file.to_string(),
                    source,
                })
            }
        }
    }

    /// Explicit-list mode: every path is resolved against `base`.
    pub fn sync_files<S: AsRef<str>>(&mut self, base: &Path, files: &[S], logger: &dyn Log) -> SyncReport {
        let mut report = SyncReport::default();
        for file in files {
            let file = file.as_ref();
            let result = self.sync_file(base, file);
            record_outcome(&mut report, file, result, logger);
        }
        report
    }

    /// Syncs every regular file directly inside `dir`, in name order, pausing
    /// before each one.
    pub fn sync_dir(&mut self, dir: &Path, logger: &dyn Log) -> SyncReport {
        let mut report = SyncReport::default();
        let files = match list_files(dir, logger) {
            Ok(files) => files,
            Err(error) => {
                emit(logger, Level::Error, &dir.display().to_string(), &error.to_string());
                report.failed.push(FailedFile {
                    file: dir.display().to_string(),
                    error,
                });
                return report;
            }
        };

        for file in files {
            thread::sleep(self.delay);
            let result = self.sync_file(dir, &file);
            record_outcome(&mut report, &file, result, logger);
        }
        report
    }
}

fn list_files(dir: &Path, logger: &dyn Log) -> SyncResult<Vec<String>> {
    let entries = fs::read_dir(dir).map_err(|e| SyncError::io(dir, e))?;
    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| SyncError::io(dir, e))?;
        let name = entry.file_name().to_string_lossy().to_string();
        // Follows symlinks, so a link to a post is synced like the post.
        if !entry.path().is_file() {
            emit(logger, Level::Debug, &name, "not a regular file, ignoring");
            continue;
        }
        files.push(name);
    }
    files.sort();
    Ok(files)
}

fn record_outcome(report: &mut SyncReport, file: &str, result: SyncResult<Article>, logger: &dyn Log) {
    match result {
        Ok(article) => {
            let front_matter = markdown::front_matter(&article.body_markdown);
            let title = front_matter.title.unwrap_or_else(|| article.title.clone());
            let published = front_matter.published.unwrap_or(article.published);
            emit(
                logger,
                Level::Info,
                file,
                &format!("Success. id={} title={title:?} published={published}", article.id),
            );
            report.synced.push(SyncedFile {
                file: file.to_string(),
                article,
            });
        }
        Err(error) => {
            let level = if error.is_expected() { Level::Info } else { Level::Error };
            emit(logger, level, file, &error.to_string());
            report.failed.push(FailedFile {
                file: file.to_string(),
                error,
            });
        }
    }
}

fn emit(logger: &dyn Log, level: Level, file: &str, message: &str) {
    logger.log(
        &Record::builder()
            .args(format_args!("[{file}] {message}"))
            .level(level)
            .target(module_path!())
            .build(),
    );
}

/// Base64 SHA-256 of a post body.
pub fn checksum(body: &str) -> String {
    STANDARD.encode(Sha256::digest(body.as_bytes()))
}
