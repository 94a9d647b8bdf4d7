//! Keeps a directory of Markdown posts in sync with dev.to articles.

pub mod app_error;
pub mod cli;
pub mod devto;
pub mod keychain;
pub mod markdown;
pub mod models;
pub mod state;
pub mod syncer;

pub use app_error::{SyncError, SyncResult};
pub use devto::{ApiError, ArticleApi, DevtoClient};
pub use models::{Article, StateRecord};
pub use state::StateStore;
pub use syncer::{SyncReport, Syncer};
