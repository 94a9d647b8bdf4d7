use std::path::Path;

use clap::Parser;
use devto_sync::cli::{Config, Mode, Options};
use devto_sync::{keychain, DevtoClient, StateStore, SyncResult, SyncReport, Syncer};
use log::LevelFilter;

fn main() {
    let options = Options::parse();
    init_logger(options.debug);

    if let Err(e) = run(options) {
        log::error!("[{}] {e}", e.code());
        std::process::exit(1);
    }
}

fn init_logger(debug: bool) {
    let default_level = if debug { LevelFilter::Debug } else { LevelFilter::Info };
    env_logger::Builder::new()
        .filter_level(default_level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

fn run(options: Options) -> SyncResult<()> {
    let config = options.into_config(keychain::load_api_key)?;
    if config.save_api_key {
        keychain::save_api_key(&config.api_key)?;
        log::info!("API key saved to the keychain");
    }

    let state = match &config.state {
        Some(path) => StateStore::load_file(path)?,
        None => StateStore::new(),
    };
    log::debug!("loaded {} state records", state.len());

    let mut client = DevtoClient::new(&config.base_url, &config.api_key)?;
    if config.debug {
        client.set_debug_logger(log::logger());
    }
    let mut syncer = Syncer::new(client, state).with_delay(config.delay);

    let report = match &config.mode {
        Mode::Files(files) => Some(syncer.sync_files(Path::new("."), files, log::logger())),
        Mode::Dir(dir) => Some(syncer.sync_dir(dir, log::logger())),
        Mode::Nothing => None,
    };
    if let Some(report) = &report {
        summarize(report);
    }

    persist(&config, &syncer.into_state());
    Ok(())
}

fn summarize(report: &SyncReport) {
    log::info!(
        "{} synced, {} unchanged or skipped, {} failed",
        report.synced.len(),
        report.failed.len() - report.errors().count(),
        report.errors().count()
    );
}

fn persist(config: &Config, state: &StateStore) {
    let Some(path) = &config.state else {
        log::info!("no --state given, not saving sync state");
        return;
    };
    if let Err(e) = state.persist(path) {
        eprintln!("Failed to dump state: {e}");
    }
}
