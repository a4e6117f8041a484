mod commands;
mod config;
mod console;
mod error;
mod paths;
mod settings;

use std::fs::{self, File};
use std::sync::Arc;

use agua_lib::AguaClient;
use agua_lib::session::Session;
use simplelog::{Config, LevelFilter, WriteLogger};

use crate::console::Console;
use crate::error::ConsoleError;
use crate::settings::{SettingsProvider, SqliteBackend};

#[tokio::main]
async fn main() {
    init_logging();

    if let Err(e) = run().await {
        log::error!("Console exited with error: {}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Logs to `<cache dir>/latest.log`, archiving the previous run's log.
fn init_logging() {
    paths::rotate_logs();
    let Some(path) = paths::log_file() else {
        return;
    };
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    match File::create(&path) {
        Ok(file) => {
            let _ = WriteLogger::init(LevelFilter::Debug, Config::default(), file);
        }
        Err(e) => eprintln!("No se pudo crear el log {}: {}", path.display(), e),
    }
}

async fn run() -> Result<(), ConsoleError> {
    let config = config::Config::load();

    let db = paths::settings_db().ok_or(ConsoleError::NoDataDir)?;
    let settings = SettingsProvider::new(SqliteBackend::open(&db).await?);
    let session = Session::restore(Arc::new(settings.clone())).await?;

    let mut builder = AguaClient::builder().url(config.api_url.as_str()).session(session);
    if let Some(timeout) = config.timeout {
        builder = builder.timeout(timeout);
    }
    let client = builder.build()?;
    log::info!("Using billing API at {}", client.base_url());

    Console::new(client, settings).await?.run().await
}
