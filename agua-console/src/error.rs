//! Console error type.

use thiserror::Error;

use crate::settings::SettingsError;

#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error(transparent)]
    Api(#[from] agua_lib::Error),

    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error(transparent)]
    Form(#[from] agua_views::form::FormError),

    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("no data directory available for settings")]
    NoDataDir,
}
