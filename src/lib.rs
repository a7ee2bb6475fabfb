pub mod authorization;
pub mod billing;
pub mod blob;
pub mod clock;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod scheduling;

pub use error::{ClinicError, ErrorDetail, ErrorKind};

use tracing_subscriber::EnvFilter;

/// Install the global fmt subscriber. `RUST_LOG` wins over `fallback_filter`
/// (or `config::default_log_filter()` when none is given). Returns false if
/// a subscriber was already installed.
pub fn init_tracing(fallback_filter: Option<&str>) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(fallback_filter.unwrap_or(config::default_log_filter()))
    });
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .is_ok();
    if installed {
        tracing::info!("{} v{} logging initialized", config::APP_NAME, config::APP_VERSION);
    }
    installed
}
