use csdkit::logging;
use csdkit::settings::{self, Settings};

/// Load settings.json, then apply environment and command-line overrides (in that order).
pub(crate) fn load_settings(log_level: Option<String>, display: Option<String>) -> Settings {
    let mut settings = match settings::csdkit_config_dir() {
        Some(dir) => settings::load_settings_from_disk(&dir),
        None => Settings::default(),
    };
    settings.apply_env_overrides();
    settings.apply_overrides(log_level, display);
    settings
}

/// Initialize logging system.
pub(crate) fn init_logging(settings: &Settings) {
    let log_level = settings
        .log_level
        .parse::<logging::LogLevel>()
        .unwrap_or(logging::LogLevel::Warn);

    if let Err(e) = logging::init_logging(log_level, settings.log_to_file) {
        eprintln!("Failed to initialize logging: {}", e);
        return;
    }

    tracing::debug!(
        version = env!("CARGO_PKG_VERSION"),
        log_level = %log_level,
        display = settings.display.as_deref().unwrap_or("$DISPLAY"),
        "csdkit started"
    );

    if settings.log_to_file {
        let deleted = logging::auto_cleanup_old_logs(settings.log_retention_days);
        tracing::debug!(deleted, "Log retention applied");
    }
}
