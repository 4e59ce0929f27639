//! Logger setup for the dashboard binary.
//!
//! Logs go to stderr by default so rendered views on stdout stay clean; a
//! configured `log_file` replaces the terminal logger.

use dashboard_logging::LogTarget;

use super::config::{ConfigError, DashboardConfig};

pub fn initialize(config: &DashboardConfig) -> Result<(), ConfigError> {
    let level = config.level_filter()?;
    dashboard_logging::initialize(log_target(config), level);
    Ok(())
}

fn log_target(config: &DashboardConfig) -> LogTarget {
    match &config.log_file {
        Some(path) => LogTarget::File(path.clone()),
        None => LogTarget::Terminal,
    }
}
