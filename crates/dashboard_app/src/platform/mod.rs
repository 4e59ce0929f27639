mod app;
mod cli;
mod config;
mod effects;
mod logging;
mod ui;
mod watch;

use clap::Parser;
use dashboard_logging::dash_info;

use cli::Cli;
use config::DashboardConfig;

pub fn run_app() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = DashboardConfig::load(&cli.global)?;
    logging::initialize(&config)?;
    dash_info!("sku-dashboard starting: {:?}", cli.command);
    app::run(cli.command, &config)
}
