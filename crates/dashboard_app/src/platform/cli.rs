use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use dashboard_core::{DetailTab, StatusFilter};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "sku-dashboard",
    version,
    about = "Read-only dashboard over scraped SKU records",
    long_about = "Browse SKU records served by the automation webhook, drill into one record, and follow scraping progress per category.\n\nExamples:\n  sku-dashboard list --status no_result\n  sku-dashboard show ABC-123 --tab images --probe-images\n  sku-dashboard stats --expand-all\n  sku-dashboard watch"
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    #[arg(
        short = 'C',
        long,
        global = true,
        value_name = "FILE",
        help_heading = "Configuration",
        help = "RON config file (defaults to ./sku_dashboard.ron when present)."
    )]
    pub config: Option<PathBuf>,

    #[arg(
        long,
        global = true,
        value_name = "URL",
        help_heading = "Configuration",
        help = "SKU list endpoint."
    )]
    pub sku_url: Option<String>,

    #[arg(
        long,
        global = true,
        value_name = "URL",
        help_heading = "Configuration",
        help = "Category stats endpoint."
    )]
    pub stats_url: Option<String>,

    #[arg(
        long,
        global = true,
        value_name = "URL",
        help_heading = "Configuration",
        help = "Workflow stats endpoint."
    )]
    pub workflows_url: Option<String>,

    #[arg(
        long,
        global = true,
        value_name = "LEVEL",
        help_heading = "Output",
        help = "Log level: off, error, warn, info, debug, trace."
    )]
    pub log_level: Option<String>,

    #[arg(
        long,
        global = true,
        value_name = "FILE",
        help_heading = "Output",
        help = "Write logs to this file instead of stderr."
    )]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Load the SKU list once and print it.
    List {
        #[arg(long, value_name = "STATUS", help = "scraping_done, category_not_match, no_result, firecrawl_scrapper_error, or all.")]
        status: Option<StatusFilter>,
        #[arg(long, value_name = "TEXT")]
        sku: Option<String>,
    },
    /// Print the detail drawer of one SKU.
    Show {
        sku: String,
        #[arg(long, value_enum, default_value_t = TabArg::Attributes)]
        tab: TabArg,
        #[arg(long, value_name = "N", help = "Expand scraped website N (0-based).")]
        open: Option<usize>,
        #[arg(long, help = "Wait for image dimensions before printing.")]
        probe_images: bool,
    },
    /// Print scraping progress per category.
    Stats {
        #[arg(long = "expand", value_name = "CATEGORY")]
        expand: Vec<String>,
        #[arg(long, conflicts_with = "expand")]
        expand_all: bool,
    },
    /// Print the workflow list.
    Workflows,
    /// Interactive session driven by commands on stdin.
    Watch,
}

impl Command {
    /// True for commands that mount the SKU list view.
    pub fn loads_sku_list(&self) -> bool {
        matches!(
            self,
            Command::List { .. } | Command::Show { .. } | Command::Watch
        )
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabArg {
    Attributes,
    Custom,
    Images,
    Websites,
}

impl From<TabArg> for DetailTab {
    fn from(tab: TabArg) -> Self {
        match tab {
            TabArg::Attributes => DetailTab::Attributes,
            TabArg::Custom => DetailTab::CustomAttributes,
            TabArg::Images => DetailTab::Images,
            TabArg::Websites => DetailTab::ScrapedWebsites,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_list_with_filters_and_global_flags() {
        let cli = Cli::try_parse_from([
            "sku-dashboard",
            "list",
            "--status",
            "no_result",
            "--sku",
            "ab",
            "--sku-url",
            "http://hooks.local/skus",
        ])
        .unwrap();
        assert_eq!(cli.global.sku_url.as_deref(), Some("http://hooks.local/skus"));
        match cli.command {
            Command::List { status, sku } => {
                assert_eq!(status, Some(StatusFilter::NoResult));
                assert_eq!(sku.as_deref(), Some("ab"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn only_list_views_need_the_sku_endpoint() {
        let needs = |args: &[&str]| {
            Cli::try_parse_from(args).unwrap().command.loads_sku_list()
        };
        assert!(needs(&["sku-dashboard", "list"]));
        assert!(needs(&["sku-dashboard", "show", "A"]));
        assert!(needs(&["sku-dashboard", "watch"]));
        assert!(!needs(&["sku-dashboard", "stats"]));
        assert!(!needs(&["sku-dashboard", "workflows"]));
    }

    #[test]
    fn rejects_unknown_status() {
        assert!(Cli::try_parse_from(["sku-dashboard", "list", "--status", "weird"]).is_err());
    }

    #[test]
    fn show_defaults_to_attributes_tab() {
        let cli = Cli::try_parse_from(["sku-dashboard", "show", "ABC"]).unwrap();
        match cli.command {
            Command::Show {
                sku,
                tab,
                open,
                probe_images,
            } => {
                assert_eq!(sku, "ABC");
                assert_eq!(DetailTab::from(tab), DetailTab::Attributes);
                assert_eq!(open, None);
                assert!(!probe_images);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn stats_collects_repeated_expand() {
        let cli =
            Cli::try_parse_from(["sku-dashboard", "stats", "--expand", "Shoes", "--expand", "Hats"])
                .unwrap();
        match cli.command {
            Command::Stats { expand, expand_all } => {
                assert_eq!(expand, vec!["Shoes", "Hats"]);
                assert!(!expand_all);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
