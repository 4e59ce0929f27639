//! Line commands accepted by `sku-dashboard watch`.

use clap::ValueEnum;
use dashboard_core::{DetailTab, Msg, StatusFilter};

use super::cli::TabArg;

pub const HELP: &str = "commands: status <filter> | search <text> | refresh | open <sku> | row <n> | \
tab <attributes|custom|images|websites> | toggle <n> | all-images | preview <url> | close-preview | \
close | stats | expand <category> | workflows | help | quit";

#[derive(Debug, Clone, PartialEq)]
pub enum WatchCommand {
    Send(Msg),
    /// Open the drawer for the row whose SKU matches.
    Open(String),
    Help,
    Quit,
}

/// Parses one input line; blank lines yield `Ok(None)`.
pub fn parse_line(line: &str) -> Result<Option<WatchCommand>, String> {
    let line = line.trim_end_matches(['\r', '\n']);
    let trimmed = line.trim_start();
    if trimmed.trim().is_empty() {
        return Ok(None);
    }
    let (verb, rest) = match trimmed.split_once(' ') {
        Some((verb, rest)) => (verb, rest),
        None => (trimmed, ""),
    };
    let arg = rest.trim();

    let command = match verb.to_ascii_lowercase().as_str() {
        "status" => {
            let filter: StatusFilter = arg.parse().map_err(|err| format!("{err}"))?;
            WatchCommand::Send(Msg::StatusFilterChanged(filter))
        }
        // The search text is kept raw; the controller trims it for the query.
        "search" => WatchCommand::Send(Msg::SkuSearchChanged(rest.to_string())),
        "refresh" | "retry" => WatchCommand::Send(Msg::RefreshClicked),
        "open" => WatchCommand::Open(required(arg, "open needs a SKU")?.to_string()),
        "row" => WatchCommand::Send(Msg::RecordSelected(index(arg)?)),
        "tab" => {
            let tab = TabArg::from_str(arg, true).map_err(|_| format!("unknown tab {arg:?}"))?;
            WatchCommand::Send(Msg::TabSelected(DetailTab::from(tab)))
        }
        "toggle" => WatchCommand::Send(Msg::SearchResultToggled(index(arg)?)),
        "all-images" => WatchCommand::Send(Msg::ShowAllImagesToggled),
        "preview" => WatchCommand::Send(Msg::ImagePreviewOpened(
            required(arg, "preview needs a URL")?.to_string(),
        )),
        "close-preview" => WatchCommand::Send(Msg::ImagePreviewClosed),
        "close" => WatchCommand::Send(Msg::DrawerClosed),
        "stats" => WatchCommand::Send(Msg::StatsRequested),
        "expand" => WatchCommand::Send(Msg::CategoryToggled(
            required(arg, "expand needs a category")?.to_string(),
        )),
        "workflows" => WatchCommand::Send(Msg::WorkflowsRequested),
        "help" | "?" => WatchCommand::Help,
        "quit" | "exit" | "q" => WatchCommand::Quit,
        other => return Err(format!("unknown command {other:?}; {HELP}")),
    };
    Ok(Some(command))
}

fn required<'a>(arg: &'a str, message: &str) -> Result<&'a str, String> {
    if arg.is_empty() {
        Err(message.to_string())
    } else {
        Ok(arg)
    }
}

fn index(arg: &str) -> Result<usize, String> {
    arg.parse()
        .map_err(|_| format!("expected a row number, got {arg:?}"))
}
