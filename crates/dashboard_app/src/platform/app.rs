use std::io::{self, BufRead, Write};
use std::sync::mpsc::{self, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{anyhow, bail, Context};
use dashboard_core::{
    update, AppState, ControllerPhase, DetailTab, Effect, Msg, SkuRowView, StatusFilter,
};
use dashboard_logging::{dash_info, dash_warn};

use super::cli::{Command, TabArg};
use super::config::DashboardConfig;
use super::effects::EffectRunner;
use super::ui::render;
use super::watch::{self, WatchCommand};

/// Engine poll interval while waiting for input or completions.
const POLL: Duration = Duration::from_millis(50);

pub fn run(command: Command, config: &DashboardConfig) -> anyhow::Result<()> {
    if command.loads_sku_list() {
        config.require_sku_url()?;
    }
    let mut session = Session::new(config)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let result = match command {
        Command::List { status, sku } => list(&mut session, status, sku, &mut out),
        Command::Show {
            sku,
            tab,
            open,
            probe_images,
        } => show(&mut session, &sku, tab, open, probe_images, &mut out),
        Command::Stats { expand, expand_all } => stats(&mut session, expand, expand_all, &mut out),
        Command::Workflows => workflows(&mut session, config, &mut out),
        Command::Watch => watch_loop(&mut session, config, &mut out),
    };
    session.close();
    result
}

struct Session {
    state: AppState,
    runner: EffectRunner,
    wait: Duration,
    /// When false, image probe effects are dropped instead of downloading.
    probe_images: bool,
}

impl Session {
    fn new(config: &DashboardConfig) -> anyhow::Result<Self> {
        let settings = config.client_settings();
        Ok(Self {
            state: AppState::new(),
            runner: EffectRunner::new(config)?,
            wait: settings.connect_timeout + settings.request_timeout + Duration::from_secs(5),
            probe_images: true,
        })
    }

    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        self.runner.enqueue(retain_probes(effects, self.probe_images));
    }

    /// Feeds engine events into the state until `done` holds.
    fn wait_until(&mut self, what: &str, done: impl Fn(&AppState) -> bool) -> anyhow::Result<()> {
        let deadline = Instant::now() + self.wait;
        while !done(&self.state) {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                bail!("timed out waiting for {what}");
            }
            if let Some(msg) = self.runner.next_msg(remaining.min(POLL)) {
                self.dispatch(msg);
            }
        }
        Ok(())
    }

    fn close(&mut self) {
        self.dispatch(Msg::Unmounted);
        self.runner.shutdown();
    }
}

fn list(
    session: &mut Session,
    status: Option<StatusFilter>,
    sku: Option<String>,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    // Edits before mount only seed the first load.
    if let Some(status) = status {
        session.dispatch(Msg::StatusFilterChanged(status));
    }
    if let Some(sku) = sku {
        session.dispatch(Msg::SkuSearchChanged(sku));
    }
    session.dispatch(Msg::Mounted);
    session.wait_until("the SKU list", |state| !state.skus().is_loading())?;

    write!(out, "{}", render::render_list(&session.state.view()))?;
    match session.state.skus().error() {
        Some(error) => bail!("SKU list failed to load: {error}"),
        None => Ok(()),
    }
}

fn show(
    session: &mut Session,
    sku: &str,
    tab: TabArg,
    open: Option<usize>,
    probe_images: bool,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    session.probe_images = probe_images;
    session.dispatch(Msg::SkuSearchChanged(sku.to_string()));
    session.dispatch(Msg::Mounted);
    session.wait_until("the SKU list", |state| !state.skus().is_loading())?;
    if let Some(error) = session.state.skus().error() {
        bail!("SKU list failed to load: {error}");
    }

    let view = session.state.view();
    let index = find_row(&view.list.rows, sku).ok_or_else(|| anyhow!("no SKU matching {sku:?}"))?;
    session.dispatch(Msg::RecordSelected(index));

    let tab = DetailTab::from(tab);
    session.dispatch(Msg::TabSelected(tab));
    if tab == DetailTab::Images && session.probe_images && has_images(&session.state) {
        session.wait_until("image probes", |state| {
            state
                .detail()
                .is_some_and(|detail| detail.gallery().has_probe_results())
        })?;
    }
    if let Some(result) = open {
        session.dispatch(Msg::SearchResultToggled(result));
    }

    let detail = session
        .state
        .view()
        .detail
        .context("detail drawer did not open")?;
    write!(out, "{}", render::render_detail(&detail))?;
    if let Some(url) = session.state.view().preview {
        write!(out, "{}", render::render_preview(&url))?;
    }
    Ok(())
}

fn stats(
    session: &mut Session,
    expand: Vec<String>,
    expand_all: bool,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    session.dispatch(Msg::StatsRequested);
    session.wait_until("stats", |state| !state.stats().is_loading())?;

    let categories: Vec<String> = if expand_all {
        session
            .state
            .stats()
            .data()
            .categories()
            .iter()
            .map(|category| category.category.clone())
            .collect()
    } else {
        expand
    };
    for category in categories {
        session.dispatch(Msg::CategoryToggled(category));
    }

    write!(out, "{}", render::render_stats(&session.state.view().stats))?;
    match session.state.stats().error() {
        Some(error) => bail!("stats failed to load: {error}"),
        None => Ok(()),
    }
}

fn workflows(
    session: &mut Session,
    config: &DashboardConfig,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    session.dispatch(Msg::WorkflowsRequested);
    session.wait_until("workflows", |state| !state.workflows().is_loading())?;

    let link = |id: &str| config.workflow_link(id);
    write!(
        out,
        "{}",
        render::render_workflows(&session.state.view().workflows, &link)
    )?;
    match session.state.workflows().error() {
        Some(error) => bail!("workflows failed to load: {error}"),
        None => Ok(()),
    }
}

fn watch_loop(
    session: &mut Session,
    config: &DashboardConfig,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let lines = spawn_stdin_reader();
    let link = |id: &str| config.workflow_link(id);
    let mut input_closed = false;

    writeln!(out, "{}", watch::HELP)?;
    session.dispatch(Msg::Mounted);

    loop {
        match lines.try_recv() {
            Ok(line) => match watch::parse_line(&line) {
                Ok(Some(WatchCommand::Quit)) => break,
                Ok(Some(WatchCommand::Help)) => writeln!(out, "{}", watch::HELP)?,
                Ok(Some(WatchCommand::Send(msg))) => session.dispatch(msg),
                Ok(Some(WatchCommand::Open(sku))) => {
                    match find_row(&session.state.view().list.rows, &sku) {
                        Some(index) => session.dispatch(Msg::RecordSelected(index)),
                        None => writeln!(out, "no SKU matching {sku:?} in the current list")?,
                    }
                }
                Ok(None) => {}
                Err(message) => writeln!(out, "{message}")?,
            },
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => input_closed = true,
        }

        if let Some(msg) = session.runner.next_msg(POLL) {
            session.dispatch(msg);
        }

        if session.state.consume_dirty() {
            writeln!(out, "\n{}", "=".repeat(40))?;
            write!(out, "{}", render::render_dashboard(&session.state.view(), &link))?;
            out.flush()?;
        }

        // Piped input: stay until the last requested work has settled.
        if input_closed && is_settled(&session.state) {
            dash_info!("input closed and nothing pending; leaving watch mode");
            break;
        }
    }
    Ok(())
}

fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(line) => {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Err(err) => {
                    dash_warn!("stdin read failed: {err}");
                    break;
                }
            }
        }
    });
    rx
}

fn is_settled(state: &AppState) -> bool {
    state.controller_phase() == ControllerPhase::Idle
        && !state.stats().is_loading()
        && !state.workflows().is_loading()
}

fn has_images(state: &AppState) -> bool {
    state.detail().is_some_and(|detail| {
        !detail.record().image_urls.is_empty() || !detail.record().image_urls_raw.is_empty()
    })
}

fn retain_probes(mut effects: Vec<Effect>, probe_images: bool) -> Vec<Effect> {
    if !probe_images {
        effects.retain(|effect| !matches!(effect, Effect::ProbeImages { .. }));
    }
    effects
}

/// Exact SKU match, ignoring ASCII case.
fn find_row(rows: &[SkuRowView], sku: &str) -> Option<usize> {
    let wanted = sku.trim();
    rows.iter()
        .find(|row| row.sku.eq_ignore_ascii_case(wanted))
        .map(|row| row.index)
}
