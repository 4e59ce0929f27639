use std::collections::BTreeSet;
use std::time::Duration;

use crate::gallery::{probe_targets, GalleryState};
use crate::view_model::{self, AppViewModel};
use crate::{
    Effect, ImageDimensions, ProbeGeneration, RequestSeq, SkuQuery, SkuRecord, StatsMap,
    StatusFilter, TimerId, Workflow,
};

/// Quiet period after the last search keystroke before the list reloads.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lifecycle {
    /// List view not shown yet; filter edits only update state.
    #[default]
    Fresh,
    Mounted,
    /// Torn down; every later message is ignored.
    Unmounted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerPhase {
    Idle,
    DebouncePending(TimerId),
    Loading,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterState {
    pub status_filter: StatusFilter,
    pub sku_search: String,
}

impl FilterState {
    pub fn query(&self) -> SkuQuery {
        SkuQuery::new(self.status_filter, &self.sku_search)
    }
}

/// A remotely loaded resource with last-response-wins settling.
#[derive(Debug, Clone, PartialEq)]
pub struct Remote<T> {
    data: T,
    loading: bool,
    error: Option<String>,
    in_flight: Option<RequestSeq>,
    loaded: bool,
}

impl<T: Default> Default for Remote<T> {
    fn default() -> Self {
        Self {
            data: T::default(),
            loading: false,
            error: None,
            in_flight: None,
            loaded: false,
        }
    }
}

impl<T> Remote<T> {
    pub fn data(&self) -> &T {
        &self.data
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// True once any request has succeeded.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    fn begin(&mut self, seq: RequestSeq) {
        self.loading = true;
        self.error = None;
        self.in_flight = Some(seq);
    }

    /// Applies a completion. Returns false when `seq` is not the latest issued.
    fn settle(&mut self, seq: RequestSeq, result: Result<T, String>) -> bool {
        if self.in_flight != Some(seq) {
            return false;
        }
        self.in_flight = None;
        self.loading = false;
        match result {
            Ok(data) => {
                self.data = data;
                self.loaded = true;
            }
            Err(message) => self.error = Some(message),
        }
        true
    }

    fn abandon(&mut self) {
        self.in_flight = None;
        self.loading = false;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetailTab {
    #[default]
    Attributes,
    CustomAttributes,
    Images,
    ScrapedWebsites,
}

impl DetailTab {
    pub const ALL: [DetailTab; 4] = [
        DetailTab::Attributes,
        DetailTab::CustomAttributes,
        DetailTab::Images,
        DetailTab::ScrapedWebsites,
    ];

    pub fn label(self) -> &'static str {
        match self {
            DetailTab::Attributes => "Attributes",
            DetailTab::CustomAttributes => "Custom Attributes",
            DetailTab::Images => "Images",
            DetailTab::ScrapedWebsites => "Scrapped Websites",
        }
    }
}

/// Drawer state; holds its own copy so a reload does not swap the record away.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailState {
    pub(crate) record: SkuRecord,
    pub(crate) tab: DetailTab,
    pub(crate) open_result: Option<usize>,
    pub(crate) gallery: GalleryState,
}

impl DetailState {
    pub fn record(&self) -> &SkuRecord {
        &self.record
    }

    pub fn tab(&self) -> DetailTab {
        self.tab
    }

    pub fn open_result(&self) -> Option<usize> {
        self.open_result
    }

    pub fn gallery(&self) -> &GalleryState {
        &self.gallery
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    lifecycle: Lifecycle,
    filter: FilterState,
    pending_search: Option<TimerId>,
    next_timer: TimerId,
    next_seq: RequestSeq,
    next_probe: ProbeGeneration,
    skus: Remote<Vec<SkuRecord>>,
    stats: Remote<StatsMap>,
    collapsed: BTreeSet<String>,
    workflows: Remote<Vec<Workflow>>,
    detail: Option<DetailState>,
    preview: Option<String>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        view_model::build(self)
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn skus(&self) -> &Remote<Vec<SkuRecord>> {
        &self.skus
    }

    pub fn stats(&self) -> &Remote<StatsMap> {
        &self.stats
    }

    pub fn workflows(&self) -> &Remote<Vec<Workflow>> {
        &self.workflows
    }

    pub fn detail(&self) -> Option<&DetailState> {
        self.detail.as_ref()
    }

    pub fn preview(&self) -> Option<&str> {
        self.preview.as_deref()
    }

    pub fn is_collapsed(&self, category: &str) -> bool {
        self.collapsed.contains(category)
    }

    pub fn pending_search(&self) -> Option<TimerId> {
        self.pending_search
    }

    pub fn controller_phase(&self) -> ControllerPhase {
        if self.skus.loading {
            ControllerPhase::Loading
        } else if let Some(timer) = self.pending_search {
            ControllerPhase::DebouncePending(timer)
        } else {
            ControllerPhase::Idle
        }
    }

    /// Returns and clears the dirty flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn mount(&mut self) {
        self.lifecycle = Lifecycle::Mounted;
    }

    pub(crate) fn is_mounted(&self) -> bool {
        self.lifecycle == Lifecycle::Mounted
    }

    /// Returns false when the value is unchanged.
    pub(crate) fn set_status_filter(&mut self, filter: StatusFilter) -> bool {
        if self.filter.status_filter == filter {
            return false;
        }
        self.filter.status_filter = filter;
        self.mark_dirty();
        true
    }

    /// Returns false when the value is unchanged.
    pub(crate) fn set_sku_search(&mut self, text: String) -> bool {
        if self.filter.sku_search == text {
            return false;
        }
        self.filter.sku_search = text;
        self.mark_dirty();
        true
    }

    pub(crate) fn take_pending_search(&mut self) -> Option<TimerId> {
        self.pending_search.take()
    }

    pub(crate) fn arm_search_debounce(&mut self) -> TimerId {
        self.next_timer += 1;
        self.pending_search = Some(self.next_timer);
        self.next_timer
    }

    fn next_seq(&mut self) -> RequestSeq {
        self.next_seq += 1;
        self.next_seq
    }

    pub(crate) fn begin_sku_load(&mut self) -> Effect {
        let seq = self.next_seq();
        self.skus.begin(seq);
        self.mark_dirty();
        Effect::FetchSkus {
            seq,
            query: self.filter.query(),
        }
    }

    pub(crate) fn settle_skus(&mut self, seq: RequestSeq, result: Result<Vec<SkuRecord>, String>) {
        if self.skus.settle(seq, result) {
            self.mark_dirty();
        }
    }

    pub(crate) fn begin_stats_load(&mut self) -> Effect {
        let seq = self.next_seq();
        self.stats.begin(seq);
        self.mark_dirty();
        Effect::FetchStats { seq }
    }

    pub(crate) fn settle_stats(&mut self, seq: RequestSeq, result: Result<StatsMap, String>) {
        let succeeded = result.is_ok();
        if !self.stats.settle(seq, result) {
            return;
        }
        if succeeded {
            // Every panel starts collapsed after a load.
            self.collapsed = self
                .stats
                .data
                .categories()
                .iter()
                .map(|category| category.category.clone())
                .collect();
        }
        self.mark_dirty();
    }

    pub(crate) fn toggle_category(&mut self, category: String) {
        let known = self
            .stats
            .data
            .categories()
            .iter()
            .any(|c| c.category == category);
        if !known {
            return;
        }
        if !self.collapsed.remove(&category) {
            self.collapsed.insert(category);
        }
        self.mark_dirty();
    }

    pub(crate) fn begin_workflows_load(&mut self) -> Effect {
        let seq = self.next_seq();
        self.workflows.begin(seq);
        self.mark_dirty();
        Effect::FetchWorkflows { seq }
    }

    pub(crate) fn settle_workflows(&mut self, seq: RequestSeq, result: Result<Vec<Workflow>, String>) {
        if self.workflows.settle(seq, result) {
            self.mark_dirty();
        }
    }

    pub(crate) fn open_detail(&mut self, index: usize) {
        let Some(record) = self.skus.data.get(index).cloned() else {
            return;
        };
        self.detail = Some(DetailState {
            record,
            tab: DetailTab::Attributes,
            open_result: None,
            gallery: GalleryState::default(),
        });
        self.preview = None;
        self.mark_dirty();
    }

    pub(crate) fn close_detail(&mut self) {
        if self.detail.take().is_some() {
            self.preview = None;
            self.mark_dirty();
        }
    }

    /// Switches tabs; returns a probe effect the first time Images is shown.
    pub(crate) fn select_tab(&mut self, tab: DetailTab) -> Option<Effect> {
        let next_probe = self.next_probe + 1;
        let detail = self.detail.as_mut()?;
        if detail.tab != tab {
            detail.tab = tab;
            self.dirty = true;
        }
        if tab != DetailTab::Images || detail.gallery.probe.is_some() {
            return None;
        }
        let urls = probe_targets(&detail.record.image_urls, &detail.record.image_urls_raw);
        if urls.is_empty() {
            return None;
        }
        detail.gallery.probe = Some(next_probe);
        self.next_probe = next_probe;
        Some(Effect::ProbeImages {
            generation: next_probe,
            urls,
        })
    }

    pub(crate) fn toggle_search_result(&mut self, index: usize) {
        let Some(detail) = self.detail.as_mut() else {
            return;
        };
        if index >= detail.record.search_result.len() {
            return;
        }
        detail.open_result = if detail.open_result == Some(index) {
            None
        } else {
            Some(index)
        };
        self.dirty = true;
    }

    pub(crate) fn toggle_show_all_images(&mut self) {
        if let Some(detail) = self.detail.as_mut() {
            detail.gallery.show_all = !detail.gallery.show_all;
            self.dirty = true;
        }
    }

    pub(crate) fn apply_probes(
        &mut self,
        generation: ProbeGeneration,
        dimensions: Vec<(String, Option<ImageDimensions>)>,
    ) {
        let Some(detail) = self.detail.as_mut() else {
            return;
        };
        if detail.gallery.probe != Some(generation) {
            return;
        }
        detail.gallery.dimensions.extend(dimensions);
        self.dirty = true;
    }

    pub(crate) fn set_preview(&mut self, url: Option<String>) {
        if self.preview != url {
            self.preview = url;
            self.mark_dirty();
        }
    }

    /// Moves to `Unmounted`, returning the cleanup effects.
    pub(crate) fn tear_down(&mut self) -> Vec<Effect> {
        self.lifecycle = Lifecycle::Unmounted;
        let mut effects = Vec::with_capacity(2);
        if let Some(timer) = self.pending_search.take() {
            effects.push(Effect::CancelDebounce { timer });
        }
        self.skus.abandon();
        self.stats.abandon();
        self.workflows.abandon();
        if let Some(detail) = self.detail.as_mut() {
            detail.gallery.probe = None;
        }
        effects.push(Effect::AbortInFlight);
        self.mark_dirty();
        effects
    }
}
