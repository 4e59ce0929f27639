//! Dashboard core: pure state machine, data model, and view-model helpers.
mod date;
mod effect;
mod gallery;
mod model;
mod msg;
mod render_value;
mod state;
mod stats;
mod update;
mod view_model;

pub use date::{format_date, DISPLAY_OFFSET_SECONDS};
pub use effect::{Effect, ProbeGeneration, RequestSeq, TimerId};
pub use gallery::{gallery_view, probe_targets, GalleryState, GalleryView, ImageDimensions, ImageTile};
pub use model::{
    CategoryStats, RecordId, SearchResponse, SearchResultEntry, SkuMatchResult, SkuQuery,
    SkuRecord, StatsMap, StatusCount, StatusFilter, UnknownStatusFilter, Workflow,
};
pub use msg::Msg;
pub use render_value::{is_image_url, render_fields, render_value, RenderedValue};
pub use state::{
    AppState, ControllerPhase, DetailState, DetailTab, FilterState, Lifecycle, Remote,
    SEARCH_DEBOUNCE,
};
pub use stats::{aggregate, status_label, CategorySummary, StatusSummary, PENDING_STATUS};
pub use update::update;
pub use view_model::{
    AppViewModel, CategoryPanelView, DetailView, ListView, SearchResultView, SkuRowView,
    StatsView, TabContent, WorkflowRowView, WorkflowsView, NOT_AVAILABLE,
};
