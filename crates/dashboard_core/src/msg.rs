use crate::{
    DetailTab, ImageDimensions, ProbeGeneration, RequestSeq, SkuRecord, StatsMap, StatusFilter,
    TimerId, Workflow,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// The SKU list view came up; triggers the initial load.
    Mounted,
    /// The dashboard is going away; nothing may fire afterwards.
    Unmounted,
    /// User picked a status in the filter dropdown.
    StatusFilterChanged(StatusFilter),
    /// User edited the SKU search box (raw, untrimmed text).
    SkuSearchChanged(String),
    /// A previously scheduled search debounce expired.
    DebounceElapsed { timer: TimerId },
    /// User clicked Refresh or Retry on the list view.
    RefreshClicked,
    /// Data client completion for a list request.
    SkusLoaded {
        seq: RequestSeq,
        result: Result<Vec<SkuRecord>, String>,
    },
    /// Stats view came up or its Refresh/Retry was clicked.
    StatsRequested,
    StatsLoaded {
        seq: RequestSeq,
        result: Result<StatsMap, String>,
    },
    /// User clicked a category panel header.
    CategoryToggled(String),
    /// Workflows view came up or its Refresh/Retry was clicked.
    WorkflowsRequested,
    WorkflowsLoaded {
        seq: RequestSeq,
        result: Result<Vec<Workflow>, String>,
    },
    /// User clicked a table row (index into the current list).
    RecordSelected(usize),
    DrawerClosed,
    TabSelected(DetailTab),
    /// User clicked a scraped-website accordion header.
    SearchResultToggled(usize),
    ShowAllImagesToggled,
    /// All image probes of one batch settled.
    ImagesProbed {
        generation: ProbeGeneration,
        dimensions: Vec<(String, Option<ImageDimensions>)>,
    },
    ImagePreviewOpened(String),
    ImagePreviewClosed,
}
