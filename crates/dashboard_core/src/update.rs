use crate::state::SEARCH_DEBOUNCE;
use crate::{AppState, Effect, Lifecycle, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    if state.lifecycle() == Lifecycle::Unmounted {
        return (state, Vec::new());
    }

    let effects = match msg {
        Msg::Mounted => {
            if state.lifecycle() != Lifecycle::Fresh {
                return (state, Vec::new());
            }
            state.mount();
            vec![state.begin_sku_load()]
        }
        Msg::Unmounted => state.tear_down(),
        Msg::StatusFilterChanged(filter) => {
            if !state.set_status_filter(filter) || !state.is_mounted() {
                return (state, Vec::new());
            }
            // A status change preempts any pending search debounce.
            let mut effects = Vec::with_capacity(2);
            if let Some(timer) = state.take_pending_search() {
                effects.push(Effect::CancelDebounce { timer });
            }
            effects.push(state.begin_sku_load());
            effects
        }
        Msg::SkuSearchChanged(text) => {
            if !state.set_sku_search(text) || !state.is_mounted() {
                return (state, Vec::new());
            }
            let mut effects = Vec::with_capacity(2);
            if let Some(timer) = state.take_pending_search() {
                effects.push(Effect::CancelDebounce { timer });
            }
            let timer = state.arm_search_debounce();
            effects.push(Effect::ScheduleDebounce {
                timer,
                delay: SEARCH_DEBOUNCE,
            });
            effects
        }
        Msg::DebounceElapsed { timer } => {
            if state.pending_search() != Some(timer) {
                return (state, Vec::new());
            }
            state.take_pending_search();
            vec![state.begin_sku_load()]
        }
        Msg::RefreshClicked => {
            if !state.is_mounted() {
                return (state, Vec::new());
            }
            let mut effects = Vec::with_capacity(2);
            if let Some(timer) = state.take_pending_search() {
                effects.push(Effect::CancelDebounce { timer });
            }
            effects.push(state.begin_sku_load());
            effects
        }
        Msg::SkusLoaded { seq, result } => {
            state.settle_skus(seq, result);
            Vec::new()
        }
        Msg::StatsRequested => vec![state.begin_stats_load()],
        Msg::StatsLoaded { seq, result } => {
            state.settle_stats(seq, result);
            Vec::new()
        }
        Msg::CategoryToggled(category) => {
            state.toggle_category(category);
            Vec::new()
        }
        Msg::WorkflowsRequested => vec![state.begin_workflows_load()],
        Msg::WorkflowsLoaded { seq, result } => {
            state.settle_workflows(seq, result);
            Vec::new()
        }
        Msg::RecordSelected(index) => {
            state.open_detail(index);
            Vec::new()
        }
        Msg::DrawerClosed => {
            state.close_detail();
            Vec::new()
        }
        Msg::TabSelected(tab) => state.select_tab(tab).into_iter().collect(),
        Msg::SearchResultToggled(index) => {
            state.toggle_search_result(index);
            Vec::new()
        }
        Msg::ShowAllImagesToggled => {
            state.toggle_show_all_images();
            Vec::new()
        }
        Msg::ImagesProbed {
            generation,
            dimensions,
        } => {
            state.apply_probes(generation, dimensions);
            Vec::new()
        }
        Msg::ImagePreviewOpened(url) => {
            state.set_preview(Some(url));
            Vec::new()
        }
        Msg::ImagePreviewClosed => {
            state.set_preview(None);
            Vec::new()
        }
    };

    (state, effects)
}
