use std::sync::Once;

use dashboard_core::{
    update, AppState, ControllerPhase, Effect, Msg, SkuQuery, StatusFilter, SEARCH_DEBOUNCE,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(dashboard_logging::initialize_for_tests);
}

fn mounted() -> AppState {
    let (state, effects) = update(AppState::new(), Msg::Mounted);
    assert_eq!(effects.len(), 1);
    state
}

fn type_text(state: AppState, keystrokes: &[&str]) -> (AppState, Vec<Effect>) {
    let mut state = state;
    let mut all = Vec::new();
    for text in keystrokes {
        let (next, effects) = update(state, Msg::SkuSearchChanged(text.to_string()));
        state = next;
        all.extend(effects);
    }
    (state, all)
}

fn fetches(effects: &[Effect]) -> Vec<SkuQuery> {
    effects
        .iter()
        .filter_map(|effect| match effect {
            Effect::FetchSkus { query, .. } => Some(query.clone()),
            _ => None,
        })
        .collect()
}

#[test]
fn mount_loads_once_without_debounce() {
    init_logging();
    let (mut state, effects) = update(AppState::new(), Msg::Mounted);

    assert_eq!(
        effects,
        vec![Effect::FetchSkus {
            seq: 1,
            query: SkuQuery::default(),
        }]
    );
    assert_eq!(state.controller_phase(), ControllerPhase::Loading);
    assert!(state.consume_dirty());

    let (_state, effects) = update(state, Msg::Mounted);
    assert!(effects.is_empty());
}

#[test]
fn typing_collapses_into_one_load_with_final_value() {
    init_logging();
    let (state, effects) = type_text(mounted(), &["a", "ab", "abc"]);

    assert_eq!(
        effects,
        vec![
            Effect::ScheduleDebounce {
                timer: 1,
                delay: SEARCH_DEBOUNCE,
            },
            Effect::CancelDebounce { timer: 1 },
            Effect::ScheduleDebounce {
                timer: 2,
                delay: SEARCH_DEBOUNCE,
            },
            Effect::CancelDebounce { timer: 2 },
            Effect::ScheduleDebounce {
                timer: 3,
                delay: SEARCH_DEBOUNCE,
            },
        ]
    );
    assert!(fetches(&effects).is_empty());
    assert_eq!(state.pending_search(), Some(3));

    // Superseded timers that still fire are ignored.
    let (state, effects) = update(state, Msg::DebounceElapsed { timer: 1 });
    assert!(effects.is_empty());
    let (state, effects) = update(state, Msg::DebounceElapsed { timer: 2 });
    assert!(effects.is_empty());

    let (state, effects) = update(state, Msg::DebounceElapsed { timer: 3 });
    assert_eq!(
        fetches(&effects),
        vec![SkuQuery {
            status: None,
            sku: Some("abc".to_string()),
        }]
    );
    assert_eq!(state.pending_search(), None);

    // The same timer cannot fire twice.
    let (_state, effects) = update(state, Msg::DebounceElapsed { timer: 3 });
    assert!(effects.is_empty());
}

#[test]
fn status_change_preempts_pending_debounce() {
    init_logging();
    let (state, _) = type_text(mounted(), &["ab"]);
    assert_eq!(state.controller_phase(), ControllerPhase::Loading);

    let (state, effects) = update(state, Msg::StatusFilterChanged(StatusFilter::NoResult));
    assert_eq!(
        effects,
        vec![
            Effect::CancelDebounce { timer: 1 },
            Effect::FetchSkus {
                seq: 2,
                query: SkuQuery {
                    status: Some(StatusFilter::NoResult),
                    sku: Some("ab".to_string()),
                },
            },
        ]
    );
    assert_eq!(state.pending_search(), None);

    let (_state, effects) = update(state, Msg::DebounceElapsed { timer: 1 });
    assert!(effects.is_empty());
}

#[test]
fn unchanged_values_do_not_trigger() {
    init_logging();
    let (state, effects) = update(mounted(), Msg::StatusFilterChanged(StatusFilter::All));
    assert!(effects.is_empty());

    let (state, _) = type_text(state, &["x"]);
    let (_state, effects) = update(state, Msg::SkuSearchChanged("x".to_string()));
    assert!(effects.is_empty());
}

#[test]
fn whitespace_search_is_sent_as_unset() {
    init_logging();
    let (state, _) = type_text(mounted(), &["   "]);
    let (_state, effects) = update(state, Msg::DebounceElapsed { timer: 1 });
    assert_eq!(fetches(&effects), vec![SkuQuery::default()]);
}

#[test]
fn edits_before_mount_only_seed_the_first_load() {
    init_logging();
    let (state, effects) = update(
        AppState::new(),
        Msg::StatusFilterChanged(StatusFilter::ScrapingDone),
    );
    assert!(effects.is_empty());
    let (state, effects) = update(state, Msg::SkuSearchChanged(" sku-9 ".to_string()));
    assert!(effects.is_empty());
    assert_eq!(state.pending_search(), None);

    let (_state, effects) = update(state, Msg::Mounted);
    assert_eq!(
        fetches(&effects),
        vec![SkuQuery {
            status: Some(StatusFilter::ScrapingDone),
            sku: Some("sku-9".to_string()),
        }]
    );
}

#[test]
fn unmount_cancels_timer_and_silences_everything() {
    init_logging();
    let (state, _) = type_text(mounted(), &["abc"]);

    let (state, effects) = update(state, Msg::Unmounted);
    assert_eq!(
        effects,
        vec![Effect::CancelDebounce { timer: 1 }, Effect::AbortInFlight]
    );

    let (state, effects) = update(state, Msg::DebounceElapsed { timer: 1 });
    assert!(effects.is_empty());
    let (state, effects) = update(state, Msg::StatusFilterChanged(StatusFilter::NoResult));
    assert!(effects.is_empty());
    let (state, effects) = update(state, Msg::RefreshClicked);
    assert!(effects.is_empty());

    let before = state.clone();
    let (after, effects) = update(
        state,
        Msg::SkusLoaded {
            seq: 1,
            result: Ok(Vec::new()),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(after, before);
}

#[test]
fn refresh_cancels_pending_debounce_and_reloads() {
    init_logging();
    let (state, _) = type_text(mounted(), &["q"]);
    let (state, effects) = update(state, Msg::RefreshClicked);
    assert_eq!(
        effects,
        vec![
            Effect::CancelDebounce { timer: 1 },
            Effect::FetchSkus {
                seq: 2,
                query: SkuQuery {
                    status: None,
                    sku: Some("q".to_string()),
                },
            },
        ]
    );
    assert_eq!(state.pending_search(), None);
}
