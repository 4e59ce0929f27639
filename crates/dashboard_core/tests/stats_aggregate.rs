use dashboard_core::{aggregate, update, AppState, Effect, Msg, StatsMap};
use pretty_assertions::assert_eq;
use serde_json::json;

fn stats(value: serde_json::Value) -> StatsMap {
    serde_json::from_value(value).expect("stats map")
}

fn sample() -> StatsMap {
    stats(json!({
        "Shoes": {
            "pending": {"status_count": 30, "percentage": 30.0},
            "scraping_done": {"status_count": 70, "percentage": 70.0}
        },
        "Bags": {
            "scraping_done": {"status_count": 10, "percentage": 100.0}
        },
        "Hats": {
            "pending": {"status_count": 25, "percentage": 25.0},
            "no_result": {"status_count": 75, "percentage": 75.0}
        },
        "Empty": {}
    }))
}

#[test]
fn computes_totals_and_progress() {
    let summaries = aggregate(&sample());
    let shoes = &summaries[0];
    assert_eq!(shoes.category, "Shoes");
    assert_eq!(shoes.total_count, 100);
    assert_eq!(shoes.pending_count, 30);
    assert_eq!(shoes.non_pending_count, 70);
    assert!((shoes.total_progress - 70.0).abs() < 1e-9);

    let bags = summaries.iter().find(|s| s.category == "Bags").unwrap();
    // No pending entry counts as zero pending.
    assert_eq!(bags.pending_count, 0);
    assert!((bags.total_progress - 100.0).abs() < 1e-9);

    let empty = summaries.iter().find(|s| s.category == "Empty").unwrap();
    assert_eq!(empty.total_count, 0);
    assert_eq!(empty.total_progress, 0.0);
}

#[test]
fn orders_by_total_descending_with_stable_ties() {
    let names: Vec<_> = aggregate(&sample())
        .into_iter()
        .map(|s| s.category)
        .collect();
    // Shoes and Hats tie at 100; Shoes comes first in the document.
    assert_eq!(names, vec!["Shoes", "Hats", "Bags", "Empty"]);
}

#[test]
fn per_status_percentages_are_copied_verbatim() {
    // Source percentages that do not match the counts stay untouched.
    let map = stats(json!({
        "Toys": {
            "scraping_done": {"status_count": 1, "percentage": 12.345},
            "pending": {"status_count": 3, "percentage": 99.0}
        }
    }));
    let summary = &aggregate(&map)[0];
    let percentages: Vec<_> = summary.statuses.iter().map(|s| s.percentage).collect();
    assert_eq!(percentages, vec![12.345, 99.0]);
    assert!((summary.total_progress - 25.0).abs() < 1e-9);
}

#[test]
fn empty_map_yields_empty_list() {
    assert!(aggregate(&StatsMap::default()).is_empty());
    assert!(aggregate(&stats(json!({}))).is_empty());
}

#[test]
fn huge_counts_saturate_instead_of_overflowing() {
    let summaries = aggregate(&stats(json!({
        "Bulk": {
            "scraping_done": {"status_count": u64::MAX},
            "pending": {"status_count": 1}
        }
    })));
    assert_eq!(summaries[0].total_count, u64::MAX);
    assert_eq!(summaries[0].pending_count, 1);
    assert_eq!(summaries[0].non_pending_count, u64::MAX - 1);
    assert!(summaries[0].total_progress <= 100.0);
}

#[test]
fn aggregate_is_pure() {
    let input = sample();
    let snapshot = input.clone();
    let first = aggregate(&input);
    let second = aggregate(&input);
    assert_eq!(first, second);
    assert_eq!(input, snapshot);
}

#[test]
fn progress_bounds_hold_for_many_shapes() {
    for total in 0u64..12 {
        for pending in 0..=total {
            let map = stats(json!({
                "A": {
                    "pending": {"status_count": pending, "percentage": 0.0},
                    "error": {"status_count": total - pending, "percentage": 0.0}
                },
                "B": {
                    "processing": {"status_count": total, "percentage": 0.0}
                }
            }));
            let summaries = aggregate(&map);
            let non_pending: u64 = summaries.iter().map(|s| s.non_pending_count).sum();
            let totals: u64 = summaries.iter().map(|s| s.total_count).sum();
            assert!(non_pending <= totals);
            for summary in &summaries {
                assert!((0.0..=100.0).contains(&summary.total_progress));
            }
            assert!(summaries
                .windows(2)
                .all(|pair| pair[0].total_count >= pair[1].total_count));
        }
    }
}

#[test]
fn stats_view_starts_collapsed_and_toggles() {
    let (state, effects) = update(AppState::new(), Msg::StatsRequested);
    let seq = match effects.as_slice() {
        [Effect::FetchStats { seq }] => *seq,
        other => panic!("unexpected effects {other:?}"),
    };
    assert!(state.view().stats.loading);

    let (state, _) = update(
        state,
        Msg::StatsLoaded {
            seq,
            result: Ok(sample()),
        },
    );
    let view = state.view().stats;
    assert!(!view.loading);
    assert_eq!(view.footer, "Showing 4 categories");
    assert!(view.panels.iter().all(|panel| panel.collapsed));

    let (state, _) = update(state, Msg::CategoryToggled("Hats".to_string()));
    let (state, _) = update(state, Msg::CategoryToggled("Nope".to_string()));
    let expanded: Vec<_> = state
        .view()
        .stats
        .panels
        .iter()
        .filter(|panel| !panel.collapsed)
        .map(|panel| panel.summary.category.clone())
        .collect();
    assert_eq!(expanded, vec!["Hats"]);

    // A reload collapses everything again.
    let (state, effects) = update(state, Msg::StatsRequested);
    let seq = match effects.as_slice() {
        [Effect::FetchStats { seq }] => *seq,
        other => panic!("unexpected effects {other:?}"),
    };
    let (state, _) = update(
        state,
        Msg::StatsLoaded {
            seq,
            result: Ok(sample()),
        },
    );
    assert!(state.view().stats.panels.iter().all(|panel| panel.collapsed));
}

#[test]
fn stats_failure_surfaces_error() {
    let (state, _) = update(AppState::new(), Msg::StatsRequested);
    let (state, _) = update(
        state,
        Msg::StatsLoaded {
            seq: 1,
            result: Err("network error".to_string()),
        },
    );
    let view = state.view().stats;
    assert!(!view.loading);
    assert!(!view.loaded);
    assert_eq!(view.error.as_deref(), Some("network error"));
}
