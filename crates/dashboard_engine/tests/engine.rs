use std::sync::{Arc, Once};
use std::time::Duration;

use dashboard_core::{SkuQuery, SkuRecord, StatsMap, StatusFilter, Workflow};
use dashboard_engine::{
    ClientError, ClientSettings, DataSource, EngineEvent, EngineHandle, FailureKind, ImageProber,
};

const WAIT: Duration = Duration::from_secs(5);

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(dashboard_logging::initialize_for_tests);
}

/// Echoes the query back as a record after `delay`; panics on a "boom" search.
struct FakeSource {
    delay: Duration,
}

#[async_trait::async_trait]
impl DataSource for FakeSource {
    async fn fetch_skus(&self, query: &SkuQuery) -> Result<Vec<SkuRecord>, ClientError> {
        tokio::time::sleep(self.delay).await;
        if query.sku.as_deref() == Some("boom") {
            panic!("fake source exploded");
        }
        Ok(vec![SkuRecord {
            sku: query.sku.clone(),
            status: query.status.map(|status| status.as_str().to_string()),
            ..SkuRecord::default()
        }])
    }

    async fn fetch_stats(&self) -> Result<StatsMap, ClientError> {
        Ok(StatsMap::default())
    }

    async fn fetch_workflows(&self) -> Result<Vec<Workflow>, ClientError> {
        tokio::time::sleep(self.delay).await;
        Ok(Vec::new())
    }
}

fn engine(delay: Duration) -> EngineHandle {
    init_logging();
    let prober = ImageProber::new(&ClientSettings::default()).expect("prober");
    EngineHandle::new(Arc::new(FakeSource { delay }), prober).expect("engine")
}

#[test]
fn completions_carry_their_sequence_numbers() {
    let engine = engine(Duration::ZERO);
    engine.fetch_skus(3, SkuQuery::new(StatusFilter::NoResult, "x"));

    match engine.recv_timeout(WAIT) {
        Some(EngineEvent::SkusLoaded { seq, result }) => {
            assert_eq!(seq, 3);
            let records = result.expect("records");
            assert_eq!(records[0].sku.as_deref(), Some("x"));
            assert_eq!(records[0].status.as_deref(), Some("no_result"));
        }
        other => panic!("unexpected event {other:?}"),
    }

    engine.fetch_stats(4);
    assert_eq!(
        engine.recv_timeout(WAIT),
        Some(EngineEvent::StatsLoaded {
            seq: 4,
            result: Ok(StatsMap::default()),
        })
    );
}

#[test]
fn panicking_request_still_completes() {
    let engine = engine(Duration::ZERO);
    engine.fetch_skus(1, SkuQuery::new(StatusFilter::All, "boom"));

    match engine.recv_timeout(WAIT) {
        Some(EngineEvent::SkusLoaded { seq: 1, result }) => {
            assert_eq!(result.unwrap_err().kind, FailureKind::TaskFailed);
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[test]
fn debounce_fires_through_the_engine() {
    let engine = engine(Duration::ZERO);
    engine.schedule_debounce(1, Duration::from_millis(200));
    engine.schedule_debounce(2, Duration::from_millis(20));
    assert_eq!(
        engine.recv_timeout(WAIT),
        Some(EngineEvent::DebounceElapsed { timer: 2 })
    );
    assert_eq!(engine.recv_timeout(Duration::from_millis(400)), None);
}

#[test]
fn abort_drops_in_flight_work_silently() {
    let engine = engine(Duration::from_millis(200));
    engine.fetch_skus(1, SkuQuery::default());
    engine.fetch_workflows(2);
    engine.schedule_debounce(1, Duration::from_millis(100));
    engine.abort_in_flight();

    assert_eq!(engine.recv_timeout(Duration::from_millis(600)), None);

    // New work after an abort is served normally.
    engine.fetch_workflows(3);
    assert_eq!(
        engine.recv_timeout(WAIT),
        Some(EngineEvent::WorkflowsLoaded {
            seq: 3,
            result: Ok(Vec::new()),
        })
    );
}

#[test]
fn shutdown_stops_all_events() {
    let engine = engine(Duration::from_millis(100));
    engine.fetch_skus(1, SkuQuery::default());
    engine.shutdown();
    engine.fetch_workflows(2);
    assert_eq!(engine.recv_timeout(Duration::from_millis(400)), None);
}
