use std::time::Duration;

use crate::SkuQuery;

/// Monotonic tag attached to every outgoing request.
pub type RequestSeq = u64;
/// Identity of one scheduled search debounce.
pub type TimerId = u64;
/// Identity of one batch of image probes.
pub type ProbeGeneration = u64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchSkus { seq: RequestSeq, query: SkuQuery },
    FetchStats { seq: RequestSeq },
    FetchWorkflows { seq: RequestSeq },
    ScheduleDebounce { timer: TimerId, delay: Duration },
    CancelDebounce { timer: TimerId },
    ProbeImages {
        generation: ProbeGeneration,
        urls: Vec<String>,
    },
    /// Teardown: drop every in-flight request and timer.
    AbortInFlight,
}
