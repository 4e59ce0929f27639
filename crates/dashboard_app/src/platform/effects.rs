use std::sync::Arc;
use std::time::Duration;

use dashboard_core::{Effect, Msg};
use dashboard_engine::{EngineEvent, EngineHandle, ImageProber, ReqwestDataSource};
use dashboard_logging::{dash_debug, dash_info, dash_warn};

use super::config::DashboardConfig;

/// Executes core effects on the engine and turns engine events back into messages.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(config: &DashboardConfig) -> anyhow::Result<Self> {
        let settings = config.client_settings();
        let source = ReqwestDataSource::new(config.endpoints(), &settings)?;
        let prober = ImageProber::new(&settings)?;
        let engine = EngineHandle::new(Arc::new(source), prober)?;
        Ok(Self { engine })
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::FetchSkus { seq, query } => {
                    dash_info!(
                        "FetchSkus seq={} status={:?} sku={:?}",
                        seq,
                        query.status.map(|status| status.as_str()),
                        query.sku
                    );
                    self.engine.fetch_skus(seq, query);
                }
                Effect::FetchStats { seq } => {
                    dash_info!("FetchStats seq={seq}");
                    self.engine.fetch_stats(seq);
                }
                Effect::FetchWorkflows { seq } => {
                    dash_info!("FetchWorkflows seq={seq}");
                    self.engine.fetch_workflows(seq);
                }
                Effect::ScheduleDebounce { timer, delay } => {
                    dash_debug!("ScheduleDebounce timer={timer} delay={delay:?}");
                    self.engine.schedule_debounce(timer, delay);
                }
                Effect::CancelDebounce { timer } => {
                    dash_debug!("CancelDebounce timer={timer}");
                    self.engine.cancel_debounce(timer);
                }
                Effect::ProbeImages { generation, urls } => {
                    dash_info!("ProbeImages generation={} urls={}", generation, urls.len());
                    self.engine.probe_images(generation, urls);
                }
                Effect::AbortInFlight => {
                    dash_info!("AbortInFlight");
                    self.engine.abort_in_flight();
                }
            }
        }
    }

    /// Waits up to `timeout` for the next engine event.
    pub fn next_msg(&self, timeout: Duration) -> Option<Msg> {
        self.engine.recv_timeout(timeout).map(to_msg)
    }

    pub fn shutdown(&self) {
        self.engine.shutdown();
    }
}

pub(crate) fn to_msg(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::SkusLoaded { seq, result } => Msg::SkusLoaded {
            seq,
            result: result.map_err(|err| {
                dash_warn!("SKU load {seq} failed: {err}");
                err.to_string()
            }),
        },
        EngineEvent::StatsLoaded { seq, result } => Msg::StatsLoaded {
            seq,
            result: result.map_err(|err| {
                dash_warn!("stats load {seq} failed: {err}");
                err.to_string()
            }),
        },
        EngineEvent::WorkflowsLoaded { seq, result } => Msg::WorkflowsLoaded {
            seq,
            result: result.map_err(|err| {
                dash_warn!("workflow load {seq} failed: {err}");
                err.to_string()
            }),
        },
        EngineEvent::DebounceElapsed { timer } => Msg::DebounceElapsed { timer },
        EngineEvent::ImagesProbed {
            generation,
            dimensions,
        } => Msg::ImagesProbed {
            generation,
            dimensions,
        },
    }
}
