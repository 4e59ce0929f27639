use std::sync::mpsc;
use std::time::Duration;

use dashboard_core::TimerId;
use dashboard_logging::dash_trace;
use tokio_util::sync::CancellationToken;

use crate::EngineEvent;

/// Runs at most one live search timer. Must be used inside a tokio runtime.
pub struct Debouncer {
    parent: CancellationToken,
    events: mpsc::Sender<EngineEvent>,
    live: Option<(TimerId, CancellationToken)>,
}

impl Debouncer {
    pub fn new(parent: CancellationToken, events: mpsc::Sender<EngineEvent>) -> Self {
        Self {
            parent,
            events,
            live: None,
        }
    }

    /// Starts `timer`, cancelling whichever timer was live before.
    pub fn schedule(&mut self, timer: TimerId, delay: Duration) {
        self.cancel_live();
        let token = self.parent.child_token();
        self.live = Some((timer, token.clone()));

        let events = self.events.clone();
        tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = token.cancelled() => {
                    dash_trace!("debounce timer {timer} cancelled");
                }
                _ = tokio::time::sleep(delay) => {
                    let _ = events.send(EngineEvent::DebounceElapsed { timer });
                }
            }
        });
    }

    /// Cancels `timer` if it is the live one.
    pub fn cancel(&mut self, timer: TimerId) {
        if self.live_timer() == Some(timer) {
            self.cancel_live();
        }
    }

    pub fn cancel_live(&mut self) {
        if let Some((_, token)) = self.live.take() {
            token.cancel();
        }
    }

    pub fn live_timer(&self) -> Option<TimerId> {
        self.live.as_ref().map(|(timer, _)| *timer)
    }
}
