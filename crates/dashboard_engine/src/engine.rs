use std::future::Future;
use std::io;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use dashboard_core::{ProbeGeneration, RequestSeq, SkuQuery, TimerId};
use dashboard_logging::{dash_debug, dash_error};
use tokio_util::sync::CancellationToken;

use crate::debounce::Debouncer;
use crate::probe::ImageProber;
use crate::{ClientError, DataSource, EngineEvent, FailureKind};

enum EngineCommand {
    FetchSkus { seq: RequestSeq, query: SkuQuery },
    FetchStats { seq: RequestSeq },
    FetchWorkflows { seq: RequestSeq },
    ScheduleDebounce { timer: TimerId, delay: Duration },
    CancelDebounce { timer: TimerId },
    ProbeImages {
        generation: ProbeGeneration,
        urls: Vec<String>,
    },
    AbortInFlight,
}

/// Runs IO on a background tokio runtime and reports back over a channel.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
    root: CancellationToken,
}

impl EngineHandle {
    pub fn new(source: Arc<dyn DataSource>, prober: ImageProber) -> io::Result<Self> {
        let runtime = tokio::runtime::Runtime::new()?;
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let root = CancellationToken::new();
        let worker = Worker {
            source,
            prober: Arc::new(prober),
            events: event_tx.clone(),
            scope: root.child_token(),
            debouncer: Debouncer::new(root.clone(), event_tx),
            root: root.clone(),
        };

        thread::Builder::new()
            .name("dashboard-engine".to_string())
            .spawn(move || {
                let guard = runtime.enter();
                let mut worker = worker;
                while let Ok(command) = cmd_rx.recv() {
                    worker.handle(command);
                }
                worker.root.cancel();
                drop(worker);
                drop(guard);
                runtime.shutdown_background();
            })?;

        Ok(Self {
            cmd_tx,
            event_rx,
            root,
        })
    }

    pub fn fetch_skus(&self, seq: RequestSeq, query: SkuQuery) {
        self.send(EngineCommand::FetchSkus { seq, query });
    }

    pub fn fetch_stats(&self, seq: RequestSeq) {
        self.send(EngineCommand::FetchStats { seq });
    }

    pub fn fetch_workflows(&self, seq: RequestSeq) {
        self.send(EngineCommand::FetchWorkflows { seq });
    }

    pub fn schedule_debounce(&self, timer: TimerId, delay: Duration) {
        self.send(EngineCommand::ScheduleDebounce { timer, delay });
    }

    pub fn cancel_debounce(&self, timer: TimerId) {
        self.send(EngineCommand::CancelDebounce { timer });
    }

    pub fn probe_images(&self, generation: ProbeGeneration, urls: Vec<String>) {
        self.send(EngineCommand::ProbeImages { generation, urls });
    }

    /// Drops every in-flight request and the live timer without reporting them.
    pub fn abort_in_flight(&self) {
        self.send(EngineCommand::AbortInFlight);
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }

    /// Cancels all outstanding work; no further events are produced.
    pub fn shutdown(&self) {
        self.root.cancel();
    }

    fn send(&self, command: EngineCommand) {
        if self.root.is_cancelled() {
            return;
        }
        if self.cmd_tx.send(command).is_err() {
            dash_error!("engine thread is gone; command dropped");
        }
    }
}

impl Drop for EngineHandle {
    fn drop(&mut self) {
        self.root.cancel();
    }
}

struct Worker {
    source: Arc<dyn DataSource>,
    prober: Arc<ImageProber>,
    events: mpsc::Sender<EngineEvent>,
    /// Parent of every in-flight request; replaced on abort.
    scope: CancellationToken,
    debouncer: Debouncer,
    root: CancellationToken,
}

impl Worker {
    fn handle(&mut self, command: EngineCommand) {
        match command {
            EngineCommand::FetchSkus { seq, query } => {
                let source = self.source.clone();
                self.spawn_request(
                    async move { source.fetch_skus(&query).await },
                    move |result| EngineEvent::SkusLoaded { seq, result },
                );
            }
            EngineCommand::FetchStats { seq } => {
                let source = self.source.clone();
                self.spawn_request(
                    async move { source.fetch_stats().await },
                    move |result| EngineEvent::StatsLoaded { seq, result },
                );
            }
            EngineCommand::FetchWorkflows { seq } => {
                let source = self.source.clone();
                self.spawn_request(
                    async move { source.fetch_workflows().await },
                    move |result| EngineEvent::WorkflowsLoaded { seq, result },
                );
            }
            EngineCommand::ScheduleDebounce { timer, delay } => {
                self.debouncer.schedule(timer, delay);
            }
            EngineCommand::CancelDebounce { timer } => self.debouncer.cancel(timer),
            EngineCommand::ProbeImages { generation, urls } => {
                let prober = self.prober.clone();
                let scope = self.scope.clone();
                let events = self.events.clone();
                tokio::spawn(async move {
                    tokio::select! {
                        biased;
                        _ = scope.cancelled() => {
                            dash_debug!("image probe batch {generation} dropped");
                        }
                        dimensions = prober.probe_all(urls) => {
                            let _ = events.send(EngineEvent::ImagesProbed { generation, dimensions });
                        }
                    }
                });
            }
            EngineCommand::AbortInFlight => {
                self.debouncer.cancel_live();
                self.scope.cancel();
                self.scope = self.root.child_token();
            }
        }
    }

    /// Spawns `request` and always reports a completion unless cancelled,
    /// including when the request task panics.
    fn spawn_request<T, F, W>(&self, request: F, wrap: W)
    where
        T: Send + 'static,
        F: Future<Output = Result<T, ClientError>> + Send + 'static,
        W: FnOnce(Result<T, ClientError>) -> EngineEvent + Send + 'static,
    {
        let scope = self.scope.clone();
        let events = self.events.clone();
        let mut task = tokio::spawn(request);
        tokio::spawn(async move {
            let joined = tokio::select! {
                biased;
                _ = scope.cancelled() => {
                    task.abort();
                    dash_debug!("in-flight request dropped");
                    return;
                }
                joined = &mut task => joined,
            };
            let result = joined.unwrap_or_else(|err| {
                dash_error!("request task failed: {err}");
                Err(ClientError::new(FailureKind::TaskFailed, err.to_string()))
            });
            let _ = events.send(wrap(result));
        });
    }
}
