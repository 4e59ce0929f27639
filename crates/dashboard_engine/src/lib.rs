//! Dashboard engine: HTTP data client, timers, image probes, and effect execution.
mod client;
mod debounce;
mod engine;
mod probe;
mod types;

pub use client::{sku_list_url, ClientSettings, DataSource, Endpoints, ListResponse, ReqwestDataSource};
pub use debounce::Debouncer;
pub use engine::EngineHandle;
pub use probe::{dimensions_of, ImageProber};
pub use types::{ClientError, EngineEvent, FailureKind};
