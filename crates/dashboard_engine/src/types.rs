use std::fmt;

use dashboard_core::{
    ImageDimensions, ProbeGeneration, RequestSeq, SkuRecord, StatsMap, TimerId, Workflow,
};

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    SkusLoaded {
        seq: RequestSeq,
        result: Result<Vec<SkuRecord>, ClientError>,
    },
    StatsLoaded {
        seq: RequestSeq,
        result: Result<StatsMap, ClientError>,
    },
    WorkflowsLoaded {
        seq: RequestSeq,
        result: Result<Vec<Workflow>, ClientError>,
    },
    DebounceElapsed {
        timer: TimerId,
    },
    ImagesProbed {
        generation: ProbeGeneration,
        dimensions: Vec<(String, Option<ImageDimensions>)>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct ClientError {
    pub kind: FailureKind,
    pub message: String,
}

impl ClientError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    /// The endpoint is optional and was not configured.
    MissingEndpoint,
    HttpStatus(u16),
    Timeout,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    Decode,
    /// The request task died before producing a result.
    TaskFailed,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::MissingEndpoint => write!(f, "endpoint not configured"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::Decode => write!(f, "malformed response"),
            FailureKind::TaskFailed => write!(f, "request task failed"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}
