use thiserror::Error;

/// Errors surfaced by the detection and segmentation pipelines.
///
/// `BackendUnavailable` and `SessionConstructionFailed` are recovered inside
/// `initialize()` by falling through to the next candidate backend; the rest
/// reach the caller.
#[derive(Debug, Error)]
pub enum VigilError {
    #[error("failed to initialize the onnxruntime environment: {0}")]
    EnvironmentInit(#[source] ort::Error),

    #[error("{backend} execution provider is not available")]
    BackendUnavailable { backend: &'static str },

    #[error("failed to construct inference session on {backend}: {source}")]
    SessionConstructionFailed {
        backend: &'static str,
        #[source]
        source: anyhow::Error,
    },

    /// Every candidate in the fallback chain was rejected; carries the last
    /// underlying rejection.
    #[error("all execution backends failed; last error: {last}")]
    AllBackendsFailed {
        #[source]
        last: Box<VigilError>,
    },

    /// `detect`/`segment` called without a ready session.
    #[error("no ready inference session; call initialize() first")]
    NotInitialized,

    /// The session run failed, including the default-options retry on GPU
    /// backends.
    #[error("inference run failed: {0}")]
    InferenceRunFailed(#[source] ort::Error),

    /// The model produced an output tensor of a rank the codec does not know.
    /// Pipelines treat this as an empty result for the frame, not a fatal
    /// error.
    #[error("unrecognized output tensor shape {0:?}")]
    DecodeShapeUnrecognized(Vec<usize>),

    #[error("failed to preprocess frame: {0}")]
    Preprocess(#[from] anyhow::Error),
}
