use serde::{Deserialize, Serialize};

/// Process-wide runtime tuning, passed explicitly to `initialize()` rather
/// than configured through globals.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeOptions {
    /// Path to the onnxruntime shared library. Empty defers to the
    /// `ORT_DYLIB` environment variable.
    pub ort_lib_path: String,
    /// Intra-op thread count; 0 keeps the runtime default.
    pub intra_threads: usize,
    /// Logs a per-phase timing line after every frame.
    pub profile: bool,
}

impl RuntimeOptions {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with_ort_lib_path(mut self, path: &str) -> Self {
        self.ort_lib_path = path.to_string();
        self
    }

    pub fn with_intra_threads(mut self, n: usize) -> Self {
        self.intra_threads = n;
        self
    }

    pub fn with_profile(mut self, profile: bool) -> Self {
        self.profile = profile;
        self
    }
}
