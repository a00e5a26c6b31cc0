use serde::{Deserialize, Serialize};

/// Execution backends the session manager knows how to bring up, one entry
/// per ONNX Runtime execution provider. Device-addressed variants carry the
/// adapter index resolved by the caller.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecutionBackend {
    TensorRT(usize),
    Cuda(usize),
    DirectML(usize),
    CoreML,
    #[default]
    Cpu,
}

impl ExecutionBackend {
    pub fn from_str(name: &str, device_id: usize) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "tensorrt" => Some(Self::TensorRT(device_id)),
            "cuda" => Some(Self::Cuda(device_id)),
            "directml" => Some(Self::DirectML(device_id)),
            "coreml" => Some(Self::CoreML),
            "cpu" => Some(Self::Cpu),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::TensorRT(_) => "TensorRT",
            Self::Cuda(_) => "CUDA",
            Self::DirectML(_) => "DirectML",
            Self::CoreML => "CoreML",
            Self::Cpu => "CPU",
        }
    }

    pub fn device_id(&self) -> Option<usize> {
        match self {
            Self::TensorRT(id) | Self::Cuda(id) | Self::DirectML(id) => Some(*id),
            Self::CoreML | Self::Cpu => None,
        }
    }

    /// Re-targets a device-addressed backend; CoreML and CPU are unchanged.
    pub fn with_device(self, device_id: usize) -> Self {
        match self {
            Self::TensorRT(_) => Self::TensorRT(device_id),
            Self::Cuda(_) => Self::Cuda(device_id),
            Self::DirectML(_) => Self::DirectML(device_id),
            other => other,
        }
    }

    /// GPU-path backends get the quiet run options and the one-shot
    /// default-options retry.
    pub fn is_gpu(&self) -> bool {
        !matches!(self, Self::Cpu)
    }

    /// Fixed-priority candidate list walked by `initialize()`. A preferred
    /// backend moves to the front; `device_index` re-targets device-addressed
    /// entries.
    pub fn candidate_chain(preferred: Option<Self>, device_index: Option<usize>) -> Vec<Self> {
        let id = device_index.unwrap_or(0);
        let mut chain = vec![
            Self::TensorRT(id),
            Self::Cuda(id),
            Self::DirectML(id),
            Self::CoreML,
            Self::Cpu,
        ];
        if let Some(mut preferred) = preferred {
            if let Some(id) = device_index {
                preferred = preferred.with_device(id);
            }
            chain.retain(|candidate| candidate.name() != preferred.name());
            chain.insert(0, preferred);
        }
        chain
    }
}
