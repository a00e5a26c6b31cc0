use anyhow::anyhow;
use half::{bf16, f16};
use ndarray::{Array4, ArrayD, IxDyn};
use ort::execution_providers::{
    CPUExecutionProvider, CUDAExecutionProvider, CoreMLExecutionProvider,
    DirectMLExecutionProvider, ExecutionProvider, TensorRTExecutionProvider,
};
use ort::logging::LogLevel;
use ort::session::builder::{GraphOptimizationLevel, SessionBuilder};
use ort::session::{RunOptions, Session};
use ort::value::{DynValue, TensorRef};
use regex::Regex;

use crate::common::{AppDirs, ModelConfig, RuntimeOptions};
use crate::error::VigilError;
use crate::inference::ExecutionBackend;
use crate::utils::human_bytes;

/// Whether a run uses the tagged quiet options or the runtime defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Quiet,
    Default,
}

/// One live ONNX Runtime session bound to a concrete execution backend,
/// together with the IO names resolved from the model.
pub struct BackendSession {
    session: Session,
    backend: ExecutionBackend,
    input_name: String,
    output_names: Vec<String>,
    quiet_options: RunOptions,
}

impl BackendSession {
    /// Probes and registers `backend` on a fresh builder, then compiles the
    /// model into a session. A failure drops the partially-built session.
    pub fn build(
        config: &ModelConfig,
        runtime: &RuntimeOptions,
        backend: ExecutionBackend,
    ) -> Result<Self, VigilError> {
        let mut builder = Session::builder().map_err(|e| construction(backend, e.into()))?;

        match backend {
            ExecutionBackend::TensorRT(device_id) => Self::register_trt(&mut builder, device_id)?,
            ExecutionBackend::Cuda(device_id) => Self::register_cuda(&mut builder, device_id)?,
            ExecutionBackend::DirectML(device_id) => {
                Self::register_directml(&mut builder, device_id)?
            }
            ExecutionBackend::CoreML => Self::register_coreml(&mut builder)?,
            ExecutionBackend::Cpu => Self::register_cpu(&mut builder)?,
        }

        let mut builder = builder
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| construction(backend, e.into()))?;
        if backend.is_gpu() {
            // GPU providers are chatty; keep session logs to errors
            builder = builder
                .with_log_level(LogLevel::Error)
                .map_err(|e| construction(backend, e.into()))?;
        }
        if runtime.intra_threads > 0 {
            builder = builder
                .with_intra_threads(runtime.intra_threads)
                .map_err(|e| construction(backend, e.into()))?;
        }

        let session = builder
            .commit_from_file(&config.model_path)
            .map_err(|e| construction(backend, e.into()))?;

        let input_name = session
            .inputs
            .first()
            .map(|input| input.name.clone())
            .ok_or_else(|| construction(backend, anyhow!("model has no inputs")))?;
        let output_names: Vec<String> = session
            .outputs
            .iter()
            .map(|output| output.name.clone())
            .collect();
        if output_names.is_empty() {
            return Err(construction(backend, anyhow!("model has no outputs")));
        }

        let mut quiet_options = RunOptions::new().map_err(|e| construction(backend, e.into()))?;
        quiet_options
            .set_tag("vigil-quiet")
            .map_err(|e| construction(backend, e.into()))?;

        let weights = std::fs::metadata(&config.model_path)
            .map(|m| m.len())
            .unwrap_or(0);
        log::info!(
            "Backend: ONNXRuntime | Device: {} | Model: {}",
            backend.name(),
            human_bytes(weights as f64),
        );

        Ok(Self {
            session,
            backend,
            input_name,
            output_names,
            quiet_options,
        })
    }

    fn register_trt(builder: &mut SessionBuilder, device_id: usize) -> Result<(), VigilError> {
        let mut ep = TensorRTExecutionProvider::default()
            .with_device_id(device_id as i32)
            .with_fp16(false)
            .with_timing_cache(false);
        if let Ok(cache_dir) = AppDirs::Cache.path_with_subs(&["trt-engine-cache"]) {
            ep = ep
                .with_engine_cache(true)
                .with_engine_cache_path(cache_dir.to_string_lossy());
        }
        if !matches!(ep.is_available(), Ok(true)) {
            return Err(VigilError::BackendUnavailable {
                backend: "TensorRT",
            });
        }
        match ep.register(builder) {
            Ok(_) => {
                log::info!("Initial model serialization with TensorRT may take some time");
                Ok(())
            }
            Err(err) => Err(VigilError::SessionConstructionFailed {
                backend: "TensorRT",
                source: anyhow!("registration failed: {err:?}"),
            }),
        }
    }

    fn register_cuda(builder: &mut SessionBuilder, device_id: usize) -> Result<(), VigilError> {
        let ep = CUDAExecutionProvider::default().with_device_id(device_id as i32);
        if !matches!(ep.is_available(), Ok(true)) {
            return Err(VigilError::BackendUnavailable { backend: "CUDA" });
        }
        match ep.register(builder) {
            Ok(_) => Ok(()),
            Err(err) => Err(VigilError::SessionConstructionFailed {
                backend: "CUDA",
                source: anyhow!("registration failed: {err:?}"),
            }),
        }
    }

    fn register_directml(builder: &mut SessionBuilder, device_id: usize) -> Result<(), VigilError> {
        let ep = DirectMLExecutionProvider::default().with_device_id(device_id as i32);
        if !matches!(ep.is_available(), Ok(true)) {
            return Err(VigilError::BackendUnavailable {
                backend: "DirectML",
            });
        }
        match ep.register(builder) {
            Ok(_) => Ok(()),
            Err(err) => Err(VigilError::SessionConstructionFailed {
                backend: "DirectML",
                source: anyhow!("registration failed: {err:?}"),
            }),
        }
    }

    fn register_coreml(builder: &mut SessionBuilder) -> Result<(), VigilError> {
        let ep = CoreMLExecutionProvider::default();
        if !matches!(ep.is_available(), Ok(true)) {
            return Err(VigilError::BackendUnavailable { backend: "CoreML" });
        }
        match ep.register(builder) {
            Ok(_) => Ok(()),
            Err(err) => Err(VigilError::SessionConstructionFailed {
                backend: "CoreML",
                source: anyhow!("registration failed: {err:?}"),
            }),
        }
    }

    fn register_cpu(builder: &mut SessionBuilder) -> Result<(), VigilError> {
        let ep = CPUExecutionProvider::default();
        if !matches!(ep.is_available(), Ok(true)) {
            return Err(VigilError::BackendUnavailable { backend: "CPU" });
        }
        match ep.register(builder) {
            Ok(_) => Ok(()),
            Err(err) => Err(VigilError::SessionConstructionFailed {
                backend: "CPU",
                source: anyhow!("registration failed: {err:?}"),
            }),
        }
    }

    pub fn backend(&self) -> ExecutionBackend {
        self.backend
    }

    pub fn input_name(&self) -> &str {
        &self.input_name
    }

    pub fn output_names(&self) -> &[String] {
        &self.output_names
    }

    /// Runs the session on one input tensor and extracts every output as an
    /// f32 tensor, converting half and integer outputs along the way.
    pub fn run(
        &mut self,
        input: &Array4<f32>,
        mode: RunMode,
    ) -> Result<Vec<ArrayD<f32>>, ort::Error> {
        let tensor = TensorRef::from_array_view(input.view())?;
        let inputs = ort::inputs![self.input_name.as_str() => tensor];
        let outputs = match mode {
            RunMode::Quiet => self.session.run_with_options(inputs, &self.quiet_options)?,
            RunMode::Default => self.session.run(inputs)?,
        };

        let mut extracted = Vec::with_capacity(self.output_names.len());
        for name in &self.output_names {
            extracted.push(extract_f32(&outputs[name.as_str()])?);
        }
        Ok(extracted)
    }

    /// Class names embedded in the model metadata, when present.
    /// String format: `{0: 'Body', 1: 'Face', ...}`.
    pub fn metadata_class_names(&self) -> Option<Vec<String>> {
        let raw = match self.session.metadata() {
            Ok(metadata) => metadata.custom("names").ok().flatten()?,
            Err(_) => return None,
        };
        let re = Regex::new(r#"(['"])([-()\w '"]+)(['"])"#).ok()?;
        let mut names = Vec::new();
        for (_, [_, name, _]) in re.captures_iter(&raw).map(|c| c.extract()) {
            names.push(name.to_string());
        }
        Some(names)
    }
}

fn construction(backend: ExecutionBackend, source: anyhow::Error) -> VigilError {
    VigilError::SessionConstructionFailed {
        backend: backend.name(),
        source,
    }
}

fn extract_f32(value: &DynValue) -> Result<ArrayD<f32>, ort::Error> {
    let first = match value.try_extract_tensor::<f32>() {
        Ok((shape, data)) => return Ok(to_array(shape, data.to_vec())),
        Err(err) => err,
    };
    if let Ok((shape, data)) = value.try_extract_tensor::<f16>() {
        return Ok(to_array(shape, data.iter().map(|v| v.to_f32()).collect()));
    }
    if let Ok((shape, data)) = value.try_extract_tensor::<bf16>() {
        return Ok(to_array(shape, data.iter().map(|v| v.to_f32()).collect()));
    }
    if let Ok((shape, data)) = value.try_extract_tensor::<i64>() {
        return Ok(to_array(shape, data.iter().map(|&v| v as f32).collect()));
    }
    if let Ok((shape, data)) = value.try_extract_tensor::<i32>() {
        return Ok(to_array(shape, data.iter().map(|&v| v as f32).collect()));
    }
    if let Ok((shape, data)) = value.try_extract_tensor::<u8>() {
        return Ok(to_array(shape, data.iter().map(|&v| v as f32).collect()));
    }
    Err(first)
}

fn to_array(shape: &[i64], data: Vec<f32>) -> ArrayD<f32> {
    let dims: Vec<usize> = shape.iter().map(|&d| d.max(0) as usize).collect();
    ArrayD::from_shape_vec(IxDyn(&dims), data).unwrap_or_else(|_| ArrayD::zeros(IxDyn(&[0])))
}
