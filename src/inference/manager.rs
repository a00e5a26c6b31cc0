use std::sync::Arc;

use crate::common::{ModelConfig, RuntimeOptions};
use crate::error::VigilError;
use crate::inference::{BackendSession, ExecutionBackend};

/// Observational callback fed human-readable phase strings for UI display.
/// No control-flow effect.
pub type StatusSink = Arc<dyn Fn(&str) + Send + Sync>;

/// Lifecycle of the managed session. `Disposed` is terminal for that
/// session; a later `initialize()` constructs a fresh one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Uninitialized,
    Initializing,
    Ready,
    Failed,
    Disposed,
}

/// Owns the single live inference session of a pipeline and the backend
/// fallback policy used to create it. At most one non-released session
/// exists per manager at any time.
pub struct SessionManager {
    state: SessionState,
    session: Option<BackendSession>,
    active: Option<ExecutionBackend>,
    status_sink: Option<StatusSink>,
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionManager {
    pub fn new() -> Self {
        Self {
            state: SessionState::Uninitialized,
            session: None,
            active: None,
            status_sink: None,
        }
    }

    pub fn set_status_sink(&mut self, sink: StatusSink) {
        self.status_sink = Some(sink);
    }

    fn emit(&self, message: &str) {
        if let Some(sink) = &self.status_sink {
            sink(message);
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn active(&self) -> Option<ExecutionBackend> {
        self.active
    }

    pub fn active_provider(&self) -> Option<&'static str> {
        self.active.map(|backend| backend.name())
    }

    /// Walks the candidate chain until a session comes up; fails only after
    /// every candidate has been rejected. Callers serialize this against
    /// `dispose()` and against in-flight runs.
    pub fn initialize(
        &mut self,
        config: &ModelConfig,
        runtime: &RuntimeOptions,
        device_index: Option<usize>,
    ) -> Result<ExecutionBackend, VigilError> {
        if self.session.is_some() {
            log::warn!("initialize() called over a live session; releasing it first");
            self.dispose();
        }
        self.state = SessionState::Initializing;
        self.emit("Loading model...");

        if let Err(err) = commit_environment(runtime) {
            self.state = SessionState::Failed;
            return Err(err);
        }

        let chain = ExecutionBackend::candidate_chain(config.preferred_backend, device_index);
        let sink = self.status_sink.clone();
        let selected = select_backend(
            &chain,
            |backend| BackendSession::build(config, runtime, backend),
            |message| {
                if let Some(sink) = &sink {
                    sink(message);
                }
            },
        );

        match selected {
            Ok((backend, session)) => {
                self.session = Some(session);
                self.active = Some(backend);
                self.state = SessionState::Ready;
                self.emit(&format!("Session ready on {}", backend.name()));
                log::info!("Inference session ready on {}", backend.name());
                Ok(backend)
            }
            Err(err) => {
                self.session = None;
                self.active = None;
                self.state = SessionState::Failed;
                Err(err)
            }
        }
    }

    /// Releases the session. Safe to call repeatedly and in any state: the
    /// handle is taken out of its slot before release, so a second call
    /// observes nothing to release. Release never blocks teardown.
    pub fn dispose(&mut self) {
        self.emit("Releasing session...");
        match self.session.take() {
            Some(session) => {
                drop(session);
                log::debug!("inference session released");
            }
            None => log::debug!("dispose(): no live session"),
        }
        self.active = None;
        self.state = SessionState::Disposed;
    }

    /// The live session, or `NotInitialized` when none is ready.
    pub fn session_mut(&mut self) -> Result<&mut BackendSession, VigilError> {
        if self.state != SessionState::Ready {
            return Err(VigilError::NotInitialized);
        }
        self.session.as_mut().ok_or(VigilError::NotInitialized)
    }
}

fn commit_environment(runtime: &RuntimeOptions) -> Result<(), VigilError> {
    let builder = if runtime.ort_lib_path.is_empty() {
        ort::init()
    } else {
        ort::init_from(&runtime.ort_lib_path)
    };
    builder
        .commit()
        .map(|_| ())
        .map_err(VigilError::EnvironmentInit)
}

/// Tries each candidate in order; the first successful build wins. Generic
/// over the build result so the walk itself stays testable without a live
/// runtime.
pub(crate) fn select_backend<S>(
    candidates: &[ExecutionBackend],
    mut build: impl FnMut(ExecutionBackend) -> Result<S, VigilError>,
    mut emit: impl FnMut(&str),
) -> Result<(ExecutionBackend, S), VigilError> {
    let mut last: Option<VigilError> = None;
    for &candidate in candidates {
        emit(&format!("Trying {}...", candidate.name()));
        match build(candidate) {
            Ok(session) => return Ok((candidate, session)),
            Err(err) => {
                log::warn!("{} rejected: {}", candidate.name(), err);
                last = Some(err);
            }
        }
    }
    Err(VigilError::AllBackendsFailed {
        last: Box::new(last.unwrap_or(VigilError::BackendUnavailable { backend: "none" })),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain() -> Vec<ExecutionBackend> {
        ExecutionBackend::candidate_chain(None, None)
    }

    #[test]
    fn default_chain_ends_at_cpu() {
        let chain = chain();
        assert_eq!(chain.len(), 5);
        assert_eq!(chain.first(), Some(&ExecutionBackend::TensorRT(0)));
        assert_eq!(chain.last(), Some(&ExecutionBackend::Cpu));
    }

    #[test]
    fn preferred_backend_moves_to_front_without_duplication() {
        let chain =
            ExecutionBackend::candidate_chain(Some(ExecutionBackend::DirectML(0)), Some(2));
        assert_eq!(chain.len(), 5);
        assert_eq!(chain[0], ExecutionBackend::DirectML(2));
        assert_eq!(chain.iter().filter(|b| b.name() == "DirectML").count(), 1);
    }

    #[test]
    fn first_successful_candidate_wins() {
        let result = select_backend(
            &chain(),
            |backend| match backend {
                ExecutionBackend::Cuda(_) => Ok("session"),
                _ => Err(VigilError::BackendUnavailable {
                    backend: backend.name(),
                }),
            },
            |_| {},
        );
        let (backend, session) = result.unwrap();
        assert_eq!(backend, ExecutionBackend::Cuda(0));
        assert_eq!(session, "session");
    }

    #[test]
    fn exhausted_chain_surfaces_the_last_error() {
        let mut tried = Vec::new();
        let mut statuses = Vec::new();
        let result: Result<(ExecutionBackend, ()), _> = select_backend(
            &chain(),
            |backend| {
                tried.push(backend.name());
                Err(VigilError::BackendUnavailable {
                    backend: backend.name(),
                })
            },
            |message| statuses.push(message.to_string()),
        );
        assert_eq!(tried, ["TensorRT", "CUDA", "DirectML", "CoreML", "CPU"]);
        assert_eq!(statuses[0], "Trying TensorRT...");
        match result {
            Err(VigilError::AllBackendsFailed { last }) => match *last {
                VigilError::BackendUnavailable { backend } => assert_eq!(backend, "CPU"),
                other => panic!("unexpected inner error: {other}"),
            },
            other => panic!("expected AllBackendsFailed, got {other:?}"),
        }
    }

    #[test]
    fn dispose_is_idempotent_and_clears_the_provider() {
        let mut manager = SessionManager::new();
        assert_eq!(manager.state(), SessionState::Uninitialized);
        manager.dispose();
        manager.dispose();
        assert_eq!(manager.state(), SessionState::Disposed);
        assert!(manager.active_provider().is_none());
        assert!(matches!(
            manager.session_mut(),
            Err(VigilError::NotInitialized)
        ));
    }
}
