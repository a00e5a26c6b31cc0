mod backend;
mod manager;
mod session;

pub use backend::ExecutionBackend;
pub use manager::{SessionManager, SessionState, StatusSink};
pub use session::{BackendSession, RunMode};
