mod fs_access;
pub mod labels;
mod model_config;
mod phase_times;
mod runtime_options;
mod vigil_box;
mod vigil_detection;
mod vigil_frame;
mod vigil_mask;

pub use fs_access::AppDirs;
pub use model_config::{ModelConfig, Normalization};
pub use phase_times::PhaseTimes;
pub use runtime_options::RuntimeOptions;
pub use vigil_box::VigilBox;
pub use vigil_detection::VigilDetection;
pub use vigil_frame::VigilFrame;
pub use vigil_mask::VigilMask;
