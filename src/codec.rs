pub mod decode;
pub mod mask;
pub mod preprocess;

pub use decode::decode_detections;
pub use mask::decode_mask;
pub use preprocess::{plan_letterbox, preprocess, LetterboxPlan};
