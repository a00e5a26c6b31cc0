//! Class tables for the bundled person/workspace model.

/// Fixed class ordering; index 0 is the full-body class.
pub const CLASS_LABELS: [&str; 25] = [
    "Body",
    "Face",
    "Head",
    "Hand",
    "Arm",
    "Shoulder",
    "Torso",
    "Leg",
    "Foot",
    "Eye",
    "Mouth",
    "Phone",
    "Laptop",
    "Monitor",
    "Keyboard",
    "Mouse",
    "Headphones",
    "Glasses",
    "Hat",
    "Cup",
    "Bottle",
    "Book",
    "Chair",
    "Pet",
    "Background",
];

/// Classes never surfaced to callers, regardless of confidence. Eye and
/// Mouth are too fine-grained for the renderer; Background is filler.
pub const EXCLUDED_CLASS_IDS: [usize; 3] = [9, 10, 24];

pub fn default_labels() -> Vec<String> {
    CLASS_LABELS.iter().map(|s| s.to_string()).collect()
}

pub fn is_excluded(class_id: usize) -> bool {
    EXCLUDED_CLASS_IDS.contains(&class_id)
}
