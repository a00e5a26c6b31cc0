use vigil_detect::common::VigilBox;
use vigil_detect::nms::{suppress, Nms};
use vigil_detect::VigilDetection;

fn det(class_id: usize, x1: f32, y1: f32, x2: f32, y2: f32, conf: f32) -> VigilDetection {
    VigilDetection::default()
        .with_bbox(VigilBox::default().with_x1y1_x2y2(x1, y1, x2, y2))
        .with_class_id(class_id)
        .with_confidence(conf)
}

#[test]
fn overlapping_same_class_keeps_the_higher_confidence_box() {
    // IoU = 7500 / 12500 = 0.6, above the 0.45 threshold
    let a = det(0, 0.0, 0.0, 100.0, 100.0, 0.9);
    let b = det(0, 0.0, 25.0, 100.0, 125.0, 0.7);
    assert!((a.iou(&b) - 0.6).abs() < 1e-6);

    let kept = suppress(vec![b, a.clone()], 0.45);
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0], a);
}

#[test]
fn overlapping_different_classes_both_survive() {
    // IoU = 9500 / 10500 ≈ 0.905, far above the threshold
    let a = det(0, 0.0, 0.0, 100.0, 100.0, 0.9);
    let b = det(1, 0.0, 5.0, 100.0, 105.0, 0.7);
    assert!(a.iou(&b) > 0.9);

    let kept = suppress(vec![a, b], 0.45);
    assert_eq!(kept.len(), 2);
    assert_ne!(kept[0].class_id, kept[1].class_id);
}

#[test]
fn suppression_is_idempotent() {
    let candidates = vec![
        det(0, 0.0, 0.0, 100.0, 100.0, 0.9),
        det(0, 0.0, 10.0, 100.0, 110.0, 0.8),
        det(0, 300.0, 300.0, 400.0, 400.0, 0.6),
        det(1, 0.0, 0.0, 100.0, 100.0, 0.5),
        det(1, 2.0, 2.0, 98.0, 98.0, 0.4),
    ];

    let once = suppress(candidates, 0.45);
    let twice = suppress(once.clone(), 0.45);
    assert_eq!(once, twice);
}

#[test]
fn survivors_of_one_class_never_overlap_past_the_threshold() {
    let candidates = vec![
        det(0, 0.0, 0.0, 100.0, 100.0, 0.9),
        det(0, 5.0, 5.0, 105.0, 105.0, 0.8),
        det(0, 50.0, 50.0, 150.0, 150.0, 0.7),
        det(0, 200.0, 200.0, 300.0, 300.0, 0.6),
    ];
    let kept = suppress(candidates, 0.45);
    for (i, a) in kept.iter().enumerate() {
        for b in kept.iter().skip(i + 1) {
            if a.same_class(b) {
                assert!(a.iou(b) < 0.45);
            }
        }
    }
}

#[test]
fn iou_is_symmetric_and_one_on_itself() {
    let a = det(0, 10.0, 20.0, 110.0, 220.0, 0.9);
    let b = det(0, 50.0, 60.0, 150.0, 260.0, 0.8);
    assert!((a.iou(&b) - b.iou(&a)).abs() < 1e-6);
    assert!((a.iou(&a) - 1.0).abs() < 1e-6);
}

#[test]
fn disjoint_boxes_have_zero_iou() {
    let a = det(0, 0.0, 0.0, 10.0, 10.0, 0.9);
    let b = det(0, 100.0, 100.0, 110.0, 110.0, 0.8);
    assert_eq!(a.iou(&b), 0.0);

    // degenerate boxes never produce a negative or NaN ratio
    let empty = det(0, 5.0, 5.0, 5.0, 5.0, 0.9);
    assert_eq!(empty.iou(&empty), 0.0);
}

#[test]
fn confidence_ties_keep_the_original_order() {
    let first = det(0, 0.0, 0.0, 10.0, 10.0, 0.8);
    let second = det(0, 100.0, 100.0, 110.0, 110.0, 0.8);
    let kept = suppress(vec![first.clone(), second.clone()], 0.45);
    assert_eq!(kept, vec![first, second]);
}
