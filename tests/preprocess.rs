use vigil_detect::codec::{plan_letterbox, preprocess};
use vigil_detect::common::Normalization;
use vigil_detect::VigilFrame;

fn solid_frame(width: u32, height: u32, rgba: [u8; 4]) -> VigilFrame {
    let mut data = Vec::with_capacity((width * height * 4) as usize);
    for _ in 0..width * height {
        data.extend_from_slice(&rgba);
    }
    VigilFrame::from_rgba(data, width, height).unwrap()
}

#[test]
fn webcam_frame_plan_pads_eighty_rows() {
    let plan = plan_letterbox(640, 480, 640, 640);
    assert_eq!(plan.scale, 1.0);
    assert_eq!(plan.resized_w, 640);
    assert_eq!(plan.resized_h, 480);
    assert_eq!(plan.pad_x, 0);
    assert_eq!(plan.pad_y, 80);
}

#[test]
fn odd_height_difference_truncates_the_top_pad() {
    // 640 - 479 = 161 rows of padding: 80 on top, 81 on the bottom
    let plan = plan_letterbox(640, 479, 640, 640);
    assert_eq!(plan.resized_h, 479);
    assert_eq!(plan.pad_y, 80);
}

#[test]
fn downscaled_frame_keeps_zero_horizontal_padding() {
    let plan = plan_letterbox(1280, 720, 640, 640);
    assert_eq!(plan.scale, 0.5);
    assert_eq!(plan.resized_w, 640);
    assert_eq!(plan.resized_h, 360);
    assert_eq!(plan.pad_x, 0);
    assert_eq!(plan.pad_y, 140);
}

#[test]
fn tensor_is_planar_with_zero_padding() {
    let frame = solid_frame(4, 2, [255, 0, 0, 255]);
    let (tensor, plan) = preprocess(&frame, 4, 4, None).unwrap();

    assert_eq!(tensor.shape(), &[1, 3, 4, 4]);
    assert_eq!(plan.pad_y, 1);

    for x in 0..4 {
        // padding rows stay at the zero fill
        for c in 0..3 {
            assert_eq!(tensor[[0, c, 0, x]], 0.0);
            assert_eq!(tensor[[0, c, 3, x]], 0.0);
        }
        // content rows carry the red channel in plane 0 only
        for row in 1..3 {
            assert_eq!(tensor[[0, 0, row, x]], 1.0);
            assert_eq!(tensor[[0, 1, row, x]], 0.0);
            assert_eq!(tensor[[0, 2, row, x]], 0.0);
        }
    }
}

#[test]
fn normalization_profile_applies_after_scaling() {
    let frame = solid_frame(4, 2, [255, 0, 0, 255]);
    let profile = Normalization {
        mean: [0.5, 0.5, 0.5],
        std: [0.5, 0.5, 0.5],
    };
    let (tensor, plan) = preprocess(&frame, 4, 4, Some(&profile)).unwrap();

    // (1.0 - 0.5) / 0.5 and (0.0 - 0.5) / 0.5 on the content rows
    let row = plan.pad_y as usize;
    assert_eq!(tensor[[0, 0, row, 0]], 1.0);
    assert_eq!(tensor[[0, 1, row, 0]], -1.0);
    assert_eq!(tensor[[0, 2, row, 0]], -1.0);
    // padding is canvas fill, not a normalized black pixel
    assert_eq!(tensor[[0, 0, 0, 0]], 0.0);
}

#[test]
fn resized_frame_lands_between_the_pads() {
    let frame = solid_frame(8, 4, [0, 255, 0, 255]);
    let (tensor, plan) = preprocess(&frame, 4, 4, None).unwrap();

    assert_eq!(plan.scale, 0.5);
    assert_eq!(plan.resized_h, 2);
    assert_eq!(plan.pad_y, 1);
    assert_eq!(tensor.shape(), &[1, 3, 4, 4]);

    for x in 0..4 {
        assert_eq!(tensor[[0, 1, 0, x]], 0.0);
        assert_eq!(tensor[[0, 1, 3, x]], 0.0);
        // a solid frame survives bilinear resampling unchanged
        assert!(tensor[[0, 1, 1, x]] > 0.9);
        assert!(tensor[[0, 1, 2, x]] > 0.9);
    }
}

#[test]
fn mismatched_buffer_is_rejected() {
    assert!(VigilFrame::from_rgba(vec![0u8; 10], 4, 2).is_err());
    assert!(VigilFrame::from_rgba(vec![0u8; 32], 4, 2).is_ok());
}
