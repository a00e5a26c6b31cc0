use image::RgbImage;
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;
use vigil_detect::common::VigilBox;
use vigil_detect::nms::suppress;
use vigil_detect::VigilDetection;


fn det(class_id: usize, x1: f32, y1: f32, x2: f32, y2: f32, conf: f32, label: &str) -> VigilDetection {
    VigilDetection::default()
        .with_bbox(VigilBox::default().with_x1y1_x2y2(x1, y1, x2, y2))
        .with_class_id(class_id)
        .with_confidence(conf)
        .with_label(label)
}

#[test]
fn suppressed_detections_draw_inside_the_frame() {
    let candidates = vec![
        det(0, 10.0, 10.0, 60.0, 80.0, 0.9, "Body"),
        det(0, 12.0, 12.0, 62.0, 82.0, 0.6, "Body"),
        det(1, 70.0, 20.0, 100.0, 50.0, 0.8, "Face"),
    ];
    let kept = suppress(candidates, 0.45);
    assert_eq!(kept.len(), 2);

    let mut canvas = RgbImage::new(120, 120);
    for detection in &kept {
        let (x, y, w, h) = detection.bbox.as_xy_wh_i32();
        draw_hollow_rect_mut(
            &mut canvas,
            Rect::at(x, y).of_size(w as u32, h as u32),
            colours::get_class_colour(detection.class_id),
        );
    }

    assert_eq!(canvas.get_pixel(10, 10), &colours::get_class_colour(0));
    assert_eq!(canvas.get_pixel(70, 20), &colours::get_class_colour(1));
    assert_eq!(canvas.get_pixel(119, 119), &image::Rgb([0, 0, 0]));
}
