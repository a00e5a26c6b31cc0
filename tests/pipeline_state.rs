use vigil_detect::pipeline::worker;
use vigil_detect::{
    DetectionPipeline, ModelConfig, RuntimeOptions, SegmentationPipeline, VigilError, VigilFrame,
};

fn frame() -> VigilFrame {
    VigilFrame::from_rgba(vec![0u8; 16 * 16 * 4], 16, 16).unwrap()
}

fn config() -> ModelConfig {
    ModelConfig::new("models/does-not-exist.onnx").with_input_shape([1, 3, 16, 16])
}

#[test]
fn detect_before_initialize_is_a_usage_error() {
    let mut pipeline = DetectionPipeline::new(config(), RuntimeOptions::default());
    assert!(pipeline.active_provider().is_none());

    match pipeline.detect(&frame()) {
        Err(VigilError::NotInitialized) => {}
        other => panic!("expected NotInitialized, got {other:?}"),
    }
    // no tensor work happened
    assert_eq!(pipeline.timings().frames(), 0);
}

#[test]
fn segment_before_initialize_is_a_usage_error() {
    let mut pipeline = SegmentationPipeline::new(config(), RuntimeOptions::default());
    assert!(pipeline.active_provider().is_none());

    match pipeline.segment(&frame()) {
        Err(VigilError::NotInitialized) => {}
        other => panic!("expected NotInitialized, got {other:?}"),
    }
    assert_eq!(pipeline.timings().frames(), 0);
}

#[test]
fn dispose_tolerates_repeated_calls() {
    let mut pipeline = DetectionPipeline::new(config(), RuntimeOptions::default());
    pipeline.dispose();
    pipeline.dispose();
    assert!(pipeline.active_provider().is_none());
    assert!(matches!(
        pipeline.detect(&frame()),
        Err(VigilError::NotInitialized)
    ));
}

#[test]
fn worker_loop_stops_cleanly_when_the_source_closes() {
    let (frame_tx, _detections_rx, channels) = worker::detection_channels(4);
    drop(frame_tx);

    let pipeline = worker::share(DetectionPipeline::new(config(), RuntimeOptions::default()));
    assert!(worker::run_detection_loop(&pipeline, &channels).is_ok());
}

#[test]
fn worker_loop_aborts_without_a_session() {
    let (frame_tx, _detections_rx, channels) = worker::detection_channels(4);
    frame_tx.send(frame()).unwrap();

    let pipeline = worker::share(DetectionPipeline::new(config(), RuntimeOptions::default()));
    match worker::run_detection_loop(&pipeline, &channels) {
        Err(VigilError::NotInitialized) => {}
        other => panic!("expected NotInitialized, got {other:?}"),
    }
}
