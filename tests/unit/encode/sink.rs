use super::*;

fn frame() -> FrameRGBA {
    FrameRGBA::new(2, 2, vec![0; 16], true).unwrap()
}

#[test]
fn in_memory_sink_captures_config_and_frames() {
    let mut sink = InMemorySink::new();
    let cfg = SinkConfig {
        width: 2,
        height: 2,
        fps: 24,
    };
    sink.begin(cfg).unwrap();
    sink.push_frame(FrameIndex(0), &frame()).unwrap();
    sink.push_frame(FrameIndex(1), &frame()).unwrap();
    sink.end().unwrap();

    assert_eq!(sink.config(), Some(cfg));
    assert_eq!(sink.frames().len(), 2);
    assert!(sink.is_finished());
    assert!(!sink.is_aborted());
}

#[test]
fn in_memory_sink_rejects_out_of_order_frames() {
    let mut sink = InMemorySink::new();
    sink.begin(SinkConfig {
        width: 2,
        height: 2,
        fps: 24,
    })
    .unwrap();
    sink.push_frame(FrameIndex(3), &frame()).unwrap();
    assert!(sink.push_frame(FrameIndex(3), &frame()).is_err());
    assert!(sink.push_frame(FrameIndex(1), &frame()).is_err());
}

#[test]
fn abort_discards_frames() {
    let mut sink = InMemorySink::new();
    sink.begin(SinkConfig {
        width: 2,
        height: 2,
        fps: 24,
    })
    .unwrap();
    sink.push_frame(FrameIndex(0), &frame()).unwrap();
    sink.abort();
    assert!(sink.frames().is_empty());
    assert!(sink.is_aborted());
    assert!(!sink.is_finished());
}
