use asl_recog_rs::{BoundingBox, Labels, decode, suppress};

fn letters() -> Labels {
    Labels::parse("A\nB\nC\nD\n")
}

/// Box on a 1x1 source so pixel and normalized geometry agree.
fn unit(x1: f32, y1: f32, x2: f32, y2: f32, conf: f32, name: &str) -> BoundingBox {
    let (w, h) = (x2 - x1, y2 - y1);
    BoundingBox::from_center(x1 + w / 2.0, y1 + h / 2.0, w, h, 1.0, 1.0, conf, 0, name)
}

#[test]
fn test_nms_keeps_a_and_c() {
    // A and B: intersection 0.75 of union 1.25 (IoU 0.6).
    // A and C: intersection 0.1 of union 1.0 (IoU 0.1).
    let a = unit(0.0, 0.0, 1.0, 1.0, 0.9, "A");
    let b = unit(0.25, 0.0, 1.25, 1.0, 0.8, "B");
    let c = unit(0.0, 0.0, 0.1, 1.0, 0.7, "C");
    assert!((a.iou(&b) - 0.6).abs() < 1e-6);
    assert!((a.iou(&c) - 0.1).abs() < 1e-6);

    let kept = suppress(vec![c, b, a], 0.5);
    let names: Vec<&str> = kept.iter().map(|b| b.class_name.as_str()).collect();
    assert_eq!(names, vec!["A", "C"]);
}

#[test]
fn test_nms_is_idempotent() {
    let boxes = vec![
        unit(0.0, 0.0, 0.4, 0.4, 0.95, "A"),
        unit(0.05, 0.05, 0.45, 0.45, 0.9, "B"),
        unit(0.3, 0.3, 0.7, 0.7, 0.6, "C"),
        unit(0.6, 0.6, 1.0, 1.0, 0.5, "D"),
        unit(0.62, 0.6, 1.0, 1.0, 0.4, "A"),
    ];
    let once = suppress(boxes, 0.5);
    let twice = suppress(once.clone(), 0.5);
    assert_eq!(once, twice);
    assert_eq!(once.len(), 3);
}

#[test]
fn test_iou_properties() {
    let boxes = [
        unit(0.0, 0.0, 0.5, 0.5, 0.9, "A"),
        unit(0.25, 0.25, 0.75, 0.75, 0.9, "B"),
        unit(0.6, 0.1, 0.9, 0.3, 0.9, "C"),
        unit(0.1, 0.1, 0.2, 0.9, 0.9, "D"),
    ];
    for a in &boxes {
        assert!((a.iou(a) - 1.0).abs() < 1e-5);
        for b in &boxes {
            let iou = a.iou(b);
            assert!((0.0..=1.0 + 1e-6).contains(&iou));
            assert!((iou - b.iou(a)).abs() < 1e-6);
        }
    }
    assert_eq!(boxes[0].iou(&boxes[2]), 0.0);
}

#[test]
fn test_decode_then_suppress() {
    #[rustfmt::skip]
    let raw = [
        // x     y     w     h      A     B     C     D
        0.30, 0.30, 0.20, 0.20,   0.10, 0.85, 0.00, 0.00,
        0.31, 0.30, 0.20, 0.20,   0.00, 0.00, 0.60, 0.00,
        0.80, 0.80, 0.10, 0.10,   0.00, 0.00, 0.00, 0.45,
        0.50, 0.50, 0.90, 0.90,   0.25, 0.00, 0.00, 0.00,
    ];
    let candidates = decode(&raw, 4, 4, 1, 1, 0.3, &letters()).unwrap();
    assert_eq!(candidates.len(), 3);

    let kept = suppress(candidates, 0.5);
    let summary: Vec<(&str, f32)> = kept
        .iter()
        .map(|b| (b.class_name.as_str(), b.confidence))
        .collect();
    assert_eq!(summary, vec![("B", 0.85), ("D", 0.45)]);
}

#[test]
fn test_decode_emits_iff_strictly_above_threshold() {
    let scores = [0.0, 0.29, 0.3, 0.31, 0.99];
    let mut raw = Vec::new();
    for &s in &scores {
        raw.extend_from_slice(&[0.5, 0.5, 0.1, 0.1, s, 0.0, 0.0, 0.0]);
    }
    let boxes = decode(&raw, scores.len(), 4, 320, 240, 0.3, &letters()).unwrap();
    let confs: Vec<f32> = boxes.iter().map(|b| b.confidence).collect();
    assert_eq!(confs, vec![0.31, 0.99]);
}
