use crate::detection::impl_roboflow::parse_response;
use crate::detection::interface::{DetectError, Status};

#[test]
fn test_parse_predictions() {
    let body = r#"{
        "time": 0.05,
        "image": {"width": 640, "height": 480},
        "predictions": [
            {"x": 320.5, "y": 240.0, "width": 100.0, "height": 200.0,
             "confidence": 0.91, "class": "pushup_complete", "class_id": 0},
            {"x": 10.0, "y": 20.0, "width": 5.0, "height": 6.0,
             "confidence": 0.4, "class": "seated_row_incomplete", "class_id": 3}
        ]
    }"#;

    let parsed = parse_response(body).unwrap();

    assert!(parsed.skipped.is_empty());
    let detections = parsed.detections;
    assert_eq!(detections.len(), 2);
    assert_eq!(detections[0].action, "pushup");
    assert_eq!(detections[0].status, Status::Complete);
    assert_eq!(detections[0].bounding_box.x, 320.5);
    assert_eq!(detections[1].action, "seated_row");
    assert_eq!(detections[1].status, Status::Incomplete);
}

#[test]
fn test_missing_predictions_is_empty() {
    let parsed = parse_response("{}").unwrap();

    assert!(parsed.detections.is_empty());
    assert!(parsed.skipped.is_empty());
}

#[test]
fn test_foreign_class_is_dropped_not_fatal() {
    let body = r#"{"predictions": [
        {"x": 1, "y": 1, "width": 1, "height": 1,
         "confidence": 0.95, "class": "pushup_complete"},
        {"x": 2, "y": 2, "width": 2, "height": 2,
         "confidence": 0.1, "class": "person"},
        {"x": 3, "y": 3, "width": 3, "height": 3,
         "confidence": 0.8, "class": "squat_done"}
    ]}"#;

    let parsed = parse_response(body).unwrap();

    assert_eq!(parsed.detections.len(), 1);
    assert_eq!(parsed.detections[0].action, "pushup");
    assert_eq!(parsed.detections[0].confidence, 0.95);
    assert_eq!(parsed.skipped, vec!["person".to_string(), "squat_done".to_string()]);
}

#[test]
fn test_malformed_body() {
    assert!(matches!(
        parse_response("<html>502 Bad Gateway</html>"),
        Err(DetectError::Malformed(_))
    ));
    assert!(matches!(
        parse_response(r#"{"predictions": [{"x": 1}]}"#),
        Err(DetectError::Malformed(_))
    ));
    assert!(matches!(
        parse_response(r#"{"predictions": "none"}"#),
        Err(DetectError::Malformed(_))
    ));
}
