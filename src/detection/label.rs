use crate::detection::interface::{BoundingBox, DetectError, Detection, Status};

/// Class order of the local model's output tensor.
pub const LOCAL_MODEL_LABELS: [&str; 8] = [
    "pushup_complete",
    "pushup_incomplete",
    "seated_row_complete",
    "seated_row_incomplete",
    "seated_shoulder_press_complete",
    "seated_shoulder_press_incomplete",
    "squat_complete",
    "squat_incomplete",
];

/// Splits `"<action>_<status>"` at the last underscore, so multi-word actions
/// like `seated_shoulder_press` stay intact.
pub fn parse_class(class: &str) -> Result<(String, Status), DetectError> {
    let (action, status) = class
        .rsplit_once('_')
        .ok_or_else(|| DetectError::Malformed(format!("class without status: {class:?}")))?;

    let status = match status.to_ascii_lowercase().as_str() {
        "complete" => Status::Complete,
        "incomplete" => Status::Incomplete,
        _ => {
            return Err(DetectError::Malformed(format!(
                "unknown status in class {class:?}"
            )))
        }
    };

    if action.is_empty() {
        return Err(DetectError::Malformed(format!("empty action in class {class:?}")));
    }

    Ok((action.to_ascii_lowercase(), status))
}

pub fn to_detection(
    class: &str,
    confidence: f32,
    bounding_box: BoundingBox,
) -> Result<Detection, DetectError> {
    let (action, status) = parse_class(class)?;
    Ok(Detection {
        action,
        status,
        confidence: confidence.clamp(0.0, 1.0),
        bounding_box,
    })
}

pub fn local_label(class_index: usize) -> Option<&'static str> {
    LOCAL_MODEL_LABELS.get(class_index).copied()
}
