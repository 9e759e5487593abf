use crate::config::LocalModelConfig;
use crate::detection::interface::{BoundingBox, DetectError, Detection, DetectionProvider};
use crate::detection::label::{local_label, to_detection};
use crate::detection::tract::image::{frame_to_tensor, Letterbox};
use crate::device_camera::interface::Frame;
use tract_onnx::prelude::*;

/// Candidates below this score are dropped before label mapping; the client
/// applies the real confidence threshold afterwards.
const MIN_CANDIDATE_SCORE: f32 = 0.1;

/// In-process fallback detector running an exported YOLO-style ONNX model.
///
/// Expected output: `[1, boxes, 5 + classes]` where each row is
/// `cx, cy, w, h, objectness, class scores...` in model input pixels, with
/// classes ordered as [`crate::detection::label::LOCAL_MODEL_LABELS`].
pub struct DetectionProviderTractOnnx {
    model: TypedRunnableModel<TypedModel>,
    config: LocalModelConfig,
}

impl DetectionProviderTractOnnx {
    pub fn new(config: LocalModelConfig) -> Result<Self, DetectError> {
        let (width, height) = config.input_shape;
        let model = tract_onnx::onnx()
            .model_for_path(&config.onnx_model_path)
            .and_then(|model| {
                model.with_input_fact(
                    0,
                    InferenceFact::dt_shape(
                        f32::datum_type(),
                        tvec!(1, 3, height as usize, width as usize),
                    ),
                )
            })
            .and_then(|model| model.into_optimized())
            .and_then(|model| model.into_runnable())
            .map_err(|e| DetectError::Init(format!("{e:#}")))?;

        Ok(Self { model, config })
    }
}

impl DetectionProvider for DetectionProviderTractOnnx {
    fn detect(&self, frame: &Frame) -> Result<Vec<Detection>, DetectError> {
        let (width, height) = self.config.input_shape;
        let (input, transform) = frame_to_tensor(frame.as_ref(), width, height);

        let outputs = self
            .model
            .run(tvec!(input.into_tvalue()))
            .map_err(|e| DetectError::Inference(format!("{e:#}")))?;

        let output = outputs
            .first()
            .ok_or_else(|| DetectError::Inference("model produced no outputs".to_string()))?
            .to_array_view::<f32>()
            .map_err(|e| DetectError::Inference(format!("{e:#}")))?;

        let shape = output.shape().to_vec();
        if shape.len() != 3 || shape[2] <= 5 {
            return Err(DetectError::Malformed(format!(
                "unexpected output shape {shape:?}"
            )));
        }

        let num_classes = shape[2] - 5;
        let mut detections = Vec::new();

        for i in 0..shape[1] {
            let row: Vec<f32> = (0..shape[2]).map(|j| output[[0, i, j]]).collect();
            if let Some(detection) = decode_row(&row, num_classes, &transform)? {
                detections.push(detection);
            }
        }

        detections.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
        Ok(detections)
    }

    fn name(&self) -> &str {
        "tract-onnx"
    }
}

/// Decodes one `cx, cy, w, h, objectness, scores...` row. Returns `None` for
/// rows under the candidate floor or with a class outside the label table or
/// not of the `<action>_<status>` form.
pub fn decode_row(
    row: &[f32],
    num_classes: usize,
    transform: &Letterbox,
) -> Result<Option<Detection>, DetectError> {
    if row.len() < 5 + num_classes {
        return Err(DetectError::Malformed(format!(
            "row has {} values, expected {}",
            row.len(),
            5 + num_classes
        )));
    }

    let objectness = row[4];
    if objectness <= MIN_CANDIDATE_SCORE {
        return Ok(None);
    }

    let (class_index, class_score) = row[5..5 + num_classes]
        .iter()
        .copied()
        .enumerate()
        .fold((0, f32::MIN), |best, (index, score)| {
            if score > best.1 {
                (index, score)
            } else {
                best
            }
        });

    let confidence = objectness * class_score;
    if confidence <= MIN_CANDIDATE_SCORE {
        return Ok(None);
    }

    let Some(class) = local_label(class_index) else {
        return Ok(None);
    };

    let (x, y) = transform.to_source(row[0], row[1]);
    let bounding_box = BoundingBox {
        x,
        y,
        width: transform.length_to_source(row[2]),
        height: transform.length_to_source(row[3]),
    };

    Ok(to_detection(class, confidence, bounding_box).ok())
}
