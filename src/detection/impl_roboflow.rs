//! Roboflow hosted inference: multipart POST of a JPEG frame, JSON predictions back.

use crate::config::RoboflowConfig;
use crate::detection::interface::{BoundingBox, DetectError, Detection, DetectionProvider};
use crate::detection::label::to_detection;
use crate::device_camera::interface::Frame;
use crate::library::logger::interface::Logger;
use image::{DynamicImage, ImageFormat};
use serde::Deserialize;
use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct RoboflowResponse {
    #[serde(default)]
    predictions: Vec<RoboflowPrediction>,
}

#[derive(Debug, Deserialize)]
struct RoboflowPrediction {
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    confidence: f32,
    class: String,
}

pub struct DetectionProviderRoboflow {
    agent: ureq::Agent,
    endpoint: String,
    api_key: String,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl DetectionProviderRoboflow {
    /// `timeout` bounds the socket operations; the client applies its own
    /// per-attempt deadline on top.
    pub fn new(
        config: &RoboflowConfig,
        timeout: Duration,
        logger: Arc<dyn Logger + Send + Sync>,
    ) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        let logger = logger.with_namespace("roboflow");
        let _ = logger.info(&format!("endpoint {}", config.endpoint));

        Self {
            agent,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            logger,
        }
    }
}

impl DetectionProvider for DetectionProviderRoboflow {
    fn detect(&self, frame: &Frame) -> Result<Vec<Detection>, DetectError> {
        let jpeg = encode_jpeg(frame)?;

        let boundary = format!(
            "----repcounter{:016x}",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        );

        let mut body = Vec::with_capacity(jpeg.len() + 256);
        write_multipart_file(&mut body, &boundary, "file", "frame.jpg", "image/jpeg", &jpeg);
        body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());

        let response = self
            .agent
            .post(&self.endpoint)
            .query("api_key", &self.api_key)
            .query("format", "json")
            .set(
                "Content-Type",
                &format!("multipart/form-data; boundary={boundary}"),
            )
            .set("Accept", "application/json")
            .send_bytes(&body);

        let text = match response {
            Ok(response) => response
                .into_string()
                .map_err(|e| DetectError::Transport(e.to_string()))?,
            Err(ureq::Error::Status(code, _)) => return Err(DetectError::Status(code)),
            Err(ureq::Error::Transport(transport)) => {
                return Err(DetectError::Transport(transport.to_string()))
            }
        };

        let parsed = parse_response(&text)?;
        for class in &parsed.skipped {
            let _ = self
                .logger
                .warn(&format!("ignoring prediction with class {class:?}"));
        }
        let _ = self
            .logger
            .info(&format!("{} predictions", parsed.detections.len()));
        Ok(parsed.detections)
    }

    fn name(&self) -> &str {
        "roboflow"
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParsedResponse {
    pub detections: Vec<Detection>,
    /// Classes that are not `<action>_<status>`; those boxes are dropped.
    pub skipped: Vec<String>,
}

/// Decodes a Roboflow JSON body. A missing `predictions` field is an empty
/// result; a body that does not fit the shape is malformed.
pub fn parse_response(body: &str) -> Result<ParsedResponse, DetectError> {
    let response: RoboflowResponse =
        serde_json::from_str(body).map_err(|e| DetectError::Malformed(e.to_string()))?;

    let mut parsed = ParsedResponse::default();
    for p in response.predictions {
        let bounding_box = BoundingBox {
            x: p.x,
            y: p.y,
            width: p.width,
            height: p.height,
        };
        match to_detection(&p.class, p.confidence, bounding_box) {
            Ok(detection) => parsed.detections.push(detection),
            Err(_) => parsed.skipped.push(p.class),
        }
    }
    Ok(parsed)
}

fn encode_jpeg(frame: &Frame) -> Result<Vec<u8>, DetectError> {
    // The JPEG encoder rejects alpha channels.
    let rgb = DynamicImage::ImageRgb8(frame.to_rgb8());
    let mut jpeg = Cursor::new(Vec::new());
    rgb.write_to(&mut jpeg, ImageFormat::Jpeg)
        .map_err(|e| DetectError::Encode(e.to_string()))?;
    Ok(jpeg.into_inner())
}

fn write_multipart_file(
    body: &mut Vec<u8>,
    boundary: &str,
    field: &str,
    filename: &str,
    content_type: &str,
    data: &[u8],
) {
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n\
             Content-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(b"\r\n");
}
