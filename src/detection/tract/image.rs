use image::{imageops, DynamicImage, RgbImage};
use tract_onnx::prelude::*;

/// Mapping from model input coordinates back to the source frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Letterbox {
    pub scale: f32,
    pub x_offset: f32,
    pub y_offset: f32,
}

impl Letterbox {
    pub fn to_source(&self, x: f32, y: f32) -> (f32, f32) {
        ((x - self.x_offset) / self.scale, (y - self.y_offset) / self.scale)
    }

    pub fn length_to_source(&self, length: f32) -> f32 {
        length / self.scale
    }
}

/// Fits the image inside `width`x`height` keeping its aspect ratio, padding
/// the rest with black.
pub fn letterbox(image: &DynamicImage, width: u32, height: u32) -> (RgbImage, Letterbox) {
    let (w, h) = (image.width().max(1) as f32, image.height().max(1) as f32);
    let scale = (width as f32 / w).min(height as f32 / h);
    let new_w = ((w * scale) as u32).clamp(1, width);
    let new_h = ((h * scale) as u32).clamp(1, height);

    let scaled = image
        .resize_exact(new_w, new_h, imageops::FilterType::Triangle)
        .to_rgb8();

    let x_offset = (width - new_w) / 2;
    let y_offset = (height - new_h) / 2;

    let mut padded = RgbImage::new(width, height);
    imageops::overlay(&mut padded, &scaled, x_offset as i64, y_offset as i64);

    (
        padded,
        Letterbox {
            scale,
            x_offset: x_offset as f32,
            y_offset: y_offset as f32,
        },
    )
}

/// NCHW float tensor with values in [0, 1].
pub fn image_to_tensor(rgb: &RgbImage) -> Tensor {
    let (width, height) = (rgb.width() as usize, rgb.height() as usize);
    tract_ndarray::Array4::from_shape_fn((1, 3, height, width), |(_, c, y, x)| {
        rgb.get_pixel(x as u32, y as u32)[c] as f32 / 255.0
    })
    .into_tensor()
}

pub fn frame_to_tensor(image: &DynamicImage, width: u32, height: u32) -> (Tensor, Letterbox) {
    let (padded, transform) = letterbox(image, width, height);
    (image_to_tensor(&padded), transform)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};

    fn solid(width: u32, height: u32, color: [u8; 3]) -> DynamicImage {
        let mut img = ImageBuffer::new(width, height);
        for pixel in img.pixels_mut() {
            *pixel = Rgb(color);
        }
        DynamicImage::ImageRgb8(img)
    }

    #[test]
    fn test_square_image_fills_tensor() {
        let (tensor, transform) = frame_to_tensor(&solid(100, 100, [255, 0, 0]), 640, 640);

        assert_eq!(tensor.shape(), &[1, 3, 640, 640]);
        assert_eq!(transform.x_offset, 0.0);
        assert_eq!(transform.y_offset, 0.0);

        let slice = tensor.as_slice::<f32>().unwrap();
        assert!(slice[0] > 0.99);
        assert!(slice[640 * 640] < 0.01);
        assert!(slice[2 * 640 * 640] < 0.01);
    }

    #[test]
    fn test_wide_image_is_centered() {
        let (tensor, transform) = frame_to_tensor(&solid(200, 100, [255, 0, 0]), 640, 640);

        assert_eq!(transform.scale, 3.2);
        assert_eq!(transform.y_offset, 160.0);

        let slice = tensor.as_slice::<f32>().unwrap();
        // padding row above the image stays black
        assert_eq!(slice[10 * 640 + 320], 0.0);
        assert!(slice[320 * 640 + 320] > 0.99);
    }

    #[test]
    fn test_letterbox_maps_back_to_source() {
        let (_, transform) = letterbox(&solid(200, 100, [0, 0, 0]), 640, 640);

        let (x, y) = transform.to_source(320.0, 320.0);
        assert!((x - 100.0).abs() < 0.001);
        assert!((y - 50.0).abs() < 0.001);
        assert!((transform.length_to_source(64.0) - 20.0).abs() < 0.001);
    }
}
