use crate::image_classifier::models::model_config::Normalization;
use image::{imageops, DynamicImage, RgbImage};
use tract_onnx::prelude::*;

/// Fits the image inside `width` x `height`, keeping its aspect ratio and
/// centering it on a black canvas.
pub fn resize_image(image: &DynamicImage, width: u32, height: u32) -> RgbImage {
    let (w, h) = (image.width() as f32, image.height() as f32);
    let scale = (width as f32 / w).min(height as f32 / h);
    let new_w = ((w * scale).round() as u32).clamp(1, width);
    let new_h = ((h * scale).round() as u32).clamp(1, height);

    if new_w == width && new_h == height {
        return image
            .resize_exact(width, height, imageops::FilterType::Triangle)
            .to_rgb8();
    }

    let scaled = image
        .resize_exact(new_w, new_h, imageops::FilterType::Triangle)
        .to_rgb8();

    let mut padded = RgbImage::new(width, height);
    let x_offset = (width - new_w) / 2;
    let y_offset = (height - new_h) / 2;
    imageops::replace(&mut padded, &scaled, x_offset as i64, y_offset as i64);

    padded
}

fn image_to_tensor(rgb: &RgbImage, normalization: Normalization) -> Tensor {
    let (width, height) = (rgb.width() as usize, rgb.height() as usize);

    tract_ndarray::Array4::from_shape_fn((1, 3, height, width), |(_, c, y, x)| {
        let value = rgb.get_pixel(x as u32, y as u32)[c] as f32 / 255.0;
        (value - normalization.mean[c]) / normalization.std[c]
    })
    .into_tensor()
}

/// NCHW float tensor ready for the network.
pub fn resize_image_to_tensor(
    image: &DynamicImage,
    width: u32,
    height: u32,
    normalization: Normalization,
) -> Tensor {
    let resized = resize_image(image, width, height);
    image_to_tensor(&resized, normalization)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageBuffer, Rgb};

    fn solid(width: u32, height: u32, color: [u8; 3]) -> DynamicImage {
        let mut img = ImageBuffer::new(width, height);
        for pixel in img.pixels_mut() {
            *pixel = Rgb(color);
        }
        DynamicImage::ImageRgb8(img)
    }

    #[test]
    fn test_image_to_tensor_square() {
        let image = solid(100, 100, [255, 0, 0]);

        let tensor = resize_image_to_tensor(&image, 224, 224, Normalization::UNIT);
        assert_eq!(tensor.shape(), &[1, 3, 224, 224]);

        let slice = tensor.as_slice::<f32>().unwrap();
        assert_eq!(slice[0], 1.0);
        assert_eq!(slice[224 * 224], 0.0);
        assert_eq!(slice[2 * 224 * 224], 0.0);
    }

    #[test]
    fn test_image_to_tensor_rectangle_is_centered() {
        let image = solid(200, 100, [255, 0, 0]);

        let tensor = resize_image_to_tensor(&image, 224, 224, Normalization::UNIT);
        let slice = tensor.as_slice::<f32>().unwrap();

        // Red channel: padded black at the top row, image at the center.
        assert_eq!(slice[0], 0.0);
        assert_eq!(slice[112 * 224 + 112], 1.0);
    }

    #[test]
    fn test_image_to_tensor_normalization() {
        let image = solid(10, 10, [128, 128, 128]);

        let tensor = resize_image_to_tensor(&image, 10, 10, Normalization::IMAGENET);
        let slice = tensor.as_slice::<f32>().unwrap();

        let gray = 128.0 / 255.0;
        let expected_red = (gray - 0.485) / 0.229;
        let expected_blue = (gray - 0.406) / 0.225;
        assert!((slice[0] - expected_red).abs() < 0.0001);
        assert!((slice[2 * 100] - expected_blue).abs() < 0.0001);
    }
}
