//! JPEG output encoding.

use image::codecs::jpeg::JpegEncoder;
use image::RgbImage;

use facemark_models::JPEG_QUALITY;

use crate::error::{VisionError, VisionResult};

/// Encode an image as JPEG at the fixed output quality.
///
/// Output images are always JPEG regardless of the upload's format.
pub fn encode_jpeg(image: &RgbImage) -> VisionResult<Vec<u8>> {
    let mut buffer = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut buffer, JPEG_QUALITY);
    encoder
        .encode_image(image)
        .map_err(|e| VisionError::encode(e.to_string()))?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn produces_jpeg_magic_bytes() {
        let img = RgbImage::from_pixel(32, 24, Rgb([200, 100, 50]));
        let bytes = encode_jpeg(&img).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn output_decodes_back_to_same_dimensions() {
        let img = RgbImage::from_fn(40, 30, |x, y| Rgb([x as u8, y as u8, 0]));
        let bytes = encode_jpeg(&img).unwrap();
        let decoded = crate::decode::decode_image(&bytes).unwrap();
        assert_eq!(decoded.dimensions(), (40, 30));
    }
}
