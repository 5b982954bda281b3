//! Decoding files into [`PixelBuffer`]s and encoding results as PNG.

use image::{DynamicImage, ExtendedColorType, ImageFormat};
use std::io::Cursor;
use std::path::Path;

use crate::error::{PipelineError, PipelineResult};
use crate::pixel::{PixelBuffer, PixelLayout};

/// Read and decode an image file.
///
/// A decoded buffer that fails [`PixelBuffer::is_valid`] is reported as a
/// load error, so callers only ever see usable buffers.
pub fn load(path: &Path) -> PipelineResult<PixelBuffer> {
    let bytes = std::fs::read(path).map_err(|e| PipelineError::Load {
        path: path.to_path_buf(),
        message: format!("Cannot read file: {}", e),
    })?;
    let buffer = decode(&bytes, path)?;
    if !buffer.is_valid() {
        return Err(PipelineError::Load {
            path: path.to_path_buf(),
            message: format!(
                "Decoded image is invalid ({}x{}x{})",
                buffer.width(),
                buffer.height(),
                buffer.channels()
            ),
        });
    }
    Ok(buffer)
}

/// Decode in-memory bytes. The format is sniffed from content, falling back
/// to the path extension.
pub fn decode(bytes: &[u8], path: &Path) -> PipelineResult<PixelBuffer> {
    let mut reader = image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| PipelineError::Load {
            path: path.to_path_buf(),
            message: format!("Cannot detect image format: {}", e),
        })?;
    if reader.format().is_none() {
        let format = ImageFormat::from_path(path).map_err(|_| PipelineError::Load {
            path: path.to_path_buf(),
            message: "Unrecognized image format".to_string(),
        })?;
        reader.set_format(format);
    }
    let image = reader.decode().map_err(|e| PipelineError::Load {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    Ok(to_pixel_buffer(image))
}

/// Flatten a decoded image to 8-bit samples, keeping its channel layout.
///
/// Wider sample types are narrowed to the 8-bit layout with the same
/// color/alpha shape.
pub fn to_pixel_buffer(image: DynamicImage) -> PixelBuffer {
    let (width, height) = (image.width(), image.height());
    let (samples, channels) = match image {
        DynamicImage::ImageLuma8(buf) => (buf.into_raw(), 1),
        DynamicImage::ImageLumaA8(buf) => (buf.into_raw(), 2),
        DynamicImage::ImageRgb8(buf) => (buf.into_raw(), 3),
        DynamicImage::ImageRgba8(buf) => (buf.into_raw(), 4),
        other => {
            let color = other.color();
            match (color.has_color(), color.has_alpha()) {
                (false, false) => (other.to_luma8().into_raw(), 1),
                (false, true) => (other.to_luma_alpha8().into_raw(), 2),
                (true, false) => (other.to_rgb8().into_raw(), 3),
                (true, true) => (other.to_rgba8().into_raw(), 4),
            }
        }
    };
    PixelBuffer::new(samples, width, height, channels)
}

/// Encode a buffer as PNG bytes. `path` is only used for error context.
pub fn encode_png(buffer: &PixelBuffer, path: &Path) -> PipelineResult<Vec<u8>> {
    let layout = buffer
        .layout()
        .filter(|_| buffer.is_valid())
        .ok_or_else(|| PipelineError::Save {
            path: path.to_path_buf(),
            message: "Invalid image data".to_string(),
        })?;
    let color = match layout {
        PixelLayout::Gray => ExtendedColorType::L8,
        PixelLayout::GrayAlpha => ExtendedColorType::La8,
        PixelLayout::Rgb => ExtendedColorType::Rgb8,
        PixelLayout::Rgba => ExtendedColorType::Rgba8,
    };

    let mut bytes = Cursor::new(Vec::new());
    image::write_buffer_with_format(
        &mut bytes,
        buffer.samples(),
        buffer.width(),
        buffer.height(),
        color,
        ImageFormat::Png,
    )
    .map_err(|e| PipelineError::Save {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    Ok(bytes.into_inner())
}

/// Encode a buffer as PNG and write it to `path`.
pub fn save_png(path: &Path, buffer: &PixelBuffer) -> PipelineResult<()> {
    let bytes = encode_png(buffer, path)?;
    std::fs::write(path, bytes).map_err(|e| PipelineError::Save {
        path: path.to_path_buf(),
        message: format!("Cannot write file: {}", e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma, Rgb, RgbImage};

    #[test]
    fn test_png_round_trip_keeps_layout() {
        let buffer = PixelBuffer::new(vec![10, 20, 30, 40, 50, 60, 70, 80], 2, 1, 4);
        let bytes = encode_png(&buffer, Path::new("x.png")).unwrap();
        let decoded = decode(&bytes, Path::new("x.png")).unwrap();
        assert_eq!(decoded, buffer);
    }

    #[test]
    fn test_decode_gray_is_single_channel() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gray.png");
        GrayImage::from_pixel(3, 2, Luma([100])).save(&path).unwrap();

        let buffer = load(&path).unwrap();
        assert_eq!(buffer.channels(), 1);
        assert_eq!(buffer.samples(), &[100; 6]);
    }

    #[test]
    fn test_decode_detects_format_by_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("misnamed.jpg");
        let png = dir.path().join("real.png");
        RgbImage::from_pixel(2, 2, Rgb([1, 2, 3])).save(&png).unwrap();
        std::fs::copy(&png, &path).unwrap();

        let buffer = load(&path).unwrap();
        assert_eq!(buffer.layout(), Some(PixelLayout::Rgb));
    }

    #[test]
    fn test_sixteen_bit_is_narrowed() {
        let image = DynamicImage::new_rgb16(2, 2);
        let buffer = to_pixel_buffer(image);
        assert_eq!(buffer.channels(), 3);
        assert!(buffer.is_valid());
    }

    #[test]
    fn test_load_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"definitely not an image").unwrap();

        let err = load(&path).unwrap_err();
        assert!(matches!(err, PipelineError::Load { .. }));
    }

    #[test]
    fn test_load_missing_file() {
        let err = load(Path::new("/nonexistent/lumabatch/a.png")).unwrap_err();
        assert!(matches!(err, PipelineError::Load { .. }));
    }

    #[test]
    fn test_encode_rejects_invalid_buffer() {
        let err = encode_png(&PixelBuffer::invalid(), Path::new("out.png")).unwrap_err();
        assert!(matches!(err, PipelineError::Save { .. }));
    }
}
