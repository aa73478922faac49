//! Raster image compression.
//!
//! JPEG and PNG are re-encoded in process with the `image` crate; JPEG gets
//! the quality-indexed encoder, PNG the strongest compression level (the
//! PNG encoder has no quality knob). Animated GIFs are handed to the
//! `gifsicle` binary as an isolated child process, with the palette size
//! derived from the requested quality.

use std::fs;
use std::io::BufWriter;
use std::path::Path;
use std::process::Command;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};

use super::SandboxError;

/// Still-image formats the in-process encoder handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RasterFormat {
    Jpeg,
    Png,
}

/// Re-encode a still image at the given quality (1-100).
pub fn compress_raster(
    src: &Path,
    dest: &Path,
    format: RasterFormat,
    quality: u8,
) -> Result<(), SandboxError> {
    let img = image::open(src)
        .map_err(|e| SandboxError::other(format!("failed to decode image: {}", e)))?;

    let file = fs::File::create(dest)?;
    let writer = BufWriter::new(file);

    let encode_err =
        |e: image::ImageError| SandboxError::other(format!("failed to encode image: {}", e));

    match format {
        RasterFormat::Jpeg => {
            let encoder = JpegEncoder::new_with_quality(writer, quality);
            img.write_with_encoder(encoder).map_err(encode_err)?;
        }
        RasterFormat::Png => {
            let encoder =
                PngEncoder::new_with_quality(writer, CompressionType::Best, FilterType::Adaptive);
            img.write_with_encoder(encoder).map_err(encode_err)?;
        }
    }

    Ok(())
}

/// Palette size for GIF compression: quality 1-100 maps onto 2-256 colors.
pub fn gif_palette_size(quality: u8) -> u32 {
    let colors = (f64::from(quality) / 100.0 * 256.0).round() as u32;
    colors.max(2)
}

/// Compress an animated GIF via the `gifsicle` child process.
///
/// Stdout/stderr and the exit status are collected; only success or a
/// failure message surfaces to the caller.
pub fn compress_gif(src: &Path, dest: &Path, quality: u8) -> Result<(), SandboxError> {
    let colors = gif_palette_size(quality);

    let output = Command::new("gifsicle")
        .arg("-O3")
        .arg("--colors")
        .arg(colors.to_string())
        .arg("-o")
        .arg(dest)
        .arg(src)
        .output()
        .map_err(|e| SandboxError::other(format!("failed to run gifsicle: {}", e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(SandboxError::other(format!(
            "gifsicle exited with {}: {}",
            output.status,
            stderr.trim()
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_palette_size_heuristic() {
        assert_eq!(gif_palette_size(100), 256);
        assert_eq!(gif_palette_size(80), 205);
        assert_eq!(gif_palette_size(50), 128);
        assert_eq!(gif_palette_size(1), 3);
        // Never fewer than two colors.
        assert_eq!(gif_palette_size(0), 2);
    }

    #[test]
    fn test_jpeg_reencode_writes_output() {
        let temp_dir = TempDir::new().unwrap();
        let src = temp_dir.path().join("in.jpg");
        let dest = temp_dir.path().join("out.jpg");

        let buffer = image::RgbImage::from_pixel(32, 32, image::Rgb([120, 80, 40]));
        buffer.save(&src).unwrap();

        compress_raster(&src, &dest, RasterFormat::Jpeg, 60).unwrap();
        assert!(dest.exists());
        assert!(image::open(&dest).is_ok());
    }

    #[test]
    fn test_png_reencode_writes_output() {
        let temp_dir = TempDir::new().unwrap();
        let src = temp_dir.path().join("in.png");
        let dest = temp_dir.path().join("out.png");

        let buffer = image::RgbaImage::from_pixel(16, 16, image::Rgba([0, 200, 0, 255]));
        buffer.save(&src).unwrap();

        compress_raster(&src, &dest, RasterFormat::Png, 80).unwrap();
        assert!(dest.exists());
        assert!(image::open(&dest).is_ok());
    }

    #[test]
    fn test_undecodable_input_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let src = temp_dir.path().join("garbage.jpg");
        let dest = temp_dir.path().join("out.jpg");
        fs::write(&src, "not an image").unwrap();

        assert!(compress_raster(&src, &dest, RasterFormat::Jpeg, 80).is_err());
    }
}
