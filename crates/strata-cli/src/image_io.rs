//! PNG load/save as RGBA8.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use anyhow::{bail, Context, Result};
use strata_core::RgbaImage;
use tracing::debug;

/// Reads a PNG of any color type and bit depth as straight RGBA8.
///
/// Palette, 16-bit and low bit depth images are normalized to 8 bits per
/// channel; gray and RGB gain an opaque alpha channel.
pub fn read_png(path: &Path) -> Result<RgbaImage> {
    let file = File::open(path).with_context(|| format!("Failed to open: {}", path.display()))?;
    let mut decoder = png::Decoder::new(BufReader::new(file));
    decoder.set_transformations(png::Transformations::normalize_to_color8());
    let mut reader = decoder
        .read_info()
        .with_context(|| format!("Failed to decode: {}", path.display()))?;

    let buf_size = reader
        .output_buffer_size()
        .context("cannot determine PNG output buffer size")?;
    let mut buf = vec![0u8; buf_size];
    let info = reader
        .next_frame(&mut buf)
        .with_context(|| format!("Failed to decode: {}", path.display()))?;
    buf.truncate(info.buffer_size());

    let rgba: Vec<u8> = match info.color_type {
        png::ColorType::Rgba => buf,
        png::ColorType::Rgb => buf.chunks_exact(3).flat_map(|p| [p[0], p[1], p[2], 255]).collect(),
        png::ColorType::GrayscaleAlpha => buf.chunks_exact(2).flat_map(|p| [p[0], p[0], p[0], p[1]]).collect(),
        png::ColorType::Grayscale => buf.iter().flat_map(|&g| [g, g, g, 255]).collect(),
        other => bail!("unsupported PNG color type {other:?} in {}", path.display()),
    };
    debug!(path = %path.display(), width = info.width, height = info.height, "read png");
    Ok(RgbaImage::from_raw(info.width, info.height, rgba)?)
}

/// Writes `image` as an 8-bit RGBA PNG.
pub fn write_png(path: &Path, image: &RgbaImage) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Failed to create: {}", path.display()))?;
    let mut encoder = png::Encoder::new(BufWriter::new(file), image.width(), image.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_compression(png::Compression::default());
    encoder.set_source_srgb(png::SrgbRenderingIntent::Perceptual);

    let mut writer = encoder
        .write_header()
        .with_context(|| format!("Failed to save: {}", path.display()))?;
    writer
        .write_image_data(image.as_raw())
        .with_context(|| format!("Failed to save: {}", path.display()))?;
    writer.finish().with_context(|| format!("Failed to save: {}", path.display()))?;
    debug!(path = %path.display(), width = image.width(), height = image.height(), "wrote png");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_png_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("img.png");
        let img = RgbaImage::from_fn(5, 3, |x, y| [(x * 50) as u8, (y * 80) as u8, 7, (255 - x * 10) as u8]);
        write_png(&path, &img).unwrap();
        assert_eq!(read_png(&path).unwrap(), img);
    }

    #[test]
    fn test_missing_file_has_context() {
        let err = read_png(Path::new("/nonexistent/strata.png")).unwrap_err();
        assert!(err.to_string().contains("Failed to open"));
    }
}
