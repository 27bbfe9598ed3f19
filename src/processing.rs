use crate::constants::{
    DEFAULT_MAX_ITERATIONS, DEFAULT_MAX_JPEG_QUALITY, DEFAULT_MIN_JPEG_QUALITY,
    LIBDEFLATER_LEVEL, MAX_IMAGE_DIMENSION, MAX_QUALITY, MAX_SCALE_STEP, MIN_QUALITY,
    MIN_SCALE_STEP, PNG_OPTIMIZATION_PRESET, SCALE_SAFETY_FACTOR,
};
use crate::engine::ImageEngine;
use crate::error::{ProcessingError, Result};
use crate::file::{ResultFile, SourceFile};
use crate::formats::OutputFormat;
use anyhow::{anyhow, bail, Context};
use async_trait::async_trait;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageFormat, ImageReader, RgbImage};
use oxipng::{Deflaters, Options};
use std::io::Cursor;

#[derive(Debug, Clone)]
pub struct ResizeOptions {
    pub max_iterations: u32,
    pub min_quality: u8,
    pub max_quality: u8,
    pub optimize_png: bool,
}

impl ResizeOptions {
    pub fn new(
        max_iterations: Option<u32>,
        min_quality: Option<u8>,
        max_quality: Option<u8>,
    ) -> Result<Self> {
        let max_iterations = max_iterations.unwrap_or(DEFAULT_MAX_ITERATIONS);
        if max_iterations == 0 {
            return Err(ProcessingError::InvalidIterations(max_iterations));
        }

        let min_quality = min_quality.unwrap_or(DEFAULT_MIN_JPEG_QUALITY);
        let max_quality = max_quality.unwrap_or(DEFAULT_MAX_JPEG_QUALITY);
        for quality in [min_quality, max_quality] {
            if !(MIN_QUALITY..=MAX_QUALITY).contains(&quality) {
                return Err(ProcessingError::InvalidQuality(quality));
            }
        }
        if min_quality > max_quality {
            return Err(ProcessingError::InvalidQuality(min_quality));
        }

        Ok(Self {
            max_iterations,
            min_quality,
            max_quality,
            optimize_png: true,
        })
    }
}

impl Default for ResizeOptions {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            min_quality: DEFAULT_MIN_JPEG_QUALITY,
            max_quality: DEFAULT_MAX_JPEG_QUALITY,
            optimize_png: true,
        }
    }
}

/// Outcome of a size-constrained recompression
#[derive(Debug, Clone)]
pub struct Compressed {
    pub bytes: Vec<u8>,
    pub content_type: String,
    /// Encode rounds performed; 0 when the input was returned untouched
    pub passes: u32,
}

impl Compressed {
    fn unchanged(bytes: &[u8], content_type: &str, passes: u32) -> Self {
        Self {
            bytes: bytes.to_vec(),
            content_type: content_type.to_string(),
            passes,
        }
    }
}

/// Decodes an image held in memory and enforces the dimension limit.
pub fn load_image_from_memory(bytes: &[u8]) -> anyhow::Result<DynamicImage> {
    let img = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .context("Failed to read image header")?
        .decode()
        .context("Failed to decode image")?;

    // Security: Validate image dimensions to prevent memory exhaustion
    let (width, height) = img.dimensions();
    if width > MAX_IMAGE_DIMENSION || height > MAX_IMAGE_DIMENSION {
        bail!(
            "Image dimensions {}x{} exceed the {}x{} limit",
            width,
            height,
            MAX_IMAGE_DIMENSION,
            MAX_IMAGE_DIMENSION
        );
    }

    Ok(img)
}

/// Best-effort recompression of an image towards `max_bytes`.
///
/// Each pass encodes at the current resolution (searching JPEG quality where it
/// applies), keeps the smallest attempt and, if that still exceeds the budget,
/// scales the image down proportionally to the overshoot before trying again.
///
/// # Returns
/// * The input unchanged if it already fits or if no attempt beat it
/// * Otherwise the smallest encoding found, which may still exceed `max_bytes`
///   when `max_iterations` runs out or the image cannot shrink further
pub fn compress_to_max_bytes(
    bytes: &[u8],
    content_type: &str,
    max_bytes: u64,
    options: &ResizeOptions,
) -> anyhow::Result<Compressed> {
    let original_size = bytes.len() as u64;
    if original_size <= max_bytes {
        log::debug!(
            "Input already fits: {} bytes <= {} bytes",
            original_size,
            max_bytes
        );
        return Ok(Compressed::unchanged(bytes, content_type, 0));
    }

    let mut img = load_image_from_memory(bytes)?;
    let format = OutputFormat::for_content_type(content_type);
    let mut best: Option<Vec<u8>> = None;
    let mut passes = 0;

    while passes < options.max_iterations {
        passes += 1;
        let encoded = encode_within(&img, format, max_bytes, options)?;
        let size = encoded.len() as u64;
        let (width, height) = img.dimensions();
        log::debug!(
            "Pass {}: {}x{} {} -> {} bytes (target {})",
            passes,
            width,
            height,
            format,
            size,
            max_bytes
        );

        if best.as_ref().map_or(true, |b| encoded.len() < b.len()) {
            best = Some(encoded);
        }
        if size <= max_bytes {
            break;
        }

        let scale = ((max_bytes as f64 / size as f64).sqrt() * SCALE_SAFETY_FACTOR)
            .clamp(MIN_SCALE_STEP, MAX_SCALE_STEP);
        let (new_width, new_height) = scaled_dimensions(width, height, scale);
        if (new_width, new_height) == (width, height) {
            log::debug!("Image cannot shrink below {}x{}", width, height);
            break;
        }
        img = img.resize_exact(new_width, new_height, FilterType::Lanczos3);
    }

    let best = best.ok_or_else(|| anyhow!("No encoding attempt was made"))?;
    if best.len() as u64 >= original_size {
        log::debug!("Re-encoding did not beat the original, keeping it");
        return Ok(Compressed::unchanged(bytes, content_type, passes));
    }
    if best.len() as u64 > max_bytes {
        log::warn!(
            "Best effort result of {} bytes is above the {} byte target",
            best.len(),
            max_bytes
        );
    }

    Ok(Compressed {
        bytes: best,
        content_type: format.mime_type().to_string(),
        passes,
    })
}

fn scaled_dimensions(width: u32, height: u32, scale: f64) -> (u32, u32) {
    let w = ((width as f64 * scale).round() as u32).max(1);
    let h = ((height as f64 * scale).round() as u32).max(1);
    (w, h)
}

fn encode_within(
    img: &DynamicImage,
    format: OutputFormat,
    max_bytes: u64,
    options: &ResizeOptions,
) -> anyhow::Result<Vec<u8>> {
    match format {
        OutputFormat::Jpeg => search_jpeg_quality(&img.to_rgb8(), max_bytes, options),
        OutputFormat::Png => encode_png(img, options),
        OutputFormat::WebP => encode_webp(img),
    }
}

/// Binary search for the highest JPEG quality that fits `max_bytes`.
///
/// Falls back to the encoding at the lowest quality tried when none fits.
pub fn search_jpeg_quality(
    rgb: &RgbImage,
    max_bytes: u64,
    options: &ResizeOptions,
) -> anyhow::Result<Vec<u8>> {
    let mut low = options.min_quality;
    let mut high = options.max_quality;
    let mut fitting: Option<Vec<u8>> = None;
    let mut smallest: Option<Vec<u8>> = None;

    while low <= high {
        let quality = low + (high - low) / 2;
        let encoded = encode_jpeg(rgb, quality)?;
        log::trace!("JPEG q={} -> {} bytes", quality, encoded.len());

        if encoded.len() as u64 <= max_bytes {
            fitting = Some(encoded);
            low = quality + 1;
        } else {
            smallest = Some(encoded);
            if quality == options.min_quality {
                break;
            }
            high = quality - 1;
        }
    }

    fitting
        .or(smallest)
        .ok_or_else(|| anyhow!("Empty JPEG quality range"))
}

fn encode_jpeg(rgb: &RgbImage, quality: u8) -> anyhow::Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut buffer, quality);
    encoder
        .encode_image(rgb)
        .context("JPEG encoding failed")?;
    Ok(buffer)
}

fn encode_png(img: &DynamicImage, options: &ResizeOptions) -> anyhow::Result<Vec<u8>> {
    let mut cursor = Cursor::new(Vec::new());
    img.write_to(&mut cursor, ImageFormat::Png)
        .context("PNG encoding failed")?;
    let raw = cursor.into_inner();

    if !options.optimize_png {
        return Ok(raw);
    }

    let mut oxipng_options = Options::from_preset(PNG_OPTIMIZATION_PRESET);
    oxipng_options.deflate = Deflaters::Libdeflater {
        compression: LIBDEFLATER_LEVEL,
    };

    match oxipng::optimize_from_memory(&raw, &oxipng_options) {
        Ok(optimized) if optimized.len() < raw.len() => Ok(optimized),
        Ok(_) => Ok(raw),
        Err(e) => {
            log::warn!("PNG optimization skipped: {}", e);
            Ok(raw)
        }
    }
}

fn encode_webp(img: &DynamicImage) -> anyhow::Result<Vec<u8>> {
    let rgba = DynamicImage::ImageRgba8(img.to_rgba8());
    let mut cursor = Cursor::new(Vec::new());
    rgba.write_to(&mut cursor, ImageFormat::WebP)
        .context("WebP encoding failed")?;
    Ok(cursor.into_inner())
}

/// Image engine backed by the `image` and `oxipng` crates
#[derive(Debug, Clone, Default)]
pub struct ImageCompressor {
    options: ResizeOptions,
}

impl ImageCompressor {
    pub fn new(options: ResizeOptions) -> Self {
        Self { options }
    }
}

#[async_trait]
impl ImageEngine for ImageCompressor {
    fn name(&self) -> &'static str {
        "image"
    }

    async fn compress_to_size(
        &self,
        file: &SourceFile,
        max_size_mb: f64,
    ) -> anyhow::Result<ResultFile> {
        let max_bytes = (max_size_mb * 1024.0 * 1024.0).floor() as u64;
        let source = file.clone();
        let options = self.options.clone();

        let compressed = tokio::task::spawn_blocking(move || {
            compress_to_max_bytes(source.bytes(), source.content_type(), max_bytes, &options)
        })
        .await
        .context("Image worker stopped unexpectedly")??;

        log::debug!(
            "Image compressed in {} pass(es): {} -> {} bytes",
            compressed.passes,
            file.size(),
            compressed.bytes.len()
        );
        Ok(ResultFile::new(compressed.content_type, compressed.bytes))
    }
}
