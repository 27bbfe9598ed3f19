//! File classification and type-safe format handling
//!
//! Decides what a selected file is from its declared content type, the same
//! way a browser exposes `File.type`, and which encoder the built-in image
//! engine uses for it.

use crate::constants::{FALLBACK_CONTENT_TYPE, IMAGE_CONTENT_TYPE_PREFIX, PDF_CONTENT_TYPE};
use std::fmt;
use std::path::Path;

/// Outcome of classifying a declared content type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Image,
    Pdf,
    Unsupported,
}

impl FileKind {
    pub fn mode(self) -> Option<ProcessMode> {
        match self {
            FileKind::Image => Some(ProcessMode::Image),
            FileKind::Pdf => Some(ProcessMode::Pdf),
            FileKind::Unsupported => None,
        }
    }
}

/// Which transform a session runs for its current file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessMode {
    /// Recompress towards a target size
    Image,
    /// Structural re-serialization
    Pdf,
}

impl fmt::Display for ProcessMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessMode::Image => write!(f, "image"),
            ProcessMode::Pdf => write!(f, "pdf"),
        }
    }
}

/// Classify a declared content type.
///
/// Matching is exact and case-sensitive: anything starting with `image/` is an
/// image, only `application/pdf` is a PDF.
///
/// # Example
/// ```
/// use file_squeeze::formats::{classify, FileKind};
///
/// assert_eq!(classify("image/png"), FileKind::Image);
/// assert_eq!(classify("application/pdf"), FileKind::Pdf);
/// assert_eq!(classify("text/plain"), FileKind::Unsupported);
/// ```
pub fn classify(content_type: &str) -> FileKind {
    if content_type.starts_with(IMAGE_CONTENT_TYPE_PREFIX) {
        FileKind::Image
    } else if content_type == PDF_CONTENT_TYPE {
        FileKind::Pdf
    } else {
        FileKind::Unsupported
    }
}

/// Declared content type for a file on disk, from its extension
pub fn content_type_for_path(path: &Path) -> &'static str {
    let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
        return FALLBACK_CONTENT_TYPE;
    };

    match ext.to_lowercase().as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        "avif" => "image/avif",
        "svg" => "image/svg+xml",
        "pdf" => PDF_CONTENT_TYPE,
        "txt" => "text/plain",
        "json" => "application/json",
        "html" | "htm" => "text/html",
        _ => FALLBACK_CONTENT_TYPE,
    }
}

/// Encodings produced by the built-in image engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Lossy, quality is searched
    Jpeg,
    /// Lossless, optimized with oxipng
    Png,
    /// Lossless WebP
    WebP,
}

impl OutputFormat {
    /// Pick the encoder for a source content type.
    ///
    /// JPEG and WebP keep their format. Everything else is written as PNG.
    pub fn for_content_type(content_type: &str) -> Self {
        match content_type {
            "image/jpeg" | "image/jpg" | "image/pjpeg" => OutputFormat::Jpeg,
            "image/webp" => OutputFormat::WebP,
            _ => OutputFormat::Png,
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::Png => "image/png",
            OutputFormat::WebP => "image/webp",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Jpeg => "JPEG",
            OutputFormat::Png => "PNG",
            OutputFormat::WebP => "WebP",
        };
        write!(f, "{}", name)
    }
}
