pub const DEFAULT_TARGET_SIZE_KB: u32 = 100;
pub const MIN_TARGET_SIZE_KB: u32 = 5;
pub const MAX_TARGET_SIZE_KB: u32 = 1000;
pub const TARGET_SIZE_STEP_KB: u32 = 5;

pub const IMAGE_CONTENT_TYPE_PREFIX: &str = "image/";
pub const PDF_CONTENT_TYPE: &str = "application/pdf";
pub const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

pub const RESIZED_SUFFIX: &str = "_resized";

/// Maximum file size in bytes (100MB)
pub const MAX_FILE_SIZE: u64 = 100 * 1024 * 1024;
pub const MAX_IMAGE_DIMENSION: u32 = 20_000;

pub const DEFAULT_MAX_ITERATIONS: u32 = 10;
pub const DEFAULT_MIN_JPEG_QUALITY: u8 = 5;
pub const DEFAULT_MAX_JPEG_QUALITY: u8 = 92;
pub const MIN_QUALITY: u8 = 1;
pub const MAX_QUALITY: u8 = 100;

// Shrink factor applied on top of sqrt(target / current) between passes.
pub const SCALE_SAFETY_FACTOR: f64 = 0.95;
pub const MIN_SCALE_STEP: f64 = 0.1;
pub const MAX_SCALE_STEP: f64 = 0.95;

pub const PNG_OPTIMIZATION_PRESET: u8 = 4;
pub const LIBDEFLATER_LEVEL: u8 = 12;

// User-facing messages
pub const UNSUPPORTED_FILE_TYPE_MESSAGE: &str =
    "Unsupported file type. Please upload an image or PDF.";
pub const IMAGE_ENGINE_MISSING_MESSAGE: &str = "Image compression library not loaded.";
pub const PDF_ENGINE_MISSING_MESSAGE: &str = "PDF library not loaded.";
pub const IMAGE_RESIZE_FAILED_MESSAGE: &str =
    "Could not resize the image. It might be too small or in an unsupported format.";
pub const PDF_OPTIMIZE_FAILED_MESSAGE: &str =
    "Could not process the PDF. The file might be corrupted or password-protected.";
pub const PROCESSING_FAILED_PREFIX: &str = "Processing failed:";

pub const PROGRESS_SPINNER_TEMPLATE: &str = "{spinner:.green} {msg}";

// Common output message prefixes
pub const ORIGINAL_SIZE_PREFIX: &str = "📊 Original size:";
pub const RESULT_SIZE_PREFIX: &str = "📈 Result size:";
pub const COMPRESSION_RATIO_PREFIX: &str = "🎯 Compression ratio:";
pub const SUCCESS_PREFIX: &str = "✅";
pub const ERROR_PREFIX: &str = "❌";
pub const INFO_PREFIX: &str = "📋";
