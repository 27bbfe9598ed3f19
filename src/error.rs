use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProcessingError {
    #[error("Unsupported file type. Please upload an image or PDF.")]
    UnsupportedFileType,

    #[error("{0}")]
    DependencyUnavailable(String),

    #[error("{0}")]
    ImageResizeFailed(String),

    #[error("{0}")]
    PdfOptimizeFailed(String),

    #[error("Invalid target size: {0} KB. Must be between {min} and {max} KB in steps of {step}",
        min = crate::constants::MIN_TARGET_SIZE_KB,
        max = crate::constants::MAX_TARGET_SIZE_KB,
        step = crate::constants::TARGET_SIZE_STEP_KB)]
    InvalidTargetSize(u32),

    #[error("Target size only applies to images")]
    TargetSizeNotApplicable,

    #[error("A file is already being processed")]
    SessionBusy,

    #[error("Invalid quality value: {0}. Must be between 1 and 100")]
    InvalidQuality(u8),

    #[error("Invalid iteration count: {0}. Must be at least 1")]
    InvalidIterations(u32),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("File too large: {0} bytes. Maximum allowed: {1} bytes")]
    FileTooLarge(u64, u64),

    #[error("Failed to create output directory: {0}")]
    DirectoryCreationFailed(PathBuf),
}

pub type Result<T> = std::result::Result<T, ProcessingError>;
