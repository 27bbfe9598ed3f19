//! Files flowing through a session and the target size newtype.

use crate::constants::{
    DEFAULT_TARGET_SIZE_KB, MAX_FILE_SIZE, MAX_TARGET_SIZE_KB, MIN_TARGET_SIZE_KB,
    TARGET_SIZE_STEP_KB,
};
use crate::error::{ProcessingError, Result};
use crate::formats::{classify, content_type_for_path, FileKind};
use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// A user-selected file. Never mutated after creation.
#[derive(Clone)]
pub struct SourceFile {
    name: String,
    content_type: String,
    bytes: Arc<[u8]>,
}

impl SourceFile {
    pub fn new(
        name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Arc<[u8]>>,
    ) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }

    /// Reads a file from disk, declaring its content type from the extension.
    ///
    /// # Returns
    /// * `Err(ProcessingError::FileNotFound)` if the path is not a file
    /// * `Err(ProcessingError::FileTooLarge)` above the 100MB limit
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(ProcessingError::FileNotFound(path.to_path_buf()));
        }

        // Check file size before loading to prevent memory exhaustion
        let file_size = fs::metadata(path)?.len();
        if file_size > MAX_FILE_SIZE {
            return Err(ProcessingError::FileTooLarge(file_size, MAX_FILE_SIZE));
        }

        let bytes = fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Self::new(name, content_type_for_path(path), bytes))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn kind(&self) -> FileKind {
        classify(&self.content_type)
    }
}

impl fmt::Debug for SourceFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceFile")
            .field("name", &self.name)
            .field("content_type", &self.content_type)
            .field("size", &self.bytes.len())
            .finish()
    }
}

/// Output of a successful transform.
#[derive(Clone, PartialEq, Eq)]
pub struct ResultFile {
    content_type: String,
    bytes: Arc<[u8]>,
}

impl ResultFile {
    pub fn new(content_type: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn kind(&self) -> FileKind {
        classify(&self.content_type)
    }

    /// Writes the artifact, creating parent directories as needed.
    pub fn write_to(&self, output: &Path) -> Result<u64> {
        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|_| ProcessingError::DirectoryCreationFailed(parent.to_path_buf()))?;
        }
        fs::write(output, &self.bytes)?;
        Ok(self.size())
    }
}

impl fmt::Debug for ResultFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResultFile")
            .field("content_type", &self.content_type)
            .field("size", &self.bytes.len())
            .finish()
    }
}

/// Requested maximum output size for images, in kilobytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TargetSize(u32);

impl TargetSize {
    pub const MIN: TargetSize = TargetSize(MIN_TARGET_SIZE_KB);
    pub const MAX: TargetSize = TargetSize(MAX_TARGET_SIZE_KB);

    /// Accepts values in `[5, 1000]` that sit on the 5 KB step grid.
    pub fn new(kb: u32) -> Result<Self> {
        if !(MIN_TARGET_SIZE_KB..=MAX_TARGET_SIZE_KB).contains(&kb) || kb % TARGET_SIZE_STEP_KB != 0
        {
            return Err(ProcessingError::InvalidTargetSize(kb));
        }
        Ok(Self(kb))
    }

    pub fn kilobytes(&self) -> u32 {
        self.0
    }

    pub fn as_megabytes(&self) -> f64 {
        self.0 as f64 / 1024.0
    }

    pub fn max_bytes(&self) -> u64 {
        self.0 as u64 * 1024
    }
}

impl Default for TargetSize {
    fn default() -> Self {
        Self(DEFAULT_TARGET_SIZE_KB)
    }
}

impl fmt::Display for TargetSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} KB", self.0)
    }
}
