//! Transform service
//!
//! Wraps the image and PDF engines behind one error contract.

use crate::constants::{
    IMAGE_ENGINE_MISSING_MESSAGE, IMAGE_RESIZE_FAILED_MESSAGE, PDF_CONTENT_TYPE,
    PDF_ENGINE_MISSING_MESSAGE, PDF_OPTIMIZE_FAILED_MESSAGE,
};
use crate::error::{ProcessingError, Result};
use crate::file::{ResultFile, SourceFile, TargetSize};
use crate::formats::{FileKind, ProcessMode};
use crate::pdf::PdfRewriter;
use crate::processing::ImageCompressor;
use async_trait::async_trait;
use std::sync::Arc;

/// Size-constrained image recompression
#[async_trait]
pub trait ImageEngine: Send + Sync {
    fn name(&self) -> &'static str;

    /// Recompress `file` aiming for at most `max_size_mb` megabytes.
    async fn compress_to_size(
        &self,
        file: &SourceFile,
        max_size_mb: f64,
    ) -> anyhow::Result<ResultFile>;
}

/// Load-and-save PDF rewriting
#[async_trait]
pub trait PdfEngine: Send + Sync {
    fn name(&self) -> &'static str;

    async fn rewrite(&self, file: &SourceFile) -> anyhow::Result<Vec<u8>>;
}

/// The two transforms, each wrapping its engine the same way: a missing
/// engine is `DependencyUnavailable`, any engine failure is logged and
/// replaced by a fixed user-facing error.
#[derive(Clone)]
pub struct TransformService {
    image: Option<Arc<dyn ImageEngine>>,
    pdf: Option<Arc<dyn PdfEngine>>,
}

impl TransformService {
    pub fn new(image: Option<Arc<dyn ImageEngine>>, pdf: Option<Arc<dyn PdfEngine>>) -> Self {
        Self { image, pdf }
    }

    pub fn with_image_engine(mut self, engine: impl ImageEngine + 'static) -> Self {
        self.image = Some(Arc::new(engine));
        self
    }

    pub fn with_pdf_engine(mut self, engine: impl PdfEngine + 'static) -> Self {
        self.pdf = Some(Arc::new(engine));
        self
    }

    /// A service with no engines wired; every transform fails as unavailable.
    pub fn empty() -> Self {
        Self::new(None, None)
    }

    pub async fn resize_image(&self, file: &SourceFile, target: TargetSize) -> Result<ResultFile> {
        let engine = self.image.as_ref().ok_or_else(|| {
            ProcessingError::DependencyUnavailable(IMAGE_ENGINE_MISSING_MESSAGE.to_string())
        })?;
        if file.kind() != FileKind::Image {
            return Err(ProcessingError::UnsupportedFileType);
        }

        log::debug!(
            "Resizing {} ({} bytes) to at most {} with {}",
            file.name(),
            file.size(),
            target,
            engine.name()
        );

        engine
            .compress_to_size(file, target.as_megabytes())
            .await
            .map_err(|e| {
                log::error!("Image resizing error: {:#}", e);
                ProcessingError::ImageResizeFailed(IMAGE_RESIZE_FAILED_MESSAGE.to_string())
            })
    }

    pub async fn optimize_pdf(&self, file: &SourceFile) -> Result<ResultFile> {
        let engine = self.pdf.as_ref().ok_or_else(|| {
            ProcessingError::DependencyUnavailable(PDF_ENGINE_MISSING_MESSAGE.to_string())
        })?;
        if file.kind() != FileKind::Pdf {
            return Err(ProcessingError::UnsupportedFileType);
        }

        log::debug!(
            "Optimizing {} ({} bytes) with {}",
            file.name(),
            file.size(),
            engine.name()
        );

        let bytes = engine.rewrite(file).await.map_err(|e| {
            log::error!("PDF optimization error: {:#}", e);
            ProcessingError::PdfOptimizeFailed(PDF_OPTIMIZE_FAILED_MESSAGE.to_string())
        })?;
        Ok(ResultFile::new(PDF_CONTENT_TYPE, bytes))
    }

    /// Runs the transform that matches `mode`.
    pub async fn run(
        &self,
        mode: ProcessMode,
        file: &SourceFile,
        target: TargetSize,
    ) -> Result<ResultFile> {
        match mode {
            ProcessMode::Image => self.resize_image(file, target).await,
            ProcessMode::Pdf => self.optimize_pdf(file).await,
        }
    }
}

impl Default for TransformService {
    /// Both built-in engines with their default options.
    fn default() -> Self {
        Self::empty()
            .with_image_engine(ImageCompressor::default())
            .with_pdf_engine(PdfRewriter::default())
    }
}
