//! Built-in PDF engine
//!
//! Structural rewrite only: load, optionally prune, save. Content streams are
//! never recompressed here.

use crate::engine::PdfEngine;
use crate::file::SourceFile;
use anyhow::{bail, Context};
use async_trait::async_trait;
use lopdf::Document;

#[derive(Debug, Clone)]
pub struct PdfOptions {
    /// Load encrypted documents instead of rejecting them
    pub ignore_encryption: bool,
    /// Drop objects no longer reachable from the trailer before saving
    pub prune_unused_objects: bool,
}

impl Default for PdfOptions {
    fn default() -> Self {
        Self {
            ignore_encryption: true,
            prune_unused_objects: false,
        }
    }
}

/// Loads a PDF into memory and writes it back out.
///
/// Re-serialization is the whole optimization: streams are written as they
/// were loaded. Encrypted input is tolerated when `ignore_encryption` is set;
/// the empty user password is tried and the document is saved either way.
pub fn rewrite_pdf(bytes: &[u8], options: &PdfOptions) -> anyhow::Result<Vec<u8>> {
    let mut doc = Document::load_mem(bytes).context("Failed to load PDF")?;
    log::debug!(
        "Loaded PDF {} with {} objects and {} pages",
        doc.version,
        doc.objects.len(),
        doc.get_pages().len()
    );

    if doc.is_encrypted() {
        if !options.ignore_encryption {
            bail!("PDF is encrypted");
        }
        match doc.decrypt(b"") {
            Ok(_) => log::debug!("Decrypted with the empty password"),
            Err(e) => log::warn!("Keeping encrypted content as is: {:?}", e),
        }
    }

    if options.prune_unused_objects {
        let removed = doc.prune_objects();
        doc.renumber_objects();
        log::debug!("Pruned {} unreferenced objects", removed.len());
    }

    let mut buffer = Vec::with_capacity(bytes.len());
    doc.save_to(&mut buffer).context("Failed to save PDF")?;
    Ok(buffer)
}

/// PDF engine backed by `lopdf`
#[derive(Debug, Clone, Default)]
pub struct PdfRewriter {
    options: PdfOptions,
}

impl PdfRewriter {
    pub fn new(options: PdfOptions) -> Self {
        Self { options }
    }
}

#[async_trait]
impl PdfEngine for PdfRewriter {
    fn name(&self) -> &'static str {
        "lopdf"
    }

    async fn rewrite(&self, file: &SourceFile) -> anyhow::Result<Vec<u8>> {
        let source = file.clone();
        let options = self.options.clone();

        tokio::task::spawn_blocking(move || rewrite_pdf(source.bytes(), &options))
            .await
            .context("PDF worker stopped unexpectedly")?
    }
}
