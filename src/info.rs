use crate::file::SourceFile;
use crate::formats::FileKind;
use crate::utils::format_file_size;
use image::ImageReader;
use std::fmt;
use std::io::Cursor;

/// What `info` reports about a file
#[derive(Debug, Clone, PartialEq)]
pub struct FileReport {
    pub name: String,
    pub content_type: String,
    pub kind: FileKind,
    pub size: u64,
    pub dimensions: Option<(u32, u32)>,
    pub pages: Option<usize>,
}

pub fn inspect(file: &SourceFile) -> FileReport {
    let kind = file.kind();
    let dimensions = match kind {
        FileKind::Image => image_dimensions(file.bytes()),
        _ => None,
    };
    let pages = match kind {
        FileKind::Pdf => lopdf::Document::load_mem(file.bytes())
            .map(|doc| doc.get_pages().len())
            .map_err(|e| log::debug!("Could not count PDF pages: {}", e))
            .ok(),
        _ => None,
    };

    FileReport {
        name: file.name().to_string(),
        content_type: file.content_type().to_string(),
        kind,
        size: file.size(),
        dimensions,
        pages,
    }
}

fn image_dimensions(bytes: &[u8]) -> Option<(u32, u32)> {
    ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .ok()?
        .into_dimensions()
        .map_err(|e| log::debug!("Could not read image dimensions: {}", e))
        .ok()
}

impl fmt::Display for FileReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "📋 Basic Information:")?;
        writeln!(f, "  📁 File: {}", self.name)?;
        writeln!(f, "  🎭 Content type: {}", self.content_type)?;
        let handled_as = match self.kind {
            FileKind::Image => "image (resize to target size)",
            FileKind::Pdf => "pdf (structure optimization)",
            FileKind::Unsupported => "unsupported",
        };
        writeln!(f, "  🏷️  Handled as: {}", handled_as)?;
        writeln!(f, "  📦 File size: {} ({} bytes)", format_file_size(self.size), self.size)?;
        if let Some((width, height)) = self.dimensions {
            writeln!(f, "  📏 Dimensions: {}x{} pixels", width, height)?;
        }
        if let Some(pages) = self.pages {
            writeln!(f, "  📄 Pages: {}", pages)?;
        }
        Ok(())
    }
}
