pub mod cli;
pub mod constants;
pub mod coordinator;
pub mod engine;
pub mod error;
pub mod file;
pub mod formats;
pub mod info;
pub mod logger;
pub mod pdf;
pub mod processing;
pub mod session;
pub mod utils;
pub mod view;

pub use coordinator::Coordinator;
pub use engine::{ImageEngine, PdfEngine, TransformService};
pub use error::{ProcessingError, Result};
pub use file::{ResultFile, SourceFile, TargetSize};
pub use formats::{classify, FileKind, ProcessMode};
pub use pdf::{rewrite_pdf, PdfOptions, PdfRewriter};
pub use processing::{compress_to_max_bytes, ImageCompressor, ResizeOptions};
pub use session::{Intent, Session, SessionState};
pub use utils::{format_file_size, resized_file_name};
pub use view::{render, Screen};
