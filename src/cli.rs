use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "file-squeeze",
    about = "Shrink an image to a target size or optimize a PDF",
    long_about = "file-squeeze takes one image or PDF at a time. Images are re-encoded and \
                  downscaled until they fit the target size; PDFs are loaded and re-serialized \
                  to tighten their structure.",
    version,
    after_help = "EXAMPLES:\n  \
    file-squeeze process photo.jpg -t 200\n  \
    file-squeeze process scan.png -o small.png -t 50 --max-iterations 15\n  \
    file-squeeze process report.pdf --prune\n  \
    file-squeeze info photo.png"
)]
pub struct Args {
    #[arg(short, long, global = true, help = "Only print errors")]
    pub quiet: bool,

    #[arg(
        short,
        long,
        global = true,
        help = "Print extra progress details",
        long_help = "Print extra progress details and enable debug diagnostics. \
                     RUST_LOG overrides the diagnostic filter when set."
    )]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(
        about = "Resize an image or optimize a PDF",
        long_about = "Select the input, apply the target size for images, run the transform \
                      and write the result. The default output sits next to the input with \
                      `_resized` before the extension."
    )]
    Process {
        #[arg(help = "Input image or PDF path")]
        input: PathBuf,

        #[arg(short = 'o', long, help = "Output path (default: <name>_resized.<ext>)")]
        output: Option<PathBuf>,

        #[arg(
            short = 't',
            long = "target-kb",
            help = "Target size in KB for images (5-1000, step 5, default: 100)",
            long_help = "Maximum size of the resized image in kilobytes. \
                         Must be a multiple of 5 between 5 and 1000. Ignored for PDFs."
        )]
        target_kb: Option<u32>,

        #[arg(
            long,
            help = "Maximum encode passes for images (default: 10)",
            long_help = "Upper bound on encode-and-downscale passes. The smallest attempt is \
                         kept when the target cannot be reached."
        )]
        max_iterations: Option<u32>,

        #[arg(
            long,
            help = "Lowest JPEG quality the search may use (1-100, default: 5)"
        )]
        min_quality: Option<u8>,

        #[arg(long, help = "Drop unreferenced PDF objects before saving")]
        prune: bool,

        #[arg(long, help = "Reject encrypted PDFs instead of rewriting them")]
        strict_encryption: bool,
    },

    #[command(
        about = "Show how a file would be handled",
        long_about = "Print the classification, declared content type, size and, for images, \
                      the pixel dimensions of a file."
    )]
    Info {
        #[arg(help = "File path to analyze")]
        input: PathBuf,
    },
}
