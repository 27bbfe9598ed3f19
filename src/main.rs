use clap::Parser;
use file_squeeze::cli::{Args, Commands};
use file_squeeze::constants::{
    COMPRESSION_RATIO_PREFIX, INFO_PREFIX, ORIGINAL_SIZE_PREFIX, RESULT_SIZE_PREFIX,
    SUCCESS_PREFIX,
};
use file_squeeze::error::{ProcessingError, Result};
use file_squeeze::info::inspect;
use file_squeeze::utils::{
    calculate_compression_ratio, create_progress_spinner, format_file_size, resized_file_name,
};
use file_squeeze::{
    error, info, logger, verbose, warn, Coordinator, ImageCompressor, Intent, PdfOptions,
    PdfRewriter, ProcessMode, ResizeOptions, SourceFile, TransformService,
};
use std::path::{Path, PathBuf};

#[tokio::main]
async fn main() {
    let args = Args::parse();
    logger::init(args.quiet, args.verbose);

    if let Err(e) = run(args.command).await {
        error!("{}", e);
        std::process::exit(1);
    }
}

async fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Process {
            input,
            output,
            target_kb,
            max_iterations,
            min_quality,
            prune,
            strict_encryption,
        } => {
            let options = ResizeOptions::new(max_iterations, min_quality, None)?;
            let pdf_options = PdfOptions {
                ignore_encryption: !strict_encryption,
                prune_unused_objects: prune,
            };
            let service = TransformService::empty()
                .with_image_engine(ImageCompressor::new(options))
                .with_pdf_engine(PdfRewriter::new(pdf_options));

            process_file(Coordinator::new(service), &input, output, target_kb).await
        }
        Commands::Info { input } => {
            info!("{} Getting info for: {:?}", INFO_PREFIX, input);
            let file = SourceFile::from_path(&input)?;
            info!("{}", inspect(&file));
            Ok(())
        }
    }
}

async fn process_file(
    coordinator: Coordinator,
    input: &Path,
    output: Option<PathBuf>,
    target_kb: Option<u32>,
) -> Result<()> {
    let file = SourceFile::from_path(input)?;
    let output = output.unwrap_or_else(|| default_output(input, file.name()));

    coordinator.dispatch(Intent::SelectFile(file)).await?;
    let mode = coordinator.with_session(|s| s.mode());

    if let Some(kb) = target_kb {
        if mode == Some(ProcessMode::Pdf) {
            warn!("--target-kb only applies to images, ignoring {} KB", kb);
        } else {
            coordinator.dispatch(Intent::ChangeTargetSize(kb)).await?;
        }
    }

    let target = coordinator.with_session(|s| s.target_size());
    verbose!("Input: {:?}", input);
    verbose!("Output: {:?}", output);
    if mode == Some(ProcessMode::Image) {
        verbose!("Target size: {}", target);
    }

    let spinner = (!logger::is_quiet()).then(|| {
        create_progress_spinner(match mode {
            Some(ProcessMode::Pdf) => "Optimizing...",
            _ => "Resizing...",
        })
    });
    let outcome = coordinator.dispatch(Intent::StartProcess).await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    info!("{}", coordinator.render());
    outcome?;

    let session = coordinator.snapshot();
    let (Some(source), Some(result)) = (session.source(), session.result()) else {
        return Err(ProcessingError::Io(std::io::Error::other(
            "transform finished without a result",
        )));
    };

    let written = result.write_to(&output)?;
    info!("{} Saved to {:?}", SUCCESS_PREFIX, output);
    info!("{} {}", ORIGINAL_SIZE_PREFIX, format_file_size(source.size()));
    info!("{} {}", RESULT_SIZE_PREFIX, format_file_size(written));
    info!(
        "{} {:.1}%",
        COMPRESSION_RATIO_PREFIX,
        calculate_compression_ratio(source.size(), written)
    );

    if mode == Some(ProcessMode::Image) && written > target.max_bytes() {
        warn!(
            "Result is {} which is still above the {} target",
            format_file_size(written),
            target
        );
    }

    Ok(())
}

fn default_output(input: &Path, name: &str) -> PathBuf {
    input.with_file_name(resized_file_name(name))
}
