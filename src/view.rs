//! Presentation layer
//!
//! Turns a [`Session`] into a screen description. Nothing here mutates the
//! session; hosts read the screen and forward [`crate::session::Intent`]s.

use crate::constants::{ERROR_PREFIX, TARGET_SIZE_STEP_KB};
use crate::file::TargetSize;
use crate::formats::{FileKind, ProcessMode};
use crate::session::Session;
use crate::utils::{format_file_size, resized_file_name};
use std::fmt;

const PDF_NOTE: &str =
    "This tool optimizes PDF structure to reduce file size. The final size may vary.";

#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    Upload { error: Option<String> },
    Workspace(Workspace),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Workspace {
    pub original: PreviewCard,
    pub controls: Controls,
    pub result: PreviewCard,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PreviewCard {
    pub title: &'static str,
    pub size_label: Option<String>,
    pub body: PreviewBody,
    pub download: Option<Download>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewBody {
    Image { label: String },
    Document { label: String },
    Other { label: String },
    Loading,
    Waiting,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub file_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Controls {
    pub heading: &'static str,
    pub slider: Option<Slider>,
    pub note: Option<&'static str>,
    pub process: Button,
    pub reset: Button,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slider {
    pub value: u32,
    pub min: u32,
    pub max: u32,
    pub step: u32,
    pub disabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: &'static str,
    pub enabled: bool,
}

pub fn render(session: &Session) -> Screen {
    let Some(source) = session.source() else {
        return Screen::Upload {
            error: session.error().map(str::to_string),
        };
    };

    let mode = session.mode().unwrap_or(ProcessMode::Image);
    let processing = session.is_processing();

    let original = PreviewCard {
        title: "Original",
        size_label: Some(format_file_size(source.size())),
        body: preview_body(source.kind(), source.name()),
        download: None,
    };

    let result = match session.result() {
        Some(result) => PreviewCard {
            title: "Result",
            size_label: Some(format_file_size(result.size())),
            body: preview_body(result.kind(), "result"),
            download: Some(Download {
                file_name: resized_file_name(source.name()),
            }),
        },
        None => PreviewCard {
            title: "Result",
            size_label: None,
            body: if processing {
                PreviewBody::Loading
            } else {
                PreviewBody::Waiting
            },
            download: None,
        },
    };

    Screen::Workspace(Workspace {
        original,
        controls: controls(mode, session.target_size(), processing, session.is_draining()),
        result,
        error: session.error().map(str::to_string),
    })
}

fn preview_body(kind: FileKind, label: &str) -> PreviewBody {
    let label = label.to_string();
    match kind {
        FileKind::Image => PreviewBody::Image { label },
        FileKind::Pdf => PreviewBody::Document { label },
        FileKind::Unsupported => PreviewBody::Other { label },
    }
}

fn controls(mode: ProcessMode, target: TargetSize, processing: bool, draining: bool) -> Controls {
    let (heading, idle_label, busy_label) = match mode {
        ProcessMode::Image => ("Resize Options", "Resize Image", "Resizing..."),
        ProcessMode::Pdf => ("PDF Optimizer", "Optimize PDF", "Optimizing..."),
    };

    Controls {
        heading,
        slider: (mode == ProcessMode::Image).then(|| Slider {
            value: target.kilobytes(),
            min: TargetSize::MIN.kilobytes(),
            max: TargetSize::MAX.kilobytes(),
            step: TARGET_SIZE_STEP_KB,
            disabled: processing,
        }),
        note: (mode == ProcessMode::Pdf).then_some(PDF_NOTE),
        process: Button {
            label: if processing { busy_label } else { idle_label },
            enabled: !processing && !draining,
        },
        reset: Button {
            label: "Start Over",
            enabled: true,
        },
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Screen::Upload { error } => {
                writeln!(f, "📂 Click to upload or drag and drop")?;
                writeln!(f, "   Image (PNG, JPG, WEBP) or PDF")?;
                if let Some(error) = error {
                    writeln!(f, "{} {}", ERROR_PREFIX, error)?;
                }
                Ok(())
            }
            Screen::Workspace(workspace) => write!(f, "{}", workspace),
        }
    }
}

impl fmt::Display for Workspace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.original)?;
        write!(f, "{}", self.controls)?;
        write!(f, "{}", self.result)?;
        if let Some(error) = &self.error {
            writeln!(f, "{} {}", ERROR_PREFIX, error)?;
        }
        Ok(())
    }
}

impl fmt::Display for PreviewCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "── {} ──", self.title)?;
        if let Some(size) = &self.size_label {
            writeln!(f, "  📦 {}", size)?;
        }
        match &self.body {
            PreviewBody::Image { label } => writeln!(f, "  🖼️  {}", label)?,
            PreviewBody::Document { label } => writeln!(f, "  📄 {}", label)?,
            PreviewBody::Other { label } => writeln!(f, "  📁 {}", label)?,
            PreviewBody::Loading => writeln!(f, "  ⏳ Processing...")?,
            PreviewBody::Waiting => writeln!(f, "  ⬚ Waiting for result")?,
        }
        if let Some(download) = &self.download {
            writeln!(f, "  ⬇️  Download: {}", download.file_name)?;
        }
        Ok(())
    }
}

impl fmt::Display for Controls {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "── {} ──", self.heading)?;
        if let Some(slider) = &self.slider {
            writeln!(
                f,
                "  🎯 Target Size: {} KB ({}-{} KB, step {}){}",
                slider.value,
                slider.min,
                slider.max,
                slider.step,
                if slider.disabled { " [locked]" } else { "" }
            )?;
        }
        if let Some(note) = self.note {
            writeln!(f, "  {}", note)?;
        }
        writeln!(
            f,
            "  [{}]{}  [{}]",
            self.process.label,
            if self.process.enabled { "" } else { " (disabled)" },
            self.reset.label
        )
    }
}
