//! Utility functions for common operations
//!
//! Size formatting and naming helpers shared by the view and the CLI.

use crate::constants::{PROGRESS_SPINNER_TEMPLATE, RESIZED_SUFFIX};
use indicatif::{ProgressBar, ProgressStyle};

/// Format file size in human-readable format
///
/// # Arguments
/// * `bytes` - Size in bytes
///
/// # Returns
/// * Human-readable size string (e.g., "1.2 MB", "512 B")
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    const THRESHOLD: f64 = 1024.0;

    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= THRESHOLD && unit_index < UNITS.len() - 1 {
        size /= THRESHOLD;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[unit_index])
    } else {
        format!("{:.1} {}", size, UNITS[unit_index])
    }
}

/// Download name for a processed file.
///
/// Inserts `_resized` before the final extension. A name without an
/// extension of word characters or dashes is returned as is.
///
/// # Example
/// ```
/// use file_squeeze::utils::resized_file_name;
///
/// assert_eq!(resized_file_name("photo.jpg"), "photo_resized.jpg");
/// assert_eq!(resized_file_name("README"), "README");
/// ```
pub fn resized_file_name(name: &str) -> String {
    let Some(dot) = name.rfind('.') else {
        return name.to_string();
    };

    let extension = &name[dot + 1..];
    let valid = !extension.is_empty()
        && extension
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');

    if valid {
        format!("{}{}{}", &name[..dot], RESIZED_SUFFIX, &name[dot..])
    } else {
        name.to_string()
    }
}

/// Calculate compression ratio as a percentage
///
/// Positive means the result is smaller, negative means it grew.
pub fn calculate_compression_ratio(original_size: u64, result_size: u64) -> f64 {
    if original_size == 0 {
        return 0.0;
    }
    ((original_size as f64 - result_size as f64) / original_size as f64) * 100.0
}

/// Create a progress spinner with consistent styling
pub fn create_progress_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template(PROGRESS_SPINNER_TEMPLATE) {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb
}
