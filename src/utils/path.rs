//! Path utilities for source selection

use std::path::Path;

use crate::error::{EditxError, EditxResult};

/// Extensions accepted as video sources
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "m4v", "mov", "mkv", "webm", "avi"];

/// Path utilities for input handling
pub struct PathUtils;

impl PathUtils {
    /// Get lowercase file extension from path
    pub fn get_extension(path: &Path) -> Option<String> {
        path.extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
    }

    /// Whether the path names a recognised video type
    pub fn is_video_file(path: &Path) -> bool {
        Self::get_extension(path)
            .map(|ext| VIDEO_EXTENSIONS.contains(&ext.as_str()))
            .unwrap_or(false)
    }

    /// Reject missing files and non-video types
    pub fn validate_source(path: &Path) -> EditxResult<()> {
        if !Self::is_video_file(path) {
            return Err(EditxError::UnsupportedInput {
                path: path.display().to_string(),
            });
        }
        if !path.is_file() {
            return Err(EditxError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Input file does not exist: {}", path.display()),
            )));
        }
        Ok(())
    }

    /// File name for display, falling back to the full path
    pub fn display_name(path: &Path) -> String {
        path.file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string())
    }
}
