//! Error types for the inklift library.

use std::io;
use thiserror::Error;

/// Result type alias for inklift operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while processing annotation scenes.
///
/// Failures scoped to a single annotation or page never surface here; they
/// are reported as [`PageWarning`] or [`crate::model::PageFailure`] entries
/// on the processing result instead.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The external scene decoder produced input the core cannot use.
    #[error("Decoder input error: {0}")]
    DecoderInput(String),

    /// The page raster provider failed to produce a sub-image.
    #[error("Image provider error: {0}")]
    ImageProvider(String),

    /// An option value is out of its documented range.
    #[error("Invalid option: {0}")]
    InvalidOption(String),

    /// A page scene declares non-positive dimensions.
    #[error("Invalid page dimensions: {width}x{height}")]
    InvalidPageDimensions {
        /// Declared page width
        width: f32,
        /// Declared page height
        height: f32,
    },
}

/// A non-fatal, annotation-scoped problem encountered while processing a
/// page. Warnings are attached to the page outcome; processing continues.
#[derive(Debug, Clone, PartialEq)]
pub enum PageWarning {
    /// A crop rectangle degenerated to zero area after clipping to the page.
    CropGeometry {
        /// Page index the crop belonged to
        page_index: u32,
        /// Human-readable description of the degenerate rectangle
        detail: String,
    },

    /// The page raster provider failed for one crop request.
    ImageProvider {
        /// Page index the crop belonged to
        page_index: u32,
        /// Provider error message
        detail: String,
    },
}

impl std::fmt::Display for PageWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PageWarning::CropGeometry { page_index, detail } => {
                write!(f, "page {page_index}: degenerate crop rectangle: {detail}")
            }
            PageWarning::ImageProvider { page_index, detail } => {
                write!(f, "page {page_index}: image provider failed: {detail}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::DecoderInput("truncated block".to_string());
        assert_eq!(err.to_string(), "Decoder input error: truncated block");

        let err = Error::InvalidPageDimensions {
            width: 0.0,
            height: 1872.0,
        };
        assert_eq!(err.to_string(), "Invalid page dimensions: 0x1872");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_warning_display() {
        let warn = PageWarning::ImageProvider {
            page_index: 3,
            detail: "raster backend unavailable".to_string(),
        };
        assert_eq!(
            warn.to_string(),
            "page 3: image provider failed: raster backend unavailable"
        );
    }
}
