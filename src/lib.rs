//! # inklift
//!
//! Semantic annotation extraction from tablet ink scenes.
//!
//! This library takes normalized per-page scenes — ink stroke groups plus
//! the host document's text layout — and reconstructs portable annotations:
//! highlighted text spans, cropped image regions, and rendered handwriting.
//! Scene decoding and page rasterization are external collaborators; the
//! decoder supplies [`PageScene`] values and the caller injects a
//! [`PageImageProvider`] for raster crops.
//!
//! ## Quick Start
//!
//! ```no_run
//! use inklift::{process_document, DocumentMetadata, PageImageProvider, ProcessOptions};
//! # use inklift::{PageScene, RasterImage, Rect, Result};
//! # struct MyProvider;
//! # impl PageImageProvider for MyProvider {
//! #     fn crop(&self, _page_id: &str, _rect: Rect) -> Result<RasterImage> {
//! #         unimplemented!()
//! #     }
//! # }
//! # fn decode_pages() -> Vec<Result<PageScene>> { Vec::new() }
//!
//! let pages = decode_pages(); // from the external scene decoder
//! let result = process_document(
//!     "My Notebook",
//!     DocumentMetadata::default(),
//!     pages,
//!     &MyProvider,
//!     &ProcessOptions::new(),
//! );
//! for page in &result.document.pages {
//!     println!("page {}: {} annotations", page.index, page.annotations.len());
//! }
//! ```
//!
//! ## Features
//!
//! - **Total classification**: every stroke becomes a highlight, crop,
//!   handwriting path, or is explicitly dropped — nothing is lost silently
//! - **Text reconstruction**: highlight spans rebuilt from the host
//!   document's layout boxes, with multi-line merging
//! - **Deterministic output**: identical input yields identical records and
//!   crop artifact names, making re-export idempotent
//! - **Resilient**: failures are page- or annotation-scoped warnings, never
//!   document-level aborts
//! - **Parallel processing**: pages are processed across a Rayon worker pool

pub mod classify;
pub mod error;
pub mod model;
pub mod palette;
pub mod pipeline;
pub mod resolve;

// Re-export commonly used types
pub use classify::{classify, Category, ClassifyOptions};
pub use error::{Error, PageWarning, Result};
pub use model::{
    Annotation, Color, DocumentMetadata, DocumentRecord, HandwritingBundle, PageContext,
    PageFailure, PageRecord, PageScene, PenKind, Point, Rect, StrokeGroup, TextLayoutBox,
    VectorPath,
};
pub use pipeline::{
    aggregate, process_document, process_page, CropArtifact, PageOutcome, ProcessOptions,
    ProcessResult, ProcessStats,
};
pub use resolve::{
    CropOptions, CropOutcome, HighlightOptions, PageImageProvider, PageTransform, RasterImage,
};

/// Builder for configuring and running the annotation pipeline.
///
/// # Example
///
/// ```
/// use inklift::Inklift;
///
/// let options = Inklift::new()
///     .with_color_tolerance(16)
///     .with_crop_margin(5.0)
///     .sequential()
///     .into_options();
/// assert!(!options.parallel);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Inklift {
    options: ProcessOptions,
}

impl Inklift {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self {
            options: ProcessOptions::new(),
        }
    }

    /// Replace the highlighter color set.
    pub fn with_highlighter_colors(mut self, colors: Vec<Color>) -> Self {
        self.options.classify.highlighter_colors = colors;
        self
    }

    /// Set the palette matching tolerance.
    pub fn with_color_tolerance(mut self, tolerance: u8) -> Self {
        self.options.classify.color_tolerance = tolerance;
        self
    }

    /// Set the maximum highlight height as a fraction of page height.
    pub fn with_max_highlight_height_ratio(mut self, ratio: f32) -> Self {
        self.options.classify.max_highlight_height_ratio = ratio;
        self
    }

    /// Set the crop margin in page units.
    pub fn with_crop_margin(mut self, margin: f32) -> Self {
        self.options.crop.margin = margin;
        self
    }

    /// Disable parallel page processing.
    pub fn sequential(mut self) -> Self {
        self.options.parallel = false;
        self
    }

    /// Finish building and return the options.
    pub fn into_options(self) -> ProcessOptions {
        self.options
    }

    /// Process one page with the configured options.
    pub fn process_page(
        &self,
        scene: &PageScene,
        provider: &dyn PageImageProvider,
    ) -> Result<PageOutcome> {
        process_page(scene, provider, &self.options)
    }

    /// Process a document with the configured options.
    pub fn process_document(
        &self,
        title: impl Into<String>,
        metadata: DocumentMetadata,
        pages: Vec<Result<PageScene>>,
        provider: &dyn PageImageProvider,
    ) -> ProcessResult {
        process_document(title, metadata, pages, provider, &self.options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let options = Inklift::new().into_options();
        assert!(options.parallel);
        assert_eq!(options.classify.color_tolerance, 24);
        assert_eq!(options.crop.margin, 3.0);
    }

    #[test]
    fn test_builder_chained() {
        let options = Inklift::new()
            .with_color_tolerance(8)
            .with_max_highlight_height_ratio(0.08)
            .with_crop_margin(5.0)
            .sequential()
            .into_options();
        assert_eq!(options.classify.color_tolerance, 8);
        assert_eq!(options.classify.max_highlight_height_ratio, 0.08);
        assert_eq!(options.crop.margin, 5.0);
        assert!(!options.parallel);
    }

    #[test]
    fn test_builder_custom_palette() {
        let teal = Color::rgb(0, 180, 180);
        let options = Inklift::new().with_highlighter_colors(vec![teal]).into_options();
        assert_eq!(options.classify.highlighter_colors, vec![teal]);
    }
}
