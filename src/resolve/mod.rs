//! Resolvers for classified stroke groups.
//!
//! Each resolver consumes a disjoint subset of a page's strokes, partitioned
//! by [`crate::classify::classify`]: highlights against the text layout,
//! box gestures into raster crops, and everything else into handwriting.

pub mod crop;
pub mod handwriting;
pub mod highlight;

pub use crop::{CropOptions, CropOutcome, PageImageProvider, RasterImage};
pub use handwriting::PageTransform;
pub use highlight::HighlightOptions;
