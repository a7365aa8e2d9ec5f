//! Data model for annotation scenes and their processed records.
//!
//! Input types ([`PageScene`], [`StrokeGroup`], [`TextLayoutBox`]) are
//! produced by an external scene decoder; output types ([`Annotation`],
//! [`PageRecord`], [`DocumentRecord`]) are handed to the export layer.

mod annotation;
mod geometry;
mod scene;

pub use annotation::{
    Annotation, DocumentMetadata, DocumentRecord, HandwritingBundle, PageFailure, PageRecord,
    VectorPath,
};
pub use geometry::{Color, Point, Rect};
pub use scene::{PageContext, PageScene, PenKind, StrokeGroup, TextLayoutBox};
