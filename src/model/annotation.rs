//! Output model: semantic annotations and the records that carry them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::geometry::{Color, Point, Rect};

/// A semantic annotation reconstructed from one or more ink strokes.
///
/// Every stroke group on a page maps to exactly one of these variants or is
/// dropped as decoration-free noise; classification is total and exclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Annotation {
    /// A highlighter stroke resolved against the host document's text layout.
    Highlight {
        /// Aggregate highlight color
        color: Color,
        /// Reconstructed text span, reading order
        text: String,
        /// Union of the matched layout boxes
        bbox: Rect,
    },

    /// A closed box gesture extracted as a raster crop of the page.
    CropImage {
        /// Crop rectangle, clipped to page bounds
        bbox: Rect,
        /// Deterministic artifact name for the cropped image
        image_ref: String,
    },

    /// Free handwriting rendered as a vector path.
    HandwritingPath {
        /// Path points in the output coordinate space
        points: Vec<Point>,
        /// Stroke color
        color: Color,
        /// Dominant stroke width
        width: f32,
    },

    /// A highlight whose text could not be matched against the layout; the
    /// bounding box is preserved rather than the annotation dropped.
    UnresolvedHighlight {
        /// Bounding box of the highlight stroke
        bbox: Rect,
    },
}

impl Annotation {
    /// Bounding rectangle used for reading-order sorting.
    pub fn bbox(&self) -> Option<Rect> {
        match self {
            Annotation::Highlight { bbox, .. }
            | Annotation::CropImage { bbox, .. }
            | Annotation::UnresolvedHighlight { bbox } => Some(*bbox),
            Annotation::HandwritingPath { points, .. } => Rect::bounding(points),
        }
    }

    /// Check if this annotation is a resolved highlight.
    pub fn is_highlight(&self) -> bool {
        matches!(self, Annotation::Highlight { .. })
    }

    /// Check if this annotation is a crop image.
    pub fn is_crop(&self) -> bool {
        matches!(self, Annotation::CropImage { .. })
    }
}

/// A single normalized vector path inside a handwriting bundle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorPath {
    /// Path points in the output coordinate space
    pub points: Vec<Point>,
    /// Stroke color
    pub color: Color,
    /// Stroke width in output units
    pub width: f32,
}

/// All handwriting on one page, combined into a single exportable artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandwritingBundle {
    /// Bundle width in output units
    pub width: f32,
    /// Bundle height in output units
    pub height: f32,
    /// One vector path per source stroke group
    pub paths: Vec<VectorPath>,
}

impl HandwritingBundle {
    /// Whether the bundle contains any paths.
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Flatten the bundle into per-path annotations for consumers that
    /// inline handwriting into the annotation stream instead of rendering
    /// the bundle as a single SVG artifact.
    pub fn to_annotations(&self) -> Vec<Annotation> {
        self.paths
            .iter()
            .map(|p| Annotation::HandwritingPath {
                points: p.points.clone(),
                color: p.color,
                width: p.width,
            })
            .collect()
    }

    /// Serialize the bundle as a standalone SVG document. Writing the string
    /// to disk is the caller's responsibility.
    pub fn to_svg(&self) -> String {
        let mut svg = String::with_capacity(256 + self.paths.len() * 128);
        svg.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        svg.push_str(&format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{:.0}\" height=\"{:.0}\" viewBox=\"0 0 {:.0} {:.0}\">\n",
            self.width, self.height, self.width, self.height
        ));
        for path in &self.paths {
            if path.points.is_empty() {
                continue;
            }
            let mut data = String::with_capacity(path.points.len() * 14);
            for (i, p) in path.points.iter().enumerate() {
                if i == 0 {
                    data.push_str(&format!("M {:.2},{:.2}", p.x, p.y));
                } else {
                    data.push_str(&format!(" L {:.2},{:.2}", p.x, p.y));
                }
            }
            let opacity = path.color.a as f32 / 255.0;
            svg.push_str(&format!(
                "  <path d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{:.2}\" stroke-opacity=\"{:.2}\" stroke-linecap=\"round\" stroke-linejoin=\"round\"/>\n",
                data,
                path.color.to_hex(),
                path.width.max(1.0),
                opacity
            ));
        }
        svg.push_str("</svg>\n");
        svg
    }
}

/// A fully-processed page: sorted annotations, tags, and the optional
/// handwriting bundle. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageRecord {
    /// Page position in the document (0-indexed)
    pub index: u32,
    /// Page-level tags, sorted and deduplicated
    pub tags: Vec<String>,
    /// Annotations in reading order (top-to-bottom, then left-to-right)
    pub annotations: Vec<Annotation>,
    /// Handwriting bundle, present only when the page has handwriting
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handwriting: Option<HandwritingBundle>,
}

impl PageRecord {
    /// Whether the page produced no output at all.
    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty() && self.handwriting.is_none() && self.tags.is_empty()
    }
}

/// A page the decoder could not parse. Recorded on the document so one bad
/// page never aborts the run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageFailure {
    /// Page position in the document
    pub index: u32,
    /// Decoder error message
    pub reason: String,
}

/// Document-level metadata carried through to the export layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// Creation timestamp from the source document
    pub created: Option<DateTime<Utc>>,
    /// Last-modified timestamp from the source document
    pub modified: Option<DateTime<Utc>>,
}

/// The complete processed document, handed to the external template/export
/// layer. Immutable once built; identical input yields a structurally
/// identical record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// Document title
    pub title: String,
    /// Processed pages, in document order
    pub pages: Vec<PageRecord>,
    /// Document metadata
    pub metadata: DocumentMetadata,
    /// Pages skipped because their decode failed
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub page_failures: Vec<PageFailure>,
}

impl DocumentRecord {
    /// Number of successfully processed pages.
    pub fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    /// Whether no page produced any output.
    pub fn is_empty(&self) -> bool {
        self.pages.iter().all(|p| p.is_empty())
    }
}
