//! Scene-level input types produced by the external decoder.

use serde::{Deserialize, Serialize};

use super::geometry::{Color, Point, Rect};

/// Pen tool used to draw a stroke group, as tagged by the capture device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PenKind {
    /// Ballpoint pen
    Ballpoint,
    /// Fineliner pen
    Fineliner,
    /// Marker
    Marker,
    /// Pencil
    Pencil,
    /// Mechanical pencil
    MechanicalPencil,
    /// Paintbrush
    Paintbrush,
    /// Highlighter tool
    Highlighter,
    /// Calligraphy pen
    Calligraphy,
    /// Eraser
    Eraser,
    /// Erase-area tool
    EraseArea,
    /// Shader tool
    Shader,
    /// Tool id not known to this crate
    Unknown(u8),
}

impl PenKind {
    /// Whether this tool erases rather than draws. Erase strokes carry no
    /// renderable ink.
    pub fn is_eraser(&self) -> bool {
        matches!(self, PenKind::Eraser | PenKind::EraseArea)
    }
}

/// One continuous ink gesture: an ordered polyline (or polygon) with uniform
/// color and pen metadata. Immutable once produced by the decoder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrokeGroup {
    /// Ordered points of the gesture, in device coordinates
    pub points: Vec<Point>,
    /// Draw color
    pub color: Color,
    /// Pen tool tag
    pub pen: PenKind,
    /// Dominant stroke width
    pub width: f32,
}

impl StrokeGroup {
    /// Create a stroke group.
    pub fn new(points: Vec<Point>, color: Color, pen: PenKind, width: f32) -> Self {
        Self {
            points,
            color,
            pen,
            width,
        }
    }

    /// Minimal axis-aligned bounding rectangle, `None` when empty.
    pub fn bbox(&self) -> Option<Rect> {
        Rect::bounding(&self.points)
    }

    /// Total polyline length.
    pub fn path_length(&self) -> f32 {
        self.points
            .windows(2)
            .map(|pair| pair[0].distance(&pair[1]))
            .sum()
    }

    /// Whether the gesture's start and end points lie within `epsilon` of
    /// each other, i.e. the path is visually closed.
    pub fn is_closed(&self, epsilon: f32) -> bool {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) if self.points.len() >= 3 => {
                first.distance(last) <= epsilon
            }
            _ => false,
        }
    }
}

/// A rectangle of typed text from the host document's layout (PDF/EPUB),
/// independent of the ink layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextLayoutBox {
    /// Bounding rectangle in page coordinates
    pub bbox: Rect,
    /// Text content of the box
    pub text: String,
    /// Position in the document's reading order
    pub reading_order: u32,
}

impl TextLayoutBox {
    /// Create a text layout box.
    pub fn new(bbox: Rect, text: impl Into<String>, reading_order: u32) -> Self {
        Self {
            bbox,
            text: text.into(),
            reading_order,
        }
    }
}

/// Normalized per-page input: the decoded ink layers and the host document's
/// text layout for one page. Consumed once by the processing pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageScene {
    /// Stable page identifier from the source document
    pub page_id: String,
    /// Page position in the document (0-indexed)
    pub index: u32,
    /// Declared page width
    pub width: f32,
    /// Declared page height
    pub height: f32,
    /// Ink stroke groups, in capture order
    pub strokes: Vec<StrokeGroup>,
    /// Text layout boxes from the host document
    pub text_boxes: Vec<TextLayoutBox>,
    /// Page-level tags surfaced by the decoder's tag layer, commonly empty
    #[serde(default)]
    pub tags: Vec<String>,
}

impl PageScene {
    /// Create an empty scene with the given identity and dimensions.
    pub fn new(page_id: impl Into<String>, index: u32, width: f32, height: f32) -> Self {
        Self {
            page_id: page_id.into(),
            index,
            width,
            height,
            strokes: Vec::new(),
            text_boxes: Vec::new(),
            tags: Vec::new(),
        }
    }

    /// Page bounds as a rectangle anchored at the origin.
    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    /// Whether the page carries no ink at all.
    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    /// Page dimensions as a `(width, height)` tuple.
    pub fn dimensions(&self) -> (f32, f32) {
        (self.width, self.height)
    }
}

/// Page-level constants the classifier and renderers need: identity,
/// dimensions, and nothing else. Cheap to copy per stroke.
#[derive(Debug, Clone)]
pub struct PageContext {
    /// Stable page identifier
    pub page_id: String,
    /// Page position in the document
    pub index: u32,
    /// Page width
    pub width: f32,
    /// Page height
    pub height: f32,
}

impl PageContext {
    /// Derive the context from a scene.
    pub fn from_scene(scene: &PageScene) -> Self {
        Self {
            page_id: scene.page_id.clone(),
            index: scene.index,
            width: scene.width,
            height: scene.height,
        }
    }

    /// Page bounds as a rectangle anchored at the origin.
    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    /// Page diagonal length, the scale-free reference for distance epsilons.
    pub fn diagonal(&self) -> f32 {
        (self.width * self.width + self.height * self.height).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(size: f32) -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(size, 0.0),
            Point::new(size, size),
            Point::new(0.0, size),
            Point::new(0.5, 0.5),
        ]
    }

    #[test]
    fn test_stroke_is_closed() {
        let stroke = StrokeGroup::new(square(100.0), Color::rgb(0, 0, 0), PenKind::Fineliner, 2.0);
        assert!(stroke.is_closed(1.0));
        assert!(!stroke.is_closed(0.1));

        let open = StrokeGroup::new(
            vec![Point::new(0.0, 0.0), Point::new(50.0, 50.0)],
            Color::rgb(0, 0, 0),
            PenKind::Fineliner,
            2.0,
        );
        assert!(!open.is_closed(10.0));
    }

    #[test]
    fn test_path_length() {
        let stroke = StrokeGroup::new(
            vec![
                Point::new(0.0, 0.0),
                Point::new(3.0, 4.0),
                Point::new(3.0, 8.0),
            ],
            Color::rgb(0, 0, 0),
            PenKind::Ballpoint,
            2.0,
        );
        assert!((stroke.path_length() - 9.0).abs() < 1e-6);
    }

    #[test]
    fn test_scene_bounds() {
        let scene = PageScene::new("p1", 0, 1404.0, 1872.0);
        assert_eq!(scene.bounds(), Rect::new(0.0, 0.0, 1404.0, 1872.0));
        assert!(scene.is_empty());
        assert_eq!(scene.dimensions(), (1404.0, 1872.0));
    }

    #[test]
    fn test_pen_kind_eraser() {
        assert!(PenKind::EraseArea.is_eraser());
        assert!(!PenKind::Highlighter.is_eraser());
    }
}
