//! Stroke classification.
//!
//! Assigns every stroke group on a page to exactly one category using
//! geometric and color heuristics. The source data carries no explicit
//! annotation tagging, so this is where freehand ink is disambiguated into
//! highlights, crop gestures, and handwriting.

use crate::model::{Color, PageContext, PenKind, StrokeGroup};
use crate::palette;

/// Category assigned to a stroke group. Classification is total: every
/// stroke maps to exactly one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// A highlighter stroke to be resolved against the text layout
    Highlight,
    /// A closed box gesture requesting a raster crop
    BoxCrop,
    /// Free handwriting to be rendered as vector paths
    Handwriting,
    /// Zero-length or single-point artifacts, and eraser strokes
    Ignored,
}

/// Classifier thresholds with documented defaults.
///
/// Every heuristic constant lives here rather than inline in the decision
/// flow, so policy can be tuned and tested independently of control flow.
#[derive(Debug, Clone)]
pub struct ClassifyOptions {
    /// Colors treated as highlighter ink
    pub highlighter_colors: Vec<Color>,

    /// Per-channel tolerance when matching stroke colors to the palette
    pub color_tolerance: u8,

    /// Maximum highlight bbox height, as a fraction of page height
    pub max_highlight_height_ratio: f32,

    /// Endpoint distance below which a path counts as closed, as a fraction
    /// of the page diagonal
    pub closure_epsilon_ratio: f32,

    /// Minimum bbox aspect ratio (width / height) for a crop gesture
    pub crop_aspect_min: f32,

    /// Maximum bbox aspect ratio for a crop gesture
    pub crop_aspect_max: f32,

    /// Minimum bbox area for a crop gesture, as a fraction of page area.
    /// Separates deliberate crop boxes from accidental closed doodles.
    pub min_crop_area_ratio: f32,
}

impl ClassifyOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the highlighter color set.
    pub fn with_highlighter_colors(mut self, colors: Vec<Color>) -> Self {
        self.highlighter_colors = colors;
        self
    }

    /// Set the color matching tolerance.
    pub fn with_color_tolerance(mut self, tolerance: u8) -> Self {
        self.color_tolerance = tolerance;
        self
    }

    /// Set the maximum highlight height ratio.
    pub fn with_max_highlight_height_ratio(mut self, ratio: f32) -> Self {
        self.max_highlight_height_ratio = ratio;
        self
    }

    /// Set the minimum crop area ratio.
    pub fn with_min_crop_area_ratio(mut self, ratio: f32) -> Self {
        self.min_crop_area_ratio = ratio;
        self
    }
}

impl Default for ClassifyOptions {
    fn default() -> Self {
        Self {
            highlighter_colors: palette::HIGHLIGHTER_COLORS.to_vec(),
            color_tolerance: 24,
            max_highlight_height_ratio: 0.05,
            closure_epsilon_ratio: 0.025,
            crop_aspect_min: 0.2,
            crop_aspect_max: 5.0,
            min_crop_area_ratio: 0.005,
        }
    }
}

/// Assign a stroke group to a category. Pure function of the stroke, the
/// page context, and the options; no I/O.
///
/// Heuristics apply in order, first match wins:
/// 1. degenerate strokes (empty, single point, eraser) → `Ignored`
/// 2. closed single path with box-like aspect and enough area → `BoxCrop`
/// 3. highlighter color and a low, line-like bbox → `Highlight`
/// 4. anything else → `Handwriting` (nothing is silently discarded)
///
/// Known limitation, preserved on purpose: two adjacent box-shaped strokes
/// classify as two independent `BoxCrop` gestures rather than one merged
/// region.
pub fn classify(stroke: &StrokeGroup, ctx: &PageContext, options: &ClassifyOptions) -> Category {
    let Some(bbox) = stroke.bbox() else {
        return Category::Ignored;
    };

    // Zero-length and single-point artifacts carry no annotation intent, and
    // eraser strokes carry no ink; neither participates in the shape tests.
    if stroke.points.len() < 2 || stroke.path_length() <= f32::EPSILON || stroke.pen.is_eraser() {
        return Category::Ignored;
    }

    if is_box_crop(stroke, ctx, options) {
        return Category::BoxCrop;
    }

    let is_highlighter_color = stroke.pen == PenKind::Highlighter
        || palette::matches_any(
            &stroke.color,
            &options.highlighter_colors,
            options.color_tolerance,
        );
    if is_highlighter_color && bbox.height() <= options.max_highlight_height_ratio * ctx.height {
        return Category::Highlight;
    }

    Category::Handwriting
}

fn is_box_crop(stroke: &StrokeGroup, ctx: &PageContext, options: &ClassifyOptions) -> bool {
    let Some(bbox) = stroke.bbox() else {
        return false;
    };

    let epsilon = options.closure_epsilon_ratio * ctx.diagonal();
    if !stroke.is_closed(epsilon) {
        return false;
    }

    let aspect = bbox.aspect_ratio();
    if !(options.crop_aspect_min..=options.crop_aspect_max).contains(&aspect) {
        return false;
    }

    let page_area = ctx.width * ctx.height;
    bbox.area() >= options.min_crop_area_ratio * page_area
}
