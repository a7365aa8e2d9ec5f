//! Highlight resolution against the host document's text layout.
//!
//! A highlighter stroke carries no text of its own; the underlying span is
//! reconstructed by intersecting the stroke's bounding box with the text
//! layout boxes the host document (PDF/EPUB) provides.

use crate::model::{Annotation, Rect, StrokeGroup, TextLayoutBox};

/// Thresholds controlling text matching and multi-line merging.
#[derive(Debug, Clone)]
pub struct HighlightOptions {
    /// Fraction of a text box's height that must overlap the highlight
    /// vertically for the box to be a candidate
    pub min_vertical_coverage: f32,

    /// Horizontal slack allowed between the highlight's extent and a
    /// candidate box, in page units
    pub horizontal_gap_tolerance: f32,

    /// Vertical slack allowed between two per-line highlights for them to
    /// merge into one logical highlight, in page units
    pub line_merge_gap: f32,
}

impl Default for HighlightOptions {
    fn default() -> Self {
        Self {
            min_vertical_coverage: 0.5,
            horizontal_gap_tolerance: 8.0,
            line_merge_gap: 6.0,
        }
    }
}

/// Resolve one highlight stroke against the page's text layout.
///
/// Matched boxes are concatenated in reading order into a single
/// [`Annotation::Highlight`] whose bbox is the union of the matched boxes.
/// When nothing matches, the stroke is downgraded to
/// [`Annotation::UnresolvedHighlight`] with its bounding box preserved;
/// the annotation is never dropped.
pub fn resolve(
    stroke: &StrokeGroup,
    text_boxes: &[TextLayoutBox],
    options: &HighlightOptions,
) -> Annotation {
    let Some(stroke_bbox) = stroke.bbox() else {
        // Classified strokes always have points; guard anyway.
        return Annotation::UnresolvedHighlight {
            bbox: Rect::new(0.0, 0.0, 0.0, 0.0),
        };
    };

    let mut matched: Vec<&TextLayoutBox> = text_boxes
        .iter()
        .filter(|tb| {
            let overlap = stroke_bbox.vertical_overlap(&tb.bbox);
            overlap >= options.min_vertical_coverage * tb.bbox.height()
        })
        .filter(|tb| stroke_bbox.horizontal_gap(&tb.bbox) <= options.horizontal_gap_tolerance)
        .collect();

    if matched.is_empty() {
        return Annotation::UnresolvedHighlight { bbox: stroke_bbox };
    }

    matched.sort_by_key(|tb| tb.reading_order);

    let text = join_spans(&matched);
    let bbox = matched
        .iter()
        .skip(1)
        .fold(matched[0].bbox, |acc, tb| acc.union(&tb.bbox));

    Annotation::Highlight {
        color: stroke.color,
        text,
        bbox,
    }
}

/// Merge per-line highlights that belong to one logical marker run.
///
/// Two resolved highlights merge when they share a color, their boxes are
/// vertically contiguous within `line_merge_gap`, and their horizontal
/// extents overlap (a wrapped line starts under the previous one). A stroke
/// whose box is already contained in the merged run contributes no text — a
/// line marked twice reads once. Input order decides color on overlap: the
/// first highlight in reading order wins, so callers pass annotations
/// already sorted by reading order.
pub fn merge_adjacent(annotations: Vec<Annotation>, options: &HighlightOptions) -> Vec<Annotation> {
    let mut merged: Vec<Annotation> = Vec::with_capacity(annotations.len());

    for ann in annotations {
        let Annotation::Highlight { color, text, bbox } = &ann else {
            merged.push(ann);
            continue;
        };

        if let Some(Annotation::Highlight {
            color: prev_color,
            text: prev_text,
            bbox: prev_bbox,
        }) = merged.last_mut()
        {
            if mergeable(prev_bbox, bbox, options) && prev_color == color {
                // A stroke whose box is already inside the merged run is the
                // same span marked again; its text would duplicate.
                if !prev_bbox.contains(bbox) {
                    if !prev_text.ends_with(char::is_whitespace)
                        && !text.starts_with(char::is_whitespace)
                    {
                        prev_text.push(' ');
                    }
                    prev_text.push_str(text);
                }
                *prev_bbox = prev_bbox.union(bbox);
                continue;
            }
        }

        merged.push(ann);
    }

    merged
}

fn mergeable(upper: &Rect, lower: &Rect, options: &HighlightOptions) -> bool {
    let vertical_gap = lower.y0 - upper.y1;
    let horizontally_aligned = upper.horizontal_gap(lower) == 0.0;
    vertical_gap <= options.line_merge_gap && horizontally_aligned
}

fn join_spans(boxes: &[&TextLayoutBox]) -> String {
    let mut text = String::new();
    for tb in boxes {
        if !text.is_empty()
            && !text.ends_with(char::is_whitespace)
            && !tb.text.starts_with(char::is_whitespace)
        {
            text.push(' ');
        }
        text.push_str(&tb.text);
    }
    text.trim_end().to_string()
}
