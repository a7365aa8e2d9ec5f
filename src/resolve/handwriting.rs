//! Handwriting rendering into a normalized vector bundle.

use crate::model::{HandwritingBundle, PageContext, Point, StrokeGroup, VectorPath};

/// Width of the output coordinate space. Matches the device screen width so
/// handwriting from un-zoomed captures renders at native scale.
pub const OUTPUT_WIDTH: f32 = 1404.0;

/// Uniform scale-and-offset transform from device coordinates into the
/// output coordinate space. The inverse is exposed so round-tripping a path
/// reproduces the original points within float epsilon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageTransform {
    scale: f32,
}

impl PageTransform {
    /// Derive the transform for a page: uniform scale to [`OUTPUT_WIDTH`],
    /// aspect preserved.
    pub fn for_page(ctx: &PageContext) -> Self {
        Self {
            scale: OUTPUT_WIDTH / ctx.width,
        }
    }

    /// Map a device-space point into output space. Pressure is carried
    /// through untouched.
    pub fn apply(&self, p: &Point) -> Point {
        Point {
            x: p.x * self.scale,
            y: p.y * self.scale,
            pressure: p.pressure,
        }
    }

    /// Map an output-space point back into device space.
    pub fn invert(&self, p: &Point) -> Point {
        Point {
            x: p.x / self.scale,
            y: p.y / self.scale,
            pressure: p.pressure,
        }
    }

    /// Scale factor applied to coordinates and stroke widths.
    pub fn scale(&self) -> f32 {
        self.scale
    }
}

/// Render the page's handwriting strokes into a single per-page bundle.
///
/// One vector path per stroke group; stroke width follows mean pen pressure
/// where the capture recorded it, else the group's dominant width. Returns
/// `None` when there is no handwriting, so pages without ink produce no
/// artifact. Pure transform, no I/O.
pub fn render(strokes: &[&StrokeGroup], ctx: &PageContext) -> Option<HandwritingBundle> {
    if strokes.is_empty() {
        return None;
    }

    let transform = PageTransform::for_page(ctx);
    let paths: Vec<VectorPath> = strokes
        .iter()
        .filter(|s| !s.points.is_empty())
        .map(|stroke| VectorPath {
            points: stroke.points.iter().map(|p| transform.apply(p)).collect(),
            color: stroke.color,
            width: effective_width(stroke) * transform.scale(),
        })
        .collect();

    if paths.is_empty() {
        return None;
    }

    Some(HandwritingBundle {
        width: OUTPUT_WIDTH,
        height: ctx.height * transform.scale(),
        paths,
    })
}

/// Stroke width scaled by mean pressure when present. A light stroke thins
/// toward half the dominant width, a full-pressure stroke keeps it.
fn effective_width(stroke: &StrokeGroup) -> f32 {
    let pressures: Vec<f32> = stroke.points.iter().filter_map(|p| p.pressure).collect();
    if pressures.is_empty() {
        return stroke.width;
    }
    let mean = pressures.iter().sum::<f32>() / pressures.len() as f32;
    stroke.width * (0.5 + 0.5 * mean.clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Color, PenKind};

    fn ctx(width: f32, height: f32) -> PageContext {
        PageContext {
            page_id: "p1".to_string(),
            index: 0,
            width,
            height,
        }
    }

    #[test]
    fn test_transform_round_trip() {
        let ctx = ctx(702.0, 936.0);
        let transform = PageTransform::for_page(&ctx);
        let original = Point::with_pressure(123.456, 654.321, 0.7);
        let there = transform.apply(&original);
        let back = transform.invert(&there);
        assert!((back.x - original.x).abs() < 1e-3);
        assert!((back.y - original.y).abs() < 1e-3);
        assert_eq!(back.pressure, original.pressure);
    }

    #[test]
    fn test_render_scales_to_output_width() {
        let ctx = ctx(702.0, 936.0);
        let stroke = StrokeGroup::new(
            vec![Point::new(0.0, 0.0), Point::new(702.0, 936.0)],
            Color::rgb(0, 0, 0),
            PenKind::Ballpoint,
            2.0,
        );
        let bundle = render(&[&stroke], &ctx).unwrap();
        assert_eq!(bundle.width, 1404.0);
        assert_eq!(bundle.height, 1872.0);
        let last = bundle.paths[0].points.last().unwrap();
        assert!((last.x - 1404.0).abs() < 1e-3);
        assert!((last.y - 1872.0).abs() < 1e-3);
        // Widths scale with coordinates.
        assert!((bundle.paths[0].width - 4.0).abs() < 1e-3);
    }

    #[test]
    fn test_render_empty_is_none() {
        let ctx = ctx(1404.0, 1872.0);
        assert!(render(&[], &ctx).is_none());

        let empty = StrokeGroup::new(Vec::new(), Color::rgb(0, 0, 0), PenKind::Ballpoint, 2.0);
        assert!(render(&[&empty], &ctx).is_none());
    }

    #[test]
    fn test_pressure_thins_stroke() {
        let ctx = ctx(1404.0, 1872.0);
        let light = StrokeGroup::new(
            vec![
                Point::with_pressure(0.0, 0.0, 0.0),
                Point::with_pressure(10.0, 10.0, 0.0),
            ],
            Color::rgb(0, 0, 0),
            PenKind::Pencil,
            4.0,
        );
        let heavy = StrokeGroup::new(
            vec![
                Point::with_pressure(0.0, 0.0, 1.0),
                Point::with_pressure(10.0, 10.0, 1.0),
            ],
            Color::rgb(0, 0, 0),
            PenKind::Pencil,
            4.0,
        );
        let bundle = render(&[&light, &heavy], &ctx).unwrap();
        assert!((bundle.paths[0].width - 2.0).abs() < 1e-3);
        assert!((bundle.paths[1].width - 4.0).abs() < 1e-3);
    }
}
