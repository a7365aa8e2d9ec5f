//! Raster crop extraction for box gestures.

use md5::{Digest, Md5};

use crate::error::{PageWarning, Result};
use crate::model::{Annotation, PageContext, Rect, StrokeGroup};

/// A raster sub-image returned by the page image provider.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterImage {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Raw RGBA pixel data, row-major
    pub data: Vec<u8>,
}

/// Page rasterization capability, injected by the caller.
///
/// The core never rasterizes pages itself; an external service renders the
/// requested rectangle of the identified page.
pub trait PageImageProvider: Sync {
    /// Render the given rectangle of the page as a pixel buffer.
    fn crop(&self, page_id: &str, rect: Rect) -> Result<RasterImage>;
}

/// Crop extraction thresholds.
#[derive(Debug, Clone)]
pub struct CropOptions {
    /// Margin added around the gesture's bounding box before clipping,
    /// in page units
    pub margin: f32,
}

impl Default for CropOptions {
    fn default() -> Self {
        Self { margin: 3.0 }
    }
}

/// The outcome of one crop extraction: an annotation plus the pixels the
/// provider returned, or a warning when the crop degenerated or the provider
/// failed.
#[derive(Debug)]
pub enum CropOutcome {
    /// Successful extraction
    Extracted {
        /// The crop annotation carrying rect and artifact name
        annotation: Annotation,
        /// Pixels to be written under the artifact name by the export layer
        image: RasterImage,
    },
    /// The crop was skipped; page processing continues
    Skipped(PageWarning),
}

/// Extract a raster crop for one box gesture.
///
/// The gesture's bounding box is expanded by [`CropOptions::margin`] and then
/// clipped to page bounds, so the resulting rectangle never claims
/// coordinates outside `[0,0] x [width,height]`. The artifact name derives
/// from the page identity and the rounded rectangle, making repeated runs
/// over unchanged input produce identical filenames.
pub fn extract(
    stroke: &StrokeGroup,
    ctx: &PageContext,
    provider: &dyn PageImageProvider,
    options: &CropOptions,
) -> CropOutcome {
    let Some(bbox) = stroke.bbox() else {
        return CropOutcome::Skipped(PageWarning::CropGeometry {
            page_index: ctx.index,
            detail: "empty stroke".to_string(),
        });
    };

    let rect = bbox.expand(options.margin).clip(&ctx.bounds());
    if rect.is_degenerate() {
        log::warn!(
            "page {}: crop rectangle degenerate after clipping ({:?})",
            ctx.index,
            rect
        );
        return CropOutcome::Skipped(PageWarning::CropGeometry {
            page_index: ctx.index,
            detail: format!("{rect:?}"),
        });
    }

    let image = match provider.crop(&ctx.page_id, rect) {
        Ok(image) => image,
        Err(err) => {
            log::warn!("page {}: image provider failed: {err}", ctx.index);
            return CropOutcome::Skipped(PageWarning::ImageProvider {
                page_index: ctx.index,
                detail: err.to_string(),
            });
        }
    };

    CropOutcome::Extracted {
        annotation: Annotation::CropImage {
            bbox: rect,
            image_ref: artifact_name(&ctx.page_id, &rect),
        },
        image,
    }
}

/// Deterministic, content-derived artifact name for a crop rectangle.
///
/// Rounding to a tenth of a page unit before hashing keeps the name stable
/// across float round-trips while still separating visually distinct crops.
pub fn artifact_name(page_id: &str, rect: &Rect) -> String {
    let mut hasher = Md5::new();
    hasher.update(page_id.as_bytes());
    for edge in [rect.x0, rect.y0, rect.x1, rect.y1] {
        hasher.update(((edge * 10.0).round() as i64).to_le_bytes());
    }
    let digest = hasher.finalize();
    let mut hex = String::with_capacity(12);
    for byte in &digest[..6] {
        hex.push_str(&format!("{byte:02x}"));
    }
    format!("crop-{hex}.png")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::model::{Color, PenKind, Point};

    struct StubProvider {
        fail: bool,
    }

    impl PageImageProvider for StubProvider {
        fn crop(&self, _page_id: &str, rect: Rect) -> Result<RasterImage> {
            if self.fail {
                return Err(Error::ImageProvider("backend down".to_string()));
            }
            Ok(RasterImage {
                width: rect.width() as u32,
                height: rect.height() as u32,
                data: Vec::new(),
            })
        }
    }

    fn ctx() -> PageContext {
        PageContext {
            page_id: "page-1".to_string(),
            index: 2,
            width: 1404.0,
            height: 1872.0,
        }
    }

    fn box_stroke(x0: f32, y0: f32, x1: f32, y1: f32) -> StrokeGroup {
        StrokeGroup::new(
            vec![
                Point::new(x0, y0),
                Point::new(x1, y0),
                Point::new(x1, y1),
                Point::new(x0, y1),
                Point::new(x0, y0),
            ],
            Color::rgb(0, 0, 0),
            PenKind::Fineliner,
            2.0,
        )
    }

    #[test]
    fn test_extract_stays_inside_page() {
        let stroke = box_stroke(-20.0, -10.0, 1500.0, 2000.0);
        let provider = StubProvider { fail: false };
        let outcome = extract(&stroke, &ctx(), &provider, &CropOptions::default());
        match outcome {
            CropOutcome::Extracted { annotation, .. } => {
                let Annotation::CropImage { bbox, .. } = annotation else {
                    panic!("expected CropImage");
                };
                assert!(bbox.x0 >= 0.0 && bbox.y0 >= 0.0);
                assert!(bbox.x1 <= 1404.0 && bbox.y1 <= 1872.0);
            }
            CropOutcome::Skipped(w) => panic!("unexpected skip: {w}"),
        }
    }

    #[test]
    fn test_extract_applies_margin() {
        let stroke = box_stroke(100.0, 100.0, 500.0, 400.0);
        let provider = StubProvider { fail: false };
        let outcome = extract(&stroke, &ctx(), &provider, &CropOptions::default());
        let CropOutcome::Extracted { annotation, .. } = outcome else {
            panic!("expected extraction");
        };
        let Annotation::CropImage { bbox, .. } = annotation else {
            panic!("expected CropImage");
        };
        assert_eq!(bbox, Rect::new(97.0, 97.0, 503.0, 403.0));
    }

    #[test]
    fn test_degenerate_crop_is_warning() {
        let stroke = box_stroke(2000.0, 2500.0, 2100.0, 2600.0);
        let provider = StubProvider { fail: false };
        let outcome = extract(&stroke, &ctx(), &provider, &CropOptions::default());
        match outcome {
            CropOutcome::Skipped(PageWarning::CropGeometry { page_index, .. }) => {
                assert_eq!(page_index, 2);
            }
            other => panic!("expected CropGeometry warning, got {other:?}"),
        }
    }

    #[test]
    fn test_provider_failure_is_warning() {
        let stroke = box_stroke(100.0, 100.0, 500.0, 400.0);
        let provider = StubProvider { fail: true };
        let outcome = extract(&stroke, &ctx(), &provider, &CropOptions::default());
        match outcome {
            CropOutcome::Skipped(PageWarning::ImageProvider { detail, .. }) => {
                assert!(detail.contains("backend down"));
            }
            other => panic!("expected ImageProvider warning, got {other:?}"),
        }
    }

    #[test]
    fn test_artifact_name_deterministic() {
        let rect = Rect::new(97.0, 97.0, 503.0, 403.0);
        let a = artifact_name("page-1", &rect);
        let b = artifact_name("page-1", &rect);
        assert_eq!(a, b);
        assert!(a.starts_with("crop-") && a.ends_with(".png"));

        // Different page or rect gives a different name.
        assert_ne!(a, artifact_name("page-2", &rect));
        assert_ne!(
            a,
            artifact_name("page-1", &Rect::new(97.0, 97.0, 503.0, 404.0))
        );
    }
}
