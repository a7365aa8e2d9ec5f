//! Page and document processing pipeline.
//!
//! Classifies each page's strokes, fans them out to the three resolvers, and
//! aggregates the results into reading-order-sorted records. Pages share no
//! mutable state and are processed in parallel unless configured otherwise.

use std::cmp::Ordering;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::classify::{classify, Category, ClassifyOptions};
use crate::error::{Error, PageWarning, Result};
use crate::model::{
    Annotation, DocumentMetadata, DocumentRecord, HandwritingBundle, PageContext, PageFailure,
    PageRecord, PageScene, Rect, StrokeGroup,
};
use crate::resolve::crop::{self, CropOptions, CropOutcome, PageImageProvider, RasterImage};
use crate::resolve::handwriting;
use crate::resolve::highlight::{self, HighlightOptions};

/// Options for the full processing pipeline.
#[derive(Debug, Clone)]
pub struct ProcessOptions {
    /// Classifier thresholds
    pub classify: ClassifyOptions,
    /// Highlight resolution thresholds
    pub highlight: HighlightOptions,
    /// Crop extraction settings
    pub crop: CropOptions,
    /// Whether to process pages in parallel
    pub parallel: bool,
}

impl ProcessOptions {
    /// Create options with defaults (parallel processing enabled).
    pub fn new() -> Self {
        Self {
            classify: ClassifyOptions::default(),
            highlight: HighlightOptions::default(),
            crop: CropOptions::default(),
            parallel: true,
        }
    }

    /// Replace the classifier options.
    pub fn with_classify(mut self, classify: ClassifyOptions) -> Self {
        self.classify = classify;
        self
    }

    /// Replace the highlight options.
    pub fn with_highlight(mut self, highlight: HighlightOptions) -> Self {
        self.highlight = highlight;
        self
    }

    /// Replace the crop options.
    pub fn with_crop(mut self, crop: CropOptions) -> Self {
        self.crop = crop;
        self
    }

    /// Disable parallel page processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Check every threshold against its documented range.
    pub fn validate(&self) -> Result<()> {
        let c = &self.classify;
        if !(0.0..=1.0).contains(&c.max_highlight_height_ratio) {
            return Err(Error::InvalidOption(format!(
                "max_highlight_height_ratio must be in [0, 1], got {}",
                c.max_highlight_height_ratio
            )));
        }
        if !(0.0..=1.0).contains(&c.min_crop_area_ratio) {
            return Err(Error::InvalidOption(format!(
                "min_crop_area_ratio must be in [0, 1], got {}",
                c.min_crop_area_ratio
            )));
        }
        if c.closure_epsilon_ratio < 0.0 {
            return Err(Error::InvalidOption(format!(
                "closure_epsilon_ratio must be non-negative, got {}",
                c.closure_epsilon_ratio
            )));
        }
        if c.crop_aspect_min <= 0.0 || c.crop_aspect_min > c.crop_aspect_max {
            return Err(Error::InvalidOption(format!(
                "crop aspect bounds must satisfy 0 < min <= max, got [{}, {}]",
                c.crop_aspect_min, c.crop_aspect_max
            )));
        }
        if self.crop.margin < 0.0 {
            return Err(Error::InvalidOption(format!(
                "crop margin must be non-negative, got {}",
                self.crop.margin
            )));
        }
        if !(0.0..=1.0).contains(&self.highlight.min_vertical_coverage) {
            return Err(Error::InvalidOption(format!(
                "min_vertical_coverage must be in [0, 1], got {}",
                self.highlight.min_vertical_coverage
            )));
        }
        Ok(())
    }
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Counters collected while processing; merged across pages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessStats {
    /// Pages processed successfully
    pub page_count: u32,
    /// Resolved highlights
    pub highlight_count: u32,
    /// Highlights that found no matching text
    pub unresolved_highlight_count: u32,
    /// Crop images extracted
    pub crop_count: u32,
    /// Handwriting paths rendered
    pub handwriting_path_count: u32,
    /// Strokes dropped as artifacts
    pub ignored_stroke_count: u32,
    /// Warnings attached across pages
    pub warning_count: u32,
}

impl ProcessStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge another stats instance into this one.
    pub fn merge(&mut self, other: &ProcessStats) {
        self.page_count += other.page_count;
        self.highlight_count += other.highlight_count;
        self.unresolved_highlight_count += other.unresolved_highlight_count;
        self.crop_count += other.crop_count;
        self.handwriting_path_count += other.handwriting_path_count;
        self.ignored_stroke_count += other.ignored_stroke_count;
        self.warning_count += other.warning_count;
    }
}

/// A crop image extracted from a page, ready for the export layer to write
/// under its deterministic artifact name.
#[derive(Debug)]
pub struct CropArtifact {
    /// Artifact file name (matches the annotation's `image_ref`)
    pub name: String,
    /// Pixel data from the page image provider
    pub image: RasterImage,
}

/// Result of processing one page.
#[derive(Debug)]
pub struct PageOutcome {
    /// The aggregated page record
    pub record: PageRecord,
    /// Crop images extracted on this page
    pub crop_images: Vec<CropArtifact>,
    /// Annotation-scoped warnings
    pub warnings: Vec<PageWarning>,
    /// Per-page statistics
    pub stats: ProcessStats,
}

/// Result of processing a whole document.
#[derive(Debug)]
pub struct ProcessResult {
    /// The assembled document record
    pub document: DocumentRecord,
    /// Crop images extracted across all pages
    pub crop_images: Vec<CropArtifact>,
    /// Warnings from all pages
    pub warnings: Vec<PageWarning>,
    /// Merged statistics
    pub stats: ProcessStats,
}

/// Process one page scene: classify, resolve, aggregate.
///
/// Fails only on caller misuse (out-of-range options, non-positive page
/// dimensions); every annotation-level problem is reported as a warning on
/// the outcome.
pub fn process_page(
    scene: &PageScene,
    provider: &dyn PageImageProvider,
    options: &ProcessOptions,
) -> Result<PageOutcome> {
    options.validate()?;
    if scene.width <= 0.0 || scene.height <= 0.0 {
        return Err(Error::InvalidPageDimensions {
            width: scene.width,
            height: scene.height,
        });
    }

    let ctx = PageContext::from_scene(scene);
    let mut stats = ProcessStats::new();
    let mut warnings = Vec::new();

    // Partition strokes by category; the resolvers operate on disjoint
    // subsets.
    let mut highlight_strokes: Vec<&StrokeGroup> = Vec::new();
    let mut crop_strokes: Vec<&StrokeGroup> = Vec::new();
    let mut handwriting_strokes: Vec<&StrokeGroup> = Vec::new();

    for stroke in &scene.strokes {
        match classify(stroke, &ctx, &options.classify) {
            Category::Highlight => highlight_strokes.push(stroke),
            Category::BoxCrop => crop_strokes.push(stroke),
            Category::Handwriting => handwriting_strokes.push(stroke),
            Category::Ignored => stats.ignored_stroke_count += 1,
        }
    }

    // Highlights resolve in reading order so the first stroke's color wins
    // when bounds overlap.
    sort_reading_order_strokes(&mut highlight_strokes);
    let resolved: Vec<Annotation> = highlight_strokes
        .iter()
        .map(|s| highlight::resolve(s, &scene.text_boxes, &options.highlight))
        .collect();
    let highlights = highlight::merge_adjacent(resolved, &options.highlight);

    let mut crop_images = Vec::new();
    let mut annotations: Vec<Annotation> = Vec::new();
    for stroke in &crop_strokes {
        match crop::extract(stroke, &ctx, provider, &options.crop) {
            CropOutcome::Extracted { annotation, image } => {
                if let Annotation::CropImage { image_ref, .. } = &annotation {
                    crop_images.push(CropArtifact {
                        name: image_ref.clone(),
                        image,
                    });
                }
                stats.crop_count += 1;
                annotations.push(annotation);
            }
            CropOutcome::Skipped(warning) => warnings.push(warning),
        }
    }

    for ann in &highlights {
        match ann {
            Annotation::Highlight { .. } => stats.highlight_count += 1,
            Annotation::UnresolvedHighlight { .. } => stats.unresolved_highlight_count += 1,
            _ => {}
        }
    }
    annotations.extend(highlights);

    let handwriting = handwriting::render(&handwriting_strokes, &ctx);
    if let Some(bundle) = &handwriting {
        stats.handwriting_path_count += bundle.paths.len() as u32;
    }

    stats.page_count = 1;
    stats.warning_count = warnings.len() as u32;

    let record = aggregate(scene.index, annotations, scene.tags.clone(), handwriting);

    Ok(PageOutcome {
        record,
        crop_images,
        warnings,
        stats,
    })
}

/// Merge classified results into an immutable, reading-order-sorted record.
pub fn aggregate(
    index: u32,
    mut annotations: Vec<Annotation>,
    mut tags: Vec<String>,
    handwriting: Option<HandwritingBundle>,
) -> PageRecord {
    sort_reading_order(&mut annotations);
    tags.sort();
    tags.dedup();

    PageRecord {
        index,
        tags,
        annotations,
        handwriting: handwriting.filter(|b| !b.is_empty()),
    }
}

/// Process a document's pages into a [`DocumentRecord`].
///
/// Pages whose decode failed arrive as `Err` entries and become
/// [`PageFailure`] records; they never abort the run. The result is
/// deterministic for identical input, including crop artifact names.
pub fn process_document(
    title: impl Into<String>,
    metadata: DocumentMetadata,
    pages: Vec<Result<PageScene>>,
    provider: &dyn PageImageProvider,
    options: &ProcessOptions,
) -> ProcessResult {
    let indexed: Vec<(u32, Result<PageScene>)> = pages
        .into_iter()
        .enumerate()
        .map(|(i, page)| (i as u32, page))
        .collect();

    let outcomes: Vec<(u32, Result<PageOutcome>)> = if options.parallel {
        indexed
            .into_par_iter()
            .map(|(index, page)| (index, page.and_then(|s| process_page(&s, provider, options))))
            .collect()
    } else {
        indexed
            .into_iter()
            .map(|(index, page)| (index, page.and_then(|s| process_page(&s, provider, options))))
            .collect()
    };

    let mut record = DocumentRecord {
        title: title.into(),
        pages: Vec::new(),
        metadata,
        page_failures: Vec::new(),
    };
    let mut crop_images = Vec::new();
    let mut warnings = Vec::new();
    let mut stats = ProcessStats::new();

    for (index, outcome) in outcomes {
        match outcome {
            Ok(outcome) => {
                stats.merge(&outcome.stats);
                warnings.extend(outcome.warnings);
                crop_images.extend(outcome.crop_images);
                record.pages.push(outcome.record);
            }
            Err(err) => {
                log::warn!("page {index} skipped: {err}");
                record.page_failures.push(PageFailure {
                    index,
                    reason: err.to_string(),
                });
            }
        }
    }

    ProcessResult {
        document: record,
        crop_images,
        warnings,
        stats,
    }
}

/// Reading-order comparison on optional bounding boxes: top edge first, then
/// left edge. Items without a box sort to the end, relative order kept.
fn cmp_reading_order(a: Option<Rect>, b: Option<Rect>) -> Ordering {
    match (a, b) {
        (Some(ra), Some(rb)) => ra
            .y0
            .total_cmp(&rb.y0)
            .then_with(|| ra.x0.total_cmp(&rb.x0)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn sort_reading_order(annotations: &mut [Annotation]) {
    annotations.sort_by(|a, b| cmp_reading_order(a.bbox(), b.bbox()));
}

fn sort_reading_order_strokes(strokes: &mut [&StrokeGroup]) {
    strokes.sort_by(|a, b| cmp_reading_order(a.bbox(), b.bbox()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Color, PenKind, Point, Rect};

    struct NullProvider;

    impl PageImageProvider for NullProvider {
        fn crop(&self, _page_id: &str, rect: Rect) -> Result<RasterImage> {
            Ok(RasterImage {
                width: rect.width() as u32,
                height: rect.height() as u32,
                data: Vec::new(),
            })
        }
    }

    #[test]
    fn test_aggregate_sorts_reading_order() {
        let lower = Annotation::UnresolvedHighlight {
            bbox: Rect::new(10.0, 500.0, 100.0, 520.0),
        };
        let upper_right = Annotation::UnresolvedHighlight {
            bbox: Rect::new(300.0, 100.0, 400.0, 120.0),
        };
        let upper_left = Annotation::UnresolvedHighlight {
            bbox: Rect::new(10.0, 100.0, 100.0, 120.0),
        };
        let record = aggregate(
            0,
            vec![lower.clone(), upper_right.clone(), upper_left.clone()],
            Vec::new(),
            None,
        );
        assert_eq!(record.annotations, vec![upper_left, upper_right, lower]);
    }

    #[test]
    fn test_aggregate_dedupes_tags() {
        let record = aggregate(
            0,
            Vec::new(),
            vec!["rust".to_string(), "paper".to_string(), "rust".to_string()],
            None,
        );
        assert_eq!(record.tags, vec!["paper".to_string(), "rust".to_string()]);
    }

    #[test]
    fn test_process_page_rejects_bad_dimensions() {
        let scene = PageScene::new("p1", 0, 0.0, 1872.0);
        let result = process_page(&scene, &NullProvider, &ProcessOptions::new());
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_rejects_out_of_range_options() {
        let mut options = ProcessOptions::new();
        options.classify.max_highlight_height_ratio = 1.5;
        assert!(matches!(
            options.validate(),
            Err(Error::InvalidOption(_))
        ));

        let mut options = ProcessOptions::new();
        options.crop.margin = -1.0;
        assert!(matches!(
            options.validate(),
            Err(Error::InvalidOption(_))
        ));

        let mut options = ProcessOptions::new();
        options.classify.crop_aspect_min = 6.0; // above crop_aspect_max
        assert!(matches!(
            options.validate(),
            Err(Error::InvalidOption(_))
        ));

        assert!(ProcessOptions::new().validate().is_ok());
    }

    #[test]
    fn test_process_page_rejects_bad_options() {
        let scene = PageScene::new("p1", 0, 1404.0, 1872.0);
        let mut options = ProcessOptions::new();
        options.highlight.min_vertical_coverage = 2.0;
        let result = process_page(&scene, &NullProvider, &options);
        assert!(matches!(result, Err(Error::InvalidOption(_))));
    }

    #[test]
    fn test_process_page_counts_ignored() {
        let mut scene = PageScene::new("p1", 0, 1404.0, 1872.0);
        scene.strokes.push(StrokeGroup::new(
            vec![Point::new(5.0, 5.0)],
            Color::rgb(0, 0, 0),
            PenKind::Ballpoint,
            2.0,
        ));
        let outcome = process_page(&scene, &NullProvider, &ProcessOptions::new()).unwrap();
        assert_eq!(outcome.stats.ignored_stroke_count, 1);
        assert!(outcome.record.annotations.is_empty());
        assert!(outcome.record.handwriting.is_none());
    }

    #[test]
    fn test_process_document_collects_failures() {
        let good = PageScene::new("p1", 0, 1404.0, 1872.0);
        let pages = vec![
            Ok(good),
            Err(crate::error::Error::DecoderInput(
                "unreadable block".to_string(),
            )),
        ];
        let result = process_document(
            "Notes",
            DocumentMetadata::default(),
            pages,
            &NullProvider,
            &ProcessOptions::new().sequential(),
        );
        assert_eq!(result.document.pages.len(), 1);
        assert_eq!(result.document.page_failures.len(), 1);
        assert_eq!(result.document.page_failures[0].index, 1);
        assert!(result.document.page_failures[0]
            .reason
            .contains("unreadable block"));
    }

    #[test]
    fn test_stats_merge() {
        let mut a = ProcessStats {
            page_count: 1,
            highlight_count: 2,
            ..Default::default()
        };
        let b = ProcessStats {
            page_count: 1,
            crop_count: 3,
            warning_count: 1,
            ..Default::default()
        };
        a.merge(&b);
        assert_eq!(a.page_count, 2);
        assert_eq!(a.highlight_count, 2);
        assert_eq!(a.crop_count, 3);
        assert_eq!(a.warning_count, 1);
    }
}
