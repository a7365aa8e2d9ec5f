//! Geometric primitives shared by the classifier and resolvers.

use serde::{Deserialize, Serialize};

/// A 2D point in device coordinates, with optional pen pressure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate
    pub x: f32,
    /// Y coordinate
    pub y: f32,
    /// Pen pressure in `[0, 1]`, when the capture device records it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pressure: Option<f32>,
}

impl Point {
    /// Create a point without pressure information.
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            pressure: None,
        }
    }

    /// Create a point with pressure.
    pub fn with_pressure(x: f32, y: f32, pressure: f32) -> Self {
        Self {
            x,
            y,
            pressure: Some(pressure),
        }
    }

    /// Euclidean distance to another point.
    pub fn distance(&self, other: &Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// An axis-aligned rectangle. `x0,y0` is the top-left corner, `x1,y1` the
/// bottom-right, in a y-down coordinate system.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge
    pub x0: f32,
    /// Top edge
    pub y0: f32,
    /// Right edge
    pub x1: f32,
    /// Bottom edge
    pub y1: f32,
}

impl Rect {
    /// Create a rectangle from two corners, normalizing edge order.
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self {
            x0: x0.min(x1),
            y0: y0.min(y1),
            x1: x0.max(x1),
            y1: y0.max(y1),
        }
    }

    /// Minimal rectangle enclosing a set of points. Returns `None` for an
    /// empty slice.
    pub fn bounding(points: &[Point]) -> Option<Self> {
        let first = points.first()?;
        let mut rect = Rect {
            x0: first.x,
            y0: first.y,
            x1: first.x,
            y1: first.y,
        };
        for p in &points[1..] {
            rect.x0 = rect.x0.min(p.x);
            rect.y0 = rect.y0.min(p.y);
            rect.x1 = rect.x1.max(p.x);
            rect.y1 = rect.y1.max(p.y);
        }
        Some(rect)
    }

    /// Rectangle width.
    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    /// Rectangle height.
    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }

    /// Rectangle area.
    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    /// Width-to-height aspect ratio. Zero-height rectangles report infinity.
    pub fn aspect_ratio(&self) -> f32 {
        if self.height() <= f32::EPSILON {
            f32::INFINITY
        } else {
            self.width() / self.height()
        }
    }

    /// Smallest rectangle containing both `self` and `other`.
    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }

    /// Expand all edges outward by `margin`.
    pub fn expand(&self, margin: f32) -> Rect {
        Rect {
            x0: self.x0 - margin,
            y0: self.y0 - margin,
            x1: self.x1 + margin,
            y1: self.y1 + margin,
        }
    }

    /// Clip this rectangle to the bounds of `other`. The result may be
    /// degenerate (zero width or height) when the rectangles are disjoint.
    pub fn clip(&self, other: &Rect) -> Rect {
        Rect {
            x0: self.x0.max(other.x0).min(other.x1),
            y0: self.y0.max(other.y0).min(other.y1),
            x1: self.x1.min(other.x1).max(other.x0),
            y1: self.y1.min(other.y1).max(other.y0),
        }
    }

    /// Length of the vertical interval shared with `other`, zero if none.
    pub fn vertical_overlap(&self, other: &Rect) -> f32 {
        (self.y1.min(other.y1) - self.y0.max(other.y0)).max(0.0)
    }

    /// Horizontal gap between this rectangle and `other`; zero when their
    /// horizontal extents touch or overlap.
    pub fn horizontal_gap(&self, other: &Rect) -> f32 {
        if other.x0 > self.x1 {
            other.x0 - self.x1
        } else if self.x0 > other.x1 {
            self.x0 - other.x1
        } else {
            0.0
        }
    }

    /// Whether the rectangle has positive area.
    pub fn is_degenerate(&self) -> bool {
        self.width() <= f32::EPSILON || self.height() <= f32::EPSILON
    }

    /// Whether `other` lies entirely inside this rectangle.
    pub fn contains(&self, other: &Rect) -> bool {
        other.x0 >= self.x0 && other.y0 >= self.y0 && other.x1 <= self.x1 && other.y1 <= self.y1
    }
}

/// An RGBA color as captured from the ink layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
    /// Alpha channel (255 = opaque)
    pub a: u8,
}

impl Color {
    /// Create an opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Create a color with an explicit alpha channel.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Lowercase `#rrggbb` form, alpha dropped.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Channel-wise comparison within `tolerance`. Alpha is ignored: the
    /// device varies highlight opacity independently of hue.
    pub fn approx_eq(&self, other: &Color, tolerance: u8) -> bool {
        self.r.abs_diff(other.r) <= tolerance
            && self.g.abs_diff(other.g) <= tolerance
            && self.b.abs_diff(other.b) <= tolerance
    }
}
