//! Device ink palette.
//!
//! Color codes were read off exported documents; they match the palette the
//! tablet uses for pen tools. Highlighter hues are a separate set — the
//! device picks different colors for highlights than for the same-named pens.

use crate::model::Color;

/// Black ink, the default pen color.
pub const BLACK: Color = Color::rgb(0, 0, 0);
/// Gray ink.
pub const GRAY: Color = Color::rgb(144, 144, 144);
/// White ink.
pub const WHITE: Color = Color::rgb(255, 255, 255);
/// Blue ink.
pub const BLUE: Color = Color::rgb(78, 105, 201);
/// Red ink.
pub const RED: Color = Color::rgb(179, 62, 57);

/// Highlighter yellow.
pub const HIGHLIGHT_YELLOW: Color = Color::rgb(251, 247, 25);
/// Highlighter yellow, newer firmware variant.
pub const HIGHLIGHT_YELLOW_2: Color = Color::rgb(247, 232, 81);
/// Highlighter green.
pub const HIGHLIGHT_GREEN: Color = Color::rgb(0, 255, 0);
/// Highlighter green, newer firmware variant.
pub const HIGHLIGHT_GREEN_2: Color = Color::rgb(161, 216, 125);
/// Highlighter pink.
pub const HIGHLIGHT_PINK: Color = Color::rgb(255, 192, 203);
/// Highlighter cyan.
pub const HIGHLIGHT_CYAN: Color = Color::rgb(139, 208, 229);
/// Highlighter magenta.
pub const HIGHLIGHT_MAGENTA: Color = Color::rgb(183, 130, 205);

/// The default set of colors treated as highlighter ink by the classifier.
///
/// Deliberately excludes the regular pen palette: a black or blue stroke is
/// never a highlight no matter its shape.
pub const HIGHLIGHTER_COLORS: [Color; 7] = [
    HIGHLIGHT_YELLOW,
    HIGHLIGHT_YELLOW_2,
    HIGHLIGHT_GREEN,
    HIGHLIGHT_GREEN_2,
    HIGHLIGHT_PINK,
    HIGHLIGHT_CYAN,
    HIGHLIGHT_MAGENTA,
];

/// Whether `color` matches any color in `palette` within a per-channel
/// `tolerance`.
pub fn matches_any(color: &Color, palette: &[Color], tolerance: u8) -> bool {
    palette.iter().any(|c| color.approx_eq(c, tolerance))
}
