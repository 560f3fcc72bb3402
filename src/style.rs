//! Style types and enums for Canvas 2D operations.

use crate::gradient::CanvasGradient;
use crate::pattern::CanvasPattern;
use std::sync::Arc;

/// Paint source for fill and stroke operations.
///
/// Solid color and pattern are mutually exclusive by construction: assigning
/// any variant replaces whatever was set before.
#[derive(Debug, Clone)]
pub enum FillStyle {
    /// Solid color fill.
    Color(tiny_skia::Color),
    /// Linear gradient fill.
    LinearGradient(CanvasGradient),
    /// Radial gradient fill.
    RadialGradient(CanvasGradient),
    /// Pattern fill. Shared by reference; `save()` clones the `Arc`.
    Pattern(Arc<CanvasPattern>),
}

impl Default for FillStyle {
    fn default() -> Self {
        // Default is opaque black
        FillStyle::Color(tiny_skia::Color::BLACK)
    }
}

/// Line cap style for stroke operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineCap {
    /// Flat edge at the endpoint.
    #[default]
    Butt,
    /// Rounded edge extending past the endpoint.
    Round,
    /// Square edge extending past the endpoint.
    Square,
}

impl From<LineCap> for tiny_skia::LineCap {
    fn from(cap: LineCap) -> Self {
        match cap {
            LineCap::Butt => tiny_skia::LineCap::Butt,
            LineCap::Round => tiny_skia::LineCap::Round,
            LineCap::Square => tiny_skia::LineCap::Square,
        }
    }
}

/// Line join style for stroke operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineJoin {
    /// Sharp corner.
    #[default]
    Miter,
    /// Rounded corner.
    Round,
    /// Beveled corner.
    Bevel,
}

impl From<LineJoin> for tiny_skia::LineJoin {
    fn from(join: LineJoin) -> Self {
        match join {
            LineJoin::Miter => tiny_skia::LineJoin::Miter,
            LineJoin::Round => tiny_skia::LineJoin::Round,
            LineJoin::Bevel => tiny_skia::LineJoin::Bevel,
        }
    }
}

/// Filter quality applied when a pattern (or image) is used as a paint source.
///
/// The quality is a property of the drawing state, not of the pattern object:
/// it is applied at paint time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PatternQuality {
    /// Nearest-neighbor sampling.
    Fast,
    /// Bilinear filtering (default).
    #[default]
    Good,
    /// Bicubic filtering.
    Best,
}

impl PatternQuality {
    /// Parse from the canvas-level quality name. Unknown names are `None`
    /// (the setter leaves the state unchanged).
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "fast" => Some(PatternQuality::Fast),
            "good" => Some(PatternQuality::Good),
            "best" => Some(PatternQuality::Best),
            _ => None,
        }
    }

    /// The canvas-level quality name.
    pub fn name(self) -> &'static str {
        match self {
            PatternQuality::Fast => "fast",
            PatternQuality::Good => "good",
            PatternQuality::Best => "best",
        }
    }
}

impl From<PatternQuality> for tiny_skia::FilterQuality {
    fn from(quality: PatternQuality) -> Self {
        match quality {
            PatternQuality::Fast => tiny_skia::FilterQuality::Nearest,
            PatternQuality::Good => tiny_skia::FilterQuality::Bilinear,
            PatternQuality::Best => tiny_skia::FilterQuality::Bicubic,
        }
    }
}

/// Text alignment for text rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    /// Align text to the left of the anchor point.
    #[default]
    Left,
    /// Center text on the anchor point.
    Center,
    /// Align text to the right of the anchor point.
    Right,
}

/// Text baseline for text rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextBaseline {
    /// Alphabetic baseline (default, exact-glyph placement).
    #[default]
    Alphabetic,
    /// Top of the text extents.
    Top,
    /// Bottom of the text extents.
    Bottom,
    /// Middle of the text extents.
    Middle,
    /// Ideographic baseline (treated as alphabetic).
    Ideographic,
    /// Hanging baseline (treated as top).
    Hanging,
}

/// Fill rule for path operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CanvasFillRule {
    /// Non-zero winding rule (default).
    #[default]
    NonZero,
    /// Even-odd rule.
    EvenOdd,
}

impl From<CanvasFillRule> for tiny_skia::FillRule {
    fn from(rule: CanvasFillRule) -> Self {
        match rule {
            CanvasFillRule::NonZero => tiny_skia::FillRule::Winding,
            CanvasFillRule::EvenOdd => tiny_skia::FillRule::EvenOdd,
        }
    }
}

/// Antialiasing mode for path rasterization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AntiAlias {
    /// Antialiasing enabled (default).
    #[default]
    Default,
    /// Antialiasing disabled.
    None,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_quality_names() {
        assert_eq!(PatternQuality::from_name("fast"), Some(PatternQuality::Fast));
        assert_eq!(PatternQuality::from_name("good"), Some(PatternQuality::Good));
        assert_eq!(PatternQuality::from_name("best"), Some(PatternQuality::Best));
        assert_eq!(PatternQuality::from_name("nearest"), None);
        assert_eq!(PatternQuality::Best.name(), "best");
    }

    #[test]
    fn test_pattern_quality_filter_mapping() {
        assert_eq!(
            tiny_skia::FilterQuality::from(PatternQuality::Fast),
            tiny_skia::FilterQuality::Nearest
        );
        assert_eq!(
            tiny_skia::FilterQuality::from(PatternQuality::Best),
            tiny_skia::FilterQuality::Bicubic
        );
    }
}
