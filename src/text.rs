//! Text measurement and anchor positioning using cosmic-text.

use crate::error::Canvas2dResult;
use crate::style::{TextAlign, TextBaseline};
use cosmic_text::{Attrs, Buffer, Family, FontSystem, Metrics, Shaping, Style, Weight};

/// Font selection for text operations.
///
/// Holds the already-resolved pieces of a font description; CSS font
/// shorthand parsing happens outside this crate.
#[derive(Debug, Clone, PartialEq)]
pub struct FontSpec {
    /// Family names in preference order.
    pub families: Vec<String>,
    /// Font size in pixels.
    pub size_px: f32,
    /// Font weight.
    pub weight: Weight,
    /// Font style (normal/italic/oblique).
    pub style: Style,
}

impl Default for FontSpec {
    fn default() -> Self {
        Self {
            families: vec!["sans-serif".to_string()],
            size_px: 10.0,
            weight: Weight::NORMAL,
            style: Style::Normal,
        }
    }
}

impl FontSpec {
    pub(crate) fn attrs(&self) -> Attrs<'_> {
        let family = self
            .families
            .first()
            .map(|name| match name.as_str() {
                "sans-serif" => Family::SansSerif,
                "serif" => Family::Serif,
                "monospace" => Family::Monospace,
                "cursive" => Family::Cursive,
                "fantasy" => Family::Fantasy,
                other => Family::Name(other),
            })
            .unwrap_or(Family::SansSerif);
        Attrs::new()
            .family(family)
            .weight(self.weight)
            .style(self.style)
    }
}

/// Text metrics returned by measureText().
#[derive(Debug, Clone, Default)]
pub struct TextMetrics {
    /// Advance width of the text in pixels.
    pub width: f32,
    /// Distance from alignment point to left of the bounding box.
    pub actual_bounding_box_left: f32,
    /// Distance from alignment point to right of the bounding box.
    pub actual_bounding_box_right: f32,
    /// Distance from baseline to top of the bounding box.
    pub actual_bounding_box_ascent: f32,
    /// Distance from baseline to bottom of the bounding box.
    pub actual_bounding_box_descent: f32,
    /// Font ascent.
    pub font_bounding_box_ascent: f32,
    /// Font descent.
    pub font_bounding_box_descent: f32,
}

impl TextMetrics {
    /// Ascent plus descent of the measured extents.
    pub fn height(&self) -> f32 {
        self.font_bounding_box_ascent + self.font_bounding_box_descent
    }
}

/// Measure text using cosmic-text.
pub fn measure_text(
    font_system: &mut FontSystem,
    text: &str,
    font: &FontSpec,
) -> Canvas2dResult<TextMetrics> {
    let metrics = Metrics::new(font.size_px, font.size_px * 1.2);
    let mut buffer = Buffer::new(font_system, metrics);

    buffer.set_text(font_system, text, &font.attrs(), Shaping::Advanced, None);
    buffer.shape_until_scroll(font_system, false);

    let mut width: f32 = 0.0;
    for run in buffer.layout_runs() {
        width = width.max(run.line_w);
    }

    // Approximate vertical extents from the font size.
    let font_ascent = font.size_px * 0.8;
    let font_descent = font.size_px * 0.2;

    Ok(TextMetrics {
        width,
        actual_bounding_box_left: 0.0,
        actual_bounding_box_right: width,
        actual_bounding_box_ascent: font_ascent,
        actual_bounding_box_descent: font_descent,
        font_bounding_box_ascent: font_ascent,
        font_bounding_box_descent: font_descent,
    })
}

/// Horizontal adjustment moving the anchor point to where the glyph run
/// should start for the given alignment.
pub fn anchor_x_offset(metrics: &TextMetrics, align: TextAlign) -> f32 {
    let bearing = metrics.actual_bounding_box_left;
    match align {
        TextAlign::Left => 0.0,
        TextAlign::Center => -(metrics.width / 2.0 + bearing),
        TextAlign::Right => -(metrics.width + bearing),
    }
}

/// Vertical adjustment moving the anchor point onto the glyph baseline for
/// the given text baseline.
///
/// Alphabetic and ideographic keep the anchor as-is; the others shift by
/// the measured extent height. Exact per-glyph baseline placement is not
/// attempted.
pub fn anchor_y_offset(metrics: &TextMetrics, baseline: TextBaseline) -> f32 {
    match baseline {
        TextBaseline::Top | TextBaseline::Hanging => metrics.height(),
        TextBaseline::Middle => metrics.height() / 2.0,
        TextBaseline::Bottom => -metrics.height() / 2.0,
        TextBaseline::Alphabetic | TextBaseline::Ideographic => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(width: f32, ascent: f32, descent: f32) -> TextMetrics {
        TextMetrics {
            width,
            actual_bounding_box_left: 0.0,
            actual_bounding_box_right: width,
            actual_bounding_box_ascent: ascent,
            actual_bounding_box_descent: descent,
            font_bounding_box_ascent: ascent,
            font_bounding_box_descent: descent,
        }
    }

    #[test]
    fn test_anchor_x_offsets() {
        let m = metrics(40.0, 8.0, 2.0);
        assert_eq!(anchor_x_offset(&m, TextAlign::Left), 0.0);
        assert_eq!(anchor_x_offset(&m, TextAlign::Center), -20.0);
        assert_eq!(anchor_x_offset(&m, TextAlign::Right), -40.0);
    }

    #[test]
    fn test_anchor_x_offset_includes_bearing() {
        let mut m = metrics(40.0, 8.0, 2.0);
        m.actual_bounding_box_left = 1.5;
        assert_eq!(anchor_x_offset(&m, TextAlign::Center), -21.5);
        assert_eq!(anchor_x_offset(&m, TextAlign::Right), -41.5);
    }

    #[test]
    fn test_anchor_y_offsets() {
        let m = metrics(40.0, 8.0, 2.0);
        assert_eq!(anchor_y_offset(&m, TextBaseline::Alphabetic), 0.0);
        assert_eq!(anchor_y_offset(&m, TextBaseline::Ideographic), 0.0);
        assert_eq!(anchor_y_offset(&m, TextBaseline::Top), 10.0);
        assert_eq!(anchor_y_offset(&m, TextBaseline::Hanging), 10.0);
        assert_eq!(anchor_y_offset(&m, TextBaseline::Middle), 5.0);
        assert_eq!(anchor_y_offset(&m, TextBaseline::Bottom), -5.0);
    }

    #[test]
    fn test_default_font_spec() {
        let font = FontSpec::default();
        assert_eq!(font.size_px, 10.0);
        assert_eq!(font.families, vec!["sans-serif".to_string()]);
    }
}
