//! Text rendering operations for Canvas2dContext.

use super::shadow::PaintOp;
use super::Canvas2dContext;
use crate::error::Canvas2dResult;
use crate::style::CanvasFillRule;
use crate::text::TextMetrics;
use cosmic_text::{Buffer, Command, Metrics, Shaping};
use tiny_skia::Transform;

impl Canvas2dContext {
    /// Measure text and return metrics.
    pub fn measure_text(&mut self, text: &str) -> Canvas2dResult<TextMetrics> {
        crate::text::measure_text(&mut self.font_system, text, &self.state.font)
    }

    /// Fill text at the specified position.
    pub fn fill_text(&mut self, text: &str, x: f32, y: f32) {
        log::debug!(target: "canvas", "fillText \"{}\" {} {}", text, x, y);
        self.render_text_impl(text, x, y, None, true);
    }

    /// Fill text at the specified position with a maximum width.
    ///
    /// If the text width exceeds max_width, the text is horizontally scaled
    /// to fit. If max_width is <= 0, NaN, or the text would be scaled below
    /// 0.1%, nothing is rendered.
    pub fn fill_text_max_width(&mut self, text: &str, x: f32, y: f32, max_width: f32) {
        self.render_text_impl(text, x, y, Some(max_width), true);
    }

    /// Stroke text at the specified position.
    pub fn stroke_text(&mut self, text: &str, x: f32, y: f32) {
        log::debug!(target: "canvas", "strokeText \"{}\" {} {}", text, x, y);
        self.render_text_impl(text, x, y, None, false);
    }

    /// Stroke text at the specified position with a maximum width.
    pub fn stroke_text_max_width(&mut self, text: &str, x: f32, y: f32, max_width: f32) {
        self.render_text_impl(text, x, y, Some(max_width), false);
    }

    /// Internal text rendering using vector glyph paths.
    ///
    /// Glyph outlines are gathered into a single path so text goes through
    /// the same shadow and paint pipeline as any other shape. The current
    /// path is left untouched.
    fn render_text_impl(&mut self, text: &str, x: f32, y: f32, max_width: Option<f32>, fill: bool) {
        if let Some(mw) = max_width {
            if mw <= 0.0 || mw.is_nan() {
                return;
            }
        }

        let font = self.state.font.clone();
        let metrics = Metrics::new(font.size_px, font.size_px * 1.2);
        let mut buffer = Buffer::new(&mut self.font_system, metrics);

        buffer.set_text(&mut self.font_system, text, &font.attrs(), Shaping::Advanced, None);
        buffer.shape_until_scroll(&mut self.font_system, false);

        let mut text_width: f32 = 0.0;
        for run in buffer.layout_runs() {
            text_width = text_width.max(run.line_w);
        }

        let text_metrics = TextMetrics {
            width: text_width,
            actual_bounding_box_left: 0.0,
            actual_bounding_box_right: text_width,
            actual_bounding_box_ascent: font.size_px * 0.8,
            actual_bounding_box_descent: font.size_px * 0.2,
            font_bounding_box_ascent: font.size_px * 0.8,
            font_bounding_box_descent: font.size_px * 0.2,
        };

        // Horizontal scale factor for maxWidth
        let scale_x = if let Some(mw) = max_width {
            if mw.is_infinite() || text_width <= mw {
                1.0
            } else {
                let scale = mw / text_width;
                if scale < 0.001 {
                    return;
                }
                scale
            }
        } else {
            1.0
        };

        // Anchor offsets use the unscaled width; the scale transform is
        // applied around x, which keeps scaled text aligned.
        let base_x = x + crate::text::anchor_x_offset(&text_metrics, self.state.text_align);
        let base_y = y + crate::text::anchor_y_offset(&text_metrics, self.state.text_baseline);

        let transform = self.state.transform;
        let scale_transform = if scale_x != 1.0 {
            Transform::from_translate(x, 0.0)
                .pre_scale(scale_x, 1.0)
                .pre_translate(-x, 0.0)
                .post_concat(transform)
        } else {
            transform
        };

        // Collect every glyph outline into one user-space path
        let mut text_builder = tiny_skia::PathBuilder::new();
        for run in buffer.layout_runs() {
            for glyph in run.glyphs.iter() {
                let physical_glyph = glyph.physical((base_x, base_y), 1.0);

                let glyph_x = base_x + glyph.x + glyph.font_size * glyph.x_offset;
                let glyph_y = base_y + glyph.y - glyph.font_size * glyph.y_offset;

                let Some(commands) = self
                    .swash_cache
                    .get_outline_commands(&mut self.font_system, physical_glyph.cache_key)
                else {
                    continue;
                };

                // Font outlines have Y pointing up, the canvas has Y pointing
                // down, so Y coordinates are negated while building the path.
                let mut glyph_builder = tiny_skia::PathBuilder::new();
                for cmd in commands {
                    match cmd {
                        Command::MoveTo(p) => glyph_builder.move_to(p.x, -p.y),
                        Command::LineTo(p) => glyph_builder.line_to(p.x, -p.y),
                        Command::QuadTo(ctrl, end) => {
                            glyph_builder.quad_to(ctrl.x, -ctrl.y, end.x, -end.y)
                        }
                        Command::CurveTo(c1, c2, end) => {
                            glyph_builder.cubic_to(c1.x, -c1.y, c2.x, -c2.y, end.x, -end.y)
                        }
                        Command::Close => glyph_builder.close(),
                    }
                }

                if let Some(glyph_path) = glyph_builder.finish() {
                    if let Some(positioned) =
                        glyph_path.transform(Transform::from_translate(glyph_x, glyph_y))
                    {
                        text_builder.push_path(&positioned);
                    }
                }
            }
        }

        let Some(path) = text_builder.finish() else {
            return;
        };
        let Some(device_path) = path.transform(scale_transform) else {
            return;
        };

        let op = if fill {
            PaintOp::Fill(CanvasFillRule::NonZero)
        } else {
            PaintOp::Stroke
        };
        if self.state.has_drawable_shadow() {
            self.paint_shadow(&device_path, op);
        }
        self.paint_path_op(&device_path, op);
    }
}
