//! Fill, stroke, clip, and paint helper operations for Canvas2dContext.

use super::shadow::PaintOp;
use super::Canvas2dContext;
use crate::geometry::RectParams;
use crate::gradient::{CanvasGradient, GradientType};
use crate::style::{CanvasFillRule, FillStyle};
use tiny_skia::Transform;

impl Canvas2dContext {
    // --- Clipping ---

    /// Create a clipping region from the current path using the non-zero winding rule.
    pub fn clip(&mut self) {
        log::debug!(target: "canvas", "clip");
        self.clip_with_rule(CanvasFillRule::NonZero);
    }

    /// Create a clipping region from the current path with the specified
    /// fill rule. The path stays available for later fills and strokes.
    pub fn clip_with_rule(&mut self, fill_rule: CanvasFillRule) {
        log::debug!(target: "canvas", "clip_with_rule");
        if let Some(path) = self.path_builder.clone().finish() {
            self.state.clip_path = Some(path);
            // Inline path coordinates are pre-transformed to device space
            self.state.clip_transform = Transform::identity();
            self.clip_fill_rule = fill_rule;
        }
    }

    // --- Drawing operations ---

    /// Fill the current path using the non-zero winding rule, consuming the path.
    pub fn fill(&mut self) {
        log::debug!(target: "canvas", "fill");
        self.paint_current_path(PaintOp::Fill(CanvasFillRule::NonZero), false);
    }

    /// Fill the current path with the specified fill rule, consuming the path.
    pub fn fill_with_rule(&mut self, fill_rule: CanvasFillRule) {
        log::debug!(target: "canvas", "fill_with_rule {:?}", fill_rule);
        self.paint_current_path(PaintOp::Fill(fill_rule), false);
    }

    /// Fill the current path and keep it for further operations.
    pub fn fill_preserve(&mut self) {
        log::debug!(target: "canvas", "fill_preserve");
        self.paint_current_path(PaintOp::Fill(CanvasFillRule::NonZero), true);
    }

    /// Fill the current path with the specified fill rule, keeping the path.
    pub fn fill_preserve_with_rule(&mut self, fill_rule: CanvasFillRule) {
        self.paint_current_path(PaintOp::Fill(fill_rule), true);
    }

    /// Stroke the current path, consuming it.
    pub fn stroke(&mut self) {
        log::debug!(target: "canvas", "stroke");
        self.paint_current_path(PaintOp::Stroke, false);
    }

    /// Stroke the current path and keep it for further operations.
    pub fn stroke_preserve(&mut self) {
        log::debug!(target: "canvas", "stroke_preserve");
        self.paint_current_path(PaintOp::Stroke, true);
    }

    /// Shared fill/stroke entry point. Paints the shadow pass first when
    /// one is drawable, then the shape itself.
    fn paint_current_path(&mut self, op: PaintOp, preserve: bool) {
        let path = if preserve {
            self.path_builder.clone().finish()
        } else {
            let builder =
                std::mem::replace(&mut self.path_builder, tiny_skia::PathBuilder::new());
            self.has_current_point = false;
            builder.finish()
        };

        if let Some(path) = path {
            if self.state.has_drawable_shadow() {
                self.paint_shadow(&path, op);
            }
            self.paint_path_op(&path, op);
        }
    }

    /// Paint a device-space path with the current fill or stroke style.
    pub(crate) fn paint_path_op(&mut self, path: &tiny_skia::Path, op: PaintOp) {
        let clip_mask = self.create_clip_mask();
        match op {
            PaintOp::Fill(fill_rule) => {
                let _ = self.with_fill_paint(|ctx, paint| {
                    ctx.pixmap.fill_path(
                        path,
                        paint,
                        fill_rule.into(),
                        Transform::identity(),
                        clip_mask.as_ref(),
                    );
                });
            }
            PaintOp::Stroke => {
                let stroke = self.device_stroke();
                let _ = self.with_stroke_paint(|ctx, paint| {
                    ctx.pixmap.stroke_path(
                        path,
                        paint,
                        &stroke,
                        Transform::identity(),
                        clip_mask.as_ref(),
                    );
                });
            }
        }
    }

    /// Stroke parameters in device space.
    ///
    /// Path coordinates are pre-transformed, so line width and dash pattern
    /// are scaled by the average axis scale of the CTM.
    pub(crate) fn device_stroke(&self) -> tiny_skia::Stroke {
        let t = &self.state.transform;
        let scale =
            ((t.sx * t.sx + t.ky * t.ky).sqrt() + (t.kx * t.kx + t.sy * t.sy).sqrt()) / 2.0;

        tiny_skia::Stroke {
            width: self.state.line_width * scale,
            line_cap: self.state.line_cap.into(),
            line_join: self.state.line_join.into(),
            miter_limit: self.state.miter_limit,
            dash: if self.state.line_dash.is_empty() {
                None
            } else {
                let scaled_dash: Vec<f32> =
                    self.state.line_dash.iter().map(|d| d * scale).collect();
                tiny_skia::StrokeDash::new(scaled_dash, self.state.line_dash_offset * scale)
            },
        }
    }

    /// Fill a rectangle. Zero-size rectangles paint nothing.
    pub fn fill_rect(&mut self, params: &RectParams) {
        log::debug!(target: "canvas", "fillRect {} {} {} {}", params.x, params.y, params.width, params.height);
        if params.width == 0.0 || params.height == 0.0 {
            return;
        }
        self.begin_path();
        self.rect(params);
        self.fill();
    }

    /// Stroke a rectangle outline.
    pub fn stroke_rect(&mut self, params: &RectParams) {
        log::debug!(target: "canvas", "strokeRect {} {} {} {}", params.x, params.y, params.width, params.height);
        if params.width == 0.0 && params.height == 0.0 {
            return;
        }
        self.begin_path();
        self.rect(params);
        self.stroke();
    }

    /// Clear a rectangle (set pixels to transparent). Zero-size rectangles
    /// clear nothing.
    pub fn clear_rect(&mut self, params: &RectParams) {
        log::debug!(target: "canvas", "clearRect {} {} {} {}", params.x, params.y, params.width, params.height);
        if params.width == 0.0 || params.height == 0.0 {
            return;
        }
        // Transform corners to device space
        let (x0, y0) = self.transform_point(params.x, params.y);
        let (x1, y1) = self.transform_point(params.x + params.width, params.y);
        let (x2, y2) = self.transform_point(params.x + params.width, params.y + params.height);
        let (x3, y3) = self.transform_point(params.x, params.y + params.height);

        let mut pb = tiny_skia::PathBuilder::new();
        pb.move_to(x0, y0);
        pb.line_to(x1, y1);
        pb.line_to(x2, y2);
        pb.line_to(x3, y3);
        pb.close();

        if let Some(path) = pb.finish() {
            let paint = tiny_skia::Paint {
                blend_mode: tiny_skia::BlendMode::Clear,
                ..Default::default()
            };
            let clip_mask = self.create_clip_mask();
            self.pixmap.fill_path(
                &path,
                &paint,
                tiny_skia::FillRule::Winding,
                Transform::identity(),
                clip_mask.as_ref(),
            );
        }
    }

    // --- Private paint helpers ---

    pub(crate) fn create_clip_mask(&self) -> Option<tiny_skia::Mask> {
        self.state.clip_path.as_ref().and_then(|clip_path| {
            let mut mask = tiny_skia::Mask::new(self.width, self.height)?;
            mask.fill_path(
                clip_path,
                self.clip_fill_rule.into(),
                true,
                self.state.clip_transform,
            );
            Some(mask)
        })
    }

    pub(crate) fn with_fill_paint<R>(
        &mut self,
        draw: impl for<'a> FnOnce(&mut Self, &tiny_skia::Paint<'a>) -> R,
    ) -> Option<R> {
        let style = self.state.fill_style.clone();
        self.with_paint_from_style(style, draw)
    }

    pub(crate) fn with_stroke_paint<R>(
        &mut self,
        draw: impl for<'a> FnOnce(&mut Self, &tiny_skia::Paint<'a>) -> R,
    ) -> Option<R> {
        let style = self.state.stroke_style.clone();
        self.with_paint_from_style(style, draw)
    }

    pub(crate) fn with_paint_from_style<R>(
        &mut self,
        style: FillStyle,
        draw: impl for<'a> FnOnce(&mut Self, &tiny_skia::Paint<'a>) -> R,
    ) -> Option<R> {
        let mut paint = tiny_skia::Paint {
            anti_alias: self.antialias_enabled(),
            blend_mode: self.state.global_composite_operation,
            ..Default::default()
        };

        match style {
            FillStyle::Color(color) => {
                let mut color = color;
                if self.state.global_alpha < 1.0 {
                    color.set_alpha((color.alpha() * self.state.global_alpha).clamp(0.0, 1.0));
                }
                paint.set_color(color);
                Some(draw(self, &paint))
            }
            FillStyle::LinearGradient(gradient) | FillStyle::RadialGradient(gradient) => {
                let shader = self.create_gradient_shader(&gradient)?;
                paint.shader = shader;
                Some(draw(self, &paint))
            }
            FillStyle::Pattern(pattern) => {
                let backing = pattern.create_backing_pixmap(self.width, self.height)?;
                let shader = pattern.create_shader_for_pixmap(
                    backing.as_ref(),
                    self.state.transform,
                    self.state.pattern_quality,
                    self.state.global_alpha,
                );
                paint.shader = shader;
                Some(draw(self, &paint))
            }
        }
    }

    pub(crate) fn create_gradient_shader(
        &self,
        gradient: &CanvasGradient,
    ) -> Option<tiny_skia::Shader<'static>> {
        if gradient.stops.is_empty() {
            return None;
        }

        let stops: Vec<tiny_skia::GradientStop> = gradient
            .stops
            .iter()
            .map(|stop| {
                let mut color: tiny_skia::Color = stop.color;
                if self.state.global_alpha < 1.0 {
                    color.set_alpha((color.alpha() * self.state.global_alpha).clamp(0.0, 1.0));
                }
                tiny_skia::GradientStop::new(stop.offset as f32, color)
            })
            .collect();

        match &gradient.gradient_type {
            GradientType::Linear { x0, y0, x1, y1 } => tiny_skia::LinearGradient::new(
                tiny_skia::Point { x: *x0, y: *y0 },
                tiny_skia::Point { x: *x1, y: *y1 },
                stops,
                tiny_skia::SpreadMode::Pad,
                self.state.transform,
            ),
            GradientType::Radial(params) => tiny_skia::RadialGradient::new(
                tiny_skia::Point {
                    x: params.x0,
                    y: params.y0,
                },
                tiny_skia::Point {
                    x: params.x1,
                    y: params.y1,
                },
                params.r1,
                stops,
                tiny_skia::SpreadMode::Pad,
                self.state.transform,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x: f32, y: f32, width: f32, height: f32) -> RectParams {
        RectParams {
            x,
            y,
            width,
            height,
        }
    }

    #[test]
    fn test_fill_consumes_path_and_preserve_keeps_it() {
        let mut ctx = Canvas2dContext::new(50, 50).unwrap();
        ctx.set_fill_style("#00ff00").unwrap();
        ctx.begin_path();
        ctx.rect(&rect(5.0, 5.0, 10.0, 10.0));
        ctx.fill_preserve();
        assert!(!ctx.path_builder.is_empty());

        ctx.fill();
        assert!(ctx.path_builder.is_empty());
        assert!(!ctx.has_current_point);
    }

    #[test]
    fn test_zero_size_fill_rect_is_a_no_op() {
        let mut ctx = Canvas2dContext::new(50, 50).unwrap();
        ctx.set_fill_style("#ff0000").unwrap();
        ctx.fill_rect(&rect(10.0, 10.0, 0.0, 20.0));
        ctx.fill_rect(&rect(10.0, 10.0, 20.0, 0.0));
        assert!(ctx.pixmap.data().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_clear_rect_erases_pixels() {
        let mut ctx = Canvas2dContext::new(50, 50).unwrap();
        ctx.set_fill_style("#0000ff").unwrap();
        ctx.fill_rect(&rect(0.0, 0.0, 50.0, 50.0));
        ctx.clear_rect(&rect(10.0, 10.0, 20.0, 20.0));

        let data = ctx.get_image_data(0, 0, 50, 50);
        let inside = (20 * 50 + 20) * 4;
        assert_eq!(data[inside + 3], 0);
        let outside = (5 * 50 + 5) * 4;
        assert_eq!(data[outside + 3], 255);
    }

    #[test]
    fn test_clip_restricts_fill() {
        let mut ctx = Canvas2dContext::new(50, 50).unwrap();
        ctx.begin_path();
        ctx.rect(&rect(0.0, 0.0, 20.0, 20.0));
        ctx.clip();

        ctx.set_fill_style("#ff0000").unwrap();
        ctx.fill_rect(&rect(0.0, 0.0, 50.0, 50.0));

        let data = ctx.get_image_data(0, 0, 50, 50);
        let inside = (10 * 50 + 10) * 4;
        assert_eq!(data[inside + 3], 255);
        let outside = (30 * 50 + 30) * 4;
        assert_eq!(data[outside + 3], 0);
    }

    #[test]
    fn test_gradient_fill_produces_gradient() {
        let mut ctx = Canvas2dContext::new(64, 16).unwrap();
        let mut gradient = ctx.create_linear_gradient(0.0, 0.0, 64.0, 0.0);
        gradient
            .add_color_stop(0.0, tiny_skia::Color::BLACK)
            .unwrap();
        gradient
            .add_color_stop(1.0, tiny_skia::Color::WHITE)
            .unwrap();
        ctx.set_fill_style_gradient(gradient);
        ctx.fill_rect(&rect(0.0, 0.0, 64.0, 16.0));

        let data = ctx.get_image_data(0, 0, 64, 16);
        let left = (8 * 64 + 4) * 4;
        let right = (8 * 64 + 60) * 4;
        assert!(data[left] < data[right]);
    }

    #[test]
    fn test_pattern_fill_tiles() {
        let mut ctx = Canvas2dContext::new(8, 8).unwrap();
        // 2x2 checker: red, transparent / transparent, red
        let mut data = vec![0u8; 2 * 2 * 4];
        for idx in [0usize, 12] {
            data[idx] = 255;
            data[idx + 3] = 255;
        }
        let pattern = ctx.create_pattern(&data, 2, 2, "repeat").unwrap();
        ctx.set_fill_style_pattern(pattern);
        ctx.set_pattern_quality("fast");
        ctx.fill_rect(&rect(0.0, 0.0, 8.0, 8.0));

        let out = ctx.get_image_data(0, 0, 8, 8);
        // Tiled: (0,0), (2,0), (4,4) all land on the red cell.
        for (px, py) in [(0usize, 0usize), (2, 0), (4, 4)] {
            let idx = (py * 8 + px) * 4;
            assert_eq!(out[idx + 3], 255, "pixel ({}, {})", px, py);
        }
    }

    #[test]
    fn test_global_alpha_scales_fill() {
        let mut ctx = Canvas2dContext::new(10, 10).unwrap();
        ctx.set_fill_style("#000000").unwrap();
        ctx.set_global_alpha(0.5);
        ctx.fill_rect(&rect(0.0, 0.0, 10.0, 10.0));

        let data = ctx.get_image_data(0, 0, 10, 10);
        let a = data[3];
        assert!((126..=129).contains(&a), "alpha was {}", a);
    }
}
