//! Shadow pass shared by fill and stroke.

use super::Canvas2dContext;
use crate::blur::box_blur;
use crate::style::CanvasFillRule;
use tiny_skia::{Pixmap, Transform};

/// Which paint primitive a shadow (and its shape) uses.
#[derive(Debug, Clone, Copy)]
pub(crate) enum PaintOp {
    Fill(CanvasFillRule),
    Stroke,
}

impl Canvas2dContext {
    /// Paint the shadow for a device-space path.
    ///
    /// The path is translated by the shadow offsets (mapped through the
    /// linear part of the CTM, since path coordinates are pre-transformed)
    /// and painted in the shadow color with global alpha applied. A blur
    /// radius above 1 renders into an offscreen group, blurs it, and
    /// composites the group back at full opacity with the current blend
    /// mode; otherwise the sharp shadow is painted directly.
    pub(crate) fn paint_shadow(&mut self, path: &tiny_skia::Path, op: PaintOp) {
        let t = self.state.transform;
        let ox = self.state.shadow_offset_x;
        let oy = self.state.shadow_offset_y;
        let dx = t.sx * ox + t.kx * oy;
        let dy = t.ky * ox + t.sy * oy;

        let Some(shifted) = path.clone().transform(Transform::from_translate(dx, dy)) else {
            return;
        };

        let mut shadow_color = self.state.shadow_color;
        if self.state.global_alpha < 1.0 {
            shadow_color
                .set_alpha((shadow_color.alpha() * self.state.global_alpha).clamp(0.0, 1.0));
        }

        let clip_mask = self.create_clip_mask();

        if self.state.shadow_blur > 1 {
            let Some(mut group) = Pixmap::new(self.width, self.height) else {
                return;
            };

            let mut paint = tiny_skia::Paint {
                anti_alias: self.antialias_enabled(),
                ..Default::default()
            };
            paint.set_color(shadow_color);
            match op {
                PaintOp::Fill(fill_rule) => {
                    group.fill_path(
                        &shifted,
                        &paint,
                        fill_rule.into(),
                        Transform::identity(),
                        None,
                    );
                }
                PaintOp::Stroke => {
                    let stroke = self.device_stroke();
                    group.stroke_path(&shifted, &paint, &stroke, Transform::identity(), None);
                }
            }

            box_blur(group.data_mut(), self.width, self.height, self.state.shadow_blur);

            let group_paint = tiny_skia::PixmapPaint {
                opacity: 1.0,
                blend_mode: self.state.global_composite_operation,
                quality: tiny_skia::FilterQuality::Nearest,
            };
            self.pixmap.draw_pixmap(
                0,
                0,
                group.as_ref(),
                &group_paint,
                Transform::identity(),
                clip_mask.as_ref(),
            );
        } else {
            let mut paint = tiny_skia::Paint {
                anti_alias: self.antialias_enabled(),
                blend_mode: self.state.global_composite_operation,
                ..Default::default()
            };
            paint.set_color(shadow_color);
            match op {
                PaintOp::Fill(fill_rule) => {
                    self.pixmap.fill_path(
                        &shifted,
                        &paint,
                        fill_rule.into(),
                        Transform::identity(),
                        clip_mask.as_ref(),
                    );
                }
                PaintOp::Stroke => {
                    let stroke = self.device_stroke();
                    self.pixmap.stroke_path(
                        &shifted,
                        &paint,
                        &stroke,
                        Transform::identity(),
                        clip_mask.as_ref(),
                    );
                }
            }
        }
    }
}
