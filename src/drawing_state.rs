//! Drawing state that can be saved and restored.

use crate::style::{AntiAlias, FillStyle, LineCap, LineJoin, PatternQuality, TextAlign, TextBaseline};
use crate::text::FontSpec;
use tiny_skia::Transform;

/// Drawing state that can be saved and restored.
#[derive(Debug, Clone)]
pub struct DrawingState {
    /// Current fill style.
    pub fill_style: FillStyle,
    /// Current stroke style.
    pub stroke_style: FillStyle,
    /// Current line width.
    pub line_width: f32,
    /// Current line cap style.
    pub line_cap: LineCap,
    /// Current line join style.
    pub line_join: LineJoin,
    /// Current miter limit.
    pub miter_limit: f32,
    /// Current line dash pattern.
    pub line_dash: Vec<f32>,
    /// Current line dash offset.
    pub line_dash_offset: f32,
    /// Current font specification.
    pub font: FontSpec,
    /// Current text alignment.
    pub text_align: TextAlign,
    /// Current text baseline.
    pub text_baseline: TextBaseline,
    /// Current global alpha.
    pub global_alpha: f32,
    /// Current global composite operation (blend mode).
    pub global_composite_operation: tiny_skia::BlendMode,
    /// Current transform matrix.
    pub transform: Transform,
    /// Clipping path (if any).
    pub clip_path: Option<tiny_skia::Path>,
    /// Transform that was active when the clip path was set.
    /// Used to transform the user-space clip path into device space at mask creation time.
    pub clip_transform: Transform,
    /// Shadow color; fully transparent disables the shadow.
    pub shadow_color: tiny_skia::Color,
    /// Shadow blur radius. A radius of 0 or 1 paints a sharp shadow.
    pub shadow_blur: u32,
    /// Shadow offset along x, in user space.
    pub shadow_offset_x: f32,
    /// Shadow offset along y, in user space.
    pub shadow_offset_y: f32,
    /// Filter quality used when painting patterns and images.
    pub pattern_quality: PatternQuality,
    /// Antialiasing mode.
    pub anti_alias: AntiAlias,
}

impl Default for DrawingState {
    fn default() -> Self {
        Self {
            fill_style: FillStyle::default(),
            stroke_style: FillStyle::default(),
            line_width: 1.0,
            line_cap: LineCap::default(),
            line_join: LineJoin::default(),
            miter_limit: 10.0,
            line_dash: Vec::new(),
            line_dash_offset: 0.0,
            font: FontSpec::default(),
            text_align: TextAlign::default(),
            text_baseline: TextBaseline::default(),
            global_alpha: 1.0,
            global_composite_operation: tiny_skia::BlendMode::SourceOver,
            transform: Transform::identity(),
            clip_path: None,
            clip_transform: Transform::identity(),
            shadow_color: tiny_skia::Color::TRANSPARENT,
            shadow_blur: 0,
            shadow_offset_x: 0.0,
            shadow_offset_y: 0.0,
            pattern_quality: PatternQuality::default(),
            anti_alias: AntiAlias::default(),
        }
    }
}

impl DrawingState {
    /// A shadow gets painted only when its color carries any alpha and it
    /// is either offset or blurred. Blur radius 1 degenerates to a sharp
    /// shadow but still triggers painting.
    pub fn has_drawable_shadow(&self) -> bool {
        self.shadow_color.alpha() > 0.0
            && (self.shadow_blur > 0 || self.shadow_offset_x != 0.0 || self.shadow_offset_y != 0.0)
    }
}
