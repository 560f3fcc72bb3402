//! Canvas 2D rendering context implementation.

mod drawing;
mod image_ops;
mod path_ops;
mod shadow;
mod text_rendering;
mod transform;

use crate::drawing_state::DrawingState;
use crate::error::{Canvas2dError, Canvas2dResult};
use crate::geometry::{CanvasColor, RadialGradientParams};
use crate::gradient::{CanvasGradient, GradientType};
use crate::pattern::{CanvasPattern, Repetition};
use crate::style::{AntiAlias, CanvasFillRule, FillStyle, LineCap, LineJoin, PatternQuality};
use crate::text::FontSpec;
use cosmic_text::{FontSystem, SwashCache};
use std::sync::Arc;
use tiny_skia::Pixmap;

/// Maximum canvas dimension (same as Chrome).
const MAX_DIMENSION: u32 = 32767;

/// Maximum number of saved drawing states.
///
/// Saving past this depth is a silent no-op, as is restoring with nothing
/// saved.
const MAX_SAVED_STATES: usize = 64;

/// Canvas 2D rendering context.
pub struct Canvas2dContext {
    /// Width of the canvas in pixels.
    pub(crate) width: u32,
    /// Height of the canvas in pixels.
    pub(crate) height: u32,
    /// Pixel buffer.
    pub(crate) pixmap: Pixmap,
    /// Font system for text rendering.
    pub(crate) font_system: FontSystem,
    /// Swash cache for glyph outlines.
    pub(crate) swash_cache: SwashCache,
    /// Current drawing state.
    pub(crate) state: DrawingState,
    /// Stack of saved drawing states, bounded by MAX_SAVED_STATES.
    state_stack: Vec<DrawingState>,
    /// Fill rule associated with the current clipping path.
    pub(crate) clip_fill_rule: CanvasFillRule,
    /// Stack of saved clip fill rules (parallel to state_stack).
    clip_fill_rule_stack: Vec<CanvasFillRule>,
    /// Current path builder.
    pub(crate) path_builder: tiny_skia::PathBuilder,
    /// Current path position (for tracking subpath start).
    pub(crate) current_x: f32,
    pub(crate) current_y: f32,
    /// Subpath start position (for closePath).
    pub(crate) subpath_start_x: f32,
    pub(crate) subpath_start_y: f32,
    /// Whether the path has a current point (for arc/ellipse line_to vs move_to).
    pub(crate) has_current_point: bool,
}

impl Canvas2dContext {
    /// Create a new Canvas2dContext with the specified dimensions.
    ///
    /// Loads system fonts for text rendering.
    pub fn new(width: u32, height: u32) -> Canvas2dResult<Self> {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();
        Self::with_font_db(width, height, db)
    }

    /// Create a new Canvas2dContext using an already-populated font database.
    ///
    /// Use this when creating multiple contexts that share the same fonts,
    /// avoiding repeated system font scanning.
    pub fn with_font_db(
        width: u32,
        height: u32,
        font_db: fontdb::Database,
    ) -> Canvas2dResult<Self> {
        if width == 0 || height == 0 || width > MAX_DIMENSION || height > MAX_DIMENSION {
            return Err(Canvas2dError::InvalidDimensions { width, height });
        }

        let pixmap =
            Pixmap::new(width, height).ok_or(Canvas2dError::InvalidDimensions { width, height })?;

        let font_system = FontSystem::new_with_locale_and_db("en".to_string(), font_db);
        let swash_cache = SwashCache::new();

        Ok(Self {
            width,
            height,
            pixmap,
            font_system,
            swash_cache,
            state: DrawingState::default(),
            state_stack: Vec::new(),
            clip_fill_rule: CanvasFillRule::NonZero,
            clip_fill_rule_stack: Vec::new(),
            path_builder: tiny_skia::PathBuilder::new(),
            current_x: 0.0,
            current_y: 0.0,
            subpath_start_x: 0.0,
            subpath_start_y: 0.0,
            has_current_point: false,
        })
    }

    /// Get canvas width.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get canvas height.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of saved states currently reachable by restore().
    pub fn saved_state_depth(&self) -> usize {
        self.state_stack.len()
    }

    /// Save the current drawing state.
    ///
    /// Saving beyond the maximum depth leaves the stack and the active
    /// state untouched.
    pub fn save(&mut self) {
        if self.state_stack.len() >= MAX_SAVED_STATES {
            log::debug!(target: "canvas", "save ignored: state stack full");
            return;
        }
        log::debug!(target: "canvas", "save");
        self.state_stack.push(self.state.clone());
        self.clip_fill_rule_stack.push(self.clip_fill_rule);
    }

    /// Restore the previously saved drawing state.
    ///
    /// Restoring with an empty stack is a no-op.
    pub fn restore(&mut self) {
        log::debug!(target: "canvas", "restore");
        if let Some(state) = self.state_stack.pop() {
            self.state = state;
            self.clip_fill_rule = self
                .clip_fill_rule_stack
                .pop()
                .unwrap_or(CanvasFillRule::NonZero);
        }
    }

    /// Reset the rendering context to its default state.
    ///
    /// This clears the canvas to transparent, resets all drawing state
    /// (fill/stroke style, transforms, shadows), and empties the state stack.
    pub fn reset(&mut self) {
        self.pixmap.fill(tiny_skia::Color::TRANSPARENT);
        self.state = DrawingState::default();
        self.state_stack.clear();
        self.clip_fill_rule_stack.clear();
        self.path_builder = tiny_skia::PathBuilder::new();
        self.current_x = 0.0;
        self.current_y = 0.0;
        self.subpath_start_x = 0.0;
        self.subpath_start_y = 0.0;
        self.has_current_point = false;
        self.clip_fill_rule = CanvasFillRule::NonZero;
    }

    // --- Style setters ---

    /// Set the fill style from a CSS color string.
    pub fn set_fill_style(&mut self, style: &str) -> Canvas2dResult<()> {
        let color = parse_color(style)?;
        self.state.fill_style = FillStyle::Color(color);
        Ok(())
    }

    /// Set the fill style from a CanvasColor.
    pub fn set_fill_style_color(&mut self, color: CanvasColor) {
        self.state.fill_style = FillStyle::Color(color.into());
    }

    /// Set the stroke style from a CSS color string.
    pub fn set_stroke_style(&mut self, style: &str) -> Canvas2dResult<()> {
        let color = parse_color(style)?;
        self.state.stroke_style = FillStyle::Color(color);
        Ok(())
    }

    /// Set the stroke style from a CanvasColor.
    pub fn set_stroke_style_color(&mut self, color: CanvasColor) {
        self.state.stroke_style = FillStyle::Color(color.into());
    }

    /// Set the line width. Ignores non-finite or non-positive values.
    pub fn set_line_width(&mut self, width: f32) {
        if width.is_finite() && width > 0.0 {
            self.state.line_width = width;
        }
    }

    /// Set the line cap style.
    pub fn set_line_cap(&mut self, cap: LineCap) {
        self.state.line_cap = cap;
    }

    /// Set the line join style.
    pub fn set_line_join(&mut self, join: LineJoin) {
        self.state.line_join = join;
    }

    /// Set the miter limit. Ignores non-finite or non-positive values.
    pub fn set_miter_limit(&mut self, limit: f32) {
        if limit.is_finite() && limit > 0.0 {
            self.state.miter_limit = limit;
        }
    }

    /// Set the global alpha. Ignores non-finite or out-of-range values.
    pub fn set_global_alpha(&mut self, alpha: f32) {
        if alpha.is_finite() && (0.0..=1.0).contains(&alpha) {
            self.state.global_alpha = alpha;
        }
    }

    /// Set the global composite operation (blend mode).
    ///
    /// Unrecognized operation names select source-over.
    pub fn set_global_composite_operation(&mut self, op: &str) {
        self.state.global_composite_operation = match op {
            "source-in" => tiny_skia::BlendMode::SourceIn,
            "source-out" => tiny_skia::BlendMode::SourceOut,
            "source-atop" => tiny_skia::BlendMode::SourceAtop,
            "destination-over" => tiny_skia::BlendMode::DestinationOver,
            "destination-in" => tiny_skia::BlendMode::DestinationIn,
            "destination-out" => tiny_skia::BlendMode::DestinationOut,
            "destination-atop" => tiny_skia::BlendMode::DestinationAtop,
            "lighter" => tiny_skia::BlendMode::Plus,
            "copy" => tiny_skia::BlendMode::Source,
            "xor" => tiny_skia::BlendMode::Xor,
            "multiply" => tiny_skia::BlendMode::Multiply,
            "screen" => tiny_skia::BlendMode::Screen,
            "overlay" => tiny_skia::BlendMode::Overlay,
            "darken" => tiny_skia::BlendMode::Darken,
            "lighten" => tiny_skia::BlendMode::Lighten,
            "color-dodge" => tiny_skia::BlendMode::ColorDodge,
            "color-burn" => tiny_skia::BlendMode::ColorBurn,
            "hard-light" => tiny_skia::BlendMode::HardLight,
            "soft-light" => tiny_skia::BlendMode::SoftLight,
            "difference" => tiny_skia::BlendMode::Difference,
            "exclusion" => tiny_skia::BlendMode::Exclusion,
            "hue" => tiny_skia::BlendMode::Hue,
            "saturation" => tiny_skia::BlendMode::Saturation,
            "color" => tiny_skia::BlendMode::Color,
            "luminosity" => tiny_skia::BlendMode::Luminosity,
            _ => tiny_skia::BlendMode::SourceOver,
        };
    }

    /// Set the line dash pattern. Ignores the call if any value is
    /// non-finite or negative; odd-length patterns are doubled.
    pub fn set_line_dash(&mut self, mut segments: Vec<f32>) {
        if segments.iter().any(|&v| !v.is_finite() || v < 0.0) {
            return;
        }
        if segments.len() % 2 != 0 {
            let copy = segments.clone();
            segments.extend(copy);
        }
        self.state.line_dash = segments;
    }

    /// Get the current line dash pattern.
    pub fn get_line_dash(&self) -> &[f32] {
        &self.state.line_dash
    }

    /// Set the line dash offset. Ignores non-finite values.
    pub fn set_line_dash_offset(&mut self, offset: f32) {
        if offset.is_finite() {
            self.state.line_dash_offset = offset;
        }
    }

    // --- Shadows ---

    /// Set the shadow color from a CSS color string.
    pub fn set_shadow_color(&mut self, color: &str) -> Canvas2dResult<()> {
        self.state.shadow_color = parse_color(color)?;
        Ok(())
    }

    /// Set the shadow color from a CanvasColor.
    pub fn set_shadow_color_color(&mut self, color: CanvasColor) {
        self.state.shadow_color = color.into();
    }

    /// Set the shadow blur radius. Ignores non-finite or negative values.
    pub fn set_shadow_blur(&mut self, blur: f32) {
        if blur.is_finite() && blur >= 0.0 {
            self.state.shadow_blur = blur as u32;
        }
    }

    /// Get the shadow blur radius.
    pub fn shadow_blur(&self) -> u32 {
        self.state.shadow_blur
    }

    /// Set the shadow x offset. Ignores non-finite values.
    pub fn set_shadow_offset_x(&mut self, offset: f32) {
        if offset.is_finite() {
            self.state.shadow_offset_x = offset;
        }
    }

    /// Set the shadow y offset. Ignores non-finite values.
    pub fn set_shadow_offset_y(&mut self, offset: f32) {
        if offset.is_finite() {
            self.state.shadow_offset_y = offset;
        }
    }

    // --- Pattern quality and antialiasing ---

    /// Set the filter quality used for pattern and image paints.
    /// Unknown names leave the quality unchanged.
    pub fn set_pattern_quality(&mut self, name: &str) {
        if let Some(quality) = PatternQuality::from_name(name) {
            self.state.pattern_quality = quality;
        }
    }

    /// Get the current pattern filter quality.
    pub fn pattern_quality(&self) -> PatternQuality {
        self.state.pattern_quality
    }

    /// Set the antialiasing mode.
    pub fn set_anti_alias(&mut self, mode: AntiAlias) {
        self.state.anti_alias = mode;
    }

    /// Get the antialiasing mode.
    pub fn anti_alias(&self) -> AntiAlias {
        self.state.anti_alias
    }

    pub(crate) fn antialias_enabled(&self) -> bool {
        self.state.anti_alias == AntiAlias::Default
    }

    // --- Text style ---

    /// Set the font used by fill_text/stroke_text. Ignores a non-finite
    /// or non-positive size.
    pub fn set_font(&mut self, font: FontSpec) {
        if font.size_px.is_finite() && font.size_px > 0.0 {
            self.state.font = font;
        }
    }

    /// Get the current font.
    pub fn font(&self) -> &FontSpec {
        &self.state.font
    }

    /// Set the text alignment.
    pub fn set_text_align(&mut self, align: crate::style::TextAlign) {
        self.state.text_align = align;
    }

    /// Set the text baseline.
    pub fn set_text_baseline(&mut self, baseline: crate::style::TextBaseline) {
        self.state.text_baseline = baseline;
    }

    // --- Gradients ---

    /// Create a linear gradient.
    pub fn create_linear_gradient(&self, x0: f32, y0: f32, x1: f32, y1: f32) -> CanvasGradient {
        CanvasGradient::new_linear(x0, y0, x1, y1)
    }

    /// Create a radial gradient.
    pub fn create_radial_gradient(&self, params: &RadialGradientParams) -> CanvasGradient {
        CanvasGradient::new_radial(params)
    }

    /// Set the fill style to a gradient.
    pub fn set_fill_style_gradient(&mut self, gradient: CanvasGradient) {
        self.state.fill_style = match gradient.gradient_type {
            GradientType::Linear { .. } => FillStyle::LinearGradient(gradient),
            GradientType::Radial { .. } => FillStyle::RadialGradient(gradient),
        };
    }

    /// Set the stroke style to a gradient.
    pub fn set_stroke_style_gradient(&mut self, gradient: CanvasGradient) {
        self.state.stroke_style = match gradient.gradient_type {
            GradientType::Linear { .. } => FillStyle::LinearGradient(gradient),
            GradientType::Radial { .. } => FillStyle::RadialGradient(gradient),
        };
    }

    // --- Patterns ---

    /// Create a pattern from non-premultiplied RGBA pixel data.
    pub fn create_pattern(
        &self,
        data: &[u8],
        width: u32,
        height: u32,
        repetition: &str,
    ) -> Canvas2dResult<Arc<CanvasPattern>> {
        let rep = repetition.parse::<Repetition>()?;
        let pattern = CanvasPattern::new(data, width, height, rep)?;
        Ok(Arc::new(pattern))
    }

    /// Create a pattern from another canvas's current content.
    pub fn create_pattern_from_canvas(
        &self,
        source: &Canvas2dContext,
        repetition: &str,
    ) -> Canvas2dResult<Arc<CanvasPattern>> {
        let rep = repetition.parse::<Repetition>()?;
        let pattern = CanvasPattern::from_pixmap_ref(source.pixmap.as_ref(), rep)?;
        Ok(Arc::new(pattern))
    }

    /// Set the fill style to a pattern.
    pub fn set_fill_style_pattern(&mut self, pattern: Arc<CanvasPattern>) {
        self.state.fill_style = FillStyle::Pattern(pattern);
    }

    /// Set the stroke style to a pattern.
    pub fn set_stroke_style_pattern(&mut self, pattern: Arc<CanvasPattern>) {
        self.state.stroke_style = FillStyle::Pattern(pattern);
    }
}

/// Parse a CSS color string into a tiny_skia::Color.
pub(crate) fn parse_color(s: &str) -> Canvas2dResult<tiny_skia::Color> {
    let parsed = csscolorparser::parse(s)
        .map_err(|e| Canvas2dError::ColorParseError(format!("{}: {}", s, e)))?;

    let [r, g, b, a] = parsed.to_array();
    Ok(tiny_skia::Color::from_rgba(r, g, b, a).unwrap_or(tiny_skia::Color::BLACK))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::RectParams;

    #[test]
    fn test_new_context_defaults() {
        let ctx = Canvas2dContext::new(200, 150).unwrap();
        assert_eq!(ctx.width(), 200);
        assert_eq!(ctx.height(), 150);
        assert_eq!(ctx.state.line_width, 1.0);
        assert_eq!(ctx.state.global_alpha, 1.0);
        assert_eq!(ctx.state.miter_limit, 10.0);
        assert!(ctx.state.line_dash.is_empty());
        assert_eq!(ctx.state.shadow_blur, 0);
        assert_eq!(ctx.state.shadow_offset_x, 0.0);
        assert_eq!(ctx.state.shadow_offset_y, 0.0);
        assert!(ctx.state.clip_path.is_none());
        assert_eq!(ctx.clip_fill_rule, CanvasFillRule::NonZero);
        assert!(ctx.pixmap.data().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_invalid_dimensions() {
        assert!(matches!(
            Canvas2dContext::new(0, 100),
            Err(Canvas2dError::InvalidDimensions { .. })
        ));
        assert!(matches!(
            Canvas2dContext::new(100, 0),
            Err(Canvas2dError::InvalidDimensions { .. })
        ));
        assert!(matches!(
            Canvas2dContext::new(MAX_DIMENSION + 1, 100),
            Err(Canvas2dError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_line_width_ignore_invalid() {
        let mut ctx = Canvas2dContext::new(100, 100).unwrap();
        ctx.set_line_width(5.0);
        assert_eq!(ctx.state.line_width, 5.0);

        ctx.set_line_width(-1.0);
        assert_eq!(ctx.state.line_width, 5.0);
        ctx.set_line_width(0.0);
        assert_eq!(ctx.state.line_width, 5.0);
        ctx.set_line_width(f32::NAN);
        assert_eq!(ctx.state.line_width, 5.0);
        ctx.set_line_width(f32::INFINITY);
        assert_eq!(ctx.state.line_width, 5.0);

        ctx.set_line_width(3.0);
        assert_eq!(ctx.state.line_width, 3.0);
    }

    #[test]
    fn test_global_alpha_ignore_invalid() {
        let mut ctx = Canvas2dContext::new(100, 100).unwrap();
        ctx.set_global_alpha(0.5);
        assert_eq!(ctx.state.global_alpha, 0.5);

        // Out-of-range values are ignored, not clamped
        ctx.set_global_alpha(2.0);
        assert_eq!(ctx.state.global_alpha, 0.5);
        ctx.set_global_alpha(-0.5);
        assert_eq!(ctx.state.global_alpha, 0.5);
        ctx.set_global_alpha(f32::NAN);
        assert_eq!(ctx.state.global_alpha, 0.5);

        ctx.set_global_alpha(0.0);
        assert_eq!(ctx.state.global_alpha, 0.0);
        ctx.set_global_alpha(1.0);
        assert_eq!(ctx.state.global_alpha, 1.0);
    }

    #[test]
    fn test_miter_limit_ignore_invalid() {
        let mut ctx = Canvas2dContext::new(100, 100).unwrap();
        ctx.set_miter_limit(5.0);
        assert_eq!(ctx.state.miter_limit, 5.0);

        ctx.set_miter_limit(0.0);
        assert_eq!(ctx.state.miter_limit, 5.0);
        ctx.set_miter_limit(-1.0);
        assert_eq!(ctx.state.miter_limit, 5.0);
        ctx.set_miter_limit(f32::NAN);
        assert_eq!(ctx.state.miter_limit, 5.0);
    }

    #[test]
    fn test_line_dash_ignore_invalid() {
        let mut ctx = Canvas2dContext::new(100, 100).unwrap();
        ctx.set_line_dash(vec![5.0, 5.0]);
        assert_eq!(ctx.get_line_dash(), &[5.0, 5.0]);

        ctx.set_line_dash(vec![5.0, -1.0]);
        assert_eq!(ctx.get_line_dash(), &[5.0, 5.0]);
        ctx.set_line_dash(vec![5.0, f32::NAN]);
        assert_eq!(ctx.get_line_dash(), &[5.0, 5.0]);

        // Odd-length patterns are doubled
        ctx.set_line_dash(vec![3.0]);
        assert_eq!(ctx.get_line_dash(), &[3.0, 3.0]);

        // Empty clears
        ctx.set_line_dash(vec![]);
        assert!(ctx.get_line_dash().is_empty());
    }

    #[test]
    fn test_composite_operation_unknown_falls_back_to_source_over() {
        let mut ctx = Canvas2dContext::new(100, 100).unwrap();
        ctx.set_global_composite_operation("multiply");
        assert_eq!(
            ctx.state.global_composite_operation,
            tiny_skia::BlendMode::Multiply
        );

        ctx.set_global_composite_operation("not-a-mode");
        assert_eq!(
            ctx.state.global_composite_operation,
            tiny_skia::BlendMode::SourceOver
        );
    }

    #[test]
    fn test_shadow_setters_ignore_invalid() {
        let mut ctx = Canvas2dContext::new(100, 100).unwrap();
        ctx.set_shadow_blur(5.0);
        assert_eq!(ctx.shadow_blur(), 5);

        ctx.set_shadow_blur(-2.0);
        assert_eq!(ctx.shadow_blur(), 5);
        ctx.set_shadow_blur(f32::NAN);
        assert_eq!(ctx.shadow_blur(), 5);

        ctx.set_shadow_offset_x(3.0);
        ctx.set_shadow_offset_y(-4.0);
        assert_eq!(ctx.state.shadow_offset_x, 3.0);
        assert_eq!(ctx.state.shadow_offset_y, -4.0);
        ctx.set_shadow_offset_x(f32::INFINITY);
        assert_eq!(ctx.state.shadow_offset_x, 3.0);
    }

    #[test]
    fn test_pattern_quality_setter() {
        let mut ctx = Canvas2dContext::new(100, 100).unwrap();
        assert_eq!(ctx.pattern_quality(), PatternQuality::Good);
        ctx.set_pattern_quality("best");
        assert_eq!(ctx.pattern_quality(), PatternQuality::Best);
        ctx.set_pattern_quality("bogus");
        assert_eq!(ctx.pattern_quality(), PatternQuality::Best);
        ctx.set_pattern_quality("fast");
        assert_eq!(ctx.pattern_quality(), PatternQuality::Fast);
    }

    #[test]
    fn test_save_restore_round_trip() {
        let mut ctx = Canvas2dContext::new(100, 100).unwrap();

        ctx.set_line_width(5.0);
        ctx.set_line_cap(LineCap::Round);
        ctx.set_line_join(LineJoin::Bevel);
        ctx.set_line_dash(vec![4.0, 2.0]);
        ctx.set_global_alpha(0.7);
        ctx.set_shadow_blur(6.0);
        ctx.set_shadow_offset_x(2.0);
        ctx.save();

        ctx.set_line_width(10.0);
        ctx.set_line_cap(LineCap::Square);
        ctx.set_line_join(LineJoin::Round);
        ctx.set_line_dash(vec![1.0]);
        ctx.set_global_alpha(0.3);
        ctx.set_shadow_blur(0.0);
        ctx.set_shadow_offset_x(-9.0);

        ctx.restore();

        assert_eq!(ctx.state.line_width, 5.0);
        assert_eq!(ctx.state.line_cap, LineCap::Round);
        assert_eq!(ctx.state.line_join, LineJoin::Bevel);
        assert_eq!(ctx.get_line_dash(), &[4.0, 2.0]);
        assert_eq!(ctx.state.global_alpha, 0.7);
        assert_eq!(ctx.shadow_blur(), 6);
        assert_eq!(ctx.state.shadow_offset_x, 2.0);
    }

    #[test]
    fn test_save_beyond_capacity_is_a_no_op() {
        let mut ctx = Canvas2dContext::new(50, 50).unwrap();
        for i in 0..MAX_SAVED_STATES {
            ctx.set_line_width(i as f32 + 1.0);
            ctx.save();
        }
        assert_eq!(ctx.saved_state_depth(), MAX_SAVED_STATES);

        // The next save does not grow the stack or disturb the active state.
        ctx.set_line_width(999.0);
        ctx.save();
        assert_eq!(ctx.saved_state_depth(), MAX_SAVED_STATES);
        assert_eq!(ctx.state.line_width, 999.0);

        // Restores unwind only the saved states.
        ctx.restore();
        assert_eq!(ctx.state.line_width, MAX_SAVED_STATES as f32);
    }

    #[test]
    fn test_restore_on_empty_stack_is_a_no_op() {
        let mut ctx = Canvas2dContext::new(50, 50).unwrap();
        ctx.set_line_width(7.0);
        ctx.restore();
        assert_eq!(ctx.state.line_width, 7.0);
        assert_eq!(ctx.saved_state_depth(), 0);
    }

    #[test]
    fn test_save_restore_transform() {
        let mut ctx = Canvas2dContext::new(100, 100).unwrap();
        ctx.translate(10.0, 20.0);
        ctx.save();
        ctx.translate(30.0, 40.0);

        let t = ctx.get_transform();
        assert_eq!(t.e, 40.0);
        assert_eq!(t.f, 60.0);

        ctx.restore();
        let t = ctx.get_transform();
        assert_eq!(t.e, 10.0);
        assert_eq!(t.f, 20.0);
    }

    #[test]
    fn test_fill_rect_pixels() {
        let mut ctx = Canvas2dContext::new(100, 100).unwrap();
        ctx.set_fill_style("#ff0000").unwrap();
        ctx.fill_rect(&RectParams {
            x: 10.0,
            y: 10.0,
            width: 50.0,
            height: 50.0,
        });

        let data = ctx.get_image_data(0, 0, 100, 100);
        let idx = (30 * 100 + 30) * 4;
        assert_eq!(data[idx], 255);
        assert_eq!(data[idx + 1], 0);
        assert_eq!(data[idx + 2], 0);
        assert_eq!(data[idx + 3], 255);

        let idx_out = (5 * 100 + 5) * 4;
        assert_eq!(data[idx_out + 3], 0);
    }

    #[test]
    fn test_reset() {
        let mut ctx = Canvas2dContext::new(100, 100).unwrap();

        ctx.set_fill_style("#ff0000").unwrap();
        ctx.set_line_width(5.0);
        ctx.set_global_alpha(0.5);
        ctx.set_shadow_offset_x(4.0);
        ctx.translate(10.0, 10.0);
        ctx.save();
        ctx.fill_rect(&RectParams {
            x: 0.0,
            y: 0.0,
            width: 100.0,
            height: 100.0,
        });
        assert!(ctx.pixmap.data().iter().any(|&b| b != 0));

        ctx.reset();

        assert!(ctx.pixmap.data().iter().all(|&b| b == 0));
        assert_eq!(ctx.state.line_width, 1.0);
        assert_eq!(ctx.state.global_alpha, 1.0);
        assert_eq!(ctx.state.shadow_offset_x, 0.0);
        assert_eq!(ctx.saved_state_depth(), 0);
        let t = ctx.get_transform();
        assert!(t.is_identity());
    }

    #[test]
    fn test_parse_color_rejects_garbage() {
        assert!(parse_color("#abcdef").is_ok());
        assert!(parse_color("rgba(1, 2, 3, 0.5)").is_ok());
        assert!(parse_color("definitely not a color").is_err());
    }
}
