//! Pure Rust Canvas 2D API implementation using tiny-skia and cosmic-text.
//!
//! This crate provides an immediate-mode Canvas 2D drawing context that can
//! be used without a browser or JavaScript runtime. It uses:
//! - `tiny-skia` for 2D graphics rendering
//! - `cosmic-text` for text shaping, measurement, and rendering
//! - `fontdb` for font database management (can be shared with other crates)
//!
//! # Example
//!
//! ```rust,ignore
//! use canvas2d_context::{Canvas2dContext, RectParams};
//!
//! let mut ctx = Canvas2dContext::new(400, 300)?;
//! ctx.set_fill_style("#ff0000")?;
//! ctx.fill_rect(&RectParams { x: 10.0, y: 10.0, width: 100.0, height: 50.0 });
//! let png_data = ctx.to_png(None)?;
//! ```

mod arc;
mod blur;
mod context;
mod dom_matrix;
mod drawing_state;
mod error;
mod geometry;
mod gradient;
mod pattern;
mod style;
mod text;

// Re-export public API
pub use context::Canvas2dContext;
pub use dom_matrix::DOMMatrix;
pub use drawing_state::DrawingState;
pub use error::{Canvas2dError, Canvas2dResult};
pub use geometry::{
    ArcParams, ArcToParams, CanvasColor, CanvasImageDataRef, CubicBezierParams, DirtyRect,
    EllipseParams, ImageCropParams, QuadraticBezierParams, RadialGradientParams, RectParams,
    SourceRect,
};
pub use gradient::{CanvasGradient, GradientStop};
pub use pattern::{CanvasPattern, Repetition};
pub use style::{
    AntiAlias, CanvasFillRule, FillStyle, LineCap, LineJoin, PatternQuality, TextAlign,
    TextBaseline,
};
pub use text::{FontSpec, TextMetrics};
