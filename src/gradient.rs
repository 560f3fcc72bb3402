//! Gradient fill sources.

use crate::error::{Canvas2dError, Canvas2dResult};
use crate::geometry::RadialGradientParams;

/// A color stop in a gradient.
#[derive(Debug, Clone)]
pub struct GradientStop {
    /// Offset position (0.0 to 1.0).
    pub offset: f64,
    /// Color at this stop.
    pub color: tiny_skia::Color,
}

/// Canvas gradient (linear or radial).
#[derive(Debug, Clone)]
pub struct CanvasGradient {
    /// Gradient type and geometry.
    pub gradient_type: GradientType,
    /// Color stops, kept sorted by offset.
    pub stops: Vec<GradientStop>,
}

/// Type of gradient.
#[derive(Debug, Clone)]
pub enum GradientType {
    /// Linear gradient from (x0, y0) to (x1, y1).
    Linear { x0: f32, y0: f32, x1: f32, y1: f32 },
    /// Radial gradient from inner circle to outer circle.
    Radial(RadialGradientParams),
}

impl CanvasGradient {
    /// Create a new linear gradient.
    pub fn new_linear(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self {
            gradient_type: GradientType::Linear { x0, y0, x1, y1 },
            stops: Vec::new(),
        }
    }

    /// Create a new radial gradient.
    pub fn new_radial(params: &RadialGradientParams) -> Self {
        Self {
            gradient_type: GradientType::Radial(*params),
            stops: Vec::new(),
        }
    }

    /// Add a color stop to the gradient.
    ///
    /// The offset must lie in `[0, 1]`; anything else (including NaN) is
    /// rejected.
    pub fn add_color_stop(&mut self, offset: f64, color: tiny_skia::Color) -> Canvas2dResult<()> {
        if !(0.0..=1.0).contains(&offset) {
            return Err(Canvas2dError::InvalidGradientStop(offset));
        }
        self.stops.push(GradientStop { offset, color });
        // Keep stops sorted by offset
        self.stops.sort_by(|a, b| {
            a.offset
                .partial_cmp(&b.offset)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stops_stay_sorted() {
        let mut gradient = CanvasGradient::new_linear(0.0, 0.0, 100.0, 0.0);
        gradient
            .add_color_stop(0.8, tiny_skia::Color::WHITE)
            .unwrap();
        gradient
            .add_color_stop(0.2, tiny_skia::Color::BLACK)
            .unwrap();
        gradient
            .add_color_stop(0.5, tiny_skia::Color::WHITE)
            .unwrap();
        let offsets: Vec<f64> = gradient.stops.iter().map(|s| s.offset).collect();
        assert_eq!(offsets, vec![0.2, 0.5, 0.8]);
    }

    #[test]
    fn test_out_of_range_stop_rejected() {
        let mut gradient = CanvasGradient::new_linear(0.0, 0.0, 100.0, 0.0);
        assert!(gradient.add_color_stop(-0.1, tiny_skia::Color::WHITE).is_err());
        assert!(gradient.add_color_stop(1.5, tiny_skia::Color::WHITE).is_err());
        assert!(gradient
            .add_color_stop(f64::NAN, tiny_skia::Color::WHITE)
            .is_err());
        assert!(gradient.stops.is_empty());
    }
}
