//! Transformation operations for Canvas2dContext.

use super::Canvas2dContext;
use crate::dom_matrix::DOMMatrix;
use tiny_skia::Transform;

impl Canvas2dContext {
    /// Translate the current transformation matrix.
    pub fn translate(&mut self, x: f32, y: f32) {
        log::debug!(target: "canvas", "translate {} {}", x, y);
        self.state.transform = self.state.transform.pre_translate(x, y);
    }

    /// Rotate the current transformation matrix by an angle in radians.
    pub fn rotate(&mut self, angle: f32) {
        log::debug!(target: "canvas", "rotate {}", angle);
        let (sin, cos) = angle.sin_cos();
        let rotation = Transform::from_row(cos, sin, -sin, cos, 0.0, 0.0);
        self.state.transform = self.state.transform.pre_concat(rotation);
    }

    /// Scale the current transformation matrix.
    pub fn scale(&mut self, x: f32, y: f32) {
        log::debug!(target: "canvas", "scale {} {}", x, y);
        self.state.transform = self.state.transform.pre_scale(x, y);
    }

    /// Multiply the current transformation matrix by the given matrix.
    pub fn transform(&mut self, matrix: DOMMatrix) {
        log::debug!(target: "canvas", "transform {:?}", matrix);
        self.state.transform = self.state.transform.pre_concat(matrix.into());
    }

    /// Replace the current transformation matrix.
    pub fn set_transform(&mut self, matrix: DOMMatrix) {
        log::debug!(target: "canvas", "setTransform {:?}", matrix);
        self.state.transform = matrix.into();
    }

    /// Reset the current transformation matrix to the identity.
    pub fn reset_transform(&mut self) {
        log::debug!(target: "canvas", "resetTransform");
        self.state.transform = Transform::identity();
    }

    /// Get the current transformation matrix.
    pub fn get_transform(&self) -> DOMMatrix {
        self.state.transform.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_then_scale_composes_in_order() {
        let mut ctx = Canvas2dContext::new(100, 100).unwrap();
        ctx.translate(10.0, 20.0);
        ctx.scale(2.0, 3.0);

        let t = ctx.get_transform();
        assert_eq!(t.a, 2.0);
        assert_eq!(t.d, 3.0);
        assert_eq!(t.e, 10.0);
        assert_eq!(t.f, 20.0);
    }

    #[test]
    fn test_rotate_quarter_turn() {
        let mut ctx = Canvas2dContext::new(100, 100).unwrap();
        ctx.rotate(std::f32::consts::FRAC_PI_2);

        let t = ctx.get_transform();
        assert!(t.a.abs() < 1e-6);
        assert!((t.b - 1.0).abs() < 1e-6);
        assert!((t.c + 1.0).abs() < 1e-6);
        assert!(t.d.abs() < 1e-6);
    }

    #[test]
    fn test_set_and_reset_transform() {
        let mut ctx = Canvas2dContext::new(100, 100).unwrap();
        ctx.set_transform(DOMMatrix::new(2.0, 0.0, 0.0, 2.0, 5.0, 6.0));
        assert_eq!(ctx.get_transform().e, 5.0);

        ctx.reset_transform();
        assert!(ctx.get_transform().is_identity());
    }
}
