//! Pattern fill sources.

use crate::dom_matrix::DOMMatrix;
use crate::error::{Canvas2dError, Canvas2dResult};
use crate::style::PatternQuality;
use tiny_skia::{Pixmap, PixmapRef, Shader, SpreadMode, Transform};

/// Maximum pattern size (4096x4096).
const MAX_PATTERN_SIZE: u32 = 4096;

/// Pattern repetition mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Repetition {
    /// Repeat in both directions (default).
    #[default]
    Repeat,
    /// Repeat only horizontally.
    RepeatX,
    /// Repeat only vertically.
    RepeatY,
    /// No repetition (single instance).
    NoRepeat,
}

impl std::str::FromStr for Repetition {
    type Err = Canvas2dError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "repeat" | "" => Ok(Repetition::Repeat),
            "repeat-x" => Ok(Repetition::RepeatX),
            "repeat-y" => Ok(Repetition::RepeatY),
            "no-repeat" => Ok(Repetition::NoRepeat),
            _ => Err(Canvas2dError::InvalidArgument(format!(
                "Invalid repetition mode: '{}'",
                s
            ))),
        }
    }
}

/// Canvas pattern for fill/stroke operations.
#[derive(Debug, Clone)]
pub struct CanvasPattern {
    /// The pattern image, premultiplied.
    pixmap: Pixmap,
    /// Repetition mode.
    repetition: Repetition,
    /// Pattern transform matrix.
    transform: Transform,
}

impl CanvasPattern {
    /// Create a new pattern from non-premultiplied RGBA pixel data.
    pub fn new(
        data: &[u8],
        width: u32,
        height: u32,
        repetition: Repetition,
    ) -> Canvas2dResult<Self> {
        if width > MAX_PATTERN_SIZE || height > MAX_PATTERN_SIZE {
            return Err(Canvas2dError::InvalidArgument(format!(
                "Pattern size {}x{} exceeds maximum {}x{}",
                width, height, MAX_PATTERN_SIZE, MAX_PATTERN_SIZE
            )));
        }

        if width == 0 || height == 0 {
            return Err(Canvas2dError::InvalidArgument(
                "Pattern dimensions must be non-zero".to_string(),
            ));
        }

        let expected_len = (width * height * 4) as usize;
        if data.len() != expected_len {
            return Err(Canvas2dError::InvalidArgument(format!(
                "Data length {} does not match expected {} for {}x{} RGBA image",
                data.len(),
                expected_len,
                width,
                height
            )));
        }

        let mut pixmap = Pixmap::new(width, height)
            .ok_or_else(|| Canvas2dError::InvalidArgument("Failed to create pixmap".to_string()))?;

        let pixels = pixmap.pixels_mut();
        for (i, pixel) in pixels.iter_mut().enumerate() {
            let offset = i * 4;
            let a = data[offset + 3];
            let premultiply = |c: u8| -> u8 {
                if a == 255 {
                    c
                } else if a == 0 {
                    0
                } else {
                    ((c as u16 * a as u16 + 127) / 255) as u8
                }
            };
            let pr = premultiply(data[offset]);
            let pg = premultiply(data[offset + 1]);
            let pb = premultiply(data[offset + 2]);
            *pixel = tiny_skia::PremultipliedColorU8::from_rgba(pr, pg, pb, a)
                .unwrap_or(tiny_skia::PremultipliedColorU8::TRANSPARENT);
        }

        Ok(Self {
            pixmap,
            repetition,
            transform: Transform::identity(),
        })
    }

    /// Create a new pattern from a Pixmap (already premultiplied).
    pub(crate) fn from_pixmap(pixmap: Pixmap, repetition: Repetition) -> Canvas2dResult<Self> {
        let width = pixmap.width();
        let height = pixmap.height();

        if width > MAX_PATTERN_SIZE || height > MAX_PATTERN_SIZE {
            return Err(Canvas2dError::InvalidArgument(format!(
                "Pattern size {}x{} exceeds maximum {}x{}",
                width, height, MAX_PATTERN_SIZE, MAX_PATTERN_SIZE
            )));
        }

        Ok(Self {
            pixmap,
            repetition,
            transform: Transform::identity(),
        })
    }

    /// Create a new pattern from a PixmapRef (copies the data).
    pub(crate) fn from_pixmap_ref(
        pixmap_ref: PixmapRef,
        repetition: Repetition,
    ) -> Canvas2dResult<Self> {
        Self::from_pixmap(pixmap_ref.to_owned(), repetition)
    }

    /// Set the pattern transform matrix.
    pub fn set_transform(&mut self, transform: DOMMatrix) {
        self.transform = transform.into();
    }

    /// Get the pattern transform matrix.
    pub fn transform(&self) -> DOMMatrix {
        self.transform.into()
    }

    /// Get the pattern width.
    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    /// Get the pattern height.
    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Get the repetition mode.
    pub fn repetition(&self) -> Repetition {
        self.repetition
    }

    /// Build the pixmap backing needed for this pattern and canvas size.
    ///
    /// Repeat mode tiles natively via the shader's spread mode and just
    /// clones the base pixmap. The other modes pre-tile into an extended
    /// pixmap with transparent padding so Pad spreading leaves the
    /// uncovered area transparent.
    pub(crate) fn create_backing_pixmap(
        &self,
        canvas_width: u32,
        canvas_height: u32,
    ) -> Option<Pixmap> {
        match self.repetition {
            Repetition::Repeat => Some(self.pixmap.clone()),
            Repetition::NoRepeat => self.extended_pixmap(canvas_width, canvas_height, 1, 1),
            Repetition::RepeatX => {
                let tiles_x = canvas_width / self.pixmap.width() + 2;
                self.extended_pixmap(canvas_width, canvas_height, tiles_x, 1)
            }
            Repetition::RepeatY => {
                let tiles_y = canvas_height / self.pixmap.height() + 2;
                self.extended_pixmap(canvas_width, canvas_height, 1, tiles_y)
            }
        }
    }

    /// Create a shader for this pattern from a caller-managed pixmap.
    pub(crate) fn create_shader_for_pixmap<'a>(
        &self,
        pixmap_ref: PixmapRef<'a>,
        context_transform: Transform,
        quality: PatternQuality,
        opacity: f32,
    ) -> Shader<'a> {
        let combined_transform = self.transform.post_concat(context_transform);

        let spread_mode = if self.repetition == Repetition::Repeat {
            SpreadMode::Repeat
        } else {
            SpreadMode::Pad
        };

        tiny_skia::Pattern::new(
            pixmap_ref,
            spread_mode,
            quality.into(),
            opacity.clamp(0.0, 1.0),
            combined_transform,
        )
    }

    /// Tile the base pattern `tiles_x` by `tiles_y` times into a pixmap
    /// padded out with transparency to at least the canvas size.
    fn extended_pixmap(
        &self,
        canvas_width: u32,
        canvas_height: u32,
        tiles_x: u32,
        tiles_y: u32,
    ) -> Option<Pixmap> {
        let pattern_width = self.pixmap.width();
        let pattern_height = self.pixmap.height();

        let ext_width =
            (pattern_width * tiles_x).max(pattern_width + canvas_width).min(MAX_PATTERN_SIZE * 2);
        let ext_height = (pattern_height * tiles_y)
            .max(pattern_height + canvas_height)
            .min(MAX_PATTERN_SIZE * 2);

        let mut extended = Pixmap::new(ext_width, ext_height)?;
        // Pixmap starts fully transparent.

        let src_pixels = self.pixmap.pixels();
        for tile_y in 0..tiles_y {
            for tile_x in 0..tiles_x {
                let x_offset = tile_x * pattern_width;
                let y_offset = tile_y * pattern_height;
                if x_offset >= ext_width || y_offset >= ext_height {
                    continue;
                }
                let copy_width = pattern_width.min(ext_width - x_offset) as usize;
                let copy_height = pattern_height.min(ext_height - y_offset);
                for y in 0..copy_height {
                    let src_start = (y * pattern_width) as usize;
                    let dst_start = ((y_offset + y) * ext_width + x_offset) as usize;
                    extended.pixels_mut()[dst_start..dst_start + copy_width]
                        .copy_from_slice(&src_pixels[src_start..src_start + copy_width]);
                }
            }
        }

        Some(extended)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn solid_pattern(width: u32, height: u32) -> CanvasPattern {
        let data = vec![255u8; (width * height * 4) as usize];
        CanvasPattern::new(&data, width, height, Repetition::Repeat).unwrap()
    }

    #[test]
    fn test_repetition_parsing() {
        assert_eq!(Repetition::from_str("repeat").unwrap(), Repetition::Repeat);
        assert_eq!(Repetition::from_str("").unwrap(), Repetition::Repeat);
        assert_eq!(
            Repetition::from_str("repeat-x").unwrap(),
            Repetition::RepeatX
        );
        assert_eq!(
            Repetition::from_str("no-repeat").unwrap(),
            Repetition::NoRepeat
        );
        assert!(Repetition::from_str("mirror").is_err());
    }

    #[test]
    fn test_premultiply_half_alpha() {
        let data = [200u8, 100, 50, 128];
        let pattern = CanvasPattern::new(&data, 1, 1, Repetition::Repeat).unwrap();
        let pixel = pattern.pixmap.pixel(0, 0).unwrap();
        assert_eq!(pixel.alpha(), 128);
        assert_eq!(pixel.red(), ((200u16 * 128 + 127) / 255) as u8);
        assert_eq!(pixel.green(), ((100u16 * 128 + 127) / 255) as u8);
    }

    #[test]
    fn test_zero_dimension_rejected() {
        assert!(CanvasPattern::new(&[], 0, 4, Repetition::Repeat).is_err());
        assert!(CanvasPattern::new(&[], 4, 0, Repetition::Repeat).is_err());
    }

    #[test]
    fn test_data_length_mismatch_rejected() {
        let data = vec![0u8; 15];
        assert!(CanvasPattern::new(&data, 2, 2, Repetition::Repeat).is_err());
    }

    #[test]
    fn test_no_repeat_backing_is_padded() {
        let mut pattern = solid_pattern(4, 4);
        pattern.repetition = Repetition::NoRepeat;
        let backing = pattern.create_backing_pixmap(16, 16).unwrap();
        assert_eq!(backing.width(), 20);
        assert_eq!(backing.height(), 20);
        // Pattern content in the top-left corner, transparency elsewhere.
        assert_eq!(backing.pixel(0, 0).unwrap().alpha(), 255);
        assert_eq!(backing.pixel(10, 10).unwrap().alpha(), 0);
    }

    #[test]
    fn test_repeat_x_backing_tiles_horizontally() {
        let mut pattern = solid_pattern(4, 4);
        pattern.repetition = Repetition::RepeatX;
        let backing = pattern.create_backing_pixmap(16, 16).unwrap();
        // Tiled across the top row of tiles, transparent below.
        assert_eq!(backing.pixel(13, 1).unwrap().alpha(), 255);
        assert_eq!(backing.pixel(1, 13).unwrap().alpha(), 0);
    }
}
