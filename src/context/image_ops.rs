//! Image drawing, pixel data, and PNG output operations for Canvas2dContext.

use super::Canvas2dContext;
use crate::error::{Canvas2dError, Canvas2dResult};
use crate::geometry::{CanvasImageDataRef, DirtyRect, ImageCropParams, SourceRect};
use tiny_skia::{Pixmap, PixmapRef, Transform};

impl Canvas2dContext {
    // --- Internal image drawing ---

    /// Draw a premultiplied-alpha pixmap at (dx, dy).
    fn draw_pixmap_at(&mut self, pixmap: PixmapRef, dx: f32, dy: f32) {
        log::debug!(target: "canvas", "drawImage {}x{} at {} {}", pixmap.width(), pixmap.height(), dx, dy);
        let paint = tiny_skia::PixmapPaint {
            opacity: self.state.global_alpha,
            blend_mode: self.state.global_composite_operation,
            quality: self.state.pattern_quality.into(),
        };

        let transform = self.state.transform.pre_translate(dx, dy);

        let clip_mask = self.create_clip_mask();
        self.pixmap
            .draw_pixmap(0, 0, pixmap, &paint, transform, clip_mask.as_ref());
    }

    /// Draw a premultiplied-alpha pixmap scaled into a destination rect.
    ///
    /// Equal source and destination sizes yield unit scale factors, so the
    /// transform reduces to a plain translation.
    fn draw_pixmap_scaled(&mut self, pixmap: PixmapRef, dx: f32, dy: f32, dw: f32, dh: f32) {
        let paint = tiny_skia::PixmapPaint {
            opacity: self.state.global_alpha,
            blend_mode: self.state.global_composite_operation,
            quality: self.state.pattern_quality.into(),
        };

        let scale_x = dw / pixmap.width() as f32;
        let scale_y = dh / pixmap.height() as f32;

        let transform = self
            .state
            .transform
            .pre_translate(dx, dy)
            .pre_scale(scale_x, scale_y);

        let clip_mask = self.create_clip_mask();
        self.pixmap
            .draw_pixmap(0, 0, pixmap, &paint, transform, clip_mask.as_ref());
    }

    /// Draw a cropped region of a premultiplied-alpha pixmap.
    ///
    /// Extracting the source region requires an offscreen sub-surface;
    /// failing to allocate one is a reported capability error rather than
    /// a silent skip.
    fn draw_pixmap_cropped(
        &mut self,
        pixmap: PixmapRef,
        params: &ImageCropParams,
    ) -> Canvas2dResult<()> {
        let ImageCropParams {
            sx,
            sy,
            sw,
            sh,
            dx,
            dy,
            dw,
            dh,
        } = *params;

        // Clamp source rectangle to image bounds
        let sx = sx.max(0.0);
        let sy = sy.max(0.0);
        let sw = sw.min(pixmap.width() as f32 - sx);
        let sh = sh.min(pixmap.height() as f32 - sy);

        if sw <= 0.0 || sh <= 0.0 || dw <= 0.0 || dh <= 0.0 {
            return Ok(());
        }

        let sub_width = sw.ceil() as u32;
        let sub_height = sh.ceil() as u32;

        let mut sub_pixmap = Pixmap::new(sub_width, sub_height).ok_or_else(|| {
            Canvas2dError::BackendCapability(format!(
                "cannot extract {}x{} sub-surface",
                sub_width, sub_height
            ))
        })?;

        // Draw the source image offset to extract the region
        let src_x = sx.floor() as i32;
        let src_y = sy.floor() as i32;
        let extract_paint = tiny_skia::PixmapPaint::default();
        let extract_transform = Transform::from_translate(-src_x as f32, -src_y as f32);
        sub_pixmap.draw_pixmap(0, 0, pixmap, &extract_paint, extract_transform, None);

        self.draw_pixmap_scaled(sub_pixmap.as_ref(), dx, dy, dw, dh);
        Ok(())
    }

    /// Convert non-premultiplied image data into a premultiplied pixmap.
    fn premultiply_image(image: &CanvasImageDataRef<'_>) -> Canvas2dResult<Pixmap> {
        let expected = image.width as usize * image.height as usize * 4;
        if image.data.len() != expected {
            return Err(Canvas2dError::InvalidArgument(format!(
                "Image data length {} does not match {}x{}",
                image.data.len(),
                image.width,
                image.height
            )));
        }
        let mut pixmap = Pixmap::new(image.width, image.height).ok_or_else(|| {
            Canvas2dError::InvalidArgument("Image dimensions must be non-zero".to_string())
        })?;
        for (i, pixel) in pixmap.pixels_mut().iter_mut().enumerate() {
            let offset = i * 4;
            let a = image.data[offset + 3];
            let premultiply = |c: u8| -> u8 {
                if a == 255 {
                    c
                } else if a == 0 {
                    0
                } else {
                    ((c as u16 * a as u16 + 127) / 255) as u8
                }
            };
            *pixel = tiny_skia::PremultipliedColorU8::from_rgba(
                premultiply(image.data[offset]),
                premultiply(image.data[offset + 1]),
                premultiply(image.data[offset + 2]),
                a,
            )
            .unwrap_or(tiny_skia::PremultipliedColorU8::TRANSPARENT);
        }
        Ok(pixmap)
    }

    // --- Public draw image/canvas methods ---

    /// Draw image data at the specified position.
    pub fn draw_image_data(
        &mut self,
        image: &CanvasImageDataRef<'_>,
        dx: f32,
        dy: f32,
    ) -> Canvas2dResult<()> {
        let pixmap = Self::premultiply_image(image)?;
        self.draw_pixmap_at(pixmap.as_ref(), dx, dy);
        Ok(())
    }

    /// Draw image data scaled to the specified dimensions.
    pub fn draw_image_data_scaled(
        &mut self,
        image: &CanvasImageDataRef<'_>,
        dx: f32,
        dy: f32,
        dw: f32,
        dh: f32,
    ) -> Canvas2dResult<()> {
        let pixmap = Self::premultiply_image(image)?;
        self.draw_pixmap_scaled(pixmap.as_ref(), dx, dy, dw, dh);
        Ok(())
    }

    /// Draw a cropped region of image data to a destination rectangle.
    pub fn draw_image_data_cropped(
        &mut self,
        image: &CanvasImageDataRef<'_>,
        params: &ImageCropParams,
    ) -> Canvas2dResult<()> {
        let pixmap = Self::premultiply_image(image)?;
        self.draw_pixmap_cropped(pixmap.as_ref(), params)
    }

    /// Draw another canvas at the specified position.
    pub fn draw_canvas(&mut self, source: &Canvas2dContext, dx: f32, dy: f32) {
        // Already premultiplied; no conversion needed.
        self.draw_pixmap_at(source.pixmap.as_ref(), dx, dy);
    }

    /// Draw another canvas scaled to the specified dimensions.
    pub fn draw_canvas_scaled(
        &mut self,
        source: &Canvas2dContext,
        dx: f32,
        dy: f32,
        dw: f32,
        dh: f32,
    ) {
        self.draw_pixmap_scaled(source.pixmap.as_ref(), dx, dy, dw, dh);
    }

    /// Draw a cropped region of another canvas to a destination rectangle.
    pub fn draw_canvas_cropped(
        &mut self,
        source: &Canvas2dContext,
        params: &ImageCropParams,
    ) -> Canvas2dResult<()> {
        self.draw_pixmap_cropped(source.pixmap.as_ref(), params)
    }

    // --- Image data ---

    /// Create a new ImageData buffer filled with transparent black, in
    /// non-premultiplied RGBA with 4 bytes per pixel.
    pub fn create_image_data(&self, width: u32, height: u32) -> Vec<u8> {
        vec![0u8; width as usize * height as usize * 4]
    }

    /// Get image data for a region of the canvas, unpremultiplied.
    pub fn get_image_data(&self, x: i32, y: i32, width: u32, height: u32) -> Vec<u8> {
        let mut data = vec![0u8; width as usize * height as usize * 4];

        for dy in 0..height {
            for dx in 0..width {
                let src_x = x + dx as i32;
                let src_y = y + dy as i32;

                let dst_idx = ((dy * width + dx) * 4) as usize;

                if src_x >= 0
                    && src_x < self.width as i32
                    && src_y >= 0
                    && src_y < self.height as i32
                {
                    let src_idx = (src_y as u32 * self.width + src_x as u32) as usize * 4;
                    let pixel = &self.pixmap.data()[src_idx..src_idx + 4];

                    // Convert from premultiplied alpha to straight alpha
                    let a = pixel[3];
                    if a == 0 {
                        data[dst_idx..dst_idx + 4].copy_from_slice(&[0, 0, 0, 0]);
                    } else if a == 255 {
                        data[dst_idx..dst_idx + 4].copy_from_slice(pixel);
                    } else {
                        let alpha_f = a as f32 / 255.0;
                        data[dst_idx] = (pixel[0] as f32 / alpha_f).min(255.0) as u8;
                        data[dst_idx + 1] = (pixel[1] as f32 / alpha_f).min(255.0) as u8;
                        data[dst_idx + 2] = (pixel[2] as f32 / alpha_f).min(255.0) as u8;
                        data[dst_idx + 3] = a;
                    }
                }
            }
        }

        data
    }

    /// Write image data to the canvas at the specified position.
    ///
    /// The data must be non-premultiplied RGBA. Writing bypasses
    /// compositing: pixels are premultiplied and stored directly. Returns
    /// the destination rectangle that changed, or `None` when nothing did.
    pub fn put_image_data(
        &mut self,
        image: &CanvasImageDataRef<'_>,
        dx: i32,
        dy: i32,
    ) -> Option<DirtyRect> {
        self.put_image_data_rect(
            image,
            dx,
            dy,
            &SourceRect {
                sx: 0,
                sy: 0,
                sw: image.width as i32,
                sh: image.height as i32,
            },
        )
    }

    /// Write a sub-rectangle of image data to the canvas.
    ///
    /// Negative source offsets trim the copied region and shift the
    /// destination by the same amount; a region fully outside the source
    /// bounds writes nothing. Destination pixels outside the canvas are
    /// skipped.
    pub fn put_image_data_rect(
        &mut self,
        image: &CanvasImageDataRef<'_>,
        dx: i32,
        dy: i32,
        src: &SourceRect,
    ) -> Option<DirtyRect> {
        let width = image.width as i32;
        let height = image.height as i32;

        let mut sx = src.sx;
        let mut sy = src.sy;
        let mut sw = src.sw;
        let mut sh = src.sh;

        // Absorb a negative offset into the extent first; the bounds clamp
        // below then handles any oversized remainder.
        if sx < 0 {
            sw += sx;
            sx = 0;
        }
        if sy < 0 {
            sh += sy;
            sy = 0;
        }
        if sx + sw > width {
            sw = width - sx;
        }
        if sy + sh > height {
            sh = height - sy;
        }
        if sw <= 0 || sh <= 0 || sx >= width || sy >= height {
            return None;
        }

        // The destination follows the source offset.
        let dest_x = dx + sx;
        let dest_y = dy + sy;

        let canvas_width = self.width as i32;
        let canvas_height = self.height as i32;
        let pixmap_data = self.pixmap.data_mut();

        let mut wrote = false;
        for row in 0..sh {
            let src_row = sy + row;
            let dst_row = dest_y + row;
            if dst_row < 0 || dst_row >= canvas_height {
                continue;
            }

            for col in 0..sw {
                let src_col = sx + col;
                let dst_col = dest_x + col;
                if dst_col < 0 || dst_col >= canvas_width {
                    continue;
                }

                let src_idx = ((src_row * width + src_col) * 4) as usize;
                let dst_idx = ((dst_row * canvas_width + dst_col) * 4) as usize;

                let r = image.data[src_idx];
                let g = image.data[src_idx + 1];
                let b = image.data[src_idx + 2];
                let a = image.data[src_idx + 3];

                // Premultiply with integer rounding: (c * a + 127) / 255
                let (pr, pg, pb) = if a == 255 {
                    (r, g, b)
                } else if a == 0 {
                    (0, 0, 0)
                } else {
                    let a16 = a as u16;
                    (
                        ((r as u16 * a16 + 127) / 255) as u8,
                        ((g as u16 * a16 + 127) / 255) as u8,
                        ((b as u16 * a16 + 127) / 255) as u8,
                    )
                };

                pixmap_data[dst_idx] = pr;
                pixmap_data[dst_idx + 1] = pg;
                pixmap_data[dst_idx + 2] = pb;
                pixmap_data[dst_idx + 3] = a;
                wrote = true;
            }
        }

        wrote.then_some(DirtyRect {
            x: dest_x,
            y: dest_y,
            width: sw,
            height: sh,
        })
    }

    /// Export the canvas as PNG data.
    ///
    /// `ppi` sets the pixel density metadata and defaults to 72.
    pub fn to_png(&self, ppi: Option<f32>) -> Canvas2dResult<Vec<u8>> {
        let ppi = ppi.unwrap_or(72.0);

        let mut buf = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut buf, self.width, self.height);
            encoder.set_color(png::ColorType::Rgba);
            encoder.set_depth(png::BitDepth::Eight);

            // Pixel density metadata uses pixels per meter
            let ppm = (ppi.max(0.0) / 0.0254).round() as u32;
            encoder.set_pixel_dims(Some(png::PixelDimensions {
                xppu: ppm,
                yppu: ppm,
                unit: png::Unit::Meter,
            }));

            let mut writer = encoder.write_header()?;
            let data = self.get_image_data(0, 0, self.width, self.height);
            writer.write_image_data(&data)?;
        }
        Ok(buf)
    }
}
