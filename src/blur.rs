//! Box blur approximating a Gaussian on a premultiplied RGBA pixel buffer.
//!
//! The blur runs three sequential box-average passes; three iterations of a
//! box filter are close enough to a Gaussian for shadow rendering. Each pass
//! rebuilds a prefix-sum (integral) image per channel from the buffer's
//! current contents, so later passes blur the already-blurred result. That
//! feedback is what produces the Gaussian-like falloff; a single wider-kernel
//! convolution is not equivalent.

/// Number of box-average passes.
const PASSES: usize = 3;

/// Blur a premultiplied RGBA buffer in place.
///
/// `radius` is the canvas-level blur radius; the averaging window uses an
/// effective radius of `radius - 1`, so a radius of 0 or 1 leaves the buffer
/// unchanged. Pixels closer than the effective radius to any edge are not
/// rewritten (only the window sums clamp their lookups), matching the
/// reference drawing model.
pub fn box_blur(data: &mut [u8], width: u32, height: u32, radius: u32) {
    if radius <= 1 {
        return;
    }
    let r = (radius - 1) as usize;
    let width = width as usize;
    let height = height as usize;
    if width == 0 || height == 0 {
        return;
    }
    debug_assert_eq!(data.len(), width * height * 4);

    // Window area is (2r)^2; the window [x-r, x+r] x [y-r, y+r] sampled via
    // four integral lookups spans 2r pixels per axis.
    let scale = 1.0 / ((2 * r) * (2 * r)) as f32;

    // One scratch integral image, rebuilt per channel per pass.
    let mut integral = vec![0u32; width * height];

    for _pass in 0..PASSES {
        for channel in 0..4 {
            build_integral(data, width, height, channel, &mut integral);

            // Skip output pixels within r of any edge.
            if height <= 2 * r || width <= 2 * r {
                continue;
            }
            for y in r..height - r {
                let t = y - r;
                let b = (y + r).min(height - 1);
                for x in r..width - r {
                    let l = x - r;
                    let rr = (x + r).min(width - 1);
                    // Wrapping arithmetic: the prefix sums may overflow u32 on
                    // large buffers, but window differences remain correct as
                    // long as the window sum itself fits.
                    let total = integral[rr + b * width]
                        .wrapping_add(integral[l + t * width])
                        .wrapping_sub(integral[l + b * width])
                        .wrapping_sub(integral[rr + t * width]);
                    data[(y * width + x) * 4 + channel] = (total as f32 * scale) as u8;
                }
            }
        }
    }
}

/// Build the 2D prefix-sum image for one channel of the current buffer.
///
/// `integral[x, y]` holds the sum of the channel over all pixels at or above
/// and to the left of `(x, y)`; out-of-bounds terms are zero.
fn build_integral(data: &[u8], width: usize, height: usize, channel: usize, integral: &mut [u32]) {
    for y in 0..height {
        for x in 0..width {
            let mut total = data[(y * width + x) * 4 + channel] as u32;
            if x > 0 {
                total = total.wrapping_add(integral[y * width + x - 1]);
            }
            if y > 0 {
                total = total.wrapping_add(integral[(y - 1) * width + x]);
            }
            if x > 0 && y > 0 {
                total = total.wrapping_sub(integral[(y - 1) * width + x - 1]);
            }
            integral[y * width + x] = total;
        }
    }
}
