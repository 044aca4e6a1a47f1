//! Bicubic resampling: arbitrary-scale shrink/stretch and arbitrary-angle rotation.
//!
//! All sampling goes through [`sample_bicubic`], a 4x4 cubic convolution that
//! clamps neighbour coordinates to the buffer edge.
use crate::{
    buffer::{Color, PixelBuffer, Rect},
    error::{Error, Result},
};
use rayon::prelude::*;
use tracy_full::zone;

/// Slack subtracted before rounding a rotated extent up, so that
/// `sin`/`cos` noise at right angles does not add a pixel.
const EXTENT_EPSILON: f64 = 1e-9;

/// Cubic convolution weight with support radius 2.
pub fn cubic_weight(x: f64) -> f64 {
    let x = x.abs();
    if x <= 1.0 {
        (1.5 * x - 2.5) * x * x + 1.0
    } else if x < 2.0 {
        ((-0.5 * x + 2.5) * x - 4.0) * x + 2.0
    } else {
        0.0
    }
}

/// Samples `buffer` at a fractional position given in pixel-edge units
/// (pixel `i` spans `[i, i + 1)`).
pub fn sample_bicubic(buffer: &PixelBuffer, px: f64, py: f64) -> Color {
    let max_x = buffer.width() as i64 - 1;
    let max_y = buffer.height() as i64 - 1;

    let ox = px - 0.5;
    let ix = ox.floor();
    let fx = ox - ix;
    let oy = py - 0.5;
    let iy = oy.floor();
    let fy = oy - iy;
    let (ix, iy) = (ix as i64, iy as i64);

    let mut color = Color::TRANSPARENT;
    for n in -1..3_i64 {
        let ky = cubic_weight(fy - n as f64);
        if ky == 0.0 {
            continue;
        }
        let sy = (iy + n).clamp(0, max_y) as u32;
        for m in -1..3_i64 {
            let k = ky * cubic_weight(m as f64 - fx);
            if k == 0.0 {
                continue;
            }
            let sx = (ix + m).clamp(0, max_x) as u32;
            color += buffer.pixel(sx, sy) * k as f32;
        }
    }
    color
}

/// Resamples to `floor(width * |scale_x|) x floor(height * |scale_y|)`.
///
/// No pre-filtering is done, so large reductions alias; blur first when that matters.
pub fn shrink(buffer: &PixelBuffer, scale_x: f32, scale_y: f32) -> Result<PixelBuffer> {
    zone!("shrink");
    let (scale_x, scale_y) = (scale_x.abs(), scale_y.abs());
    if !scale_x.is_normal() || !scale_y.is_normal() {
        return Err(Error::degenerate(format!(
            "scale factors must be finite and non-zero, got {scale_x}x{scale_y}"
        )));
    }
    let new_width = (buffer.width() as f32 * scale_x).floor();
    let new_height = (buffer.height() as f32 * scale_y).floor();
    if new_width < 1.0 || new_height < 1.0 || new_width > u32::MAX as f32 || new_height > u32::MAX as f32 {
        return Err(Error::degenerate(format!(
            "scaling {}x{} by {scale_x}x{scale_y} gives {new_width}x{new_height}",
            buffer.width(),
            buffer.height()
        )));
    }
    let (new_width, new_height) = (new_width as u32, new_height as u32);
    let inv_x = 1.0 / scale_x as f64;
    let inv_y = 1.0 / scale_y as f64;

    let pixels = (0..new_width as usize * new_height as usize)
        .into_par_iter()
        .map(|i| {
            let x = (i % new_width as usize) as f64;
            let y = (i / new_width as usize) as f64;
            sample_bicubic(buffer, x * inv_x, y * inv_y)
        })
        .collect();
    Ok(PixelBuffer::from_raw(new_width, new_height, pixels))
}

/// Cuts `region` out of `buffer` (a sprite inside its sheet) and resamples it.
pub fn shrink_region(
    buffer: &PixelBuffer,
    region: Rect,
    scale_x: f32,
    scale_y: f32,
) -> Result<PixelBuffer> {
    zone!("shrink_region");
    shrink(&buffer.crop(region)?, scale_x, scale_y)
}

/// Rotation about the buffer center, mapping between source and destination frames.
struct Rotation {
    sin: f64,
    cos: f64,
    src_center: (f64, f64),
    dst_center: (f64, f64),
}

impl Rotation {
    fn forward(&self, x: f64, y: f64) -> (f64, f64) {
        let (dx, dy) = (x - self.src_center.0, y - self.src_center.1);
        (
            dx * self.cos - dy * self.sin + self.dst_center.0,
            dx * self.sin + dy * self.cos + self.dst_center.1,
        )
    }

    fn inverse(&self, x: f64, y: f64) -> (f64, f64) {
        let (dx, dy) = (x - self.dst_center.0, y - self.dst_center.1);
        (
            dx * self.cos + dy * self.sin + self.src_center.0,
            -dx * self.sin + dy * self.cos + self.src_center.1,
        )
    }
}

/// Rotates counter-clockwise (bottom-left origin) by `angle_degrees`.
///
/// The output is sized to the rotated bounding box; pixels not covered by
/// the source stay transparent black.
pub fn rotate(buffer: &PixelBuffer, angle_degrees: f32) -> Result<PixelBuffer> {
    zone!("rotate");
    if !angle_degrees.is_finite() {
        return Err(Error::degenerate(format!(
            "rotation angle must be finite, got {angle_degrees}"
        )));
    }
    let (sin, cos) = (angle_degrees as f64).to_radians().sin_cos();
    let (width, height) = (buffer.width() as f64, buffer.height() as f64);
    let src_center = (width / 2.0, height / 2.0);

    let (mut min_x, mut max_x, mut min_y, mut max_y) = (f64::MAX, f64::MIN, f64::MAX, f64::MIN);
    for (cx, cy) in [(0.0, 0.0), (width, 0.0), (0.0, height), (width, height)] {
        let (dx, dy) = (cx - src_center.0, cy - src_center.1);
        let rx = dx * cos - dy * sin;
        let ry = dx * sin + dy * cos;
        min_x = min_x.min(rx);
        max_x = max_x.max(rx);
        min_y = min_y.min(ry);
        max_y = max_y.max(ry);
    }
    let new_width = ((max_x - min_x - EXTENT_EPSILON).ceil() as u32).max(1);
    let new_height = ((max_y - min_y - EXTENT_EPSILON).ceil() as u32).max(1);

    let rotation = Rotation {
        sin,
        cos,
        src_center,
        dst_center: (new_width as f64 / 2.0, new_height as f64 / 2.0),
    };
    let dst_len = new_width as usize * new_height as usize;

    let covered = {
        zone!("rotate_forward_map");
        let hits: Vec<usize> = (0..buffer.len())
            .into_par_iter()
            .filter_map(|i| {
                let x = (i % buffer.width() as usize) as f64 + 0.5;
                let y = (i / buffer.width() as usize) as f64 + 0.5;
                let (dx, dy) = rotation.forward(x, y);
                let (dx, dy) = (dx.floor(), dy.floor());
                if dx < 0.0 || dy < 0.0 || dx >= new_width as f64 || dy >= new_height as f64 {
                    return None;
                }
                Some(dx as usize + dy as usize * new_width as usize)
            })
            .collect();
        let mut covered = vec![false; dst_len];
        for index in hits {
            covered[index] = true;
        }
        covered
    };

    let sample_at = |i: usize| {
        let x = (i % new_width as usize) as f64 + 0.5;
        let y = (i / new_width as usize) as f64 + 0.5;
        rotation.inverse(x, y)
    };

    let mut output = PixelBuffer::blank_with(new_width, new_height, Color::TRANSPARENT);
    {
        zone!("rotate_forward_fill");
        output
            .pixels_mut()
            .par_iter_mut()
            .enumerate()
            .filter(|(i, _)| covered[*i])
            .for_each(|(i, px)| {
                let (sx, sy) = sample_at(i);
                *px = sample_bicubic(buffer, sx, sy);
            });
    }
    {
        zone!("rotate_inverse_fill");
        output
            .pixels_mut()
            .par_iter_mut()
            .enumerate()
            .filter(|(i, _)| !covered[*i])
            .for_each(|(i, px)| {
                let (sx, sy) = sample_at(i);
                if sx >= 0.0 && sy >= 0.0 && sx < width && sy < height {
                    *px = sample_bicubic(buffer, sx, sy);
                }
            });
    }
    Ok(output)
}
