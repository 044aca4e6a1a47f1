use crate::{
    buffer::{PixelBuffer, Point},
    error::{Error, Result},
};
use rayon::prelude::*;
use tracy_full::zone;

/// Blends `overlay` onto a copy of `base` with its bottom-left corner at `at`.
///
/// Every channel, alpha included, becomes `a * src + (1 - a) * dst` where `a`
/// is the overlay alpha. With `solidify`, any overlay alpha above zero is
/// treated as fully opaque. Pixels landing outside `base` are dropped.
pub fn composite(
    base: &PixelBuffer,
    overlay: &PixelBuffer,
    at: Point,
    solidify: bool,
) -> PixelBuffer {
    zone!("composite");
    let mut output = base.clone();
    let width = base.width() as usize;
    output
        .pixels_mut()
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, row)| {
            let overlay_y = y as i64 - at.y as i64;
            if overlay_y < 0 || overlay_y >= overlay.height() as i64 {
                return;
            }
            for overlay_x in 0..overlay.width() {
                let x = at.x as i64 + overlay_x as i64;
                if x < 0 || x >= width as i64 {
                    continue;
                }
                let mut src = overlay.pixel(overlay_x, overlay_y as u32);
                if solidify && src.a > 0.0 {
                    src.a = 1.0;
                }
                let dst = &mut row[x as usize];
                *dst = src.a * src + (1.0 - src.a) * *dst;
            }
        });
    output
}

/// Smallest power of two strictly greater than `n`.
pub fn larger_power_of_two(n: u32) -> Result<u32> {
    n.checked_add(1)
        .and_then(u32::checked_next_power_of_two)
        .ok_or_else(|| Error::degenerate(format!("no power of two above {n} fits in 32 bits")))
}
