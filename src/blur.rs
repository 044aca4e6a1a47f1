//! Gaussian blur approximated by three successive box blurs per channel.
use crate::{
    buffer::{Color, PixelBuffer},
    error::{Error, Result},
};
use rayon::prelude::*;
use tracy_full::zone;

const PASSES: u32 = 3;

/// Box widths whose successive application approximates a Gaussian of `sigma`.
///
/// The first `m` boxes use the largest odd width not above the ideal width,
/// the rest use that width plus two.
pub fn boxes_for_gauss(sigma: u32, n: u32) -> Result<Vec<u32>> {
    if n == 0 {
        return Err(Error::degenerate("box count must be at least 1"));
    }
    let sigma = sigma as i128;
    let n = n as i128;
    let w_ideal = ((12 * sigma * sigma / n + 1) as f64).sqrt();
    let mut wl = w_ideal.floor() as i128;
    if wl % 2 == 0 {
        wl -= 1;
    }
    let wu = wl + 2;
    let (Ok(narrow), Ok(wide)) = (u32::try_from(wl), u32::try_from(wu)) else {
        return Err(Error::degenerate(format!(
            "box width {wu} for sigma {sigma} does not fit in 32 bits"
        )));
    };

    let m_ideal =
        (12 * sigma * sigma - n * wl * wl - 4 * n * wl - 3 * n) as f64 / (-4 * wl - 4) as f64;
    let m = m_ideal.round_ties_even();

    Ok((0..n)
        .map(|i| if (i as f64) < m { narrow } else { wide })
        .collect())
}

/// One sliding-window pass of radius `r` along a line of `len` samples.
///
/// Samples before the start and past the end repeat the edge value.
fn blur_line<R, W>(len: usize, r: usize, read: R, mut write: W)
where
    R: Fn(usize) -> f32,
    W: FnMut(usize, f32),
{
    let last = len - 1;
    let at = |i: isize| read(i.clamp(0, last as isize) as usize) as f64;
    let window = (2 * r + 1) as f64;
    let r = r as isize;

    // f64 running sum keeps constant lines exact
    let mut sum: f64 = (-r..=r).map(&at).sum();
    write(0, (sum / window) as f32);
    for i in 1..len as isize {
        sum += at(i + r) - at(i - r - 1);
        write(i as usize, (sum / window) as f32);
    }
}

fn blur_rows(source: &[f32], width: usize, r: usize) -> Vec<f32> {
    let mut dest = vec![0.0; source.len()];
    dest.par_chunks_mut(width)
        .zip(source.par_chunks(width))
        .for_each(|(out, line)| {
            blur_line(width, r, |i| line[i], |i, v| out[i] = v);
        });
    dest
}

fn blur_columns(source: &[f32], width: usize, height: usize, r: usize) -> Vec<f32> {
    let columns: Vec<Vec<f32>> = (0..width)
        .into_par_iter()
        .map(|x| {
            let mut column = vec![0.0; height];
            blur_line(height, r, |y| source[x + y * width], |y, v| column[y] = v);
            column
        })
        .collect();
    let mut dest = vec![0.0; source.len()];
    dest.par_chunks_mut(width).enumerate().for_each(|(y, row)| {
        for (x, column) in columns.iter().enumerate() {
            row[x] = column[y];
        }
    });
    dest
}

/// Separable box blur of one channel: every row, then every column.
pub fn box_blur(channel: &[f32], width: usize, height: usize, r: usize) -> Vec<f32> {
    zone!("box_blur");
    let horizontal = blur_rows(channel, width, r);
    blur_columns(&horizontal, width, height, r)
}

fn gauss_channel(channel: Vec<f32>, width: usize, height: usize, boxes: &[u32]) -> Vec<f32> {
    zone!("gauss_channel");
    boxes.iter().fold(channel, |acc, box_width| {
        box_blur(&acc, width, height, ((box_width - 1) / 2) as usize)
    })
}

/// Blurs with a Gaussian of sigma `radius`. Channels are blurred independently and
/// only clamped to `[0, 1]` once all passes are done.
pub fn gaussian_blur(buffer: &PixelBuffer, radius: u32) -> Result<PixelBuffer> {
    zone!("gaussian_blur");
    let boxes = boxes_for_gauss(radius, PASSES)?;
    let (width, height) = (buffer.width() as usize, buffer.height() as usize);

    let split = |f: fn(&Color) -> f32| buffer.pixels().par_iter().map(f).collect::<Vec<f32>>();
    let (alpha, red, green, blue) = (split(|c| c.a), split(|c| c.r), split(|c| c.g), split(|c| c.b));

    let blur = |channel| gauss_channel(channel, width, height, &boxes);
    let ((alpha, red), (green, blue)) = rayon::join(
        || rayon::join(|| blur(alpha), || blur(red)),
        || rayon::join(|| blur(green), || blur(blue)),
    );

    let pixels = (0..buffer.len())
        .into_par_iter()
        .map(|i| Color::new(red[i], green[i], blue[i], alpha[i]).clamped())
        .collect();
    Ok(PixelBuffer::from_raw(buffer.width(), buffer.height(), pixels))
}
