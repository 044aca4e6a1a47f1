use crate::error::{Error, Result};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Mul};

/// Straight (non-premultiplied) RGBA color with float channels, nominally in `[0, 1]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const TRANSPARENT: Color = Color::new(0.0, 0.0, 0.0, 0.0);
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Same value in all four channels.
    pub const fn splat(value: f32) -> Self {
        Self::new(value, value, value, value)
    }

    pub fn into_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    fn map(self, f: impl Fn(f32) -> f32) -> Self {
        Self::new(f(self.r), f(self.g), f(self.b), f(self.a))
    }

    pub fn clamped(self) -> Self {
        self.map(|c| c.clamp(0.0, 1.0))
    }

    #[cfg(feature = "image")]
    fn from_rgba8(rgba: [u8; 4]) -> Self {
        Self::new(
            rgba[0] as f32 / 255.0,
            rgba[1] as f32 / 255.0,
            rgba[2] as f32 / 255.0,
            rgba[3] as f32 / 255.0,
        )
    }

    #[cfg(feature = "image")]
    fn into_rgba8(self) -> [u8; 4] {
        let c = self.clamped();
        [
            (c.r * 255.0).round() as u8,
            (c.g * 255.0).round() as u8,
            (c.b * 255.0).round() as u8,
            (c.a * 255.0).round() as u8,
        ]
    }
}

impl Add for Color {
    type Output = Color;

    fn add(self, other: Color) -> Color {
        Color::new(
            self.r + other.r,
            self.g + other.g,
            self.b + other.b,
            self.a + other.a,
        )
    }
}

impl AddAssign for Color {
    fn add_assign(&mut self, other: Color) {
        *self = *self + other;
    }
}

impl Mul<f32> for Color {
    type Output = Color;

    fn mul(self, scalar: f32) -> Color {
        self.map(|c| c * scalar)
    }
}

impl Mul<Color> for f32 {
    type Output = Color;

    fn mul(self, color: Color) -> Color {
        color * self
    }
}

/// Integer position, used for cell origins and grid offsets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle. `x`/`y` may be negative when the rect is expressed
/// relative to a slicing origin rather than to a buffer corner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Exclusive right edge.
    pub fn right(&self) -> i64 {
        self.x as i64 + self.width as i64
    }

    /// Exclusive top edge.
    pub fn top(&self) -> i64 {
        self.y as i64 + self.height as i64
    }

    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    pub fn translate(&self, by: Point) -> Rect {
        Rect::new(self.x + by.x, self.y + by.y, self.width, self.height)
    }

    pub fn overlaps(&self, other: &Rect) -> bool {
        (self.x as i64) < other.right()
            && (other.x as i64) < self.right()
            && (self.y as i64) < other.top()
            && (other.y as i64) < self.top()
    }
}

/// A sub-image cut out of (or destined for) an atlas.
#[derive(Clone, Debug, PartialEq)]
pub struct Cell {
    pub buffer: PixelBuffer,
    /// Bottom-left pixel of the cell inside its atlas.
    pub position: Point,
}

/// Row-major RGBA float image. Index `x + y * width`, origin at the bottom-left.
///
/// Width and height are always non-zero and the pixel count always matches;
/// every constructor checks this.
#[derive(Clone, Debug, PartialEq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

impl PixelBuffer {
    /// Transparent black buffer.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        Self::filled(width, height, Color::TRANSPARENT)
    }

    pub fn filled(width: u32, height: u32, color: Color) -> Result<Self> {
        check_dimensions(width, height)?;
        Ok(Self::blank_with(width, height, color))
    }

    pub fn from_pixels(width: u32, height: u32, pixels: Vec<Color>) -> Result<Self> {
        check_dimensions(width, height)?;
        if pixels.len() != width as usize * height as usize {
            return Err(Error::SizeMismatch {
                width,
                height,
                len: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Builds a buffer by evaluating `f(x, y)` for every pixel in parallel.
    pub fn from_fn<F>(width: u32, height: u32, f: F) -> Result<Self>
    where
        F: Fn(u32, u32) -> Color + Sync,
    {
        check_dimensions(width, height)?;
        let pixels = (0..width as usize * height as usize)
            .into_par_iter()
            .map(|i| f((i % width as usize) as u32, (i / width as usize) as u32))
            .collect();
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Only for callers that have already validated the dimensions.
    pub(crate) fn blank_with(width: u32, height: u32, color: Color) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; width as usize * height as usize],
        }
    }

    pub(crate) fn from_raw(width: u32, height: u32, pixels: Vec<Color>) -> Self {
        debug_assert_eq!(pixels.len(), width as usize * height as usize);
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    /// Never true for a buffer built through the public constructors.
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    pub(crate) fn pixels_mut(&mut self) -> &mut [Color] {
        &mut self.pixels
    }

    pub fn index(&self, x: u32, y: u32) -> usize {
        x as usize + y as usize * self.width as usize
    }

    /// Panics when out of bounds, like slice indexing.
    pub fn pixel(&self, x: u32, y: u32) -> Color {
        self.pixels[self.index(x, y)]
    }

    pub fn get_pixel(&self, x: i64, y: i64) -> Option<Color> {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return None;
        }
        Some(self.pixel(x as u32, y as u32))
    }

    /// True when no pixel has alpha above `threshold`.
    pub fn is_blank(&self, threshold: f32) -> bool {
        self.pixels.par_iter().all(|px| px.a <= threshold)
    }

    /// Applies `f` to every pixel independently, producing a new buffer.
    pub fn map_pixels<F>(&self, f: F) -> PixelBuffer
    where
        F: Fn(Color) -> Color + Sync + Send,
    {
        PixelBuffer::from_raw(
            self.width,
            self.height,
            self.pixels.par_iter().map(|px| f(*px)).collect(),
        )
    }

    /// Copies out a sub-rectangle, which must lie fully inside the buffer.
    pub fn crop(&self, rect: Rect) -> Result<PixelBuffer> {
        if rect.width == 0 || rect.height == 0 {
            return Err(Error::degenerate(format!(
                "crop rect {rect:?} has no area"
            )));
        }
        if rect.x < 0
            || rect.y < 0
            || rect.right() > self.width as i64
            || rect.top() > self.height as i64
        {
            return Err(Error::degenerate(format!(
                "crop rect {rect:?} exceeds {}x{} buffer",
                self.width, self.height
            )));
        }
        let (x0, y0) = (rect.x as usize, rect.y as usize);
        let width = self.width as usize;
        let mut pixels = Vec::with_capacity(rect.area() as usize);
        for y in y0..y0 + rect.height as usize {
            let start = x0 + y * width;
            pixels.extend_from_slice(&self.pixels[start..start + rect.width as usize]);
        }
        Ok(PixelBuffer::from_raw(rect.width, rect.height, pixels))
    }
}

fn check_dimensions(width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(Error::degenerate(format!(
            "buffer dimensions {width}x{height} have no area"
        )));
    }
    Ok(())
}

#[cfg(feature = "image")]
impl PixelBuffer {
    /// Converts an 8-bit image (top-left origin) into a float buffer (bottom-left origin).
    pub fn from_rgba_image(image: &image::RgbaImage) -> Result<Self> {
        let (width, height) = image.dimensions();
        Self::from_fn(width, height, |x, y| {
            Color::from_rgba8(image.get_pixel(x, height - 1 - y).0)
        })
    }

    /// Converts back to an 8-bit image, clamping and rounding each channel.
    pub fn to_rgba_image(&self) -> image::RgbaImage {
        let height = self.height;
        image::RgbaImage::from_fn(self.width, self.height, |x, y| {
            image::Rgba(self.pixel(x, height - 1 - y).into_rgba8())
        })
    }
}
