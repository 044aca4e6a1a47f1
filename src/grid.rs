//! Slicing a buffer into a grid of unit-sized rects around an off-center origin,
//! as used for 9-slice style partitioning.
use crate::{
    buffer::{PixelBuffer, Point, Rect},
    error::{Error, Result},
};
use rayon::prelude::*;
use serde::Serialize;
use tracy_full::zone;

/// Grid of entries laid out row-major, row 0 at the bottom.
///
/// Rects are expressed relative to `origin`, the slicing center inside the
/// source buffer, so cells left of or below it have negative coordinates.
/// Adding `remap` to a rect's corner and dividing by the unit size yields its
/// grid coordinate.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SlicingGrid<T> {
    columns: u32,
    rows: u32,
    unit: (u32, u32),
    origin: Point,
    remap: Point,
    entries: Vec<T>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GridCell {
    pub rect: Rect,
    pub buffer: PixelBuffer,
}

impl<T> SlicingGrid<T> {
    pub fn columns(&self) -> u32 {
        self.columns
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn unit(&self) -> (u32, u32) {
        self.unit
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn remap(&self) -> Point {
        self.remap
    }

    pub fn entries(&self) -> &[T] {
        &self.entries
    }

    pub fn get(&self, column: u32, row: u32) -> Option<&T> {
        if column >= self.columns || row >= self.rows {
            return None;
        }
        self.entries
            .get(column as usize + row as usize * self.columns as usize)
    }

    /// Grid coordinate of a rect emitted by this grid.
    pub fn coordinate_of(&self, rect: &Rect) -> (u32, u32) {
        (
            ((rect.x + self.remap.x) / self.unit.0 as i32) as u32,
            ((rect.y + self.remap.y) / self.unit.1 as i32) as u32,
        )
    }

    fn try_map<U, F>(self, f: F) -> Result<SlicingGrid<U>>
    where
        T: Send,
        U: Send,
        F: Fn(T) -> Result<U> + Sync + Send,
    {
        let entries = self
            .entries
            .into_par_iter()
            .map(f)
            .collect::<Result<Vec<U>>>()?;
        Ok(SlicingGrid {
            columns: self.columns,
            rows: self.rows,
            unit: self.unit,
            origin: self.origin,
            remap: self.remap,
            entries,
        })
    }
}

/// Segments `(start, length)` along one axis, from the far negative edge to the
/// far positive edge. Segments grow outward from zero; the outermost one on
/// each side is clipped to what is left of the span.
fn axis_segments(before: u32, after: u32, unit: u32) -> Vec<(i32, u32)> {
    let cells_before = before.div_ceil(unit);
    let cells_after = after.div_ceil(unit);
    let mut segments = Vec::with_capacity((cells_before + cells_after) as usize);
    for k in (1..=cells_before).rev() {
        let far = (k * unit).min(before);
        let near = (k - 1) * unit;
        segments.push((-(far as i32), far - near));
    }
    for k in 0..cells_after {
        let start = k * unit;
        segments.push((start as i32, unit.min(after - start)));
    }
    segments
}

/// Splits a `width x height` texture around an origin displaced from its center.
fn split_span(size: u32, center_offset: i32, axis: &str) -> Result<(u32, u32)> {
    let before = (size / 2) as i64 + center_offset as i64;
    if before < 0 || before > size as i64 {
        return Err(Error::degenerate(format!(
            "{axis} center offset {center_offset} falls outside a span of {size}"
        )));
    }
    Ok((before as u32, size - before as u32))
}

pub fn slice_to_rects(
    width: u32,
    height: u32,
    unit_width: u32,
    unit_height: u32,
    center_offset_x: i32,
    center_offset_y: i32,
) -> Result<SlicingGrid<Rect>> {
    zone!("slice_to_rects");
    if width == 0 || height == 0 || width > i32::MAX as u32 || height > i32::MAX as u32 {
        return Err(Error::degenerate(format!(
            "cannot slice a {width}x{height} texture"
        )));
    }
    if unit_width == 0 || unit_height == 0 {
        return Err(Error::degenerate(format!(
            "unit size {unit_width}x{unit_height} has no area"
        )));
    }
    let (left, right) = split_span(width, center_offset_x, "horizontal")?;
    let (below, above) = split_span(height, center_offset_y, "vertical")?;

    let columns = axis_segments(left, right, unit_width);
    let rows = axis_segments(below, above, unit_height);

    let mut entries = Vec::with_capacity(columns.len() * rows.len());
    for &(y, h) in &rows {
        for &(x, w) in &columns {
            entries.push(Rect::new(x, y, w, h));
        }
    }
    Ok(SlicingGrid {
        columns: columns.len() as u32,
        rows: rows.len() as u32,
        unit: (unit_width, unit_height),
        origin: Point::new(left as i32, below as i32),
        remap: Point::new(
            (left.div_ceil(unit_width) * unit_width) as i32,
            (below.div_ceil(unit_height) * unit_height) as i32,
        ),
        entries,
    })
}

/// Slices `buffer` as [`slice_to_rects`] does and copies out each rect's pixels.
pub fn slice_grid(
    buffer: &PixelBuffer,
    unit_width: u32,
    unit_height: u32,
    center_offset_x: i32,
    center_offset_y: i32,
) -> Result<SlicingGrid<GridCell>> {
    zone!("slice_grid");
    let rects = slice_to_rects(
        buffer.width(),
        buffer.height(),
        unit_width,
        unit_height,
        center_offset_x,
        center_offset_y,
    )?;
    let origin = rects.origin();
    rects.try_map(|rect| {
        Ok(GridCell {
            rect,
            buffer: buffer.crop(rect.translate(origin))?,
        })
    })
}
