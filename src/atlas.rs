//! Cutting fixed-size cells out of an atlas, and packing cells back into one.
use crate::{
    buffer::{Cell, Color, PixelBuffer, Point, Rect},
    error::{Error, Result},
};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracy_full::zone;

/// Margin before the first cell and gap between neighbouring cells, in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellLayout {
    pub offset: (u32, u32),
    pub padding: (u32, u32),
}

impl CellLayout {
    pub const fn new(offset: (u32, u32), padding: (u32, u32)) -> Self {
        Self { offset, padding }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExtractOptions {
    pub layout: CellLayout,
    /// Cells whose every pixel has alpha at or below this are dropped.
    pub empty_alpha: f32,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            layout: CellLayout::default(),
            empty_alpha: 0.01,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackOptions {
    pub layout: CellLayout,
    pub min_bin: u32,
    pub max_bin: u32,
}

impl Default for PackOptions {
    fn default() -> Self {
        Self {
            layout: CellLayout::default(),
            min_bin: 1024,
            max_bin: 2048,
        }
    }
}

/// How many cells of `cell` pixels fit along `size` pixels after `offset`,
/// with `padding` between cells. The last cell needs no trailing padding.
pub fn real_count(size: u32, cell: u32, offset: u32, padding: u32) -> u32 {
    if cell == 0 || size <= offset {
        return 0;
    }
    let span = (size - offset) as u64;
    let stride = cell as u64 + padding as u64;
    let count = span / stride;
    let count = if span - count * stride >= cell as u64 {
        count + 1
    } else {
        count
    };
    // never more cells than pixels in the span
    count as u32
}

/// Splits `atlas` into `cell_width x cell_height` cells, row by row from the top,
/// dropping cells that are fully transparent.
pub fn extract_cells(
    atlas: &PixelBuffer,
    cell_width: u32,
    cell_height: u32,
    options: &ExtractOptions,
) -> Result<Vec<Cell>> {
    zone!("extract_cells");
    if cell_width == 0 || cell_height == 0 {
        return Err(Error::degenerate(format!(
            "cell size {cell_width}x{cell_height} has no area"
        )));
    }
    let CellLayout { offset, padding } = options.layout;
    let columns = real_count(atlas.width(), cell_width, offset.0, padding.0);
    let rows = real_count(atlas.height(), cell_height, offset.1, padding.1);

    let cells = (0..columns as usize * rows as usize)
        .into_par_iter()
        .map(|i| {
            zone!("extract_cell");
            let column = (i % columns as usize) as u32;
            let row = (i / columns as usize) as u32;
            let x = offset.0 as u64 + column as u64 * (cell_width as u64 + padding.0 as u64);
            let top = offset.1 as u64 + row as u64 * (cell_height as u64 + padding.1 as u64);
            let y = atlas.height() as u64 - top - cell_height as u64;
            let rect = Rect::new(x as i32, y as i32, cell_width, cell_height);
            let buffer = atlas.crop(rect)?;
            if buffer.is_blank(options.empty_alpha) {
                return Ok(None);
            }
            Ok(Some(Cell {
                buffer,
                position: Point::new(rect.x, rect.y),
            }))
        })
        .collect::<Result<Vec<Option<Cell>>>>()?;
    Ok(cells.into_iter().flatten().collect())
}

/// An atlas together with where each input cell landed, in input order.
#[derive(Clone, Debug, PartialEq)]
pub struct PackedAtlas {
    pub atlas: PixelBuffer,
    pub placements: Vec<Rect>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtlasManifest {
    pub width: u32,
    pub height: u32,
    pub cells: Vec<Rect>,
}

impl PackedAtlas {
    pub fn manifest(&self) -> AtlasManifest {
        AtlasManifest {
            width: self.atlas.width(),
            height: self.atlas.height(),
            cells: self.placements.clone(),
        }
    }

    #[cfg(feature = "json")]
    pub fn manifest_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.manifest())?)
    }
}

/// Chooses the bin for `count` cells of the average cell size.
fn choose_bin(count: usize, cell: (u32, u32), options: &PackOptions) -> Result<(u32, u32)> {
    let CellLayout { offset, padding } = options.layout;
    let capacity = |size: u32| {
        real_count(size, cell.0, offset.0, padding.0) as usize
            * real_count(size, cell.1, offset.1, padding.1) as usize
    };
    let max_capacity = capacity(options.max_bin);
    if count > max_capacity {
        return Err(Error::CapacityExceeded {
            cells: count,
            capacity: max_capacity,
            bin: options.max_bin,
        });
    }
    if count <= capacity(options.min_bin) {
        return Ok((options.min_bin, options.min_bin));
    }
    let columns = real_count(options.max_bin, cell.0, offset.0, padding.0) as usize;
    let rows = count.div_ceil(columns) as u64;
    let used_height =
        offset.1 as u64 + rows * cell.1 as u64 + (rows - 1) * padding.1 as u64;
    let height = if used_height <= options.min_bin as u64 {
        options.min_bin
    } else {
        options.max_bin
    };
    Ok((options.max_bin, height))
}

/// Packs `cells` left to right, top row first, into the smaller bin that fits them.
///
/// Slots are sized by the average cell size; pixels falling outside the bin are dropped.
pub fn pack_cells(cells: Vec<PixelBuffer>, options: &PackOptions) -> Result<PackedAtlas> {
    zone!("pack_cells");
    if cells.is_empty() {
        return Err(Error::degenerate("no cells to pack"));
    }
    if options.min_bin == 0
        || options.min_bin > options.max_bin
        || options.max_bin > i32::MAX as u32
    {
        return Err(Error::degenerate(format!(
            "bin sizes {}..{} are not a valid range",
            options.min_bin, options.max_bin
        )));
    }
    let count = cells.len();
    let total_width: u64 = cells.iter().map(|cell| cell.width() as u64).sum();
    let total_height: u64 = cells.iter().map(|cell| cell.height() as u64).sum();
    let cell_width = (total_width / count as u64) as u32;
    let cell_height = (total_height / count as u64) as u32;

    let (width, height) = choose_bin(count, (cell_width, cell_height), options)?;
    let CellLayout { offset, padding } = options.layout;

    let placements = {
        zone!("place_cells");
        let mut placements = Vec::with_capacity(count);
        let mut x = offset.0 as i64;
        let mut y = height as i64 - offset.1 as i64 - cell_height as i64;
        for cell in &cells {
            if width as i64 - x < cell_width as i64 {
                x = offset.0 as i64;
                y -= cell_height as i64 + padding.1 as i64;
            }
            placements.push(Rect::new(x as i32, y as i32, cell.width(), cell.height()));
            x += cell_width as i64 + padding.0 as i64;
        }
        placements
    };

    let mut atlas = PixelBuffer::blank_with(width, height, Color::TRANSPARENT);
    {
        zone!("blit_cells");
        atlas
            .pixels_mut()
            .par_chunks_mut(width as usize)
            .enumerate()
            .for_each(|(atlas_y, row)| {
                for (cell, rect) in cells.iter().zip(&placements) {
                    let cell_y = atlas_y as i64 - rect.y as i64;
                    if cell_y < 0 || cell_y >= cell.height() as i64 {
                        continue;
                    }
                    for cell_x in 0..cell.width() {
                        let atlas_x = rect.x as i64 + cell_x as i64;
                        if atlas_x < 0 || atlas_x >= width as i64 {
                            continue;
                        }
                        row[atlas_x as usize] = cell.pixel(cell_x, cell_y as u32);
                    }
                }
            });
    }
    Ok(PackedAtlas { atlas, placements })
}
