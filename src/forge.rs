//! Runs the buffer operations on a dedicated, explicitly sized thread pool.
#[cfg(feature = "atlas")]
use crate::atlas::{CellLayout, ExtractOptions, PackOptions, PackedAtlas};
#[cfg(feature = "composite")]
use crate::buffer::Point;
#[cfg(feature = "atlas")]
use crate::buffer::Cell;
#[cfg(feature = "resample")]
use crate::buffer::Rect;
#[cfg(feature = "color")]
use crate::color::Channel;
#[cfg(feature = "grid")]
use crate::grid::{GridCell, SlicingGrid};
use crate::{buffer::PixelBuffer, config::ForgeConfig, error::Result};
use rayon::{ThreadPool, ThreadPoolBuilder};

pub struct Forge {
    pool: ThreadPool,
    config: ForgeConfig,
}

impl Forge {
    pub fn new(config: ForgeConfig) -> Result<Self> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(config.threads)
            .thread_name(|index| format!("texforge-{index}"))
            .build()?;
        Ok(Self { pool, config })
    }

    pub fn config(&self) -> &ForgeConfig {
        &self.config
    }

    /// Number of workers actually running in the pool.
    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    fn run<R: Send>(&self, op: impl FnOnce() -> R + Send) -> R {
        self.pool.install(op)
    }

    #[cfg(feature = "color")]
    pub fn grayscale(&self, buffer: &PixelBuffer, channel: Channel) -> PixelBuffer {
        self.run(|| crate::color::grayscale(buffer, channel))
    }

    #[cfg(feature = "color")]
    pub fn negate(&self, buffer: &PixelBuffer) -> PixelBuffer {
        self.run(|| crate::color::negate(buffer))
    }

    #[cfg(feature = "resample")]
    pub fn shrink(&self, buffer: &PixelBuffer, scale_x: f32, scale_y: f32) -> Result<PixelBuffer> {
        self.run(|| crate::resample::shrink(buffer, scale_x, scale_y))
    }

    #[cfg(feature = "resample")]
    pub fn shrink_region(
        &self,
        buffer: &PixelBuffer,
        region: Rect,
        scale_x: f32,
        scale_y: f32,
    ) -> Result<PixelBuffer> {
        self.run(|| crate::resample::shrink_region(buffer, region, scale_x, scale_y))
    }

    #[cfg(feature = "resample")]
    pub fn rotate(&self, buffer: &PixelBuffer, angle_degrees: f32) -> Result<PixelBuffer> {
        self.run(|| crate::resample::rotate(buffer, angle_degrees))
    }

    #[cfg(feature = "blur")]
    pub fn gaussian_blur(&self, buffer: &PixelBuffer, radius: u32) -> Result<PixelBuffer> {
        self.run(|| crate::blur::gaussian_blur(buffer, radius))
    }

    /// Extracts cells using the configured empty-cell threshold.
    #[cfg(feature = "atlas")]
    pub fn extract_cells(
        &self,
        atlas: &PixelBuffer,
        cell_width: u32,
        cell_height: u32,
        offset: (u32, u32),
        padding: (u32, u32),
    ) -> Result<Vec<Cell>> {
        let options = ExtractOptions {
            layout: CellLayout::new(offset, padding),
            empty_alpha: self.config.empty_alpha,
        };
        self.run(|| crate::atlas::extract_cells(atlas, cell_width, cell_height, &options))
    }

    /// Packs cells into one of the configured bin sizes.
    #[cfg(feature = "atlas")]
    pub fn pack_cells(
        &self,
        cells: Vec<PixelBuffer>,
        offset: (u32, u32),
        padding: (u32, u32),
    ) -> Result<PackedAtlas> {
        let options = PackOptions {
            layout: CellLayout::new(offset, padding),
            min_bin: self.config.min_bin_size,
            max_bin: self.config.max_bin_size,
        };
        self.run(|| crate::atlas::pack_cells(cells, &options))
    }

    #[cfg(feature = "grid")]
    pub fn slice_grid(
        &self,
        buffer: &PixelBuffer,
        unit_width: u32,
        unit_height: u32,
        center_offset_x: i32,
        center_offset_y: i32,
    ) -> Result<SlicingGrid<GridCell>> {
        self.run(|| {
            crate::grid::slice_grid(
                buffer,
                unit_width,
                unit_height,
                center_offset_x,
                center_offset_y,
            )
        })
    }

    #[cfg(feature = "composite")]
    pub fn composite(
        &self,
        base: &PixelBuffer,
        overlay: &PixelBuffer,
        at: Point,
        solidify: bool,
    ) -> PixelBuffer {
        self.run(|| crate::composite::composite(base, overlay, at, solidify))
    }
}
