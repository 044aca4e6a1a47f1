//! Offline pixel buffer transforms and sprite atlas packing.
//!
//! Every operation takes a [`PixelBuffer`] and returns a freshly allocated one;
//! inputs are never modified. The free functions in each module run on rayon's
//! global pool, while [`Forge`] runs them on a pool sized by [`ForgeConfig`].

#[cfg(feature = "atlas")]
pub mod atlas;
#[cfg(feature = "blur")]
pub mod blur;
pub mod buffer;
#[cfg(feature = "color")]
pub mod color;
#[cfg(feature = "composite")]
pub mod composite;
pub mod config;
pub mod error;
pub mod forge;
#[cfg(feature = "grid")]
pub mod grid;
#[cfg(feature = "resample")]
pub mod resample;

pub use buffer::{Cell, Color, PixelBuffer, Point, Rect};
pub use config::ForgeConfig;
pub use error::{Error, Result};
pub use forge::Forge;
