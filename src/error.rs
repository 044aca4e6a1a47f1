use std::{io, result};

use thiserror::Error;

pub type Result<T> = result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{cells} cells do not fit in a {bin}x{bin} bin (capacity {capacity})")]
    CapacityExceeded {
        cells: usize,
        capacity: usize,
        bin: u32,
    },
    #[error("Degenerate input: {0}")]
    DegenerateInput(String),
    #[error("Channel index {0} is out of range, expected 0..=3")]
    InvalidChannel(usize),
    #[error("Pixel count {len} does not match a {width}x{height} buffer")]
    SizeMismatch { width: u32, height: u32, len: usize },
    #[error(transparent)]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[cfg(feature = "toml")]
    #[error(transparent)]
    Toml(#[from] toml_dep::de::Error),
    #[cfg(feature = "json")]
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn degenerate(message: impl Into<String>) -> Self {
        Error::DegenerateInput(message.into())
    }
}
