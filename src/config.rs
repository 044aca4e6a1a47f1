#[cfg(feature = "toml")]
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Settings owned by a [`Forge`](crate::forge::Forge).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForgeConfig {
    /// Worker threads in the pool. Zero lets rayon pick one per core.
    pub threads: usize,
    /// Side of the square bin tried first when packing.
    pub min_bin_size: u32,
    /// Side of the largest bin; more cells than fit here is an error.
    pub max_bin_size: u32,
    /// Extracted cells with no pixel alpha above this are dropped.
    pub empty_alpha: f32,
}

impl Default for ForgeConfig {
    fn default() -> Self {
        Self {
            threads: 16,
            min_bin_size: 1024,
            max_bin_size: 2048,
            empty_alpha: 0.01,
        }
    }
}

#[cfg(feature = "toml")]
impl ForgeConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml_dep::from_str(text)?)
    }

    pub fn from_toml_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        Self::from_toml_str(&std::fs::read_to_string(path)?)
    }
}
