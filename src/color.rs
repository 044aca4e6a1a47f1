use crate::{
    buffer::{Color, PixelBuffer},
    error::Error,
};
use serde::{Deserialize, Serialize};
use tracy_full::zone;

/// Selects one channel of a `Color`. The numeric values match the r/g/b/a index order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Channel {
    Red = 0,
    Green = 1,
    Blue = 2,
    #[default]
    Alpha = 3,
}

impl Channel {
    pub fn of(self, color: Color) -> f32 {
        match self {
            Channel::Red => color.r,
            Channel::Green => color.g,
            Channel::Blue => color.b,
            Channel::Alpha => color.a,
        }
    }
}

impl TryFrom<usize> for Channel {
    type Error = Error;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        match index {
            0 => Ok(Channel::Red),
            1 => Ok(Channel::Green),
            2 => Ok(Channel::Blue),
            3 => Ok(Channel::Alpha),
            _ => Err(Error::InvalidChannel(index)),
        }
    }
}

/// Writes the selected channel of every pixel into all four output channels.
pub fn grayscale(buffer: &PixelBuffer, channel: Channel) -> PixelBuffer {
    zone!("grayscale");
    buffer.map_pixels(|px| Color::splat(channel.of(px)))
}

/// Replaces every channel `c` with `1 - c`, alpha included.
pub fn negate(buffer: &PixelBuffer) -> PixelBuffer {
    zone!("negate");
    buffer.map_pixels(|px| Color::new(1.0 - px.r, 1.0 - px.g, 1.0 - px.b, 1.0 - px.a))
}
