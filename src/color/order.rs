//! Channel ordering on the wire
//!
//! WS2812 pixels latch their channels in Green, Red, Blue order, regardless of
//! the order used by the color-setting API.

use crate::color::Rgb;

/// Order in which a pixel's channels are shifted out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelOrder {
    /// Green, Red, Blue (WS2812 / WS2812B)
    Grb,
}

impl ChannelOrder {
    /// Channel values of `color` in wire order
    #[inline]
    pub const fn channels(self, color: Rgb) -> [u8; 3] {
        match self {
            Self::Grb => [color.g, color.r, color.b],
        }
    }

    /// Rebuild a color from channel values given in wire order
    #[inline]
    pub const fn from_channels(self, channels: [u8; 3]) -> Rgb {
        match self {
            Self::Grb => Rgb {
                r: channels[1],
                g: channels[0],
                b: channels[2],
            },
        }
    }
}
