//! WS2812 wire encoding
//!
//! Every logical bit is stretched into four output symbols clocked at
//! 2.4 MHz (~417 ns each), which approximates the WS2812 pulse widths:
//!
//! ```text
//! logical 0: 1000  ->  ~0.42 us high, ~1.25 us low
//! logical 1: 1100  ->  ~0.83 us high, ~0.83 us low
//! ```
//!
//! A channel byte is expanded most-significant bit first into a 32-bit group
//! that is stored big-endian, so one channel becomes 4 bytes and one pixel
//! (three channels, GRB order) becomes [`BYTES_PER_LED`] bytes.
//!
//! Everything here is pure data transformation and does not touch hardware.

use crate::color::{ChannelOrder, Rgb};
use crate::error::DecodeError;

/// Output symbols per logical bit
pub const SYMBOLS_PER_BIT: usize = 4;

/// Logical bits per color channel
pub const BITS_PER_CHANNEL: usize = 8;

/// Color channels per pixel
pub const CHANNELS_PER_LED: usize = 3;

/// Encoded bytes per color channel
pub const BYTES_PER_CHANNEL: usize = BITS_PER_CHANNEL * SYMBOLS_PER_BIT / 8;

/// Encoded bytes per pixel
pub const BYTES_PER_LED: usize = CHANNELS_PER_LED * BYTES_PER_CHANNEL;

/// Channel order used on the wire
pub const WIRE_ORDER: ChannelOrder = ChannelOrder::Grb;

const SYMBOL_MASK: u32 = 0b1111;

/// Four-unit output pattern for a single logical bit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Symbol {
    /// One unit high, three units low
    Zero = 0b1000,
    /// Two units high, two units low
    One = 0b1100,
}

impl Symbol {
    /// Symbol for a logical bit
    #[inline]
    pub const fn from_bit(bit: bool) -> Self {
        if bit { Self::One } else { Self::Zero }
    }

    /// Parse a 4-bit pattern, returning `None` for anything but `1000`/`1100`
    #[inline]
    pub const fn from_pattern(pattern: u8) -> Option<Self> {
        match pattern {
            0b1000 => Some(Self::Zero),
            0b1100 => Some(Self::One),
            _ => None,
        }
    }

    /// The 4-bit pattern, leading unit in the most significant position
    #[inline]
    pub const fn pattern(self) -> u8 {
        self as u8
    }

    /// Logical bit carried by this symbol
    #[inline]
    pub const fn bit(self) -> bool {
        matches!(self, Self::One)
    }

    /// Number of high units at the start of the pattern
    #[inline]
    pub const fn high_units(self) -> u8 {
        match self {
            Self::Zero => 1,
            Self::One => 2,
        }
    }
}

/// Expand one channel byte into its 4-byte wire form
#[allow(clippy::cast_lossless)]
pub const fn encode_byte(value: u8) -> [u8; BYTES_PER_CHANNEL] {
    let mut encoded: u32 = 0;
    let mut bit = 0;
    while bit < BITS_PER_CHANNEL {
        let is_set = value & (0x80 >> bit) != 0;
        encoded = (encoded << SYMBOLS_PER_BIT) | Symbol::from_bit(is_set).pattern() as u32;
        bit += 1;
    }
    encoded.to_be_bytes()
}

/// Precomputed [`encode_byte`] output for every channel value
static ENCODE_TABLE: [[u8; BYTES_PER_CHANNEL]; 256] = {
    let mut table = [[0; BYTES_PER_CHANNEL]; 256];
    let mut value = 0;
    while value < 256 {
        #[allow(clippy::cast_possible_truncation)]
        let byte = value as u8;
        table[value] = encode_byte(byte);
        value += 1;
    }
    table
};

/// Recover a channel byte from its 4-byte wire form
///
/// Fails with [`DecodeError::InvalidSymbol`] when a 4-bit group is neither
/// `1000` nor `1100`; the offset is the index of the offending byte.
pub fn decode_byte(bytes: [u8; BYTES_PER_CHANNEL]) -> Result<u8, DecodeError> {
    let encoded = u32::from_be_bytes(bytes);
    let mut value = 0u8;
    for index in 0..BITS_PER_CHANNEL {
        let shift = (BITS_PER_CHANNEL - 1 - index) * SYMBOLS_PER_BIT;
        #[allow(clippy::cast_possible_truncation)]
        let pattern = ((encoded >> shift) & SYMBOL_MASK) as u8;
        let symbol = Symbol::from_pattern(pattern).ok_or(DecodeError::InvalidSymbol {
            offset: index * SYMBOLS_PER_BIT / 8,
        })?;
        value = (value << 1) | u8::from(symbol.bit());
    }
    Ok(value)
}

/// Encode a single pixel into its [`BYTES_PER_LED`] wire bytes
#[inline]
pub fn encode_led(color: Rgb, out: &mut [u8; BYTES_PER_LED]) {
    for (channel, chunk) in WIRE_ORDER
        .channels(color)
        .into_iter()
        .zip(out.chunks_exact_mut(BYTES_PER_CHANNEL))
    {
        chunk.copy_from_slice(&ENCODE_TABLE[usize::from(channel)]);
    }
}

/// Encode `colors` in index order into `out`
///
/// Writes `colors.len() * BYTES_PER_LED` bytes, or fewer if `out` is too
/// short to hold every pixel. Returns the number of bytes written.
pub fn encode_frame(colors: &[Rgb], out: &mut [u8]) -> usize {
    let mut written = 0;
    for (color, chunk) in colors.iter().zip(out.chunks_exact_mut(BYTES_PER_LED)) {
        if let Ok(led) = <&mut [u8; BYTES_PER_LED]>::try_from(chunk) {
            encode_led(*color, led);
            written += BYTES_PER_LED;
        }
    }
    written
}

/// Decode wire bytes back into pixel colors
///
/// `bytes` must hold whole pixels. Decodes at most `out.len()` pixels and
/// returns how many were written.
pub fn decode_frame(bytes: &[u8], out: &mut [Rgb]) -> Result<usize, DecodeError> {
    if !bytes.len().is_multiple_of(BYTES_PER_LED) {
        return Err(DecodeError::Truncated { len: bytes.len() });
    }

    let mut decoded = 0;
    for (led_index, (chunk, color)) in bytes
        .chunks_exact(BYTES_PER_LED)
        .zip(out.iter_mut())
        .enumerate()
    {
        let mut channels = [0u8; CHANNELS_PER_LED];
        for (channel_index, (group, channel)) in chunk
            .chunks_exact(BYTES_PER_CHANNEL)
            .zip(channels.iter_mut())
            .enumerate()
        {
            let base = led_index * BYTES_PER_LED + channel_index * BYTES_PER_CHANNEL;
            let group = [group[0], group[1], group[2], group[3]];
            *channel = decode_byte(group).map_err(|err| err.shifted(base))?;
        }
        *color = WIRE_ORDER.from_channels(channels);
        decoded += 1;
    }
    Ok(decoded)
}
