//! Transfer buffer ownership
//!
//! The transfer engine reads the encoded frame straight from memory, so the
//! buffer has to live in RAM the engine can reach without a cache in between
//! (on most parts a dedicated no-cache section), and it must not move or be
//! rewritten while a transfer is running.
//!
//! The buffer is borrowed for the lifetime of the driver and rewritten in
//! place on every frame. There is no double buffering: [`Ws2812::show`] only
//! re-encodes after the previous transfer has completed.
//!
//! ```ignore
//! #[unsafe(link_section = ".nocache")]
//! static mut WIRE: [u8; buffer_size(8)] = [0; buffer_size(8)];
//!
//! let buffer = TransferBuffer::new(unsafe { &mut *core::ptr::addr_of_mut!(WIRE) });
//! ```
//!
//! [`Ws2812::show`]: crate::Ws2812::show

use crate::color::Rgb;
use crate::encoder::{BYTES_PER_LED, encode_byte, encode_frame};

/// Encoded byte length for a strip of `led_count` pixels
pub const fn buffer_size(led_count: usize) -> usize {
    led_count * BYTES_PER_LED
}

/// Encoded frame storage handed to the transfer engine
///
/// `BYTES` must be a non-zero multiple of [`BYTES_PER_LED`]; anything else
/// fails to compile when the buffer is constructed.
///
/// ```
/// # use myrtio_ws2812_dma::TransferBuffer;
/// let mut wire = [0u8; 24];
/// let buffer = TransferBuffer::new(&mut wire);
/// assert_eq!(TransferBuffer::<24>::LED_COUNT, 2);
/// assert_eq!(buffer.len(), 24);
/// ```
///
/// ```compile_fail
/// # use myrtio_ws2812_dma::TransferBuffer;
/// let mut wire = [0u8; 13];
/// let _ = TransferBuffer::new(&mut wire);
/// ```
///
/// ```compile_fail
/// # use myrtio_ws2812_dma::TransferBuffer;
/// let mut wire = [0u8; 0];
/// let _ = TransferBuffer::new(&mut wire);
/// ```
pub struct TransferBuffer<'a, const BYTES: usize> {
    bytes: &'a mut [u8; BYTES],
}

impl<'a, const BYTES: usize> TransferBuffer<'a, BYTES> {
    const LAYOUT: () = assert!(
        BYTES > 0 && BYTES.is_multiple_of(BYTES_PER_LED),
        "transfer buffer must hold a whole, non-zero number of pixels"
    );

    /// Number of pixels the buffer can hold
    pub const LED_COUNT: usize = BYTES / BYTES_PER_LED;

    /// Take ownership of DMA-visible storage
    ///
    /// The contents are reset to an all-black frame.
    pub fn new(bytes: &'a mut [u8; BYTES]) -> Self {
        let () = Self::LAYOUT;
        let mut buffer = Self { bytes };
        buffer.clear();
        buffer
    }

    /// Overwrite the buffer with an all-black frame
    pub fn clear(&mut self) {
        let black = encode_byte(0);
        for chunk in self.bytes.chunks_exact_mut(black.len()) {
            chunk.copy_from_slice(&black);
        }
    }

    /// Encode `colors` into the buffer
    ///
    /// Returns the number of bytes written, which is `BYTES` whenever
    /// `colors` has [`Self::LED_COUNT`] entries.
    pub fn encode(&mut self, colors: &[Rgb]) -> usize {
        encode_frame(colors, self.bytes.as_mut_slice())
    }

    /// Encoded bytes, in transmission order
    pub fn as_bytes(&self) -> &[u8] {
        self.bytes.as_slice()
    }

    /// Start address of the storage as seen by the transfer engine
    pub fn address(&self) -> usize {
        self.bytes.as_ptr() as usize
    }

    /// Exact byte length of a frame
    #[allow(clippy::len_without_is_empty, clippy::unused_self)]
    pub const fn len(&self) -> usize {
        BYTES
    }
}
