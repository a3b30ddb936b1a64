//! WS2812 frame driver
//!
//! [`Ws2812`] owns the color buffer, the transfer buffer and the peripheral
//! session. Colors are changed between frames and [`Ws2812::show`] pushes
//! them out, blocking until the frame has left the wire and latched.

use embassy_time::Duration;
use embedded_hal::delay::DelayNs;
use smart_leds::SmartLedsWrite;

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::buffer::{TransferBuffer, buffer_size};
use crate::color::Rgb;
use crate::config::{DriverConfig, FrameTimings};
use crate::error::Error;
use crate::peripheral::{PeripheralSession, SerialOutput, TransferEngine};
use crate::state::{FrameEvent, FrameState};

/// Error type of a [`Ws2812`] built on `S` and `E`
pub type DriverError<S, E> = Error<<S as SerialOutput>::Error, <E as TransferEngine>::Error>;

/// WS2812 strip of `LEDS` pixels driven through a DMA-fed serial output
///
/// `BYTES` is the transfer buffer size and must equal
/// [`buffer_size(LEDS)`](buffer_size); a mismatch fails to compile.
///
/// # Usage
///
/// ```
/// # use embedded_hal::delay::DelayNs;
/// # use myrtio_ws2812_dma::{
/// #     DriverConfig, SerialConfig, SerialOutput, TransferBuffer, TransferEngine, Ws2812,
/// #     buffer_size,
/// # };
/// # struct Spi;
/// # impl SerialOutput for Spi {
/// #     type Error = ();
/// #     fn configure(&mut self, _: &SerialConfig) -> Result<(), ()> { Ok(()) }
/// # }
/// # struct Dma;
/// # impl TransferEngine for Dma {
/// #     type Error = ();
/// #     fn configure(&mut self) -> Result<(), ()> { Ok(()) }
/// #     fn start(&mut self, _: &[u8]) -> Result<(), ()> { Ok(()) }
/// #     fn is_busy(&mut self) -> bool { false }
/// # }
/// # struct Delay;
/// # impl DelayNs for Delay {
/// #     fn delay_ns(&mut self, _: u32) {}
/// # }
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut wire = [0u8; buffer_size(8)];
/// let mut strip = Ws2812::<_, _, _, 8, { buffer_size(8) }>::new(
///     Spi,
///     Dma,
///     Delay,
///     TransferBuffer::new(&mut wire),
///     &DriverConfig::DEFAULT,
/// )?;
///
/// strip.set_all_leds(0, 0, 0);
/// strip.set_led_color(0, 255, 0, 0);
/// strip.show()?;
/// # Ok(())
/// # }
/// ```
///
/// A buffer sized for another strip length is rejected:
///
/// ```compile_fail
/// # use embedded_hal::delay::DelayNs;
/// # use myrtio_ws2812_dma::{
/// #     DriverConfig, SerialConfig, SerialOutput, TransferBuffer, TransferEngine, Ws2812,
/// #     buffer_size,
/// # };
/// # struct Spi;
/// # impl SerialOutput for Spi {
/// #     type Error = ();
/// #     fn configure(&mut self, _: &SerialConfig) -> Result<(), ()> { Ok(()) }
/// # }
/// # struct Dma;
/// # impl TransferEngine for Dma {
/// #     type Error = ();
/// #     fn configure(&mut self) -> Result<(), ()> { Ok(()) }
/// #     fn start(&mut self, _: &[u8]) -> Result<(), ()> { Ok(()) }
/// #     fn is_busy(&mut self) -> bool { false }
/// # }
/// # struct Delay;
/// # impl DelayNs for Delay {
/// #     fn delay_ns(&mut self, _: u32) {}
/// # }
/// let mut wire = [0u8; buffer_size(8)];
/// let _ = Ws2812::<_, _, _, 7, { buffer_size(8) }>::new(
///     Spi,
///     Dma,
///     Delay,
///     TransferBuffer::new(&mut wire),
///     &DriverConfig::DEFAULT,
/// );
/// ```
///
/// So is an empty strip:
///
/// ```compile_fail
/// # use embedded_hal::delay::DelayNs;
/// # use myrtio_ws2812_dma::{
/// #     DriverConfig, SerialConfig, SerialOutput, TransferBuffer, TransferEngine, Ws2812,
/// #     buffer_size,
/// # };
/// # struct Spi;
/// # impl SerialOutput for Spi {
/// #     type Error = ();
/// #     fn configure(&mut self, _: &SerialConfig) -> Result<(), ()> { Ok(()) }
/// # }
/// # struct Dma;
/// # impl TransferEngine for Dma {
/// #     type Error = ();
/// #     fn configure(&mut self) -> Result<(), ()> { Ok(()) }
/// #     fn start(&mut self, _: &[u8]) -> Result<(), ()> { Ok(()) }
/// #     fn is_busy(&mut self) -> bool { false }
/// # }
/// # struct Delay;
/// # impl DelayNs for Delay {
/// #     fn delay_ns(&mut self, _: u32) {}
/// # }
/// let mut wire = [0u8; buffer_size(1)];
/// let _ = Ws2812::<_, _, _, 0, { buffer_size(1) }>::new(
///     Spi,
///     Dma,
///     Delay,
///     TransferBuffer::new(&mut wire),
///     &DriverConfig::DEFAULT,
/// );
/// ```
pub struct Ws2812<'a, S, E, D, const LEDS: usize, const BYTES: usize> {
    session: PeripheralSession<S, E>,
    delay: D,
    buffer: TransferBuffer<'a, BYTES>,
    colors: [Rgb; LEDS],
    timings: FrameTimings,
    state: FrameState,
}

impl<'a, S, E, D, const LEDS: usize, const BYTES: usize> Ws2812<'a, S, E, D, LEDS, BYTES>
where
    S: SerialOutput,
    E: TransferEngine,
    D: DelayNs,
{
    const LAYOUT: () = assert!(
        LEDS > 0 && BYTES == buffer_size(LEDS),
        "transfer buffer must be exactly LEDS * 12 bytes"
    );

    /// Number of pixels in the strip
    pub const LED_COUNT: usize = LEDS;

    /// Validate `config`, bring up the serial output and take ownership of
    /// the peripherals and buffer
    ///
    /// Any failure is a bring-up fault and no driver is returned.
    pub fn new(
        serial: S,
        engine: E,
        delay: D,
        buffer: TransferBuffer<'a, BYTES>,
        config: &DriverConfig,
    ) -> Result<Self, DriverError<S, E>> {
        let () = Self::LAYOUT;
        config.validate()?;

        let session = PeripheralSession::initialize_output(serial, engine, config.serial)?
            .with_watchdog(config.watchdog());

        #[cfg(feature = "esp32-log")]
        println!(
            "ws2812: {} LEDs, {} byte transfer buffer",
            LEDS,
            buffer.len()
        );

        Ok(Self {
            session,
            delay,
            buffer,
            colors: [Rgb::default(); LEDS],
            timings: config.timings,
            state: FrameState::Idle,
        })
    }

    /// Set a single pixel; indices past the end of the strip are ignored
    pub fn set_led_color(&mut self, index: usize, r: u8, g: u8, b: u8) {
        let _ = self.try_set_led_color(index, r, g, b);
    }

    /// Set a single pixel, returning `false` if `index` is out of range
    pub fn try_set_led_color(&mut self, index: usize, r: u8, g: u8, b: u8) -> bool {
        match self.colors.get_mut(index) {
            Some(led) => {
                *led = Rgb { r, g, b };
                true
            }
            None => false,
        }
    }

    /// Set a single pixel from an [`Rgb`]; indices past the end are ignored
    pub fn set_led(&mut self, index: usize, color: Rgb) {
        self.set_led_color(index, color.r, color.g, color.b);
    }

    /// Set every pixel to the same color
    pub fn set_all_leds(&mut self, r: u8, g: u8, b: u8) {
        self.fill(Rgb { r, g, b });
    }

    /// Set every pixel to `color`
    pub fn fill(&mut self, color: Rgb) {
        self.colors.fill(color);
    }

    /// Current pixel colors
    pub fn colors(&self) -> &[Rgb; LEDS] {
        &self.colors
    }

    /// Current lifecycle state
    pub fn state(&self) -> FrameState {
        self.state
    }

    /// Encoded bytes of the last frame
    pub fn transfer_buffer(&self) -> &[u8] {
        self.buffer.as_bytes()
    }

    /// Quiet periods used around each frame
    pub fn timings(&self) -> &FrameTimings {
        &self.timings
    }

    /// Send the current colors to the strip
    ///
    /// Holds the line low, encodes, transfers and holds the line low again.
    /// Does not return before the transfer engine reports idle and the
    /// latch period has elapsed.
    pub fn show(&mut self) -> Result<(), DriverError<S, E>> {
        if self.state == FrameState::Fault {
            return Err(Error::Faulted);
        }

        self.advance(FrameEvent::Show);
        self.delay.delay_us(micros(self.timings.pre_quiet));

        self.advance(FrameEvent::StepDone);
        self.buffer.encode(&self.colors);

        self.advance(FrameEvent::StepDone);
        if let Err(err) = self.session.transfer(self.buffer.as_bytes(), &mut self.delay) {
            let stuck = matches!(err, Error::TransferTimeout);
            self.advance(FrameEvent::TransferFailed { stuck });
            return Err(err);
        }

        self.advance(FrameEvent::StepDone);
        self.delay.delay_us(micros(self.timings.post_quiet));

        self.advance(FrameEvent::StepDone);
        Ok(())
    }

    /// Leave the fault state after the transfer engine has been reset
    pub fn clear_fault(&mut self) {
        self.advance(FrameEvent::ClearFault);
    }

    /// Give the peripherals and delay back
    pub fn release(self) -> (S, E, D) {
        let (serial, engine) = self.session.release();
        (serial, engine, self.delay)
    }

    fn advance(&mut self, event: FrameEvent) {
        self.state = self.state.transition(event);
    }
}

impl<S, E, D, const LEDS: usize, const BYTES: usize> SmartLedsWrite
    for Ws2812<'_, S, E, D, LEDS, BYTES>
where
    S: SerialOutput,
    E: TransferEngine,
    D: DelayNs,
{
    type Error = DriverError<S, E>;
    type Color = Rgb;

    /// Copy up to `LEDS` colors into the strip and show them
    ///
    /// Pixels past the end of the iterator keep their previous color.
    fn write<T, I>(&mut self, iterator: T) -> Result<(), Self::Error>
    where
        T: IntoIterator<Item = I>,
        I: Into<Self::Color>,
    {
        for (led, color) in self.colors.iter_mut().zip(iterator) {
            *led = color.into();
        }
        self.show()
    }
}

fn micros(duration: Duration) -> u32 {
    u32::try_from(duration.as_micros()).unwrap_or(u32::MAX)
}
