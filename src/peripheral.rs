//! Serial output and transfer engine abstractions
//!
//! Implement [`SerialOutput`] and [`TransferEngine`] to support a platform.
//! [`PeripheralSession`] owns both and turns "move this buffer to the data
//! register" into a call that only returns once the engine is idle again.

use embassy_time::Duration;
use embedded_hal::delay::DelayNs;

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::config::{
    DEFAULT_FREQUENCY_HZ, DEFAULT_POLL_INTERVAL, DEFAULT_TRANSFER_TIMEOUT, MIN_POLL_INTERVAL,
};
use crate::error::Error;

/// Bit order of the serial output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitOrder {
    MsbFirst,
    LsbFirst,
}

/// Serial output settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SerialConfig {
    /// Output clock in Hz, one output symbol per clock
    pub frequency_hz: u32,
    /// Bit order within each byte
    pub bit_order: BitOrder,
    /// Continuous framing, no idle gap between consecutive bytes
    pub continuous: bool,
}

impl SerialConfig {
    /// Settings for WS2812 output: 2.4 MHz, LSB first, gapless
    pub const WS2812: Self = Self {
        frequency_hz: DEFAULT_FREQUENCY_HZ,
        bit_order: BitOrder::LsbFirst,
        continuous: true,
    };

    /// Duration of a single output symbol in nanoseconds
    pub const fn symbol_period_ns(&self) -> u32 {
        if self.frequency_hz == 0 {
            return 0;
        }
        1_000_000_000 / self.frequency_hz
    }
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self::WS2812
    }
}

/// Synchronous serial output feeding the LED data line
pub trait SerialOutput {
    /// Error type for configuration
    type Error;

    /// Apply clock rate, bit order and framing, and route the transfer
    /// engine's requests to this peripheral
    fn configure(&mut self, config: &SerialConfig) -> Result<(), Self::Error>;
}

/// Block-transfer engine moving memory to the serial output's data register
pub trait TransferEngine {
    /// Error type for bring-up and for starting a transfer
    type Error;

    /// Set up memory-to-peripheral transfers: byte-wide reads with an
    /// incrementing source address, writes to the serial output's data
    /// register, paced by its transmit request
    ///
    /// Called once at bring-up, after [`SerialOutput::configure`].
    fn configure(&mut self) -> Result<(), Self::Error>;

    /// Start a one-shot transfer of `source` to the peripheral
    ///
    /// The engine keeps reading `source` after this returns; the caller must
    /// keep it untouched until [`TransferEngine::is_busy`] reports `false`.
    fn start(&mut self, source: &[u8]) -> Result<(), Self::Error>;

    /// Whether the last started transfer is still running
    fn is_busy(&mut self) -> bool;
}

/// Bounded wait for transfer completion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Watchdog {
    /// Busy polls allowed before the transfer is declared stuck
    pub max_polls: u64,
    /// Delay between polls
    pub poll_interval: Duration,
}

impl Watchdog {
    /// Watchdog covering `timeout` with a poll every `poll_interval`
    ///
    /// Intervals under [`MIN_POLL_INTERVAL`] are raised to it, so the poll
    /// count always matches the delay actually spent between polls.
    pub fn new(timeout: Duration, poll_interval: Duration) -> Self {
        let poll_interval = poll_interval.max(MIN_POLL_INTERVAL);
        Self {
            max_polls: timeout
                .as_micros()
                .div_ceil(poll_interval.as_micros())
                .max(1),
            poll_interval,
        }
    }

    fn poll_interval_ns(&self) -> u32 {
        u32::try_from(self.poll_interval.as_micros().saturating_mul(1_000)).unwrap_or(u32::MAX)
    }
}

impl Default for Watchdog {
    fn default() -> Self {
        Self::new(DEFAULT_TRANSFER_TIMEOUT, DEFAULT_POLL_INTERVAL)
    }
}

/// Configured serial output plus its transfer engine
pub struct PeripheralSession<S, E> {
    serial: S,
    engine: E,
    config: SerialConfig,
    watchdog: Watchdog,
}

impl<S, E> PeripheralSession<S, E>
where
    S: SerialOutput,
    E: TransferEngine,
{
    /// Configure the serial output, then the transfer engine, and take
    /// ownership of both
    ///
    /// A failure here is a bring-up fault; no session is produced.
    pub fn initialize_output(
        mut serial: S,
        mut engine: E,
        config: SerialConfig,
    ) -> Result<Self, Error<S::Error, E::Error>> {
        if let Err(err) = serial.configure(&config) {
            #[cfg(feature = "esp32-log")]
            println!("ws2812: serial output configuration failed");
            return Err(Error::Serial(err));
        }
        if let Err(err) = engine.configure() {
            #[cfg(feature = "esp32-log")]
            println!("ws2812: transfer engine configuration failed");
            return Err(Error::Engine(err));
        }

        #[cfg(feature = "esp32-log")]
        println!(
            "ws2812: serial output at {} Hz ({:?}, continuous: {})",
            config.frequency_hz, config.bit_order, config.continuous
        );

        Ok(Self {
            serial,
            engine,
            config,
            watchdog: Watchdog::default(),
        })
    }

    /// Replace the completion watchdog
    #[must_use]
    pub fn with_watchdog(mut self, watchdog: Watchdog) -> Self {
        self.watchdog = watchdog;
        self
    }

    /// Transfer `bytes` and wait until the engine reports idle
    ///
    /// Returns [`Error::TransferTimeout`] if the engine is still busy after
    /// the watchdog runs out. The engine may then still be reading `bytes`.
    pub fn transfer<D: DelayNs>(
        &mut self,
        bytes: &[u8],
        delay: &mut D,
    ) -> Result<(), Error<S::Error, E::Error>> {
        self.engine.start(bytes).map_err(Error::Transfer)?;

        let mut polls = 0;
        while self.engine.is_busy() {
            if polls >= self.watchdog.max_polls {
                #[cfg(feature = "esp32-log")]
                println!(
                    "ws2812: transfer of {} bytes still busy after {} polls",
                    bytes.len(),
                    polls
                );
                return Err(Error::TransferTimeout);
            }
            delay.delay_ns(self.watchdog.poll_interval_ns());
            polls += 1;
        }
        Ok(())
    }

    /// Active serial settings
    pub fn config(&self) -> &SerialConfig {
        &self.config
    }

    /// Active watchdog
    pub fn watchdog(&self) -> &Watchdog {
        &self.watchdog
    }

    /// Give the peripherals back
    pub fn release(self) -> (S, E) {
        (self.serial, self.engine)
    }
}
