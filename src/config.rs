//! Driver configuration
//!
//! All values are plain constants so a board can declare its configuration
//! as a `const` and have it checked once at bring-up.

use embassy_time::Duration;

use crate::error::ConfigError;
use crate::peripheral::{SerialConfig, Watchdog};

/// Default strip length
pub const DEFAULT_LED_COUNT: usize = 8;

/// Output clock giving four symbols per ~1.25 us WS2812 bit
pub const DEFAULT_FREQUENCY_HZ: u32 = 2_400_000;

/// Shortest idle-low time that WS2812 pixels reliably treat as a latch
pub const MIN_QUIET_PERIOD: Duration = Duration::from_micros(50);

/// Quiet period used before and after each frame by default
pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_micros(100);

/// Default watchdog for a single transfer
///
/// A full frame of [`DEFAULT_LED_COUNT`] pixels takes ~320 us on the wire.
pub const DEFAULT_TRANSFER_TIMEOUT: Duration = Duration::from_millis(10);

/// Default delay between busy-status polls
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_micros(1);

/// Shortest delay between busy-status polls
pub const MIN_POLL_INTERVAL: Duration = Duration::from_micros(1);

/// Line-low periods around each frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameTimings {
    /// Quiet time before the first bit of a frame
    pub pre_quiet: Duration,
    /// Quiet time after the last bit, lets the chain latch
    pub post_quiet: Duration,
}

impl FrameTimings {
    pub const DEFAULT: Self = Self {
        pre_quiet: DEFAULT_QUIET_PERIOD,
        post_quiet: DEFAULT_QUIET_PERIOD,
    };
}

impl Default for FrameTimings {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Complete driver configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverConfig {
    /// Serial output settings
    pub serial: SerialConfig,
    /// Quiet periods around each frame
    pub timings: FrameTimings,
    /// Longest time a transfer may stay busy before it is treated as a fault
    pub transfer_timeout: Duration,
    /// Delay between busy-status polls
    pub poll_interval: Duration,
}

impl DriverConfig {
    pub const DEFAULT: Self = Self {
        serial: SerialConfig::WS2812,
        timings: FrameTimings::DEFAULT,
        transfer_timeout: DEFAULT_TRANSFER_TIMEOUT,
        poll_interval: DEFAULT_POLL_INTERVAL,
    };

    /// Check the configuration against the protocol limits
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.serial.frequency_hz == 0 {
            return Err(ConfigError::ZeroFrequency);
        }
        for quiet in [self.timings.pre_quiet, self.timings.post_quiet] {
            if quiet < MIN_QUIET_PERIOD {
                return Err(ConfigError::QuietPeriodTooShort {
                    actual: quiet,
                    minimum: MIN_QUIET_PERIOD,
                });
            }
        }
        if self.transfer_timeout == Duration::from_ticks(0) {
            return Err(ConfigError::ZeroTransferTimeout);
        }
        if self.poll_interval < MIN_POLL_INTERVAL {
            return Err(ConfigError::PollIntervalTooShort {
                actual: self.poll_interval,
                minimum: MIN_POLL_INTERVAL,
            });
        }
        Ok(())
    }

    /// Transfer watchdog derived from the timeout and poll interval
    pub fn watchdog(&self) -> Watchdog {
        Watchdog::new(self.transfer_timeout, self.poll_interval)
    }
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
