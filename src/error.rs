use core::fmt;

use embassy_time::Duration;

/// Invalid driver configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Output clock frequency is zero
    ZeroFrequency,
    /// A quiet period is shorter than the WS2812 reset threshold
    QuietPeriodTooShort { actual: Duration, minimum: Duration },
    /// Transfer watchdog is zero
    ZeroTransferTimeout,
    /// Busy polls would not wait between checks
    PollIntervalTooShort { actual: Duration, minimum: Duration },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroFrequency => f.write_str("output frequency must be non-zero"),
            Self::QuietPeriodTooShort { actual, minimum } => write!(
                f,
                "quiet period of {}us is below the {}us reset threshold",
                actual.as_micros(),
                minimum.as_micros()
            ),
            Self::ZeroTransferTimeout => f.write_str("transfer timeout must be non-zero"),
            Self::PollIntervalTooShort { actual, minimum } => write!(
                f,
                "poll interval of {}us is below the {}us minimum",
                actual.as_micros(),
                minimum.as_micros()
            ),
        }
    }
}

impl core::error::Error for ConfigError {}

/// Driver error
///
/// `SE` is the serial output error, `TE` the transfer engine error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error<SE, TE> {
    /// Configuration rejected before touching hardware
    Config(ConfigError),
    /// Serial output could not be brought up
    Serial(SE),
    /// Transfer engine could not be brought up
    Engine(TE),
    /// Transfer engine refused to start a transfer
    Transfer(TE),
    /// Transfer engine stayed busy past the watchdog interval
    TransferTimeout,
    /// A previous transfer timed out; the buffer may still be in use
    Faulted,
}

impl<SE, TE> From<ConfigError> for Error<SE, TE> {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl<SE: fmt::Debug, TE: fmt::Debug> fmt::Display for Error<SE, TE> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(err) => write!(f, "invalid configuration: {err}"),
            Self::Serial(err) => write!(f, "serial output bring-up failed: {err:?}"),
            Self::Engine(err) => write!(f, "transfer engine bring-up failed: {err:?}"),
            Self::Transfer(err) => write!(f, "transfer failed to start: {err:?}"),
            Self::TransferTimeout => f.write_str("transfer engine did not complete in time"),
            Self::Faulted => f.write_str("driver is faulted after a transfer timeout"),
        }
    }
}

impl<SE: fmt::Debug, TE: fmt::Debug> core::error::Error for Error<SE, TE> {}

/// Wire bytes that are not a valid WS2812 encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// Byte at `offset` holds a 4-bit group other than `1000` or `1100`
    InvalidSymbol { offset: usize },
    /// Input length is not a whole number of pixels
    Truncated { len: usize },
}

impl DecodeError {
    /// Move a byte offset relative to a larger buffer
    pub(crate) const fn shifted(self, base: usize) -> Self {
        match self {
            Self::InvalidSymbol { offset } => Self::InvalidSymbol {
                offset: base + offset,
            },
            Self::Truncated { len } => Self::Truncated { len },
        }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSymbol { offset } => write!(f, "invalid symbol at byte {offset}"),
            Self::Truncated { len } => write!(f, "{len} bytes is not a whole number of pixels"),
        }
    }
}

impl core::error::Error for DecodeError {}
