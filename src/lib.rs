#![no_std]

pub mod buffer;
pub mod color;
pub mod completion;
pub mod config;
pub mod demo;
pub mod driver;
pub mod encoder;
pub mod error;
pub mod peripheral;
pub mod state;

pub use buffer::{TransferBuffer, buffer_size};
pub use completion::TransferCompletion;
pub use config::{DEFAULT_LED_COUNT, DriverConfig, FrameTimings};
pub use demo::{DemoConfig, DemoSequence, DemoTimings, run_demo_cycle};
pub use driver::{DriverError, Ws2812};
pub use encoder::{BYTES_PER_LED, Symbol, decode_byte, decode_frame, encode_byte, encode_frame};
pub use error::{ConfigError, DecodeError, Error};
pub use peripheral::{
    BitOrder, PeripheralSession, SerialConfig, SerialOutput, TransferEngine, Watchdog,
};
pub use state::FrameState;

pub use color::Rgb;
pub use embassy_time::Duration;
pub use smart_leds::SmartLedsWrite;
