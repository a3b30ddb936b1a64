//! Demo animation
//!
//! Sweeps a single lit pixel down the strip for each sweep color, then
//! flashes the whole strip through the flash colors, and repeats.
//! [`DemoSequence`] only produces the steps; [`run_demo_cycle`] plays one
//! full cycle on a strip.

use embassy_time::Duration;
use embedded_hal::delay::DelayNs;
use heapless::Vec;

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::color::{BLACK, BLUE, GREEN, RED, Rgb, WHITE};
use crate::driver::{DriverError, Ws2812};
use crate::peripheral::{SerialOutput, TransferEngine};

/// Maximum number of colors per demo phase group
pub const MAX_DEMO_COLORS: usize = 8;

const DEFAULT_SWEEP_COLORS: [Rgb; 4] = [RED, GREEN, BLUE, WHITE];
const DEFAULT_FLASH_COLORS: [Rgb; 5] = [RED, GREEN, BLUE, WHITE, BLACK];

/// Pauses between demo frames, on top of the protocol quiet periods
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemoTimings {
    /// Pause after each sweep frame
    pub sweep_pause: Duration,
    /// Pause after each whole-strip flash
    pub flash_pause: Duration,
}

impl Default for DemoTimings {
    fn default() -> Self {
        Self {
            sweep_pause: Duration::from_millis(200),
            flash_pause: Duration::from_millis(500),
        }
    }
}

/// Demo configuration
#[derive(Debug, Clone)]
pub struct DemoConfig {
    /// Colors swept one pixel at a time, in order
    pub sweep_colors: Vec<Rgb, MAX_DEMO_COLORS>,
    /// Colors flashed on the whole strip, in order
    pub flash_colors: Vec<Rgb, MAX_DEMO_COLORS>,
    pub timings: DemoTimings,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            sweep_colors: Vec::from_slice(&DEFAULT_SWEEP_COLORS).unwrap_or_default(),
            flash_colors: Vec::from_slice(&DEFAULT_FLASH_COLORS).unwrap_or_default(),
            timings: DemoTimings::default(),
        }
    }
}

/// What a single demo frame shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemoFrame {
    /// One pixel lit, every other pixel off
    Single { index: usize, color: Rgb },
    /// Every pixel the same color
    All(Rgb),
}

/// A frame plus the pause that follows it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemoStep {
    /// Zero-based phase within the cycle
    pub phase: usize,
    pub frame: DemoFrame,
    pub pause: Duration,
}

impl DemoStep {
    /// Apply this step's colors to a strip
    pub fn apply<S, E, D, const LEDS: usize, const BYTES: usize>(
        &self,
        strip: &mut Ws2812<'_, S, E, D, LEDS, BYTES>,
    ) where
        S: SerialOutput,
        E: TransferEngine,
        D: DelayNs,
    {
        match self.frame {
            DemoFrame::Single { index, color } => {
                strip.fill(BLACK);
                strip.set_led(index, color);
            }
            DemoFrame::All(color) => strip.fill(color),
        }
    }
}

/// Endless iterator over demo steps
#[derive(Debug, Clone)]
pub struct DemoSequence {
    config: DemoConfig,
    led_count: usize,
    phase: usize,
    led: usize,
}

impl DemoSequence {
    /// Create a sequence for a strip of `led_count` pixels
    pub fn new(config: DemoConfig, led_count: usize) -> Self {
        Self {
            config,
            led_count,
            phase: 0,
            led: 0,
        }
    }

    /// Number of phases in one cycle
    pub fn phase_count(&self) -> usize {
        self.sweep_phases() + usize::from(!self.config.flash_colors.is_empty())
    }

    /// Number of steps in one full cycle
    pub fn cycle_len(&self) -> usize {
        self.config.sweep_colors.len() * self.led_count + self.config.flash_colors.len()
    }

    /// Restart from the first step
    pub fn reset(&mut self) {
        self.phase = 0;
        self.led = 0;
    }

    fn sweep_phases(&self) -> usize {
        if self.led_count == 0 {
            0
        } else {
            self.config.sweep_colors.len()
        }
    }
}

impl Iterator for DemoSequence {
    type Item = DemoStep;

    fn next(&mut self) -> Option<DemoStep> {
        if self.cycle_len() == 0 {
            return None;
        }

        let sweeps = self.sweep_phases();
        if self.phase < sweeps {
            let step = DemoStep {
                phase: self.phase,
                frame: DemoFrame::Single {
                    index: self.led,
                    color: self.config.sweep_colors[self.phase],
                },
                pause: self.config.timings.sweep_pause,
            };
            self.led += 1;
            if self.led == self.led_count {
                self.led = 0;
                self.phase += 1;
            }
            return Some(step);
        }

        if self.config.flash_colors.is_empty() {
            self.reset();
            return self.next();
        }

        let step = DemoStep {
            phase: sweeps,
            frame: DemoFrame::All(self.config.flash_colors[self.led]),
            pause: self.config.timings.flash_pause,
        };
        self.led += 1;
        if self.led == self.config.flash_colors.len() {
            self.reset();
        }
        Some(step)
    }
}

/// Play one full demo cycle on `strip`, pausing with `pacing`
pub fn run_demo_cycle<S, E, D, P, const LEDS: usize, const BYTES: usize>(
    strip: &mut Ws2812<'_, S, E, D, LEDS, BYTES>,
    sequence: &mut DemoSequence,
    pacing: &mut P,
) -> Result<(), DriverError<S, E>>
where
    S: SerialOutput,
    E: TransferEngine,
    D: DelayNs,
    P: DelayNs,
{
    let steps = sequence.cycle_len();
    let mut last_phase = None;
    for step in sequence.by_ref().take(steps) {
        if last_phase != Some(step.phase) {
            #[cfg(feature = "esp32-log")]
            println!("demo: phase {}, {:?}", step.phase + 1, step.frame);
            last_phase = Some(step.phase);
        }
        step.apply(strip);
        strip.show()?;
        pacing.delay_ms(u32::try_from(step.pause.as_millis()).unwrap_or(u32::MAX));
    }
    Ok(())
}
