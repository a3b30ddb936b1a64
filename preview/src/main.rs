//! Desktop preview for the WS2812 driver
//!
//! Plays the demo animation through a simulated serial output, captures the
//! bytes the transfer engine would have clocked out, decodes them back into
//! pixels and draws those. What is on screen is exactly what the wire said.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Instant as StdInstant;

use eframe::egui::{self};
use embedded_hal::delay::DelayNs;
use myrtio_ws2812_dma::{
    BYTES_PER_LED, DEFAULT_LED_COUNT, DecodeError, DemoConfig, DemoSequence, DriverConfig,
    DriverError, FrameState, Rgb, SerialConfig, SerialOutput, TransferBuffer, TransferCompletion,
    TransferEngine, Ws2812, buffer_size, decode_frame,
};

const LEDS: usize = DEFAULT_LED_COUNT;
const BYTES: usize = buffer_size(LEDS);

/// Size of each LED rectangle in pixels
const LED_SIZE: f32 = 48.0;

/// Gap between LEDs
const LED_GAP: f32 = 6.0;

type PreviewStrip = Ws2812<'static, SimSerial, SimEngine, NoDelay, LEDS, BYTES>;

/// Serial output that only remembers its settings
struct SimSerial {
    config: Rc<Cell<Option<SerialConfig>>>,
}

impl SerialOutput for SimSerial {
    type Error = ();

    fn configure(&mut self, config: &SerialConfig) -> Result<(), ()> {
        self.config.set(Some(*config));
        Ok(())
    }
}

/// Completion of the simulated transfer, signalled as an interrupt would
static TRANSFER_DONE: TransferCompletion = TransferCompletion::new();

/// Transfer engine that copies each frame to `wire` and signals completion
/// straight away, unless `stalled` is set
struct SimEngine {
    wire: Rc<RefCell<Vec<u8>>>,
    stalled: Rc<Cell<bool>>,
}

impl TransferEngine for SimEngine {
    type Error = ();

    fn configure(&mut self) -> Result<(), ()> {
        TRANSFER_DONE.reset();
        Ok(())
    }

    fn start(&mut self, source: &[u8]) -> Result<(), ()> {
        TRANSFER_DONE.arm();
        let mut wire = self.wire.borrow_mut();
        wire.clear();
        wire.extend_from_slice(source);
        if !self.stalled.get() {
            TRANSFER_DONE.signal();
        }
        Ok(())
    }

    fn is_busy(&mut self) -> bool {
        !TRANSFER_DONE.is_complete()
    }
}

/// Quiet periods and polls take no wall time in the preview
struct NoDelay;

impl DelayNs for NoDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}

fn main() -> eframe::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([640.0, 360.0])
            .with_title("WS2812 Preview"),
        ..Default::default()
    };

    eframe::run_native(
        "myrtio-ws2812-preview",
        options,
        Box::new(|_cc| {
            let app =
                PreviewApp::new().map_err(|err| format!("driver bring-up failed: {err}"))?;
            Ok(Box::new(app))
        }),
    )
}

struct PreviewApp {
    strip: PreviewStrip,
    sequence: DemoSequence,
    /// Bytes captured from the last started transfer
    wire: Rc<RefCell<Vec<u8>>>,
    stalled: Rc<Cell<bool>>,
    serial_config: Rc<Cell<Option<SerialConfig>>>,

    /// Pixels decoded from `wire`
    pixels: [Rgb; LEDS],
    decode_error: Option<DecodeError>,
    last_error: Option<DriverError<SimSerial, SimEngine>>,
    phase: usize,
    frames: u64,

    /// Time left before the next demo step, in milliseconds
    remaining_ms: f64,
    last_frame: StdInstant,
    playing: bool,
    /// Time scale multiplier (1.0 = realtime)
    time_scale: f32,
    led_size: f32,
}

impl PreviewApp {
    fn new() -> Result<Self, DriverError<SimSerial, SimEngine>> {
        let wire = Rc::new(RefCell::new(Vec::with_capacity(BYTES)));
        let stalled = Rc::new(Cell::new(false));
        let serial_config = Rc::new(Cell::new(None));

        let buffer: &'static mut [u8; BYTES] = Box::leak(Box::new([0; BYTES]));
        let strip = Ws2812::new(
            SimSerial {
                config: serial_config.clone(),
            },
            SimEngine {
                wire: wire.clone(),
                stalled: stalled.clone(),
            },
            NoDelay,
            TransferBuffer::new(buffer),
            &DriverConfig::DEFAULT,
        )?;

        Ok(Self {
            strip,
            sequence: DemoSequence::new(DemoConfig::default(), LEDS),
            wire,
            stalled,
            serial_config,
            pixels: [Rgb::default(); LEDS],
            decode_error: None,
            last_error: None,
            phase: 0,
            frames: 0,
            remaining_ms: 0.0,
            last_frame: StdInstant::now(),
            playing: true,
            time_scale: 1.0,
            led_size: LED_SIZE,
        })
    }

    /// Restart the animation from the first sweep
    fn reset(&mut self) {
        self.sequence.reset();
        self.remaining_ms = 0.0;
        self.last_frame = StdInstant::now();
    }

    /// Show the next demo frame and capture what went out
    fn step(&mut self) {
        let Some(step) = self.sequence.next() else {
            return;
        };
        self.phase = step.phase;
        #[allow(clippy::cast_precision_loss)]
        let pause_ms = step.pause.as_millis() as f64;
        self.remaining_ms += pause_ms;

        step.apply(&mut self.strip);
        match self.strip.show() {
            Ok(()) => {
                self.last_error = None;
                self.frames += 1;
            }
            Err(err) => {
                self.last_error = Some(err);
                return;
            }
        }

        self.decode_error = decode_frame(&self.wire.borrow(), &mut self.pixels).err();
    }

    /// Advance by wall-clock time scaled by `time_scale`
    fn update_time(&mut self) {
        let now = StdInstant::now();
        let delta = now.duration_since(self.last_frame);
        self.last_frame = now;

        if !self.playing {
            return;
        }
        let delta_ms = delta.as_secs_f64() * 1000.0 * f64::from(self.time_scale);
        if delta_ms.is_finite() {
            self.remaining_ms -= delta_ms;
        }
        // Bounded so a long stall does not replay a whole backlog at once
        let mut budget = self.sequence.cycle_len();
        while self.remaining_ms <= 0.0 && budget > 0 {
            self.step();
            budget -= 1;
            if self.strip.state() == FrameState::Fault {
                self.remaining_ms = 0.0;
                break;
            }
        }
    }

    fn status_label(&self) -> String {
        let state = self.strip.state();
        match (&self.last_error, &self.decode_error) {
            (Some(err), _) => format!("{state:?}: {err}"),
            (None, Some(err)) => format!("{state:?}: wire decode failed, {err}"),
            (None, None) => format!("{state:?}"),
        }
    }
}

impl eframe::App for PreviewApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.update_time();

        // Request continuous repaint for animation
        ctx.request_repaint();

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.vertical(|ui| {
                    ui.horizontal(|ui| {
                        if ui.button("⏮ Reset").clicked() {
                            self.reset();
                        }
                        if ui
                            .button(if self.playing { "⏸ Pause" } else { "▶ Play" })
                            .clicked()
                        {
                            self.playing = !self.playing;
                        }
                        if ui.button("⏭ Step").clicked() {
                            self.remaining_ms = 0.0;
                            self.step();
                        }
                    });

                    ui.add_space(4.0);

                    ui.horizontal(|ui| {
                        ui.label("Speed:");
                        ui.add(egui::Slider::new(&mut self.time_scale, 0.1..=5.0).logarithmic(true));
                    });

                    ui.horizontal(|ui| {
                        ui.label("Size:");
                        ui.add(egui::Slider::new(&mut self.led_size, 8.0..=96.0));
                    });
                });

                ui.add_space(16.0);

                ui.vertical(|ui| {
                    let mut stalled = self.stalled.get();
                    if ui.checkbox(&mut stalled, "Stall transfer engine").changed() {
                        self.stalled.set(stalled);
                    }
                    let faulted = self.strip.state() == FrameState::Fault;
                    if ui
                        .add_enabled(faulted, egui::Button::new("Clear fault"))
                        .clicked()
                    {
                        TRANSFER_DONE.reset();
                        self.strip.clear_fault();
                        self.last_error = None;
                    }
                });
            });

            ui.add_space(8.0);

            ui.label(format!(
                "Phase {} of {} | frames shown: {} | {}",
                self.phase + 1,
                self.sequence.phase_count(),
                self.frames,
                self.status_label()
            ));
            if let Some(config) = self.serial_config.get() {
                ui.label(format!(
                    "Output: {} Hz, {:?}, {} ns per symbol, {} bytes per frame",
                    config.frequency_hz,
                    config.bit_order,
                    config.symbol_period_ns(),
                    BYTES
                ));
            }

            ui.add_space(16.0);

            // === LED Display ===
            let available_width = ui.available_width();
            let led_pitch = self.led_size + LED_GAP;
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let leds_per_row = (available_width / led_pitch).floor().max(1.0) as usize;
            let rows = LEDS.div_ceil(leds_per_row);
            #[allow(clippy::cast_precision_loss)]
            let height = rows as f32 * led_pitch;

            let (response, painter) =
                ui.allocate_painter(egui::vec2(available_width, height), egui::Sense::hover());
            let origin = response.rect.min;

            #[allow(clippy::cast_precision_loss)]
            for (i, pixel) in self.pixels.iter().enumerate() {
                let row = i / leds_per_row;
                let col = i % leds_per_row;
                let x = origin.x + col as f32 * led_pitch;
                let y = origin.y + row as f32 * led_pitch;

                let rect = egui::Rect::from_min_size(
                    egui::pos2(x, y),
                    egui::vec2(self.led_size, self.led_size),
                );
                painter.rect_filled(rect, 3.0, egui::Color32::from_rgb(pixel.r, pixel.g, pixel.b));
            }

            ui.add_space(16.0);

            // Raw wire bytes, one pixel per line
            ui.monospace("Wire (G R B groups):");
            let wire = self.wire.borrow();
            for (i, block) in wire.chunks(BYTES_PER_LED).enumerate() {
                let hex: Vec<String> = block.iter().map(|byte| format!("{byte:02X}")).collect();
                ui.monospace(format!("{i}: {}", hex.join(" ")));
            }
        });
    }
}
