#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use myrtio_ws2812_dma::{
    DriverConfig, SerialConfig, SerialOutput, TransferBuffer, TransferEngine, Ws2812,
    buffer_size,
};

pub const LEDS: usize = 8;
pub const BYTES: usize = buffer_size(LEDS);

pub type TestStrip<'a> = Ws2812<'a, FakeSerial, FakeEngine, FakeDelay, LEDS, BYTES>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FakeError;

/// Everything the fakes observed, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HwEvent {
    Configure(SerialConfig),
    EngineConfigure,
    Start(Vec<u8>),
    Poll { busy: bool },
    DelayNs(u32),
    DelayUs(u32),
    DelayMs(u32),
}

pub type HwLog = Rc<RefCell<Vec<HwEvent>>>;

pub fn new_log() -> HwLog {
    Rc::new(RefCell::new(Vec::new()))
}

pub struct FakeSerial {
    pub log: HwLog,
    pub fail: bool,
}

impl SerialOutput for FakeSerial {
    type Error = FakeError;

    fn configure(&mut self, config: &SerialConfig) -> Result<(), FakeError> {
        if self.fail {
            return Err(FakeError);
        }
        self.log.borrow_mut().push(HwEvent::Configure(*config));
        Ok(())
    }
}

/// Engine that stays busy for `busy_polls` polls after each start
pub struct FakeEngine {
    pub log: HwLog,
    pub busy_polls: usize,
    pub remaining: usize,
    pub stuck: Rc<Cell<bool>>,
    pub fail_configure: bool,
    pub fail_start: bool,
}

impl FakeEngine {
    pub fn new(log: &HwLog, busy_polls: usize) -> Self {
        Self {
            log: log.clone(),
            busy_polls,
            remaining: 0,
            stuck: Rc::new(Cell::new(false)),
            fail_configure: false,
            fail_start: false,
        }
    }
}

impl TransferEngine for FakeEngine {
    type Error = FakeError;

    fn configure(&mut self) -> Result<(), FakeError> {
        if self.fail_configure {
            return Err(FakeError);
        }
        self.log.borrow_mut().push(HwEvent::EngineConfigure);
        Ok(())
    }

    fn start(&mut self, source: &[u8]) -> Result<(), FakeError> {
        if self.fail_start {
            return Err(FakeError);
        }
        self.log.borrow_mut().push(HwEvent::Start(source.to_vec()));
        self.remaining = self.busy_polls;
        Ok(())
    }

    fn is_busy(&mut self) -> bool {
        let busy = if self.stuck.get() {
            true
        } else if self.remaining > 0 {
            self.remaining -= 1;
            true
        } else {
            false
        };
        self.log.borrow_mut().push(HwEvent::Poll { busy });
        busy
    }
}

pub struct FakeDelay {
    pub log: HwLog,
}

impl DelayNs for FakeDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.log.borrow_mut().push(HwEvent::DelayNs(ns));
    }

    fn delay_us(&mut self, us: u32) {
        self.log.borrow_mut().push(HwEvent::DelayUs(us));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.log.borrow_mut().push(HwEvent::DelayMs(ms));
    }
}

/// Build a strip over `wire` with fakes sharing `log`
pub fn strip<'a>(
    wire: &'a mut [u8; BYTES],
    log: &HwLog,
    busy_polls: usize,
    config: &DriverConfig,
) -> TestStrip<'a> {
    let serial = FakeSerial {
        log: log.clone(),
        fail: false,
    };
    let engine = FakeEngine::new(log, busy_polls);
    let delay = FakeDelay { log: log.clone() };
    match Ws2812::new(serial, engine, delay, TransferBuffer::new(wire), config) {
        Ok(strip) => strip,
        Err(err) => panic!("strip bring-up failed: {err}"),
    }
}

/// All frames handed to the transfer engine so far
pub fn started_frames(log: &HwLog) -> Vec<Vec<u8>> {
    log.borrow()
        .iter()
        .filter_map(|event| match event {
            HwEvent::Start(bytes) => Some(bytes.clone()),
            _ => None,
        })
        .collect()
}
