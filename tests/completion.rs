mod common;

mod tests {
    use std::thread::{self, JoinHandle};
    use std::time::{Duration as StdDuration, Instant as StdInstant};

    use embassy_time::Duration;
    use embedded_hal::delay::DelayNs;
    use myrtio_ws2812_dma::{
        DriverConfig, FrameState, TransferBuffer, TransferCompletion, TransferEngine, Ws2812,
    };

    use crate::common::{BYTES, FakeError, FakeSerial, new_log};

    static DONE: TransferCompletion = TransferCompletion::new();

    /// Engine whose completion arrives from another thread, like an interrupt
    struct InterruptEngine {
        latency: StdDuration,
        handler: Option<JoinHandle<()>>,
    }

    impl TransferEngine for InterruptEngine {
        type Error = FakeError;

        fn configure(&mut self) -> Result<(), FakeError> {
            DONE.reset();
            Ok(())
        }

        fn start(&mut self, _source: &[u8]) -> Result<(), FakeError> {
            DONE.arm();
            let latency = self.latency;
            self.handler = Some(thread::spawn(move || {
                thread::sleep(latency);
                DONE.signal();
            }));
            Ok(())
        }

        fn is_busy(&mut self) -> bool {
            !DONE.is_complete()
        }
    }

    struct SleepDelay;

    impl DelayNs for SleepDelay {
        fn delay_ns(&mut self, ns: u32) {
            thread::sleep(StdDuration::from_nanos(u64::from(ns)));
        }
    }

    #[test]
    fn test_flag_lifecycle() {
        let flag = TransferCompletion::new();
        assert!(flag.is_complete());
        assert!(!flag.is_pending());

        flag.arm();
        assert!(flag.is_pending());
        assert!(!flag.is_complete());

        flag.signal();
        assert!(flag.is_complete());

        flag.reset();
        assert!(flag.is_complete());
    }

    #[test]
    fn test_signal_without_arm_is_ignored() {
        let flag = TransferCompletion::new();
        flag.signal();
        flag.arm();
        assert!(flag.is_pending());
    }

    #[test]
    fn test_show_blocks_until_interrupt() {
        let log = new_log();
        let mut wire = [0u8; BYTES];
        let latency = StdDuration::from_millis(20);
        let config = DriverConfig {
            transfer_timeout: Duration::from_secs(2),
            ..DriverConfig::DEFAULT
        };

        let mut strip = match Ws2812::<_, _, _, 8, BYTES>::new(
            FakeSerial {
                log: log.clone(),
                fail: false,
            },
            InterruptEngine {
                latency,
                handler: None,
            },
            SleepDelay,
            TransferBuffer::new(&mut wire),
            &config,
        ) {
            Ok(strip) => strip,
            Err(err) => panic!("bring-up failed: {err}"),
        };

        strip.set_all_leds(255, 255, 255);
        let started = StdInstant::now();
        assert_eq!(strip.show(), Ok(()));

        assert!(started.elapsed() >= latency);
        assert!(DONE.is_complete());
        assert_eq!(strip.state(), FrameState::Idle);

        let (_, engine, _) = strip.release();
        if let Some(handler) = engine.handler {
            assert!(handler.join().is_ok());
        }
    }
}
