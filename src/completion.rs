//! Transfer completion flag for interrupt-driven engines
//!
//! Built on `critical-section`, so it can be shared between the thread that
//! starts a transfer and the transfer-complete interrupt handler.
//!
//! ```ignore
//! static DONE: TransferCompletion = TransferCompletion::new();
//!
//! impl TransferEngine for DmaChannel {
//!     type Error = DmaError;
//!
//!     fn configure(&mut self) -> Result<(), DmaError> {
//!         self.set_memory_to_peripheral()
//!     }
//!
//!     fn start(&mut self, source: &[u8]) -> Result<(), DmaError> {
//!         DONE.arm();
//!         self.reload_and_start(source)
//!     }
//!
//!     fn is_busy(&mut self) -> bool {
//!         !DONE.is_complete()
//!     }
//! }
//!
//! #[interrupt]
//! fn DMA0_ALL() {
//!     DONE.signal();
//! }
//! ```

use core::cell::Cell;

use critical_section::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Pending,
    Complete,
}

/// One-shot completion signal shared with an interrupt handler
pub struct TransferCompletion {
    phase: Mutex<Cell<Phase>>,
}

impl TransferCompletion {
    /// Create a flag with no transfer in flight
    pub const fn new() -> Self {
        Self {
            phase: Mutex::new(Cell::new(Phase::Idle)),
        }
    }

    /// Mark a transfer as started
    pub fn arm(&self) {
        critical_section::with(|cs| self.phase.borrow(cs).set(Phase::Pending));
    }

    /// Report that the armed transfer finished
    ///
    /// Intended to be called from the completion interrupt. A signal with
    /// nothing armed is ignored.
    pub fn signal(&self) {
        critical_section::with(|cs| {
            let phase = self.phase.borrow(cs);
            if phase.get() == Phase::Pending {
                phase.set(Phase::Complete);
            }
        });
    }

    /// Whether an armed transfer has not been signalled yet
    pub fn is_pending(&self) -> bool {
        critical_section::with(|cs| self.phase.borrow(cs).get() == Phase::Pending)
    }

    /// Whether no transfer is outstanding
    pub fn is_complete(&self) -> bool {
        !self.is_pending()
    }

    /// Forget any armed or completed transfer
    pub fn reset(&self) {
        critical_section::with(|cs| self.phase.borrow(cs).set(Phase::Idle));
    }
}

impl Default for TransferCompletion {
    fn default() -> Self {
        Self::new()
    }
}
