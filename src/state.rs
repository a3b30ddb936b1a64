//! Frame lifecycle state machine
//!
//! One `show` walks `Idle -> PreDelay -> Encoding -> Transferring ->
//! PostDelay -> Idle`. A transfer that never completes parks the driver in
//! `Fault`.

/// Frame lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameState {
    /// No transfer in flight, colors may be changed
    Idle,
    /// Holding the line low before the frame
    PreDelay,
    /// Writing the transfer buffer
    Encoding,
    /// Transfer engine is moving the buffer out
    Transferring,
    /// Holding the line low so the chain latches
    PostDelay,
    /// Transfer never completed; the buffer may still be in use
    Fault,
}

/// Events driving [`FrameState`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameEvent {
    /// A frame was requested
    Show,
    /// The current step finished
    StepDone,
    /// The transfer engine missed its watchdog, or refused to start
    TransferFailed { stuck: bool },
    /// The caller cleared a fault after resetting the engine
    ClearFault,
}

impl FrameState {
    /// Whether colors and the transfer buffer are free to change
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Whether the transfer buffer may be read by the engine
    pub fn buffer_in_use(&self) -> bool {
        matches!(self, Self::Transferring | Self::Fault)
    }

    /// Process an event and return the next state
    #[allow(clippy::enum_glob_use)]
    pub fn transition(self, event: FrameEvent) -> Self {
        use FrameEvent::*;
        use FrameState::*;

        match (self, event) {
            (Idle, Show) => PreDelay,
            (PreDelay, StepDone) => Encoding,
            (Encoding, StepDone) => Transferring,
            (Transferring, StepDone) => PostDelay,
            (PostDelay, StepDone) => Idle,

            // A refused start leaves nothing in flight
            (Transferring, TransferFailed { stuck: false }) => Idle,
            (Transferring, TransferFailed { stuck: true }) => Fault,

            (Fault, ClearFault) => Idle,

            // Default: stay in current state
            _ => self,
        }
    }
}
