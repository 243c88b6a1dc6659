//=========================================================================
// Event Collector
//=========================================================================
//
// Core-side draining of host notifications with shutdown detection.
//
// Architecture:
//   Receiver<HostEvent> → collect() → pending events → TickControl
//
// Draining is bounded per pump so a flooding host cannot starve the
// frame loop. There is no idle sleep: the orchestrator runs on the host's
// own thread and returns control to it after every pump.
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{Receiver, TryRecvError};
use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::HostEvent;

//=== TickControl =========================================================

/// Pump control signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickControl {
    Continue,
    Exit,
}

//=== EventCollector ======================================================

/// Collects host events with bounded draining.
pub(crate) struct EventCollector {
    receiver: Receiver<HostEvent>,
    pending: Vec<HostEvent>,
}

impl EventCollector {
    const MAX_EVENTS_PER_PUMP: usize = 256;

    pub(crate) fn new(receiver: Receiver<HostEvent>) -> Self {
        Self {
            receiver,
            pending: Vec::with_capacity(16),
        }
    }

    /// Drains queued host events.
    ///
    /// Events received before a close request are kept so the caller can
    /// still apply them; the close request itself yields `Exit`.
    pub(crate) fn collect(&mut self) -> TickControl {
        let mut drained = 0;

        while drained < Self::MAX_EVENTS_PER_PUMP {
            match self.receiver.try_recv() {
                Ok(HostEvent::CloseRequested) => {
                    debug!(target: "platform", "Host requested close");
                    return TickControl::Exit;
                }
                Ok(event) => {
                    self.pending.push(event);
                    drained += 1;
                }
                Err(TryRecvError::Disconnected) => {
                    debug!(target: "platform", "Host channel disconnected");
                    return TickControl::Exit;
                }
                Err(TryRecvError::Empty) => break,
            }
        }

        if drained >= Self::MAX_EVENTS_PER_PUMP {
            warn!(target: "platform", "Host event backlog: drained {} events this pump", drained);
        }

        TickControl::Continue
    }

    pub(crate) fn events(&self) -> &[HostEvent] {
        &self.pending
    }

    /// Takes ownership of collected events, leaving an empty buffer.
    pub(crate) fn take_events(&mut self) -> Vec<HostEvent> {
        std::mem::take(&mut self.pending)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
