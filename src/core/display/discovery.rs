//=========================================================================
// Display Discovery
//=========================================================================
//
// One-shot asynchronous enumeration of head-mounted displays.
//
// Architecture:
//   discover() ──→ DiscoveryResponder ──→ PlatformContext::enumerate_displays
//                                                 │ (answers later)
//   poll() ←── Receiver<DisplayList> ←────────────┘
//
// This is the only suspension point in the stage core. The answer is
// picked up by `poll()` on the orchestrator's pump, never awaited.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;

use crossbeam_channel::{bounded, Receiver, Sender, TryRecvError};
use log::{debug, error, info, warn};

//=== Internal Dependencies ===============================================

use super::{DisplayHandle, StageDimensions};
use crate::core::error::DiscoveryError;

//=== Types ===============================================================

/// What the host answers to an enumeration request.
pub type DisplayList = Result<Vec<DisplayHandle>, DiscoveryError>;

/// Result of a discovery attempt.
///
/// `NotFound` and `Failed` both route to the fallback path but stay
/// distinguishable.
#[derive(Clone)]
pub enum DiscoveryOutcome {
    Found(DisplayHandle),
    NotFound,
    Failed(DiscoveryError),
}

impl DiscoveryOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    pub fn device(&self) -> Option<&DisplayHandle> {
        match self {
            Self::Found(device) => Some(device),
            _ => None,
        }
    }
}

impl fmt::Debug for DiscoveryOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Found(device) => write!(f, "Found({:?})", device.display_name()),
            Self::NotFound => write!(f, "NotFound"),
            Self::Failed(err) => write!(f, "Failed({:?})", err),
        }
    }
}

/// A resolved discovery together with the stage size to use.
#[derive(Debug, Clone)]
pub struct DiscoveryResolution {
    pub outcome: DiscoveryOutcome,
    pub stage: StageDimensions,
}

/// Lifecycle of the single discovery attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscoveryStatus {
    Idle,
    Pending,
    Resolved,
}

//=== DiscoveryResponder ==================================================

/// Handed to the host; consumed when the host answers.
///
/// Dropping it without answering resolves the discovery as
/// [`DiscoveryError::Abandoned`].
pub struct DiscoveryResponder {
    sender: Sender<DisplayList>,
}

impl DiscoveryResponder {
    /// Answers with the displays the host found (possibly none).
    pub fn resolve(self, displays: Vec<DisplayHandle>) {
        self.send(Ok(displays));
    }

    /// Answers with a platform failure.
    pub fn reject(self, error: DiscoveryError) {
        self.send(Err(error));
    }

    fn send(self, answer: DisplayList) {
        if self.sender.send(answer).is_err() {
            warn!(target: "stage::discovery", "Discovery answered after the requester went away");
        }
    }
}

//=== DisplayDiscovery ====================================================

/// Runs the one-shot display enumeration.
pub struct DisplayDiscovery {
    default_stage: StageDimensions,
    receiver: Option<Receiver<DisplayList>>,
    status: DiscoveryStatus,
}

impl DisplayDiscovery {
    /// `default_stage` is used when a found device reports no stage.
    pub fn new(default_stage: StageDimensions) -> Self {
        Self {
            default_stage,
            receiver: None,
            status: DiscoveryStatus::Idle,
        }
    }

    pub fn status(&self) -> DiscoveryStatus {
        self.status
    }

    //--- Request ----------------------------------------------------------

    /// Starts the attempt and returns the responder for the host.
    ///
    /// Returns `None` if discovery was already attempted; it is never
    /// retried.
    pub fn discover(&mut self) -> Option<DiscoveryResponder> {
        if self.status != DiscoveryStatus::Idle {
            debug!(target: "stage::discovery", "Discovery already attempted, ignoring");
            return None;
        }

        info!(target: "stage::discovery", "Waiting to detect a connected display...");
        let (sender, receiver) = bounded(1);
        self.receiver = Some(receiver);
        self.status = DiscoveryStatus::Pending;
        Some(DiscoveryResponder { sender })
    }

    //--- Continuation -----------------------------------------------------

    /// Picks up the host's answer if it has arrived.
    ///
    /// Yields `Some` exactly once per attempt.
    pub fn poll(&mut self) -> Option<DiscoveryResolution> {
        let receiver = self.receiver.as_ref()?;

        let answer = match receiver.try_recv() {
            Ok(answer) => answer,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => Err(DiscoveryError::Abandoned),
        };

        self.receiver = None;
        self.status = DiscoveryStatus::Resolved;
        Some(self.resolve(answer))
    }

    fn resolve(&self, answer: DisplayList) -> DiscoveryResolution {
        let outcome = match answer {
            Ok(displays) => match displays.into_iter().next() {
                Some(device) => {
                    info!(
                        target: "stage::discovery",
                        "Display detected: {}",
                        device.display_name()
                    );
                    DiscoveryOutcome::Found(device)
                }
                None => {
                    info!(target: "stage::discovery", "No display connected");
                    DiscoveryOutcome::NotFound
                }
            },
            Err(err) => {
                error!(target: "stage::discovery", "Could not get displays: {}", err);
                DiscoveryOutcome::Failed(err)
            }
        };

        let stage = outcome
            .device()
            .and_then(|device| device.stage_parameters())
            .unwrap_or(self.default_stage);

        DiscoveryResolution { outcome, stage }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
