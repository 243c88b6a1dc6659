//=========================================================================
// Frame Scheduler
//=========================================================================
//
// Self-rescheduling per-frame loop driven by host frame callbacks.
//
// Loop:
//   start() ──request──→ FrameCallback → begin_frame() → [update, render]
//        ↑                                                      │
//        └──────────────── end_frame() ──request (unless paused)─┘
//
// At most one callback is outstanding. A callback requested before a
// pause is swallowed while paused; if it is still outstanding when the
// loop resumes, it becomes the next frame instead of a second request.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, info, trace};

//=== Internal Dependencies ===============================================

use crate::core::clock::{Clock, FrameTick};
use crate::core::platform_bridge::PlatformContext;

//=== FrameScheduler ======================================================

pub struct FrameScheduler {
    clock: Clock,
    started: bool,
    paused: bool,
    frame_requested: bool,
    frames: u64,
}

impl FrameScheduler {
    //--- Construction -----------------------------------------------------

    pub fn new(clock: Clock) -> Self {
        Self {
            clock,
            started: false,
            paused: false,
            frame_requested: false,
            frames: 0,
        }
    }

    //--- Lifecycle --------------------------------------------------------

    /// Starts the loop. Returns `false` if it was already started.
    pub fn start(&mut self, platform: &mut dyn PlatformContext) -> bool {
        if self.started {
            debug!(target: "stage::frame", "Scheduler already started");
            return false;
        }

        self.started = true;
        info!(target: "stage::frame", "Frame loop started");
        self.schedule(platform);
        true
    }

    /// Halts (`true`) or resumes (`false`) the loop.
    ///
    /// Returns `true` only when the state actually changed, so callers can
    /// skip notifying listeners on redundant requests.
    ///
    /// Resuming does not render anything itself: it only requests a frame
    /// (unless one is already in flight), and the loop continues on the
    /// next host frame callback.
    pub fn pause(&mut self, paused: bool, platform: &mut dyn PlatformContext) -> bool {
        if self.paused == paused {
            debug!(target: "stage::frame", "Pause({}) ignored, state unchanged", paused);
            return false;
        }

        self.paused = paused;
        if paused {
            info!(target: "stage::frame", "Frame loop paused after {} frames", self.frames);
        } else {
            info!(target: "stage::frame", "Frame loop resumed");
            self.schedule(platform);
        }
        true
    }

    //--- Per-frame --------------------------------------------------------

    /// Consumes a host frame callback.
    ///
    /// Yields the tick for this frame, or `None` when the callback must not
    /// produce a frame (not requested, not started, or paused).
    pub fn begin_frame(&mut self) -> Option<FrameTick> {
        if !self.frame_requested {
            trace!(target: "stage::frame", "Unrequested frame callback ignored");
            return None;
        }
        self.frame_requested = false;

        if !self.is_running() {
            debug!(target: "stage::frame", "Frame callback swallowed while paused");
            return None;
        }

        let tick = self.clock.tick();
        self.frames += 1;
        trace!(
            target: "stage::frame",
            "Frame {} (delta {:.4}s, elapsed {:.3}s)",
            self.frames,
            tick.delta,
            tick.elapsed
        );
        Some(tick)
    }

    /// Requests the next frame unless the loop was paused meanwhile.
    pub fn end_frame(&mut self, platform: &mut dyn PlatformContext) {
        self.schedule(platform);
    }

    fn schedule(&mut self, platform: &mut dyn PlatformContext) {
        if !self.is_running() || self.frame_requested {
            return;
        }
        self.frame_requested = true;
        platform.request_frame();
    }

    //--- Queries ----------------------------------------------------------

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Started and not paused.
    pub fn is_running(&self) -> bool {
        self.started && !self.paused
    }

    /// A host callback has been requested and not yet delivered.
    pub fn frame_in_flight(&self) -> bool {
        self.frame_requested
    }

    /// Frames produced since start.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn elapsed(&self) -> f64 {
        self.clock.elapsed()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
