//=========================================================================
// Frame Loop
//=========================================================================
//
// Components:
// - `scheduler`: run/pause/resume of the host-driven frame loop
// - `tween`: timed interpolations advanced once per frame
//
//=========================================================================

mod scheduler;
mod tween;

pub use scheduler::FrameScheduler;
pub use tween::{Easing, Tween, TweenQueue};
