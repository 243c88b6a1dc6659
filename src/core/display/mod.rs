//=========================================================================
// Display Subsystem
//=========================================================================
//
// Head-mounted display contract and one-shot discovery.
//
// Components:
// - `device`: the `HeadMountedDisplay` trait, value types, simulator
// - `discovery`: asynchronous enumeration delivered over a channel
//
//=========================================================================

//=== Module Declarations =================================================

mod device;
mod discovery;

//=== Public API ==========================================================

pub use device::{
    DisplayHandle, Eye, EyeParameters, HeadMountedDisplay, Pose, SimulatedDisplay,
    StageDimensions,
};
pub use discovery::{
    DiscoveryOutcome, DiscoveryResolution, DiscoveryResponder, DiscoveryStatus,
    DisplayDiscovery, DisplayList,
};
