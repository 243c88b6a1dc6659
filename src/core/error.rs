//=========================================================================
// Error Types
//=========================================================================
//
// Error enums for every recoverable failure in the stage core.
//
// None of these are fatal inside the core: discovery and presentation
// failures degrade to the fallback path and are only logged. Config
// errors surface to the binary, which decides whether to abort.
//
//=========================================================================

//=== External Dependencies ===============================================

use thiserror::Error;

//=== DiscoveryError ======================================================

/// Failure reported by the host while enumerating head-mounted displays.
///
/// Distinct from "no device found": a rejection means the platform could
/// not answer at all. Both outcomes route to the fallback path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiscoveryError {
    /// The host has no device-enumeration capability.
    #[error("display enumeration is not supported by this platform")]
    Unsupported,

    /// The host rejected the enumeration request.
    #[error("display enumeration rejected: {0}")]
    Rejected(String),

    /// The host dropped the request without ever answering.
    #[error("display enumeration was abandoned by the host")]
    Abandoned,
}

//=== PresentError ========================================================

/// Failure while asking a device to start presenting frames.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PresentError {
    /// The device is no longer connected.
    #[error("display '{0}' is disconnected")]
    Disconnected(String),

    /// The device refused the request (user gesture missing, busy, ...).
    #[error("display refused to present: {0}")]
    Refused(String),
}

//=== ConfigError =========================================================

/// Configuration loading and saving errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

//=========================================================================
// Unit Tests
//=========================================================================
