//! Error types for the eDMA driver.
//!
//! All configuration and allocation calls report failures synchronously
//! through [`Error`]. Runtime transfer errors (bus faults detected after a
//! transfer has started) are never returned from the call that started the
//! transfer; they arrive asynchronously through the error-interrupt dispatch
//! path and surface as [`ChannelStatus::Error`](crate::ChannelStatus).

/// Errors reported by the eDMA driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// A parameter is malformed: unsupported transfer size, byte count that
    /// does not divide evenly, segment-count mismatch, or loop parameters
    /// supplied while minor-loop mapping is unavailable.
    InvalidArgument,
    /// No channel could be bound: the requested channel is already occupied,
    /// or every channel is in use for a dynamic request.
    InvalidChannel,
    /// Generic operation failure, e.g. acting on a channel that was never
    /// allocated, or initializing the driver twice.
    Fail,
    /// The eDMA or DMAMUX peripheral clock is gated off.
    ClockGatedOff,
}

impl Error {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Error::InvalidArgument => "invalid argument",
            Error::InvalidChannel => "no such channel available",
            Error::Fail => "operation failed",
            Error::ClockGatedOff => "peripheral clock gated off",
        }
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result type alias for eDMA operations
pub type Result<T> = core::result::Result<T, Error>;

// =============================================================================
// Unit Tests
// =============================================================================
