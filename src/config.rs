//! Configuration types for the eDMA driver.

/// Channel arbitration policy.
///
/// Selects which pending channel request the hardware services next when
/// several channels are asserting requests at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChannelArbitration {
    /// Fixed priority: the highest-numbered requesting channel wins.
    #[default]
    FixedPriority,
    /// Round robin: channels are serviced cyclically.
    RoundRobin,
}

/// Peripheral clocks consumed by the engine.
///
/// Queried through [`ClockGate`](crate::hal::ClockGate) at init time; the
/// driver refuses to touch a clock-gated-off peripheral.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockName {
    /// The eDMA controller clock.
    Edma,
    /// The DMA request multiplexer clock.
    DmaMux,
}

/// Module-level configuration applied by [`Edma::init`](crate::Edma::init).
///
/// # Example
///
/// ```ignore
/// let config = EdmaConfig::new()
///     .with_arbitration(ChannelArbitration::RoundRobin)
///     .with_halt_on_error(false);
/// edma.init(&config, &clocks)?;
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EdmaConfig {
    /// Channel arbitration policy.
    pub arbitration: ChannelArbitration,
    /// When `true`, any channel error sets the controller HALT bit and all
    /// service requests are ignored until the error is handled.
    pub halt_on_error: bool,
    /// Enables minor-loop mapping (the NBYTES register layout that carries
    /// per-loop offsets and offset-enable flags). Required for loop
    /// transfers that use minor-loop offsets or channel linking.
    pub minor_loop_mapping: bool,
}

impl Default for EdmaConfig {
    fn default() -> Self {
        Self {
            arbitration: ChannelArbitration::FixedPriority,
            halt_on_error: true,
            minor_loop_mapping: true,
        }
    }
}

impl EdmaConfig {
    /// Create a configuration with default settings (fixed-priority
    /// arbitration, halt on error, minor-loop mapping enabled).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the channel arbitration policy.
    #[must_use]
    pub fn with_arbitration(mut self, arbitration: ChannelArbitration) -> Self {
        self.arbitration = arbitration;
        self
    }

    /// Set the halt-on-error behavior.
    #[must_use]
    pub fn with_halt_on_error(mut self, halt: bool) -> Self {
        self.halt_on_error = halt;
        self
    }

    /// Enable or disable minor-loop mapping.
    #[must_use]
    pub fn with_minor_loop_mapping(mut self, enable: bool) -> Self {
        self.minor_loop_mapping = enable;
        self
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
