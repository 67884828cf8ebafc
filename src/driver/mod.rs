//! eDMA driver core.
//!
//! [`Edma`] owns the register-access collaborators and an arena of per-channel
//! records indexed by channel number. The submodules split the behavior:
//! [`channel`] covers allocation and start/stop control, [`transfer`] builds
//! and installs transfer descriptors, [`interrupt`] dispatches completion and
//! error interrupts to channel callbacks.

pub mod channel;
pub mod interrupt;
pub mod transfer;

use crate::config::{ClockName, EdmaConfig};
use crate::error::{Error, Result};
use crate::hal::{ClockGate, EdmaRegisters, RequestMux};

pub use channel::{ChannelSelection, ChannelSetup};
pub use interrupt::ErrorFlags;

/// Driver lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DriverState {
    /// Not yet initialized; only [`Edma::init`] is legal.
    Uninitialized,
    /// Ready; channels may be requested and transfers configured.
    Initialized,
}

/// Per-channel transfer state, as reported by [`Edma::channel_status`] and
/// passed to channel callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChannelStatus {
    /// Allocated and either idle-before-first-start or mid-transfer.
    Normal,
    /// The last major loop completed.
    Idle,
    /// The hardware flagged a transfer error; the channel has been stopped.
    Error,
}

/// Channel event callback.
///
/// Invoked from interrupt dispatch with the context word registered via
/// [`Edma::install_callback`] and the channel's new status. Runs in interrupt
/// context; keep it short and non-blocking.
pub type Callback = fn(context: usize, status: ChannelStatus);

/// One entry in the channel arena.
#[derive(Clone, Copy)]
struct ChannelSlot {
    occupied: bool,
    status: ChannelStatus,
    callback: Option<Callback>,
    context: usize,
}

impl ChannelSlot {
    const EMPTY: ChannelSlot = ChannelSlot {
        occupied: false,
        status: ChannelStatus::Normal,
        callback: None,
        context: 0,
    };
}

/// eDMA channel-management engine.
///
/// Generic over the register-access capabilities so the same logic drives
/// real hardware ([`MmioEdma`](crate::register::MmioEdma) /
/// [`MmioDmaMux`](crate::register::MmioDmaMux)) and host-test mocks.
/// `CHANNELS` is the number of physical channels, at most 32.
///
/// All mutating operations take `&mut self`; wrap the engine in
/// [`SharedEdma`](crate::sync::SharedEdma) when it is shared with interrupt
/// handlers.
pub struct Edma<R: EdmaRegisters, M: RequestMux, const CHANNELS: usize> {
    regs: R,
    mux: M,
    channels: [ChannelSlot; CHANNELS],
    minor_loop_mapping: bool,
    state: DriverState,
}

impl<R: EdmaRegisters, M: RequestMux, const CHANNELS: usize> Edma<R, M, CHANNELS> {
    /// Create an engine over the given register collaborators.
    ///
    /// The engine starts [`DriverState::Uninitialized`]; call [`Self::init`]
    /// before any channel operation.
    #[must_use]
    pub const fn new(regs: R, mux: M) -> Self {
        Self {
            regs,
            mux,
            channels: [ChannelSlot::EMPTY; CHANNELS],
            minor_loop_mapping: false,
            state: DriverState::Uninitialized,
        }
    }

    /// Initialize the module: verify clocks, apply the module configuration,
    /// and mark the driver ready.
    ///
    /// # Errors
    ///
    /// `ClockGatedOff` when the eDMA or DMAMUX clock is disabled; `Fail` when
    /// already initialized.
    pub fn init(&mut self, config: &EdmaConfig, clocks: &impl ClockGate) -> Result<()> {
        if self.state == DriverState::Initialized {
            return Err(Error::Fail);
        }
        if !clocks.is_enabled(ClockName::Edma) || !clocks.is_enabled(ClockName::DmaMux) {
            return Err(Error::ClockGatedOff);
        }

        self.regs.configure(
            config.arbitration,
            config.halt_on_error,
            config.minor_loop_mapping,
        );
        self.minor_loop_mapping = config.minor_loop_mapping;
        self.channels = [ChannelSlot::EMPTY; CHANNELS];
        self.state = DriverState::Initialized;

        #[cfg(feature = "log")]
        log::debug!("edma initialized, {} channels", CHANNELS);

        Ok(())
    }

    /// Shut the module down: release every occupied channel and return the
    /// control registers to their reset state.
    ///
    /// # Errors
    ///
    /// `Fail` when the driver was never initialized.
    pub fn deinit(&mut self) -> Result<()> {
        if self.state != DriverState::Initialized {
            return Err(Error::Fail);
        }
        for channel in 0..CHANNELS as u8 {
            if self.channels[channel as usize].occupied {
                self.mux.disconnect(channel);
            }
        }
        self.regs.reset();
        self.channels = [ChannelSlot::EMPTY; CHANNELS];
        self.state = DriverState::Uninitialized;
        Ok(())
    }

    /// Current driver lifecycle state.
    #[must_use]
    pub fn state(&self) -> DriverState {
        self.state
    }

    /// Number of physical channels managed by this engine.
    #[must_use]
    pub const fn channel_count(&self) -> usize {
        CHANNELS
    }

    /// Whether minor-loop mapping was enabled at init.
    #[must_use]
    pub fn minor_loop_mapping(&self) -> bool {
        self.minor_loop_mapping
    }

    /// Validate a channel number and return it as an arena index.
    fn channel_index(&self, channel: u8) -> Result<usize> {
        let index = channel as usize;
        if index < CHANNELS {
            Ok(index)
        } else {
            Err(Error::InvalidArgument)
        }
    }

    /// Validate that a channel is in range and occupied.
    fn occupied_index(&self, channel: u8) -> Result<usize> {
        let index = self.channel_index(channel)?;
        if self.channels[index].occupied {
            Ok(index)
        } else {
            Err(Error::Fail)
        }
    }

    /// Require an initialized driver.
    fn require_initialized(&self) -> Result<()> {
        if self.state == DriverState::Initialized {
            Ok(())
        } else {
            Err(Error::Fail)
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChannelArbitration;
    use crate::testing::{MockClockGate, MockEdmaRegisters, MockRequestMux};

    type TestEdma = Edma<MockEdmaRegisters<8>, MockRequestMux<8>, 8>;

    fn test_edma() -> TestEdma {
        Edma::new(MockEdmaRegisters::new(), MockRequestMux::new())
    }

    #[test]
    fn starts_uninitialized() {
        let edma = test_edma();
        assert_eq!(edma.state(), DriverState::Uninitialized);
        assert_eq!(edma.channel_count(), 8);
    }

    #[test]
    fn init_applies_configuration() {
        let mut edma = test_edma();
        let config = EdmaConfig::new()
            .with_arbitration(ChannelArbitration::RoundRobin)
            .with_halt_on_error(false);
        edma.init(&config, &MockClockGate::all_on()).unwrap();

        assert_eq!(edma.state(), DriverState::Initialized);
        assert_eq!(
            edma.regs.configured,
            Some((ChannelArbitration::RoundRobin, false, true))
        );
        assert!(edma.minor_loop_mapping());
    }

    #[test]
    fn init_twice_fails() {
        let mut edma = test_edma();
        let clocks = MockClockGate::all_on();
        edma.init(&EdmaConfig::new(), &clocks).unwrap();
        assert_eq!(edma.init(&EdmaConfig::new(), &clocks), Err(Error::Fail));
    }

    #[test]
    fn init_rejects_gated_clocks() {
        let mut edma = test_edma();
        let gated_edma = MockClockGate {
            edma: false,
            dma_mux: true,
        };
        assert_eq!(
            edma.init(&EdmaConfig::new(), &gated_edma),
            Err(Error::ClockGatedOff)
        );

        let gated_mux = MockClockGate {
            edma: true,
            dma_mux: false,
        };
        assert_eq!(
            edma.init(&EdmaConfig::new(), &gated_mux),
            Err(Error::ClockGatedOff)
        );
        assert_eq!(edma.state(), DriverState::Uninitialized);
    }

    #[test]
    fn deinit_resets_hardware_and_channels() {
        let mut edma = test_edma();
        edma.init(&EdmaConfig::new(), &MockClockGate::all_on())
            .unwrap();
        let ch = edma
            .request_channel(ChannelSelection::Any, 7)
            .unwrap();

        edma.deinit().unwrap();
        assert_eq!(edma.state(), DriverState::Uninitialized);
        assert_eq!(edma.regs.reset_count, 1);
        assert_eq!(edma.mux.connections[ch as usize], None);
    }

    #[test]
    fn deinit_uninitialized_fails() {
        let mut edma = test_edma();
        assert_eq!(edma.deinit(), Err(Error::Fail));
    }

    #[test]
    fn operations_require_init() {
        let mut edma = test_edma();
        assert_eq!(
            edma.request_channel(ChannelSelection::Any, 0),
            Err(Error::Fail)
        );
    }
}
