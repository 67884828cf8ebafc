//! Channel allocation and control.
//!
//! The allocator hands out physical channels from the arena, either a caller
//! named channel (static) or the lowest-numbered free one (dynamic). The
//! controller half starts and stops the hardware request gate and reports
//! per-channel status.

use crate::descriptor::Tcd;
use crate::error::{Error, Result};
use crate::hal::{EdmaRegisters, RequestMux};

use super::{Callback, ChannelStatus, Edma};

/// How [`Edma::request_channel`] picks a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChannelSelection {
    /// Dynamic: the lowest-numbered free channel.
    Any,
    /// Static: exactly this channel, failing if it is taken.
    Fixed(u8),
}

/// One-call channel setup: selection, request routing, and callback.
#[derive(Debug, Clone, Copy)]
pub struct ChannelSetup {
    /// Static or dynamic channel selection.
    pub selection: ChannelSelection,
    /// DMAMUX request source to route to the channel.
    pub source: u8,
    /// Completion/error callback, if any.
    pub callback: Option<Callback>,
    /// Context word handed back to the callback.
    pub context: usize,
}

impl<R: EdmaRegisters, M: RequestMux, const CHANNELS: usize> Edma<R, M, CHANNELS> {
    /// Request a channel and route `source` to it through the multiplexer.
    ///
    /// The channel's TCD is reset to a known state, its error interrupt is
    /// enabled, and its status starts [`ChannelStatus::Normal`]. Returns the
    /// channel number.
    ///
    /// # Errors
    ///
    /// `InvalidChannel` when the named channel is occupied or no free channel
    /// exists; `InvalidArgument` when the named channel is out of range;
    /// `Fail` before init.
    pub fn request_channel(&mut self, selection: ChannelSelection, source: u8) -> Result<u8> {
        self.require_initialized()?;

        let channel = match selection {
            ChannelSelection::Fixed(channel) => {
                let index = self.channel_index(channel)?;
                if self.channels[index].occupied {
                    return Err(Error::InvalidChannel);
                }
                channel
            }
            ChannelSelection::Any => {
                let free = self.channels.iter().position(|slot| !slot.occupied);
                match free {
                    Some(index) => index as u8,
                    None => return Err(Error::InvalidChannel),
                }
            }
        };

        self.regs.write_tcd(channel, &Tcd::ZERO);
        self.regs.enable_error_interrupt(channel);
        self.mux.connect(channel, source);

        let slot = &mut self.channels[channel as usize];
        slot.occupied = true;
        slot.status = ChannelStatus::Normal;
        slot.callback = None;
        slot.context = 0;

        #[cfg(feature = "log")]
        log::debug!("channel {} allocated, source {}", channel, source);

        Ok(channel)
    }

    /// Release a channel back to the pool.
    ///
    /// Disables its request gate, error interrupt, and multiplexer route,
    /// then clears the arena slot so no status or callback leaks to the next
    /// owner.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` when the channel is out of range; `Fail` when it was
    /// never allocated.
    pub fn release_channel(&mut self, channel: u8) -> Result<()> {
        let index = self.channel_index(channel)?;
        if !self.channels[index].occupied {
            #[cfg(feature = "log")]
            log::warn!("release of unallocated channel {}", channel);
            return Err(Error::Fail);
        }

        self.regs.disable_request(channel);
        self.regs.disable_error_interrupt(channel);
        self.regs.clear_done(channel);
        self.regs.clear_interrupt(channel);
        self.mux.disconnect(channel);

        self.channels[index] = super::ChannelSlot::EMPTY;
        Ok(())
    }

    /// Register (or with `None`, remove) the channel's event callback.
    ///
    /// `context` is handed back verbatim on every invocation.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` out of range; `Fail` when the channel is not
    /// allocated.
    pub fn install_callback(
        &mut self,
        channel: u8,
        callback: Option<Callback>,
        context: usize,
    ) -> Result<()> {
        let index = self.occupied_index(channel)?;
        self.channels[index].callback = callback;
        self.channels[index].context = context;
        Ok(())
    }

    /// Request a channel and install its callback in one call.
    ///
    /// Returns the channel number.
    pub fn channel_init(&mut self, setup: &ChannelSetup) -> Result<u8> {
        let channel = self.request_channel(setup.selection, setup.source)?;
        self.install_callback(channel, setup.callback, setup.context)?;
        Ok(channel)
    }

    /// Open the channel's request gate so hardware requests start transfers.
    ///
    /// Returns the channel to [`ChannelStatus::Normal`], clearing a previous
    /// `Idle` or `Error`.
    pub fn start_channel(&mut self, channel: u8) -> Result<()> {
        let index = self.occupied_index(channel)?;
        self.channels[index].status = ChannelStatus::Normal;
        self.regs.enable_request(channel);
        Ok(())
    }

    /// Close the channel's request gate. In-flight minor loops finish; no new
    /// requests are serviced.
    pub fn stop_channel(&mut self, channel: u8) -> Result<()> {
        self.occupied_index(channel)?;
        self.regs.disable_request(channel);
        Ok(())
    }

    /// Current status of an allocated channel.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` out of range; `Fail` when the channel is not
    /// allocated.
    pub fn channel_status(&self, channel: u8) -> Result<ChannelStatus> {
        let index = self.occupied_index(channel)?;
        Ok(self.channels[index].status)
    }

    /// Whether the channel is currently executing a minor loop.
    pub fn is_channel_active(&self, channel: u8) -> Result<bool> {
        self.occupied_index(channel)?;
        Ok(self.regs.is_active(channel))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
