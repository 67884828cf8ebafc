//! Interrupt dispatch.
//!
//! Two entry points, matching the two vectors the hardware provides: a
//! per-channel completion interrupt and a module-wide error interrupt that
//! reports all faulting channels in one bitmask. Both run in interrupt
//! context; neither touches the allocator, only channel status and the
//! request gate.

use crate::error::Result;
use crate::hal::{EdmaRegisters, RequestMux};

use super::{ChannelStatus, Edma};

/// Per-channel error bitmask, bit `n` for channel `n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ErrorFlags {
    raw: u32,
}

impl ErrorFlags {
    /// Wrap a raw error register value.
    #[must_use]
    pub const fn from_raw(raw: u32) -> Self {
        Self { raw }
    }

    /// The raw bitmask.
    #[must_use]
    pub const fn to_raw(self) -> u32 {
        self.raw
    }

    /// Whether any channel is flagged.
    #[must_use]
    pub const fn any(self) -> bool {
        self.raw != 0
    }

    /// Whether the given channel is flagged.
    #[must_use]
    pub const fn is_set(self, channel: u8) -> bool {
        channel < 32 && self.raw & (1 << channel) != 0
    }

    /// Lowest flagged channel, if any.
    #[must_use]
    pub const fn lowest_set(self) -> Option<u8> {
        if self.raw == 0 {
            None
        } else {
            Some(self.raw.trailing_zeros() as u8)
        }
    }

    /// Iterate flagged channels in ascending order.
    #[must_use]
    pub const fn iter(self) -> ErrorFlagsIter {
        ErrorFlagsIter { remaining: self.raw }
    }
}

/// Ascending-order iterator over flagged channels.
pub struct ErrorFlagsIter {
    remaining: u32,
}

impl Iterator for ErrorFlagsIter {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        if self.remaining == 0 {
            return None;
        }
        let channel = self.remaining.trailing_zeros() as u8;
        self.remaining &= self.remaining - 1;
        Some(channel)
    }
}

impl IntoIterator for ErrorFlags {
    type Item = u8;
    type IntoIter = ErrorFlagsIter;

    fn into_iter(self) -> ErrorFlagsIter {
        self.iter()
    }
}

impl<R: EdmaRegisters, M: RequestMux, const CHANNELS: usize> Edma<R, M, CHANNELS> {
    /// Handle the completion interrupt for one channel.
    ///
    /// Acknowledges the interrupt and DONE flags, marks the channel
    /// [`ChannelStatus::Idle`], and invokes its callback. Interrupts from
    /// channels that are out of range or unallocated are acknowledged and
    /// otherwise ignored.
    pub fn on_channel_interrupt(&mut self, channel: u8) {
        if channel as usize >= CHANNELS {
            return;
        }
        self.regs.clear_interrupt(channel);
        self.regs.clear_done(channel);

        let slot = &mut self.channels[channel as usize];
        if !slot.occupied {
            return;
        }
        slot.status = ChannelStatus::Idle;
        if let Some(callback) = slot.callback {
            callback(slot.context, ChannelStatus::Idle);
        }
    }

    /// Handle the module error interrupt.
    ///
    /// Scans the error bitmask from lowest channel to highest. Each flagged
    /// channel is stopped, its error flag cleared, its status set to
    /// [`ChannelStatus::Error`], and its callback invoked once. Returns the
    /// flags that were serviced.
    pub fn on_error_interrupt(&mut self) -> ErrorFlags {
        let flags = ErrorFlags::from_raw(self.regs.error_flags());

        for channel in flags.iter() {
            if channel as usize >= CHANNELS {
                break;
            }
            // Stop the channel before acknowledging, so a still-faulting
            // request cannot immediately re-flag it.
            self.regs.disable_request(channel);
            self.regs.clear_error(channel);
            self.regs.clear_done(channel);

            #[cfg(feature = "log")]
            log::warn!("transfer error on channel {}", channel);

            let slot = &mut self.channels[channel as usize];
            if !slot.occupied {
                continue;
            }
            slot.status = ChannelStatus::Error;
            if let Some(callback) = slot.callback {
                callback(slot.context, ChannelStatus::Error);
            }
        }
        flags
    }

    /// Pending completion-interrupt flags, one bit per channel.
    pub fn interrupt_flags(&self) -> Result<u32> {
        self.require_initialized()?;
        Ok(self.regs.interrupt_flags())
    }

    /// Pending error flags, one bit per channel.
    pub fn error_flags(&self) -> Result<ErrorFlags> {
        self.require_initialized()?;
        Ok(ErrorFlags::from_raw(self.regs.error_flags()))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
