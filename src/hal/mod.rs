//! Hardware capability traits.
//!
//! The engine never touches registers directly. Every hardware interaction
//! goes through one of the traits below, injected at construction. Real
//! builds plug in the MMIO implementations from [`crate::register`]; host
//! tests plug in plain-array mocks. The engine logic is identical in both
//! cases, which is what makes the driver testable without hardware.

use crate::config::{ChannelArbitration, ClockName};
use crate::descriptor::Tcd;

/// Operations on the eDMA controller register block.
///
/// Channel arguments are raw channel numbers; callers guarantee they are in
/// range for the underlying block. Implementations perform the access and
/// nothing else: no bookkeeping, no validation.
pub trait EdmaRegisters {
    /// Apply module-level control settings.
    fn configure(
        &mut self,
        arbitration: ChannelArbitration,
        halt_on_error: bool,
        minor_loop_mapping: bool,
    );

    /// Return the control register to its reset state.
    fn reset(&mut self);

    /// Write a full descriptor to the channel's TCD registers.
    fn write_tcd(&mut self, channel: u8, tcd: &Tcd);

    /// Read back the channel's TCD registers.
    fn read_tcd(&self, channel: u8) -> Tcd;

    /// Enable hardware service requests for the channel.
    fn enable_request(&mut self, channel: u8);

    /// Disable hardware service requests for the channel.
    fn disable_request(&mut self, channel: u8);

    /// Whether hardware service requests are enabled for the channel.
    fn is_request_enabled(&self, channel: u8) -> bool;

    /// Enable the error interrupt for the channel.
    fn enable_error_interrupt(&mut self, channel: u8);

    /// Disable the error interrupt for the channel.
    fn disable_error_interrupt(&mut self, channel: u8);

    /// Clear the channel's DONE flag.
    fn clear_done(&mut self, channel: u8);

    /// Clear the channel's completion-interrupt flag.
    fn clear_interrupt(&mut self, channel: u8);

    /// Clear the channel's error flag.
    fn clear_error(&mut self, channel: u8);

    /// Pending completion-interrupt flags, one bit per channel.
    fn interrupt_flags(&self) -> u32;

    /// Pending error flags, one bit per channel.
    fn error_flags(&self) -> u32;

    /// Whether the channel is currently executing.
    fn is_active(&self, channel: u8) -> bool;
}

/// Operations on the DMA request multiplexer.
pub trait RequestMux {
    /// Route the given request source to the channel and enable it.
    fn connect(&mut self, channel: u8, source: u8);

    /// Disable routing for the channel.
    fn disconnect(&mut self, channel: u8);
}

/// Clock-gate status provider.
///
/// Consulted once at driver init; the driver refuses to run against a gated
/// peripheral rather than bus-faulting on the first register access.
pub trait ClockGate {
    /// Whether the named peripheral clock is enabled.
    fn is_enabled(&self, clock: ClockName) -> bool;
}
