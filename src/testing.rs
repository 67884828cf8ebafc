//! Host-test doubles for the hardware capability traits.
//!
//! The mocks back every trait operation with plain arrays, record each
//! mutating call in an operation log, and expose `raise_*` helpers so tests
//! can simulate hardware events. They implement exactly the traits the
//! engine consumes, so driver tests run against the same code paths as real
//! hardware.

extern crate std;

use std::vec::Vec;

use crate::config::{ChannelArbitration, ClockName};
use crate::descriptor::Tcd;
use crate::hal::{ClockGate, EdmaRegisters, RequestMux};

/// One logged eDMA register operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockOp {
    /// `configure` was called.
    Configure,
    /// `reset` was called.
    Reset,
    /// `write_tcd` on the channel.
    WriteTcd(u8),
    /// `enable_request` on the channel.
    EnableRequest(u8),
    /// `disable_request` on the channel.
    DisableRequest(u8),
    /// `enable_error_interrupt` on the channel.
    EnableErrorInterrupt(u8),
    /// `disable_error_interrupt` on the channel.
    DisableErrorInterrupt(u8),
    /// `clear_done` on the channel.
    ClearDone(u8),
    /// `clear_interrupt` on the channel.
    ClearInterrupt(u8),
    /// `clear_error` on the channel.
    ClearError(u8),
}

/// In-memory eDMA register block.
pub struct MockEdmaRegisters<const CHANNELS: usize> {
    /// Channel TCD shadow registers.
    pub tcds: [Tcd; CHANNELS],
    /// Per-channel request-enable bits (the ERQ register).
    pub request_enabled: [bool; CHANNELS],
    /// Per-channel error-interrupt-enable bits (the EEI register).
    pub error_interrupt_enabled: [bool; CHANNELS],
    /// Pending completion-interrupt bits.
    pub interrupt_flags: u32,
    /// Pending error bits.
    pub error_flags: u32,
    /// Per-channel active bits.
    pub active: u32,
    /// Last `configure` arguments: (arbitration, halt_on_error, mapping).
    pub configured: Option<(ChannelArbitration, bool, bool)>,
    /// Number of `reset` calls.
    pub reset_count: usize,
    /// Every mutating call, in order.
    pub ops: Vec<MockOp>,
}

impl<const CHANNELS: usize> MockEdmaRegisters<CHANNELS> {
    /// A block in reset state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tcds: [Tcd::ZERO; CHANNELS],
            request_enabled: [false; CHANNELS],
            error_interrupt_enabled: [false; CHANNELS],
            interrupt_flags: 0,
            error_flags: 0,
            active: 0,
            configured: None,
            reset_count: 0,
            ops: Vec::new(),
        }
    }

    /// Simulate a completion interrupt on the channel.
    pub fn raise_interrupt(&mut self, channel: u8) {
        self.interrupt_flags |= 1 << channel;
    }

    /// Simulate a transfer error on the channel.
    pub fn raise_error(&mut self, channel: u8) {
        self.error_flags |= 1 << channel;
    }

    /// Simulate the channel becoming active.
    pub fn set_active(&mut self, channel: u8, active: bool) {
        if active {
            self.active |= 1 << channel;
        } else {
            self.active &= !(1 << channel);
        }
    }

    /// How many times the given operation was logged.
    #[must_use]
    pub fn count(&self, op: MockOp) -> usize {
        self.ops.iter().filter(|logged| **logged == op).count()
    }
}

impl<const CHANNELS: usize> Default for MockEdmaRegisters<CHANNELS> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const CHANNELS: usize> EdmaRegisters for MockEdmaRegisters<CHANNELS> {
    fn configure(
        &mut self,
        arbitration: ChannelArbitration,
        halt_on_error: bool,
        minor_loop_mapping: bool,
    ) {
        self.configured = Some((arbitration, halt_on_error, minor_loop_mapping));
        self.ops.push(MockOp::Configure);
    }

    fn reset(&mut self) {
        self.reset_count += 1;
        self.request_enabled = [false; CHANNELS];
        self.error_interrupt_enabled = [false; CHANNELS];
        self.interrupt_flags = 0;
        self.error_flags = 0;
        self.configured = None;
        self.ops.push(MockOp::Reset);
    }

    fn write_tcd(&mut self, channel: u8, tcd: &Tcd) {
        self.tcds[channel as usize] = *tcd;
        self.ops.push(MockOp::WriteTcd(channel));
    }

    fn read_tcd(&self, channel: u8) -> Tcd {
        self.tcds[channel as usize]
    }

    fn enable_request(&mut self, channel: u8) {
        self.request_enabled[channel as usize] = true;
        self.ops.push(MockOp::EnableRequest(channel));
    }

    fn disable_request(&mut self, channel: u8) {
        if let Some(enabled) = self.request_enabled.get_mut(channel as usize) {
            *enabled = false;
        }
        self.ops.push(MockOp::DisableRequest(channel));
    }

    fn is_request_enabled(&self, channel: u8) -> bool {
        self.request_enabled[channel as usize]
    }

    fn enable_error_interrupt(&mut self, channel: u8) {
        self.error_interrupt_enabled[channel as usize] = true;
        self.ops.push(MockOp::EnableErrorInterrupt(channel));
    }

    fn disable_error_interrupt(&mut self, channel: u8) {
        self.error_interrupt_enabled[channel as usize] = false;
        self.ops.push(MockOp::DisableErrorInterrupt(channel));
    }

    fn clear_done(&mut self, channel: u8) {
        self.ops.push(MockOp::ClearDone(channel));
    }

    fn clear_interrupt(&mut self, channel: u8) {
        self.interrupt_flags &= !(1 << channel);
        self.ops.push(MockOp::ClearInterrupt(channel));
    }

    fn clear_error(&mut self, channel: u8) {
        self.error_flags &= !(1 << channel);
        self.ops.push(MockOp::ClearError(channel));
    }

    fn interrupt_flags(&self) -> u32 {
        self.interrupt_flags
    }

    fn error_flags(&self) -> u32 {
        self.error_flags
    }

    fn is_active(&self, channel: u8) -> bool {
        self.active & (1 << channel) != 0
    }
}

/// One logged multiplexer operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MuxOp {
    /// `connect(channel, source)`.
    Connect(u8, u8),
    /// `disconnect(channel)`.
    Disconnect(u8),
}

/// In-memory request multiplexer.
pub struct MockRequestMux<const CHANNELS: usize> {
    /// Routed source per channel, `None` when disconnected.
    pub connections: [Option<u8>; CHANNELS],
    /// Every call, in order.
    pub ops: Vec<MuxOp>,
}

impl<const CHANNELS: usize> MockRequestMux<CHANNELS> {
    /// A multiplexer with every route disabled.
    #[must_use]
    pub fn new() -> Self {
        Self {
            connections: [None; CHANNELS],
            ops: Vec::new(),
        }
    }
}

impl<const CHANNELS: usize> Default for MockRequestMux<CHANNELS> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const CHANNELS: usize> RequestMux for MockRequestMux<CHANNELS> {
    fn connect(&mut self, channel: u8, source: u8) {
        self.connections[channel as usize] = Some(source);
        self.ops.push(MuxOp::Connect(channel, source));
    }

    fn disconnect(&mut self, channel: u8) {
        self.connections[channel as usize] = None;
        self.ops.push(MuxOp::Disconnect(channel));
    }
}

/// Clock-gate stub with per-peripheral switches.
#[derive(Debug, Clone, Copy)]
pub struct MockClockGate {
    /// eDMA controller clock state.
    pub edma: bool,
    /// DMAMUX clock state.
    pub dma_mux: bool,
}

impl MockClockGate {
    /// Both clocks running.
    #[must_use]
    pub fn all_on() -> Self {
        Self {
            edma: true,
            dma_mux: true,
        }
    }
}

impl ClockGate for MockClockGate {
    fn is_enabled(&self, clock: ClockName) -> bool {
        match clock {
            ClockName::Edma => self.edma,
            ClockName::DmaMux => self.dma_mux,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_registers_log_and_count() {
        let mut regs: MockEdmaRegisters<4> = MockEdmaRegisters::new();
        regs.enable_request(1);
        regs.enable_request(1);
        regs.disable_request(1);
        assert_eq!(regs.count(MockOp::EnableRequest(1)), 2);
        assert_eq!(regs.count(MockOp::DisableRequest(1)), 1);
        assert_eq!(regs.count(MockOp::EnableRequest(0)), 0);
        assert!(!regs.is_request_enabled(1));
    }

    #[test]
    fn mock_registers_tcd_round_trip() {
        let mut regs: MockEdmaRegisters<2> = MockEdmaRegisters::new();
        let tcd = Tcd {
            saddr: 0x1234,
            ..Tcd::ZERO
        };
        regs.write_tcd(1, &tcd);
        assert_eq!(regs.read_tcd(1), tcd);
        assert_eq!(regs.read_tcd(0), Tcd::ZERO);
    }

    #[test]
    fn mock_registers_flag_simulation() {
        let mut regs: MockEdmaRegisters<8> = MockEdmaRegisters::new();
        regs.raise_interrupt(3);
        regs.raise_error(5);
        assert_eq!(regs.interrupt_flags(), 1 << 3);
        assert_eq!(regs.error_flags(), 1 << 5);
        regs.clear_interrupt(3);
        regs.clear_error(5);
        assert_eq!(regs.interrupt_flags(), 0);
        assert_eq!(regs.error_flags(), 0);
    }

    #[test]
    fn mock_registers_active_simulation() {
        let mut regs: MockEdmaRegisters<8> = MockEdmaRegisters::new();
        assert!(!regs.is_active(2));
        regs.set_active(2, true);
        assert!(regs.is_active(2));
        regs.set_active(2, false);
        assert!(!regs.is_active(2));
    }

    #[test]
    fn mock_mux_tracks_connections() {
        let mut mux: MockRequestMux<4> = MockRequestMux::new();
        mux.connect(0, 17);
        assert_eq!(mux.connections[0], Some(17));
        mux.disconnect(0);
        assert_eq!(mux.connections[0], None);
        assert_eq!(mux.ops, [MuxOp::Connect(0, 17), MuxOp::Disconnect(0)]);
    }

    #[test]
    fn mock_clock_gate_switches() {
        let clocks = MockClockGate::all_on();
        assert!(clocks.is_enabled(ClockName::Edma));
        assert!(clocks.is_enabled(ClockName::DmaMux));

        let gated = MockClockGate {
            edma: false,
            dma_mux: true,
        };
        assert!(!gated.is_enabled(ClockName::Edma));
    }
}
