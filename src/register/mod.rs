//! Memory-mapped register access for the eDMA and DMAMUX blocks.
//!
//! [`MmioEdma`] and [`MmioDmaMux`] are the hardware-backed implementations of
//! the capability traits in [`crate::hal`]. They are the only place in the
//! crate that performs volatile memory access; everything above them is safe
//! code operating on trait objects.

use crate::config::ChannelArbitration;
use crate::descriptor::Tcd;
use crate::hal::{EdmaRegisters, RequestMux};

// =============================================================================
// eDMA register offsets
// =============================================================================

/// Control register.
pub const CR: usize = 0x000;
/// Error status register.
pub const ES: usize = 0x004;
/// Enable request register (one bit per channel).
pub const ERQ: usize = 0x00C;
/// Enable error interrupt register (one bit per channel).
pub const EEI: usize = 0x014;
/// Clear enable error interrupt (8-bit, channel number or [`OP_ALL`]).
pub const CEEI: usize = 0x018;
/// Set enable error interrupt (8-bit).
pub const SEEI: usize = 0x019;
/// Clear enable request (8-bit).
pub const CERQ: usize = 0x01A;
/// Set enable request (8-bit).
pub const SERQ: usize = 0x01B;
/// Clear DONE status bit (8-bit).
pub const CDNE: usize = 0x01C;
/// Set START bit (8-bit).
pub const SSRT: usize = 0x01D;
/// Clear error (8-bit).
pub const CERR: usize = 0x01E;
/// Clear interrupt request (8-bit).
pub const CINT: usize = 0x01F;
/// Interrupt request register (one bit per channel).
pub const INT: usize = 0x024;
/// Error register (one bit per channel).
pub const ERR: usize = 0x02C;
/// Hardware request status register.
pub const HRS: usize = 0x034;

/// Writing this to one of the 8-bit command registers applies the operation
/// to every channel at once.
pub const OP_ALL: u8 = 0x40;

/// Control register: round-robin channel arbitration.
pub const CR_ERCA: u32 = 1 << 2;
/// Control register: halt on error.
pub const CR_HOE: u32 = 1 << 4;
/// Control register: halt DMA operations.
pub const CR_HALT: u32 = 1 << 5;
/// Control register: enable minor-loop mapping.
pub const CR_EMLM: u32 = 1 << 7;

/// Offset of the first channel TCD.
pub const TCD_BASE: usize = 0x1000;
/// Byte stride between channel TCDs.
pub const TCD_STRIDE: usize = 32;

// TCD word offsets within a channel's descriptor.
const TCD_SADDR: usize = 0x00;
const TCD_SOFF: usize = 0x04;
const TCD_ATTR: usize = 0x06;
const TCD_NBYTES: usize = 0x08;
const TCD_SLAST: usize = 0x0C;
const TCD_DADDR: usize = 0x10;
const TCD_DOFF: usize = 0x14;
const TCD_CITER: usize = 0x16;
const TCD_DLAST_SGA: usize = 0x18;
const TCD_CSR: usize = 0x1C;
const TCD_BITER: usize = 0x1E;

// =============================================================================
// MmioEdma
// =============================================================================

/// eDMA controller register block at a fixed base address.
pub struct MmioEdma {
    base: usize,
}

impl MmioEdma {
    /// Create an accessor for the register block at `base`.
    ///
    /// # Safety
    ///
    /// `base` must be the address of an eDMA register block, the block must
    /// be clocked, and no other code may access it concurrently.
    #[must_use]
    pub const unsafe fn new(base: usize) -> Self {
        Self { base }
    }

    #[inline]
    fn read32(&self, offset: usize) -> u32 {
        unsafe { core::ptr::read_volatile((self.base + offset) as *const u32) }
    }

    #[inline]
    fn write32(&mut self, offset: usize, value: u32) {
        unsafe { core::ptr::write_volatile((self.base + offset) as *mut u32, value) }
    }

    #[inline]
    fn read16(&self, offset: usize) -> u16 {
        unsafe { core::ptr::read_volatile((self.base + offset) as *const u16) }
    }

    #[inline]
    fn write16(&mut self, offset: usize, value: u16) {
        unsafe { core::ptr::write_volatile((self.base + offset) as *mut u16, value) }
    }

    #[inline]
    fn write8(&mut self, offset: usize, value: u8) {
        unsafe { core::ptr::write_volatile((self.base + offset) as *mut u8, value) }
    }

    #[inline]
    const fn tcd_offset(channel: u8) -> usize {
        TCD_BASE + channel as usize * TCD_STRIDE
    }

    /// Raw error status register, for diagnostics.
    #[must_use]
    pub fn error_status(&self) -> u32 {
        self.read32(ES)
    }

    /// Hardware request status, one bit per channel.
    #[must_use]
    pub fn hardware_request_status(&self) -> u32 {
        self.read32(HRS)
    }

    /// Set the channel's START bit, triggering a software service request.
    pub fn software_start(&mut self, channel: u8) {
        self.write8(SSRT, channel);
    }
}

impl EdmaRegisters for MmioEdma {
    fn configure(
        &mut self,
        arbitration: ChannelArbitration,
        halt_on_error: bool,
        minor_loop_mapping: bool,
    ) {
        let mut cr = 0;
        if matches!(arbitration, ChannelArbitration::RoundRobin) {
            cr |= CR_ERCA;
        }
        if halt_on_error {
            cr |= CR_HOE;
        }
        if minor_loop_mapping {
            cr |= CR_EMLM;
        }
        self.write32(CR, cr);
    }

    fn reset(&mut self) {
        self.write32(CR, 0);
        self.write8(CERR, OP_ALL);
        self.write8(CINT, OP_ALL);
        self.write8(CEEI, OP_ALL);
        self.write8(CERQ, OP_ALL);
    }

    fn write_tcd(&mut self, channel: u8, tcd: &Tcd) {
        let base = Self::tcd_offset(channel);
        // CSR last: it may carry the START bit.
        self.write32(base + TCD_SADDR, tcd.saddr);
        self.write16(base + TCD_SOFF, tcd.soff as u16);
        self.write16(base + TCD_ATTR, tcd.attr);
        self.write32(base + TCD_NBYTES, tcd.nbytes);
        self.write32(base + TCD_SLAST, tcd.slast as u32);
        self.write32(base + TCD_DADDR, tcd.daddr);
        self.write16(base + TCD_DOFF, tcd.doff as u16);
        self.write16(base + TCD_CITER, tcd.citer);
        self.write32(base + TCD_DLAST_SGA, tcd.dlast_sga as u32);
        self.write16(base + TCD_BITER, tcd.biter);
        self.write16(base + TCD_CSR, tcd.csr);
    }

    fn read_tcd(&self, channel: u8) -> Tcd {
        let base = Self::tcd_offset(channel);
        Tcd {
            saddr: self.read32(base + TCD_SADDR),
            soff: self.read16(base + TCD_SOFF) as i16,
            attr: self.read16(base + TCD_ATTR),
            nbytes: self.read32(base + TCD_NBYTES),
            slast: self.read32(base + TCD_SLAST) as i32,
            daddr: self.read32(base + TCD_DADDR),
            doff: self.read16(base + TCD_DOFF) as i16,
            citer: self.read16(base + TCD_CITER),
            dlast_sga: self.read32(base + TCD_DLAST_SGA) as i32,
            csr: self.read16(base + TCD_CSR),
            biter: self.read16(base + TCD_BITER),
        }
    }

    fn enable_request(&mut self, channel: u8) {
        self.write8(SERQ, channel);
    }

    fn disable_request(&mut self, channel: u8) {
        self.write8(CERQ, channel);
    }

    fn is_request_enabled(&self, channel: u8) -> bool {
        self.read32(ERQ) & (1 << channel) != 0
    }

    fn enable_error_interrupt(&mut self, channel: u8) {
        self.write8(SEEI, channel);
    }

    fn disable_error_interrupt(&mut self, channel: u8) {
        self.write8(CEEI, channel);
    }

    fn clear_done(&mut self, channel: u8) {
        self.write8(CDNE, channel);
    }

    fn clear_interrupt(&mut self, channel: u8) {
        self.write8(CINT, channel);
    }

    fn clear_error(&mut self, channel: u8) {
        self.write8(CERR, channel);
    }

    fn interrupt_flags(&self) -> u32 {
        self.read32(INT)
    }

    fn error_flags(&self) -> u32 {
        self.read32(ERR)
    }

    fn is_active(&self, channel: u8) -> bool {
        let csr = self.read16(Self::tcd_offset(channel) + TCD_CSR);
        csr & crate::descriptor::bits::CSR_ACTIVE != 0
    }
}

// =============================================================================
// MmioDmaMux
// =============================================================================

/// DMAMUX channel configuration: route enable.
pub const CHCFG_ENBL: u8 = 0x80;
/// DMAMUX channel configuration: periodic trigger enable.
pub const CHCFG_TRIG: u8 = 0x40;
/// DMAMUX channel configuration: request source field.
pub const CHCFG_SOURCE_MASK: u8 = 0x3F;

/// DMA request multiplexer register block at a fixed base address.
///
/// One byte-wide configuration register per channel, laid out contiguously.
pub struct MmioDmaMux {
    base: usize,
}

impl MmioDmaMux {
    /// Create an accessor for the DMAMUX block at `base`.
    ///
    /// # Safety
    ///
    /// `base` must be the address of a DMAMUX register block, the block must
    /// be clocked, and no other code may access it concurrently.
    #[must_use]
    pub const unsafe fn new(base: usize) -> Self {
        Self { base }
    }

    #[inline]
    fn write_chcfg(&mut self, channel: u8, value: u8) {
        unsafe { core::ptr::write_volatile((self.base + channel as usize) as *mut u8, value) }
    }
}

impl RequestMux for MmioDmaMux {
    fn connect(&mut self, channel: u8, source: u8) {
        // Route must be disabled while the source field changes.
        self.write_chcfg(channel, 0);
        self.write_chcfg(channel, CHCFG_ENBL | (source & CHCFG_SOURCE_MASK));
    }

    fn disconnect(&mut self, channel: u8) {
        self.write_chcfg(channel, 0);
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_registers_are_byte_wide_neighbors() {
        assert_eq!(SEEI, CEEI + 1);
        assert_eq!(CERQ, SEEI + 1);
        assert_eq!(SERQ, CERQ + 1);
        assert_eq!(CDNE, SERQ + 1);
        assert_eq!(SSRT, CDNE + 1);
        assert_eq!(CERR, SSRT + 1);
        assert_eq!(CINT, CERR + 1);
    }

    #[test]
    fn tcd_offsets() {
        assert_eq!(MmioEdma::tcd_offset(0), 0x1000);
        assert_eq!(MmioEdma::tcd_offset(1), 0x1020);
        assert_eq!(MmioEdma::tcd_offset(15), 0x11E0);
    }

    #[test]
    fn cr_bits() {
        assert_eq!(CR_ERCA, 0x04);
        assert_eq!(CR_HOE, 0x10);
        assert_eq!(CR_HALT, 0x20);
        assert_eq!(CR_EMLM, 0x80);
    }

    #[test]
    fn chcfg_fields_disjoint() {
        assert_eq!(CHCFG_ENBL & CHCFG_TRIG, 0);
        assert_eq!((CHCFG_ENBL | CHCFG_TRIG) & CHCFG_SOURCE_MASK, 0);
    }
}
