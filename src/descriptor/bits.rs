//! TCD bit-field constants.
//!
//! Field layouts for the transfer-control-descriptor words. Kept separate
//! from the descriptor logic so the packing code reads against named shifts
//! and masks instead of magic numbers.

// =============================================================================
// ATTR (transfer attributes, u16)
// =============================================================================

/// Source address modulo, bits [15:11].
pub const ATTR_SMOD_SHIFT: u16 = 11;
/// Source address modulo mask (5 bits).
pub const ATTR_SMOD_MASK: u16 = 0x1F << ATTR_SMOD_SHIFT;
/// Source transfer size, bits [10:8].
pub const ATTR_SSIZE_SHIFT: u16 = 8;
/// Source transfer size mask (3 bits).
pub const ATTR_SSIZE_MASK: u16 = 0x7 << ATTR_SSIZE_SHIFT;
/// Destination address modulo, bits [7:3].
pub const ATTR_DMOD_SHIFT: u16 = 3;
/// Destination address modulo mask (5 bits).
pub const ATTR_DMOD_MASK: u16 = 0x1F << ATTR_DMOD_SHIFT;
/// Destination transfer size, bits [2:0].
pub const ATTR_DSIZE_SHIFT: u16 = 0;
/// Destination transfer size mask (3 bits).
pub const ATTR_DSIZE_MASK: u16 = 0x7;

/// Largest legal address-modulo value (the field is 5 bits wide).
pub const MODULO_MAX: u8 = 0x1F;

// =============================================================================
// NBYTES (minor byte count, u32)
// =============================================================================
//
// Three layouts share this word. With minor-loop mapping disabled the whole
// word is the byte count. With mapping enabled, the top two bits select
// source/destination offset application, and the presence of an offset
// splits the remainder into MLOFF + a 10-bit count.

/// Source minor-loop offset enable, bit 31 (mapping enabled).
pub const NBYTES_SMLOE: u32 = 1 << 31;
/// Destination minor-loop offset enable, bit 30 (mapping enabled).
pub const NBYTES_DMLOE: u32 = 1 << 30;
/// Minor-loop offset field, bits [29:10] (mapping enabled, offset in use).
pub const NBYTES_MLOFF_SHIFT: u32 = 10;
/// Minor-loop offset mask (20 bits).
pub const NBYTES_MLOFF_MASK: u32 = 0xF_FFFF << NBYTES_MLOFF_SHIFT;
/// Byte count when mapping is enabled and an offset is in use, bits [9:0].
pub const NBYTES_MLOFFYES_COUNT_MASK: u32 = 0x3FF;
/// Byte count when mapping is enabled without an offset, bits [29:0].
pub const NBYTES_MLOFFNO_COUNT_MASK: u32 = 0x3FFF_FFFF;

// =============================================================================
// CITER / BITER (major iteration counts, u16)
// =============================================================================

/// Channel-linking enable on minor-loop completion, bit 15.
pub const ITER_ELINK: u16 = 1 << 15;
/// Linked channel number when ELINK is set, bits [13:9].
pub const ITER_LINKCH_SHIFT: u16 = 9;
/// Linked channel mask (5 bits).
pub const ITER_LINKCH_MASK: u16 = 0x1F << ITER_LINKCH_SHIFT;
/// Iteration count when linking, bits [8:0].
pub const ITER_LINK_COUNT_MASK: u16 = 0x1FF;
/// Iteration count without linking, bits [14:0].
pub const ITER_COUNT_MASK: u16 = 0x7FFF;

// =============================================================================
// CSR (control and status, u16)
// =============================================================================

/// Software-initiated service request, bit 0.
pub const CSR_START: u16 = 1 << 0;
/// Interrupt on major-loop completion, bit 1.
pub const CSR_INTMAJOR: u16 = 1 << 1;
/// Interrupt at the major-loop halfway point, bit 2.
pub const CSR_INTHALF: u16 = 1 << 2;
/// Disable the hardware request on major-loop completion, bit 3.
pub const CSR_DREQ: u16 = 1 << 3;
/// Enable scatter/gather processing, bit 4.
pub const CSR_ESG: u16 = 1 << 4;
/// Channel-linking enable on major-loop completion, bit 5.
pub const CSR_MAJORELINK: u16 = 1 << 5;
/// Channel is executing, bit 6 (read-only in hardware).
pub const CSR_ACTIVE: u16 = 1 << 6;
/// Major loop complete, bit 7 (cleared by the done-clear register).
pub const CSR_DONE: u16 = 1 << 7;
/// Linked channel on major-loop completion, bits [12:8].
pub const CSR_MAJORLINKCH_SHIFT: u16 = 8;
/// Major-link channel mask (5 bits).
pub const CSR_MAJORLINKCH_MASK: u16 = 0x1F << CSR_MAJORLINKCH_SHIFT;
/// Bandwidth control (engine stall policy), bits [15:14].
pub const CSR_BWC_SHIFT: u16 = 14;
/// Bandwidth control mask (2 bits).
pub const CSR_BWC_MASK: u16 = 0x3 << CSR_BWC_SHIFT;

// =============================================================================
// Unit Tests
// =============================================================================
