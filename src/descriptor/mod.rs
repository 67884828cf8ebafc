//! Transfer control descriptor (TCD) model.
//!
//! [`Tcd`] mirrors the 32-byte hardware descriptor word for word.
//! [`Tcd::from_config`] translates a logical [`TransferConfig`] into a
//! descriptor value; the same value is then either written to the channel's
//! live TCD registers or stored in a software descriptor for scatter/gather
//! chains. Because both paths consume the output of the same pure builder,
//! they cannot drift apart.

pub mod bits;

use crate::error::{Error, Result};

// =============================================================================
// Transfer Size
// =============================================================================

/// Per-access transfer width.
///
/// The discriminants are the hardware SSIZE/DSIZE encodings; note the gap at
/// 3 (8-byte accesses are not supported by this engine).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum TransferSize {
    /// 8-bit accesses.
    Bytes1 = 0,
    /// 16-bit accesses.
    Bytes2 = 1,
    /// 32-bit accesses.
    Bytes4 = 2,
    /// 16-byte burst accesses.
    Bytes16 = 4,
    /// 32-byte burst accesses.
    Bytes32 = 5,
}

impl TransferSize {
    /// Map a byte width to its encoding. Returns `None` for widths the
    /// hardware cannot express.
    #[must_use]
    pub const fn from_bytes(bytes: u32) -> Option<Self> {
        match bytes {
            1 => Some(TransferSize::Bytes1),
            2 => Some(TransferSize::Bytes2),
            4 => Some(TransferSize::Bytes4),
            16 => Some(TransferSize::Bytes16),
            32 => Some(TransferSize::Bytes32),
            _ => None,
        }
    }

    /// Decode a raw SSIZE/DSIZE field value.
    #[must_use]
    pub const fn from_encoding(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(TransferSize::Bytes1),
            1 => Some(TransferSize::Bytes2),
            2 => Some(TransferSize::Bytes4),
            4 => Some(TransferSize::Bytes16),
            5 => Some(TransferSize::Bytes32),
            _ => None,
        }
    }

    /// Access width in bytes.
    #[must_use]
    pub const fn bytes(self) -> u32 {
        match self {
            TransferSize::Bytes1 => 1,
            TransferSize::Bytes2 => 2,
            TransferSize::Bytes4 => 4,
            TransferSize::Bytes16 => 16,
            TransferSize::Bytes32 => 32,
        }
    }
}

// =============================================================================
// Transfer Type
// =============================================================================

/// Direction of a transfer, used to derive address offsets.
///
/// The peripheral side of a transfer keeps a fixed address (offset 0); the
/// memory side increments by the access width after every read or write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransferType {
    /// Peripheral data register to a memory buffer.
    PeripheralToMemory,
    /// Memory buffer to a peripheral data register.
    MemoryToPeripheral,
    /// Memory buffer to memory buffer.
    MemoryToMemory,
    /// Peripheral data register to peripheral data register.
    PeripheralToPeripheral,
}

// =============================================================================
// Loop configuration
// =============================================================================

/// Minor/major loop parameters for a loop transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LoopConfig {
    /// Number of minor-loop service requests making up the major loop.
    pub major_loop_count: u16,
    /// Signed offset applied after each minor loop, when enabled below.
    /// Requires minor-loop mapping.
    pub minor_loop_offset: i32,
    /// Apply `minor_loop_offset` to the source address.
    pub offset_on_source: bool,
    /// Apply `minor_loop_offset` to the destination address.
    pub offset_on_dest: bool,
    /// Channel to link (trigger) after each minor-loop completion.
    pub minor_link: Option<u8>,
    /// Channel to link after major-loop completion.
    pub major_link: Option<u8>,
}

impl LoopConfig {
    /// A loop that only iterates, with no offsets and no linking.
    #[must_use]
    pub const fn with_iterations(major_loop_count: u16) -> Self {
        Self {
            major_loop_count,
            minor_loop_offset: 0,
            offset_on_source: false,
            offset_on_dest: false,
            minor_link: None,
            major_link: None,
        }
    }
}

// =============================================================================
// Transfer configuration
// =============================================================================

/// One scatter/gather segment: a buffer address and its length in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScatterGatherEntry {
    /// Start address of the segment.
    pub address: u32,
    /// Segment length in bytes.
    pub length: u32,
}

/// Logical description of a transfer, independent of where the resulting
/// descriptor lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TransferConfig {
    /// Source start address.
    pub src_addr: u32,
    /// Destination start address.
    pub dest_addr: u32,
    /// Source access width.
    pub src_transfer_size: TransferSize,
    /// Destination access width.
    pub dest_transfer_size: TransferSize,
    /// Signed source address increment applied after each access.
    pub src_offset: i16,
    /// Signed destination address increment applied after each access.
    pub dest_offset: i16,
    /// Source address modulo (0 disables wraparound, max 31).
    pub src_modulo: u8,
    /// Destination address modulo (0 disables wraparound, max 31).
    pub dest_modulo: u8,
    /// Bytes moved per service request (minor loop).
    pub minor_byte_count: u32,
    /// Signed source adjustment applied after major-loop completion.
    pub src_last_addr_adjust: i32,
    /// Signed destination adjustment applied after major-loop completion.
    /// Ignored when `scatter_gather_next` is set.
    pub dest_last_addr_adjust: i32,
    /// Address of the next descriptor for scatter/gather chaining.
    pub scatter_gather_next: Option<u32>,
    /// Raise the channel completion interrupt after the major loop.
    pub interrupt_on_completion: bool,
    /// Clear the hardware request enable after the major loop.
    pub disable_request_on_complete: bool,
    /// Loop parameters. `None` configures a single-iteration major loop.
    pub loop_config: Option<LoopConfig>,
}

impl TransferConfig {
    /// A minimal memory-to-memory style configuration; callers adjust the
    /// fields they care about.
    #[must_use]
    pub const fn new(
        src_addr: u32,
        dest_addr: u32,
        transfer_size: TransferSize,
        minor_byte_count: u32,
    ) -> Self {
        Self {
            src_addr,
            dest_addr,
            src_transfer_size: transfer_size,
            dest_transfer_size: transfer_size,
            src_offset: 0,
            dest_offset: 0,
            src_modulo: 0,
            dest_modulo: 0,
            minor_byte_count,
            src_last_addr_adjust: 0,
            dest_last_addr_adjust: 0,
            scatter_gather_next: None,
            interrupt_on_completion: false,
            disable_request_on_complete: false,
            loop_config: None,
        }
    }
}

// =============================================================================
// TCD
// =============================================================================

/// Transfer control descriptor.
///
/// Field-for-field image of the hardware descriptor. The alignment matches
/// the hardware requirement for scatter/gather targets, so any `Tcd` (or
/// element of a `[Tcd]` array) is a valid link destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(C, align(32))]
pub struct Tcd {
    /// Source address.
    pub saddr: u32,
    /// Signed source address offset per access.
    pub soff: i16,
    /// Transfer attributes (modulo and access widths).
    pub attr: u16,
    /// Minor byte count (layout depends on minor-loop mapping).
    pub nbytes: u32,
    /// Source last-address adjustment.
    pub slast: i32,
    /// Destination address.
    pub daddr: u32,
    /// Signed destination address offset per access.
    pub doff: i16,
    /// Current major iteration count.
    pub citer: u16,
    /// Destination last-address adjustment, or next-descriptor address when
    /// scatter/gather is enabled.
    pub dlast_sga: i32,
    /// Control and status.
    pub csr: u16,
    /// Beginning major iteration count.
    pub biter: u16,
}

impl Tcd {
    /// An all-zero descriptor, the hardware reset state.
    pub const ZERO: Tcd = Tcd {
        saddr: 0,
        soff: 0,
        attr: 0,
        nbytes: 0,
        slast: 0,
        daddr: 0,
        doff: 0,
        citer: 0,
        dlast_sga: 0,
        csr: 0,
        biter: 0,
    };

    /// Create an all-zero descriptor.
    #[must_use]
    pub const fn new() -> Self {
        Self::ZERO
    }

    /// Build a descriptor from a logical transfer configuration.
    ///
    /// `minor_loop_mapping` must reflect the module-level setting the
    /// descriptor will execute under, since it selects the NBYTES layout.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` when a modulo exceeds 31, a count does not fit its
    /// field, minor-loop offsets are requested without mapping, a link
    /// channel is out of range, or a scatter/gather target is misaligned.
    pub fn from_config(config: &TransferConfig, minor_loop_mapping: bool) -> Result<Tcd> {
        if config.src_modulo > bits::MODULO_MAX || config.dest_modulo > bits::MODULO_MAX {
            return Err(Error::InvalidArgument);
        }
        if config.minor_byte_count == 0 {
            return Err(Error::InvalidArgument);
        }

        let attr = (u16::from(config.src_modulo) << bits::ATTR_SMOD_SHIFT)
            | ((config.src_transfer_size as u16) << bits::ATTR_SSIZE_SHIFT)
            | (u16::from(config.dest_modulo) << bits::ATTR_DMOD_SHIFT)
            | (config.dest_transfer_size as u16);

        let nbytes = Self::pack_nbytes(config, minor_loop_mapping)?;
        let iter = Self::pack_iter(config.loop_config.as_ref())?;

        let mut csr: u16 = 0;
        if config.interrupt_on_completion {
            csr |= bits::CSR_INTMAJOR;
        }
        if config.disable_request_on_complete {
            csr |= bits::CSR_DREQ;
        }
        if let Some(loop_config) = &config.loop_config {
            if let Some(channel) = loop_config.major_link {
                if u16::from(channel) > bits::CSR_MAJORLINKCH_MASK >> bits::CSR_MAJORLINKCH_SHIFT {
                    return Err(Error::InvalidArgument);
                }
                csr |= bits::CSR_MAJORELINK
                    | (u16::from(channel) << bits::CSR_MAJORLINKCH_SHIFT);
            }
        }

        let dlast_sga = match config.scatter_gather_next {
            Some(next) => {
                // Hardware fetches the next descriptor with a 32-byte
                // aligned burst.
                if next % 32 != 0 {
                    return Err(Error::InvalidArgument);
                }
                csr |= bits::CSR_ESG;
                next as i32
            }
            None => config.dest_last_addr_adjust,
        };

        Ok(Tcd {
            saddr: config.src_addr,
            soff: config.src_offset,
            attr,
            nbytes,
            slast: config.src_last_addr_adjust,
            daddr: config.dest_addr,
            doff: config.dest_offset,
            citer: iter,
            dlast_sga,
            csr,
            biter: iter,
        })
    }

    fn pack_nbytes(config: &TransferConfig, minor_loop_mapping: bool) -> Result<u32> {
        let count = config.minor_byte_count;
        let (offset_on_source, offset_on_dest, offset) = match &config.loop_config {
            Some(lc) => (lc.offset_on_source, lc.offset_on_dest, lc.minor_loop_offset),
            None => (false, false, 0),
        };
        let offset_enabled = offset_on_source || offset_on_dest;

        if !minor_loop_mapping {
            if offset_enabled {
                return Err(Error::InvalidArgument);
            }
            return Ok(count);
        }

        let mut word = 0;
        if offset_on_source {
            word |= bits::NBYTES_SMLOE;
        }
        if offset_on_dest {
            word |= bits::NBYTES_DMLOE;
        }

        if offset_enabled {
            if count > bits::NBYTES_MLOFFYES_COUNT_MASK {
                return Err(Error::InvalidArgument);
            }
            // MLOFF is a 20-bit signed field.
            if !(-(1 << 19)..(1 << 19)).contains(&offset) {
                return Err(Error::InvalidArgument);
            }
            word |= ((offset as u32) << bits::NBYTES_MLOFF_SHIFT) & bits::NBYTES_MLOFF_MASK;
            word |= count;
        } else {
            if count > bits::NBYTES_MLOFFNO_COUNT_MASK {
                return Err(Error::InvalidArgument);
            }
            word |= count;
        }
        Ok(word)
    }

    fn pack_iter(loop_config: Option<&LoopConfig>) -> Result<u16> {
        let Some(lc) = loop_config else {
            return Ok(1);
        };
        if lc.major_loop_count == 0 {
            return Err(Error::InvalidArgument);
        }
        match lc.minor_link {
            Some(channel) => {
                if lc.major_loop_count > bits::ITER_LINK_COUNT_MASK
                    || u16::from(channel) > bits::ITER_LINKCH_MASK >> bits::ITER_LINKCH_SHIFT
                {
                    return Err(Error::InvalidArgument);
                }
                Ok(bits::ITER_ELINK
                    | (u16::from(channel) << bits::ITER_LINKCH_SHIFT)
                    | lc.major_loop_count)
            }
            None => {
                if lc.major_loop_count > bits::ITER_COUNT_MASK {
                    return Err(Error::InvalidArgument);
                }
                Ok(lc.major_loop_count)
            }
        }
    }

    // =========================================================================
    // Decode accessors
    // =========================================================================

    /// Source address.
    #[must_use]
    pub const fn source_address(&self) -> u32 {
        self.saddr
    }

    /// Signed source offset per access.
    #[must_use]
    pub const fn source_offset(&self) -> i16 {
        self.soff
    }

    /// Destination address.
    #[must_use]
    pub const fn destination_address(&self) -> u32 {
        self.daddr
    }

    /// Signed destination offset per access.
    #[must_use]
    pub const fn destination_offset(&self) -> i16 {
        self.doff
    }

    /// Source access width, or `None` for a reserved encoding.
    #[must_use]
    pub const fn source_transfer_size(&self) -> Option<TransferSize> {
        TransferSize::from_encoding(((self.attr & bits::ATTR_SSIZE_MASK) >> bits::ATTR_SSIZE_SHIFT) as u8)
    }

    /// Destination access width, or `None` for a reserved encoding.
    #[must_use]
    pub const fn destination_transfer_size(&self) -> Option<TransferSize> {
        TransferSize::from_encoding((self.attr & bits::ATTR_DSIZE_MASK) as u8)
    }

    /// Source address modulo.
    #[must_use]
    pub const fn source_modulo(&self) -> u8 {
        ((self.attr & bits::ATTR_SMOD_MASK) >> bits::ATTR_SMOD_SHIFT) as u8
    }

    /// Destination address modulo.
    #[must_use]
    pub const fn destination_modulo(&self) -> u8 {
        ((self.attr & bits::ATTR_DMOD_MASK) >> bits::ATTR_DMOD_SHIFT) as u8
    }

    /// Bytes moved per service request, interpreted under the given
    /// minor-loop-mapping setting.
    #[must_use]
    pub const fn minor_byte_count(&self, minor_loop_mapping: bool) -> u32 {
        if !minor_loop_mapping {
            self.nbytes
        } else if self.nbytes & (bits::NBYTES_SMLOE | bits::NBYTES_DMLOE) != 0 {
            self.nbytes & bits::NBYTES_MLOFFYES_COUNT_MASK
        } else {
            self.nbytes & bits::NBYTES_MLOFFNO_COUNT_MASK
        }
    }

    /// Beginning major iteration count, with any link encoding stripped.
    #[must_use]
    pub const fn major_loop_count(&self) -> u16 {
        if self.biter & bits::ITER_ELINK != 0 {
            self.biter & bits::ITER_LINK_COUNT_MASK
        } else {
            self.biter & bits::ITER_COUNT_MASK
        }
    }

    /// Whether the completion interrupt fires after the major loop.
    #[must_use]
    pub const fn is_interrupt_on_major(&self) -> bool {
        self.csr & bits::CSR_INTMAJOR != 0
    }

    /// Whether the request enable is cleared after the major loop.
    #[must_use]
    pub const fn is_disable_request_on_complete(&self) -> bool {
        self.csr & bits::CSR_DREQ != 0
    }

    /// Whether scatter/gather processing is enabled.
    #[must_use]
    pub const fn is_scatter_gather(&self) -> bool {
        self.csr & bits::CSR_ESG != 0
    }

    /// Next descriptor address, when scatter/gather is enabled.
    #[must_use]
    pub const fn next_descriptor(&self) -> Option<u32> {
        if self.is_scatter_gather() {
            Some(self.dlast_sga as u32)
        } else {
            None
        }
    }

    /// Whether the major loop has completed.
    #[must_use]
    pub const fn is_done(&self) -> bool {
        self.csr & bits::CSR_DONE != 0
    }

    /// Whether the channel is currently executing this descriptor.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.csr & bits::CSR_ACTIVE != 0
    }
}

impl Default for Tcd {
    fn default() -> Self {
        Self::ZERO
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
