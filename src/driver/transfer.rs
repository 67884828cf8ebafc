//! Transfer configuration.
//!
//! Translates logical transfer descriptions into descriptors and installs
//! them. Validation happens entirely before any hardware write, so a
//! rejected configuration leaves the channel exactly as it was.

use crate::descriptor::{
    LoopConfig, ScatterGatherEntry, Tcd, TransferConfig, TransferSize, TransferType,
};
use crate::error::{Error, Result};
use crate::hal::{EdmaRegisters, RequestMux};

use super::Edma;

/// Per-access offsets for the two sides of a transfer: the peripheral side
/// holds its address, the memory side steps by the access width.
fn offsets(transfer_type: TransferType, size: TransferSize) -> (i16, i16) {
    let step = size.bytes() as i16;
    match transfer_type {
        TransferType::PeripheralToMemory => (0, step),
        TransferType::MemoryToPeripheral => (step, 0),
        TransferType::MemoryToMemory => (step, step),
        TransferType::PeripheralToPeripheral => (0, 0),
    }
}

impl<R: EdmaRegisters, M: RequestMux, const CHANNELS: usize> Edma<R, M, CHANNELS> {
    /// Build a descriptor from `config` and write it to the channel's live
    /// TCD registers.
    ///
    /// # Errors
    ///
    /// Validation errors from [`Tcd::from_config`]; `Fail` when the channel
    /// is not allocated.
    pub fn push_to_registers(&mut self, channel: u8, config: &TransferConfig) -> Result<()> {
        self.occupied_index(channel)?;
        let tcd = Tcd::from_config(config, self.minor_loop_mapping)?;
        self.regs.write_tcd(channel, &tcd);
        Ok(())
    }

    /// Build a descriptor from `config` into a software TCD.
    ///
    /// Produces exactly the value [`Self::push_to_registers`] would write,
    /// making software descriptors safe scatter/gather link targets.
    pub fn push_to_tcd(&self, config: &TransferConfig, tcd: &mut Tcd) -> Result<()> {
        *tcd = Tcd::from_config(config, self.minor_loop_mapping)?;
        Ok(())
    }

    /// Read back the channel's live descriptor.
    pub fn channel_tcd(&self, channel: u8) -> Result<Tcd> {
        self.occupied_index(channel)?;
        Ok(self.regs.read_tcd(channel))
    }

    /// Configure a single-block transfer: one access width, `data_length`
    /// bytes total, one service request per access group.
    ///
    /// The channel raises its completion interrupt and releases its request
    /// gate when the block is done.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` when `data_length` is not a multiple of the access
    /// width or the iteration count does not fit; `Fail` when the channel is
    /// not allocated.
    pub fn config_single_block_transfer(
        &mut self,
        channel: u8,
        transfer_type: TransferType,
        src_addr: u32,
        dest_addr: u32,
        transfer_size: TransferSize,
        data_length: u32,
    ) -> Result<()> {
        self.occupied_index(channel)?;

        let width = transfer_size.bytes();
        if data_length == 0 || data_length % width != 0 {
            return Err(Error::InvalidArgument);
        }
        let iterations = data_length / width;
        if iterations > u32::from(u16::MAX) {
            return Err(Error::InvalidArgument);
        }

        let (src_offset, dest_offset) = offsets(transfer_type, transfer_size);
        let mut config = TransferConfig::new(src_addr, dest_addr, transfer_size, width);
        config.src_offset = src_offset;
        config.dest_offset = dest_offset;
        config.interrupt_on_completion = true;
        config.disable_request_on_complete = true;
        config.loop_config = Some(LoopConfig::with_iterations(iterations as u16));

        self.push_to_registers(channel, &config)
    }

    /// Configure a loop transfer from a full [`TransferConfig`] carrying
    /// loop parameters.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` when `config` has no loop parameters or requests
    /// scatter/gather (loop and scatter/gather transfers are configured
    /// through separate calls); otherwise as [`Self::push_to_registers`].
    pub fn config_loop_transfer(&mut self, channel: u8, config: &TransferConfig) -> Result<()> {
        if config.loop_config.is_none() || config.scatter_gather_next.is_some() {
            return Err(Error::InvalidArgument);
        }
        self.push_to_registers(channel, config)
    }

    /// Configure a scatter/gather transfer over matched source/destination
    /// segment lists.
    ///
    /// Each segment moves `bytes_on_request` bytes per service request.
    /// Descriptors are built into `tcd_list`; each non-final descriptor links
    /// to the next, and only the final one raises the completion interrupt
    /// and releases the request gate. The first descriptor is also written to
    /// the channel's live registers, arming the chain.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` when the segment lists differ in length, `tcd_list`
    /// has fewer slots than segments, a segment length is not a multiple of
    /// `bytes_on_request`, or (memory-to-memory) a source and destination
    /// segment disagree in length. `Fail` when the channel is not allocated.
    /// Nothing is written to the hardware on error.
    pub fn config_scatter_gather_transfer(
        &mut self,
        channel: u8,
        tcd_list: &mut [Tcd],
        transfer_size: TransferSize,
        bytes_on_request: u32,
        transfer_type: TransferType,
        src_list: &[ScatterGatherEntry],
        dest_list: &[ScatterGatherEntry],
    ) -> Result<()> {
        self.occupied_index(channel)?;

        let segments = src_list.len();
        if segments == 0 || dest_list.len() != segments || tcd_list.len() < segments {
            return Err(Error::InvalidArgument);
        }
        if bytes_on_request == 0 {
            return Err(Error::InvalidArgument);
        }

        let (src_offset, dest_offset) = offsets(transfer_type, transfer_size);

        for index in 0..segments {
            let src = &src_list[index];
            let dest = &dest_list[index];

            // Both sides must agree on the byte count the segment moves.
            let length = match transfer_type {
                TransferType::MemoryToMemory => {
                    if src.length != dest.length {
                        return Err(Error::InvalidArgument);
                    }
                    src.length
                }
                TransferType::PeripheralToMemory | TransferType::PeripheralToPeripheral => {
                    dest.length
                }
                TransferType::MemoryToPeripheral => src.length,
            };
            if length == 0 || length % bytes_on_request != 0 {
                return Err(Error::InvalidArgument);
            }
            let iterations = length / bytes_on_request;
            if iterations > u32::from(u16::MAX) {
                return Err(Error::InvalidArgument);
            }

            let final_segment = index == segments - 1;
            let mut config =
                TransferConfig::new(src.address, dest.address, transfer_size, bytes_on_request);
            config.src_offset = src_offset;
            config.dest_offset = dest_offset;
            config.loop_config = Some(LoopConfig::with_iterations(iterations as u16));
            if final_segment {
                config.interrupt_on_completion = true;
                config.disable_request_on_complete = true;
            } else {
                config.scatter_gather_next =
                    Some(core::ptr::from_ref(&tcd_list[index + 1]) as u32);
            }

            tcd_list[index] = Tcd::from_config(&config, self.minor_loop_mapping)?;
        }

        // Arm the chain only after every descriptor validated.
        self.regs.write_tcd(channel, &tcd_list[0]);
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
