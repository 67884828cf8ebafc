//! # edma-driver
//!
//! Channel-management engine for the eDMA peripheral: channel allocation,
//! transfer-descriptor construction, transfer control, and interrupt
//! dispatch, in a `no_std`, no-alloc crate.
//!
//! ## Design
//!
//! All hardware access goes through the capability traits in [`hal`]
//! ([`hal::EdmaRegisters`], [`hal::RequestMux`], [`hal::ClockGate`]),
//! injected into [`Edma`] at construction. Production builds use the MMIO
//! implementations in [`register`]; tests run the full engine against
//! in-memory mocks, no hardware required.
//!
//! Transfer descriptors are built by the pure [`Tcd::from_config`] and then
//! installed either in a channel's live registers or in a software TCD for
//! scatter/gather chaining, so both destinations always receive identical
//! values.
//!
//! ## Example
//!
//! ```ignore
//! use edma_driver::{
//!     ChannelSelection, Edma, EdmaConfig, TransferSize, TransferType,
//!     register::{MmioDmaMux, MmioEdma},
//! };
//!
//! let mut edma: Edma<_, _, 16> = Edma::new(
//!     unsafe { MmioEdma::new(EDMA_BASE) },
//!     unsafe { MmioDmaMux::new(DMAMUX_BASE) },
//! );
//! edma.init(&EdmaConfig::new(), &clocks)?;
//!
//! let ch = edma.request_channel(ChannelSelection::Any, UART0_RX_SOURCE)?;
//! edma.config_single_block_transfer(
//!     ch,
//!     TransferType::PeripheralToMemory,
//!     UART0_DATA_REG,
//!     buffer_addr,
//!     TransferSize::Bytes1,
//!     buffer_len,
//! )?;
//! edma.start_channel(ch)?;
//! ```
//!
//! ## Features
//!
//! - `defmt`: `defmt::Format` derives on public types.
//! - `log`: diagnostics on the allocation and error-dispatch paths.
//! - `critical-section`: the ISR-safe [`sync::SharedEdma`] wrapper.

#![no_std]

pub mod config;
pub mod descriptor;
pub mod driver;
pub mod error;
pub mod hal;
pub mod register;
#[cfg(feature = "critical-section")]
pub mod sync;
#[cfg(test)]
pub mod testing;

pub use config::{ChannelArbitration, ClockName, EdmaConfig};
pub use descriptor::{
    LoopConfig, ScatterGatherEntry, Tcd, TransferConfig, TransferSize, TransferType,
};
pub use driver::{
    Callback, ChannelSelection, ChannelSetup, ChannelStatus, DriverState, Edma, ErrorFlags,
};
pub use error::{Error, Result};
#[cfg(feature = "critical-section")]
pub use sync::SharedEdma;
