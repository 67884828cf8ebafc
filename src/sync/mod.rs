//! ISR-safe engine sharing.
//!
//! A driver shared between thread context and the eDMA interrupt handlers
//! needs exclusive access on both sides. [`SharedEdma`] wraps the engine in a
//! critical-section cell: every access runs with interrupts masked, which
//! also closes the race between releasing a channel and a pending error
//! interrupt naming it.

use core::cell::RefCell;

use critical_section::Mutex;

use crate::driver::Edma;
use crate::hal::{EdmaRegisters, RequestMux};

/// Interior-mutability cell guarded by a critical section.
pub struct CriticalSectionCell<T> {
    inner: Mutex<RefCell<T>>,
}

impl<T> CriticalSectionCell<T> {
    /// Wrap a value (const, suitable for statics).
    pub const fn new(value: T) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(value)),
        }
    }

    /// Run `f` with exclusive access, interrupts masked.
    #[inline]
    pub fn with<R, F>(&self, f: F) -> R
    where
        F: FnOnce(&mut T) -> R,
    {
        critical_section::with(|cs| f(&mut self.inner.borrow_ref_mut(cs)))
    }

    /// Run `f` if the cell is not already borrowed, interrupts masked.
    #[inline]
    pub fn try_with<R, F>(&self, f: F) -> Option<R>
    where
        F: FnOnce(&mut T) -> R,
    {
        critical_section::with(|cs| {
            let mut borrow = self.inner.borrow(cs).try_borrow_mut().ok()?;
            Some(f(&mut borrow))
        })
    }
}

/// ISR-safe engine wrapper.
///
/// # Example
///
/// ```ignore
/// static EDMA: SharedEdma<MmioEdma, MmioDmaMux, 16> =
///     SharedEdma::new(unsafe { MmioEdma::new(EDMA_BASE) }, unsafe {
///         MmioDmaMux::new(DMAMUX_BASE)
///     });
///
/// // In the error vector:
/// fn edma_error_handler() {
///     EDMA.with(|edma| {
///         edma.on_error_interrupt();
///     });
/// }
/// ```
pub struct SharedEdma<R: EdmaRegisters, M: RequestMux, const CHANNELS: usize> {
    inner: CriticalSectionCell<Edma<R, M, CHANNELS>>,
}

impl<R: EdmaRegisters, M: RequestMux, const CHANNELS: usize> SharedEdma<R, M, CHANNELS> {
    /// Wrap a new engine over the given register collaborators (const,
    /// suitable for statics).
    pub const fn new(regs: R, mux: M) -> Self {
        Self {
            inner: CriticalSectionCell::new(Edma::new(regs, mux)),
        }
    }

    /// Run `f` with exclusive access to the engine, interrupts masked.
    #[inline]
    pub fn with<T, F>(&self, f: F) -> T
    where
        F: FnOnce(&mut Edma<R, M, CHANNELS>) -> T,
    {
        self.inner.with(f)
    }

    /// Run `f` if the engine is not already borrowed, interrupts masked.
    #[inline]
    pub fn try_with<T, F>(&self, f: F) -> Option<T>
    where
        F: FnOnce(&mut Edma<R, M, CHANNELS>) -> T,
    {
        self.inner.try_with(f)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
