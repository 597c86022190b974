// rv_trapio/src/mmio.rs

//! # Memory-Mapped Register Access
//!
//! Every device driver in the crate talks to its register block through one of
//! the two bus traits below, addressed by byte offset from the block base.
//! On hardware the bus is an [`Mmio`] handle doing volatile accesses; the host
//! test suite substitutes behavioural device models.

use core::ptr;

/// A register block made of 32-bit words (the interrupt controller).
pub trait RegisterBus32 {
    /// Reads the 32-bit register at byte `offset`.
    fn read32(&self, offset: usize) -> u32;
    /// Writes the 32-bit register at byte `offset`.
    fn write32(&self, offset: usize, value: u32);
}

/// A register block made of 8-bit ports (the UART).
pub trait RegisterBus8 {
    /// Reads the 8-bit port at byte `offset`.
    fn read8(&self, offset: usize) -> u8;
    /// Writes the 8-bit port at byte `offset`.
    fn write8(&self, offset: usize, value: u8);
}

/// An owned handle to a physical register block.
///
/// The handle holds nothing but the base address. Reads and writes have side
/// effects outside normal program state, so every access is volatile.
#[derive(Debug)]
pub struct Mmio {
    base: usize,
}

impl Mmio {
    /// Creates a handle for the register block at `base`.
    ///
    /// # Safety
    ///
    /// `base` must be the address of a device register block that stays mapped
    /// for the lifetime of the handle, and no other `Mmio` may cover the same
    /// address range.
    pub const unsafe fn new(base: usize) -> Self {
        Self { base }
    }

    /// Returns the base address of the block.
    pub const fn base(&self) -> usize {
        self.base
    }
}

impl RegisterBus32 for Mmio {
    #[inline]
    fn read32(&self, offset: usize) -> u32 {
        let reg = ptr::with_exposed_provenance::<u32>(self.base + offset);
        // SAFETY: the constructor contract guarantees the block is mapped.
        unsafe { reg.read_volatile() }
    }

    #[inline]
    fn write32(&self, offset: usize, value: u32) {
        let reg = ptr::with_exposed_provenance_mut::<u32>(self.base + offset);
        // SAFETY: the constructor contract guarantees the block is mapped.
        unsafe { reg.write_volatile(value) }
    }
}

impl RegisterBus8 for Mmio {
    #[inline]
    fn read8(&self, offset: usize) -> u8 {
        let reg = ptr::with_exposed_provenance::<u8>(self.base + offset);
        // SAFETY: the constructor contract guarantees the block is mapped.
        unsafe { reg.read_volatile() }
    }

    #[inline]
    fn write8(&self, offset: usize, value: u8) {
        let reg = ptr::with_exposed_provenance_mut::<u8>(self.base + offset);
        // SAFETY: the constructor contract guarantees the block is mapped.
        unsafe { reg.write_volatile(value) }
    }
}

impl<B: RegisterBus32 + ?Sized> RegisterBus32 for &B {
    fn read32(&self, offset: usize) -> u32 {
        (**self).read32(offset)
    }

    fn write32(&self, offset: usize, value: u32) {
        (**self).write32(offset, value)
    }
}

impl<B: RegisterBus8 + ?Sized> RegisterBus8 for &B {
    fn read8(&self, offset: usize) -> u8 {
        (**self).read8(offset)
    }

    fn write8(&self, offset: usize, value: u8) {
        (**self).write8(offset, value)
    }
}
