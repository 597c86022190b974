// rv_trapio/src/trap/infrastructure/vector.rs

//! # Trap Vector Installation
//!
//! Tracks whether `mtvec` has been written. The arming sequence refuses to
//! enable any interrupt source until it has, so no interrupt can be taken
//! without a handler in place.

use super::hart::Hart;
use crate::trap::ds::ArmError;
use core::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use log::debug;

/// The installed trap vector of one hart.
#[derive(Debug)]
pub struct TrapVector {
    installed: AtomicBool,
    entry: AtomicUsize,
}

/// The trap vector of the boot hart.
pub static TRAP_VECTOR: TrapVector = TrapVector::new();

impl TrapVector {
    pub const fn new() -> Self {
        Self {
            installed: AtomicBool::new(false),
            entry: AtomicUsize::new(0),
        }
    }

    /// Writes `entry` to the hart's trap vector register, once.
    ///
    /// # Safety
    ///
    /// Same contract as [`Hart::write_trap_vector`].
    pub unsafe fn install<H: Hart + ?Sized>(&self, hart: &H, entry: usize) -> Result<(), ArmError> {
        if entry % 4 != 0 {
            return Err(ArmError::MisalignedVector(entry));
        }
        if self
            .installed
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(ArmError::VectorAlreadyInstalled);
        }

        // SAFETY: forwarded from the caller.
        unsafe { hart.write_trap_vector(entry) };
        self.entry.store(entry, Ordering::Release);
        debug!("trap vector: mtvec = {:#x}", entry);
        Ok(())
    }

    pub fn is_installed(&self) -> bool {
        self.installed.load(Ordering::Acquire)
    }

    /// The installed entry address.
    pub fn entry(&self) -> Option<usize> {
        self.is_installed()
            .then(|| self.entry.load(Ordering::Acquire))
    }
}

impl Default for TrapVector {
    fn default() -> Self {
        Self::new()
    }
}
