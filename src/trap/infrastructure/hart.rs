// rv_trapio/src/trap/infrastructure/hart.rs

//! # Hart Control Interface
//!
//! The privileged operations the trap subsystem performs on the hart it runs
//! on. [`super::low_level::MachineHart`] implements them with CSR
//! instructions; host tests use a recording double.

use core::fmt;
use core::ops::BitOr;

/// A set of machine-level interrupt lines, laid out like the `mie` register.
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct MachineInterrupts(usize);

impl MachineInterrupts {
    pub const NONE: Self = Self(0);
    /// `mie.MSIE`
    pub const SOFTWARE: Self = Self(1 << 3);
    /// `mie.MTIE`
    pub const TIMER: Self = Self(1 << 7);
    /// `mie.MEIE`
    pub const EXTERNAL: Self = Self(1 << 11);

    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn bits(self) -> usize {
        self.0
    }
}

impl BitOr for MachineInterrupts {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl fmt::Debug for MachineInterrupts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MachineInterrupts({:#x})", self.0)
    }
}

/// Privileged control of the current hart.
pub trait Hart {
    fn hart_id(&self) -> usize;

    /// Raw value of `mcause`.
    fn read_cause(&self) -> usize;

    /// Raw value of `mepc`.
    fn read_epc(&self) -> usize;

    /// Raw value of `mtval`.
    fn read_tval(&self) -> usize;

    /// Points `mtvec` at `entry` in direct mode.
    ///
    /// # Safety
    ///
    /// `entry` must be the address of a routine that preserves interrupted
    /// state and returns with `mret`.
    unsafe fn write_trap_vector(&self, entry: usize);

    /// Sets `mstatus.MPP` to machine mode, sets `MPIE` and `MIE`, and enables
    /// the given lines in `mie`.
    fn enable_interrupts(&self, lines: MachineInterrupts);

    /// Clears `mstatus.MIE`, returning whether it was set.
    fn disable_interrupts(&self) -> bool;

    /// Restores `mstatus.MIE` to a state returned by
    /// [`Hart::disable_interrupts`].
    fn restore_interrupts(&self, was_enabled: bool);

    /// Stalls until an interrupt is pending. Returns even when `mstatus.MIE`
    /// is clear.
    fn wait_for_interrupt(&self);
}

/// Runs `f` with interrupts disabled on `hart`, then restores the prior state.
///
/// Anything the trap handler also touches must be accessed from the main flow
/// inside this section.
pub fn without_interrupts<H, R>(hart: &H, f: impl FnOnce() -> R) -> R
where
    H: Hart + ?Sized,
{
    let was_enabled = hart.disable_interrupts();
    let result = f();
    hart.restore_interrupts(was_enabled);
    result
}
