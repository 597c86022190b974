// rv_trapio/src/trap/infrastructure/low_level.rs

//! # Low-Level Trap Hardware Control
//!
//! The CSR-backed [`Hart`] and the assembly trap entry. Only built for
//! RISC-V targets.

use super::hart::{Hart, MachineInterrupts};
use crate::console::Console;
use crate::trap::api::DISPATCHER;
use crate::trap::ds::{TrapFrame, TrapOutcome};
use core::arch::{asm, global_asm};
use log::error;
use riscv::register::{mcause, mepc, mhartid, mtval};

cfg_if::cfg_if! {
    if #[cfg(target_arch = "riscv64")] {
        global_asm!(
            ".equ REGBYTES, 8",
            ".macro SAVE reg, slot",
            "    sd \\reg, \\slot*REGBYTES(sp)",
            ".endm",
            ".macro LOAD reg, slot",
            "    ld \\reg, \\slot*REGBYTES(sp)",
            ".endm",
            include_str!("asm/trap_entry.S"),
        );
    } else {
        global_asm!(
            ".equ REGBYTES, 4",
            ".macro SAVE reg, slot",
            "    sw \\reg, \\slot*REGBYTES(sp)",
            ".endm",
            ".macro LOAD reg, slot",
            "    lw \\reg, \\slot*REGBYTES(sp)",
            ".endm",
            include_str!("asm/trap_entry.S"),
        );
    }
}

extern "C" {
    /// Saves a [`TrapFrame`], calls [`handle_trap`], restores and `mret`s.
    fn __trap_entry();
}

const MSTATUS_MIE: usize = 1 << 3;
const MSTATUS_MPIE: usize = 1 << 7;
const MSTATUS_MPP_MACHINE: usize = 0b11 << 11;

/// Address of the trap entry, for [`super::vector::TrapVector::install`].
pub fn trap_entry_address() -> usize {
    __trap_entry as usize
}

/// The hart this code is running on, driven through its CSRs.
#[derive(Debug, Default, Copy, Clone)]
pub struct MachineHart;

impl Hart for MachineHart {
    fn hart_id(&self) -> usize {
        mhartid::read()
    }

    fn read_cause(&self) -> usize {
        mcause::read().bits()
    }

    fn read_epc(&self) -> usize {
        mepc::read()
    }

    fn read_tval(&self) -> usize {
        mtval::read()
    }

    unsafe fn write_trap_vector(&self, entry: usize) {
        // Low bits 0b00 select direct mode.
        unsafe {
            asm!("csrw mtvec, {}", in(reg) entry);
        }
    }

    fn enable_interrupts(&self, lines: MachineInterrupts) {
        unsafe {
            asm!("csrs mstatus, {}", in(reg) MSTATUS_MPP_MACHINE | MSTATUS_MPIE);
            asm!("csrs mie, {}", in(reg) lines.bits());
            asm!("csrs mstatus, {}", in(reg) MSTATUS_MIE);
        }
    }

    #[inline]
    fn disable_interrupts(&self) -> bool {
        let mstatus: usize;
        unsafe {
            asm!("csrrci {}, mstatus, 1 << 3", out(reg) mstatus);
        }
        mstatus & MSTATUS_MIE != 0
    }

    #[inline]
    fn restore_interrupts(&self, was_enabled: bool) {
        if was_enabled {
            unsafe {
                asm!("csrsi mstatus, 1 << 3");
            }
        }
    }

    #[inline]
    fn wait_for_interrupt(&self) {
        unsafe {
            asm!("wfi");
        }
    }
}

/// Stops the hart for good.
pub fn halt() -> ! {
    let hart = MachineHart;
    hart.disable_interrupts();
    loop {
        hart.wait_for_interrupt();
    }
}

/// Called by `__trap_entry` with `a0` pointing at the saved frame.
///
/// # Safety
///
/// Only `__trap_entry` may call this; `frame` points into the stack it
/// just pushed.
#[no_mangle]
pub unsafe extern "C" fn handle_trap(frame: *const TrapFrame) {
    let hart = MachineHart;
    match DISPATCHER.dispatch(hart.read_cause(), &mut Console) {
        TrapOutcome::Resume => {}
        TrapOutcome::Halt(reason) => {
            // SAFETY: see the function contract.
            let frame = unsafe { &*frame };
            error!(
                "hart {} halted: {} (mepc={:#x}, mtval={:#x}, ra={:#x})",
                hart.hart_id(),
                reason,
                hart.read_epc(),
                hart.read_tval(),
                frame.return_address()
            );
            halt()
        }
    }
}
