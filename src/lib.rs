// rv_trapio/src/lib.rs

//! # rv_trapio
//!
//! Machine-mode interrupt I/O for a single RISC-V hart: trap cause decoding,
//! a PLIC driver speaking the claim/complete protocol, an NS16550A UART
//! driver, and the trap dispatcher and arming sequence that connect them.
//!
//! Everything except the CSR-backed hart and the assembly trap entry builds
//! on the host, where the test suite runs against register-level models.

#![cfg_attr(not(test), no_std)]

pub mod boot;
pub mod config;
pub mod console;
pub mod drivers;
pub mod logger;
pub mod mmio;
pub mod trap;

#[cfg(all(feature = "selftest", any(target_arch = "riscv32", target_arch = "riscv64")))]
pub mod test;

#[cfg(test)]
pub(crate) mod testing;

/// Zeroes `.bss`.
///
/// # Safety
///
/// Must run once, before anything reads a zero-initialised static. The boot
/// stack lives outside `.bss`.
#[cfg(target_os = "none")]
pub unsafe fn clear_bss() {
    extern "C" {
        fn sbss();
        fn ebss();
    }

    let start = sbss as usize;
    let end = ebss as usize;
    for addr in start..end {
        // SAFETY: the linker script bounds the range to `.bss`.
        unsafe { core::ptr::write_volatile(addr as *mut u8, 0) };
    }
}
