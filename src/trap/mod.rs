// rv_trapio/src/trap/mod.rs

//! # Machine-Mode Trap and Interrupt Subsystem
//!
//! Decodes every trap the hart takes, halts on exceptions, and routes
//! external interrupts through the interrupt controller's claim/complete
//! protocol to the bound device driver.

pub mod collections;
pub mod ds;
mod infrastructure;
mod api;

pub use self::api::*;

pub use self::ds::{
    decode, ArmError, BindingTable, CauseCode, ExceptionKind, HaltReason, InterruptKind,
    InterruptService, TrapFrame, TrapOutcome,
};
pub use self::infrastructure::dispatcher::{DispatchState, TrapDispatcher};
pub use self::infrastructure::hart::{without_interrupts, Hart, MachineInterrupts};
pub use self::infrastructure::vector::{TrapVector, TRAP_VECTOR};

#[cfg(any(target_arch = "riscv32", target_arch = "riscv64"))]
pub use self::infrastructure::low_level::{halt, trap_entry_address, MachineHart};
