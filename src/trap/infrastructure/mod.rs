// rv_trapio/src/trap/infrastructure/mod.rs

//! # Trap Infrastructure
//!
//! The hart interface, the trap vector, the dispatcher state machine and the
//! machine-mode trap entry that ties them together.

pub mod dispatcher;
pub mod hart;
pub mod vector;

#[cfg(any(target_arch = "riscv32", target_arch = "riscv64"))]
pub mod low_level;
