// rv_trapio/src/testing/mod.rs

//! # Host Test Doubles
//!
//! Behavioural models of the interrupt controller, the UART and the hart,
//! used by the host test suite in place of real registers and CSRs.

mod hart;
mod plic_model;
mod uart_model;

pub use self::hart::{HartEvent, RecordingHart};
pub use self::plic_model::PlicModel;
pub use self::uart_model::UartModel;

/// Builds a raw cause value with the interrupt flag set for the host width.
pub const fn interrupt_cause(code: usize) -> usize {
    (1 << (usize::BITS - 1)) | code
}
