// rv_trapio/src/trap/ds/error.rs

//! # Arming Errors
//!
//! Errors reported while the trap vector and interrupt sources are being set
//! up. Faults taken at trap time are not errors: the dispatcher turns them into
//! a halt, since there is no caller above the trap entry to return one to.

use thiserror::Error;

/// Failures of the arming sequence and its configuration.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
pub enum ArmError {
    /// An interrupt-enable step ran before the trap vector was installed.
    #[error("trap vector has not been installed")]
    VectorNotInstalled,
    /// The trap vector is written exactly once.
    #[error("trap vector is already installed")]
    VectorAlreadyInstalled,
    /// Direct-mode vectors need a 4-byte aligned entry point.
    #[error("trap entry {0:#x} is not 4-byte aligned")]
    MisalignedVector(usize),
    /// Source ids run from 1 to 1023; 0 is the controller's "no source" value.
    #[error("interrupt source {0} is out of range")]
    InvalidSource(u32),
    /// A source routed with priority 0 can never interrupt.
    #[error("interrupt source priority must be non-zero")]
    ZeroPriority,
    #[error("interrupt source {0} is already bound to a device")]
    SourceAlreadyBound(u32),
    #[error("device binding table is full")]
    BindingTableFull,
    #[error("trap dispatcher is already installed")]
    DispatcherAlreadyInstalled,
    #[error("trap dispatcher has not been installed")]
    DispatcherNotInstalled,
    #[error("UART base {0:#x} is not the console UART")]
    ConsoleBaseMismatch(usize),
}
