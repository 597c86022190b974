// rv_trapio/src/trap/ds/mod.rs

//! # Trap Data Structures Module
//!
//! Cause decoding, the saved trap frame, arming errors and the types that
//! connect interrupt sources to device drivers. Nothing here allocates.

pub mod context;
pub mod error;
pub mod handler;
pub mod types;

pub use self::context::TrapFrame;
pub use self::error::ArmError;
pub use self::handler::{
    BindingTable, DeviceBinding, HaltReason, InterruptService, TrapOutcome,
};
pub use self::types::{decode, decode_width, CauseCode, ExceptionKind, InterruptKind};
