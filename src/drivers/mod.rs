// rv_trapio/src/drivers/mod.rs

//! # Device Drivers
//!
//! Register-level drivers for the two devices the firmware talks to.

pub mod plic;
pub mod uart;

pub use self::plic::{Context, Plic, PrivilegeMode, SourceId};
pub use self::uart::{IrqFlags, Uart};
