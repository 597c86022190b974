// rv_trapio/src/trap/ds/handler.rs

//! # Device Interrupt Bindings
//!
//! Maps controller source ids to the device driver responsible for servicing
//! them. The table is filled during arming and only read afterwards.

use super::error::ArmError;
use crate::drivers::plic::SourceId;
use core::fmt;

/// Device-side interrupt service behaviour.
///
/// Called by the dispatcher between claim and complete, so the controller
/// will not hand the same source out again while `service` runs.
pub trait InterruptService: Sync {
    /// Handles one pending event on the device.
    fn service(&self);
}

/// One source-to-device entry.
#[derive(Copy, Clone)]
pub struct DeviceBinding<'d> {
    pub source: SourceId,
    pub device: &'d dyn InterruptService,
}

impl fmt::Debug for DeviceBinding<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceBinding")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

/// A fixed-capacity table of device bindings.
pub struct BindingTable<'d, const N: usize> {
    entries: [Option<DeviceBinding<'d>>; N],
}

impl<'d, const N: usize> BindingTable<'d, N> {
    pub const fn new() -> Self {
        Self { entries: [None; N] }
    }

    /// Binds `device` to `source`.
    pub fn bind(
        &mut self,
        source: SourceId,
        device: &'d dyn InterruptService,
    ) -> Result<(), ArmError> {
        if self.lookup(source).is_some() {
            return Err(ArmError::SourceAlreadyBound(source.get()));
        }
        let slot = self
            .entries
            .iter_mut()
            .find(|entry| entry.is_none())
            .ok_or(ArmError::BindingTableFull)?;
        *slot = Some(DeviceBinding { source, device });
        Ok(())
    }

    /// Returns the device bound to `source`, if any.
    pub fn lookup(&self, source: SourceId) -> Option<&'d dyn InterruptService> {
        self.entries
            .iter()
            .flatten()
            .find(|binding| binding.source == source)
            .map(|binding| binding.device)
    }

    pub fn len(&self) -> usize {
        self.entries.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<const N: usize> Default for BindingTable<'_, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> fmt::Debug for BindingTable<'_, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.entries.iter().flatten()).finish()
    }
}

/// Why the dispatcher stopped the hart.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum HaltReason {
    /// A synchronous exception with the given code.
    Exception(usize),
    /// An interrupt with no service path, with the given code.
    UnhandledInterrupt(usize),
    /// A trap arrived after the dispatcher had already halted.
    AlreadyHalted,
    /// A trap arrived before any dispatcher was installed.
    NotArmed,
    /// A trap arrived while the dispatcher was held by the main flow.
    DispatcherBusy,
}

impl fmt::Display for HaltReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exception(code) => write!(f, "exception {:#x}", code),
            Self::UnhandledInterrupt(code) => write!(f, "unhandled interrupt {:#x}", code),
            Self::AlreadyHalted => f.write_str("trap after halt"),
            Self::NotArmed => f.write_str("trap before dispatcher installed"),
            Self::DispatcherBusy => f.write_str("trap while dispatcher in use"),
        }
    }
}

/// What the trap entry does after the dispatcher returns.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TrapOutcome {
    /// Return to the interrupted instruction stream.
    Resume,
    /// Stop the hart for good.
    Halt(HaltReason),
}
