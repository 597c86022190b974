// rv_trapio/src/config.rs

//! # Platform Configuration
//!
//! Board addresses and interrupt routing, fixed at build time.

use crate::drivers::plic::{PrivilegeMode, SourceId};
use crate::drivers::uart::IrqFlags;
use crate::trap::{ArmError, MachineInterrupts};
use log::LevelFilter;

/// Everything the boot sequence needs to know about the board.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PlatformConfig {
    pub plic_base: usize,
    pub uart_base: usize,
    /// Controller source id of the UART.
    pub uart_source: u32,
    pub uart_priority: u32,
    /// Controller threshold for the boot hart's context.
    pub threshold: u32,
    /// Privilege mode half of the interrupt context.
    pub mode: PrivilegeMode,
    pub uart_irq_flags: IrqFlags,
    /// Lines enabled in `mie` at arming time.
    pub hart_interrupts: MachineInterrupts,
    pub log_level: LevelFilter,
}

impl PlatformConfig {
    /// QEMU `virt`, booted in machine mode.
    pub const QEMU_VIRT: Self = Self {
        plic_base: 0x0c00_0000,
        uart_base: 0x1000_0000,
        uart_source: 10,
        uart_priority: 1,
        threshold: 0,
        mode: PrivilegeMode::Machine,
        uart_irq_flags: IrqFlags::RX_AVAILABLE,
        hart_interrupts: MachineInterrupts::SOFTWARE.union(MachineInterrupts::EXTERNAL),
        log_level: LevelFilter::Info,
    };

    pub const fn with_plic_base(mut self, base: usize) -> Self {
        self.plic_base = base;
        self
    }

    pub const fn with_uart_base(mut self, base: usize) -> Self {
        self.uart_base = base;
        self
    }

    pub const fn with_uart_source(mut self, source: u32) -> Self {
        self.uart_source = source;
        self
    }

    pub const fn with_uart_priority(mut self, priority: u32) -> Self {
        self.uart_priority = priority;
        self
    }

    pub const fn with_threshold(mut self, threshold: u32) -> Self {
        self.threshold = threshold;
        self
    }

    pub const fn with_mode(mut self, mode: PrivilegeMode) -> Self {
        self.mode = mode;
        self
    }

    pub const fn with_log_level(mut self, level: LevelFilter) -> Self {
        self.log_level = level;
        self
    }

    /// The UART source id, if it is a valid controller source.
    pub fn uart_source_id(&self) -> Result<SourceId, ArmError> {
        SourceId::new(self.uart_source).ok_or(ArmError::InvalidSource(self.uart_source))
    }

    /// Checks the routing values before any register is touched.
    ///
    /// The console UART is a static at [`PLATFORM`]'s address, so a board
    /// with another UART base is rejected.
    pub fn validate(&self) -> Result<(), ArmError> {
        if self.uart_base != PLATFORM.uart_base {
            return Err(ArmError::ConsoleBaseMismatch(self.uart_base));
        }
        self.uart_source_id()?;
        if self.uart_priority == 0 {
            return Err(ArmError::ZeroPriority);
        }
        if self.threshold >= self.uart_priority {
            log::warn!(
                "threshold {} masks UART priority {}",
                self.threshold,
                self.uart_priority
            );
        }
        Ok(())
    }
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self::QEMU_VIRT
    }
}

/// The board this firmware is built for.
pub const PLATFORM: PlatformConfig = PlatformConfig::QEMU_VIRT;
