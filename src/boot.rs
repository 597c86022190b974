// rv_trapio/src/boot.rs

//! # Boot and Arming
//!
//! Brings the interrupt path up in a fixed order: trap vector, hart interrupt
//! enables, controller routing, device interrupt enable. [`Arming`] refuses
//! every step after the first until the trap vector is in place, so an
//! interrupt can never arrive at an empty `mtvec`.

use crate::drivers::plic::{Context, Plic, PrivilegeMode, SourceId};
use crate::drivers::uart::{IrqFlags, Uart};
use crate::mmio::{RegisterBus32, RegisterBus8};
use crate::trap::{without_interrupts, ArmError, Hart, MachineInterrupts, TrapVector};
use log::debug;

/// The arming sequence for one hart.
pub struct Arming<'a, H: Hart + ?Sized> {
    hart: &'a H,
    vector: &'a TrapVector,
    context: Context,
}

impl<'a, H: Hart + ?Sized> Arming<'a, H> {
    pub fn new(hart: &'a H, vector: &'a TrapVector, mode: PrivilegeMode) -> Self {
        Self {
            hart,
            vector,
            context: Context::new(hart.hart_id(), mode),
        }
    }

    /// The controller context interrupts are routed to.
    pub fn context(&self) -> Context {
        self.context
    }

    /// Writes the trap vector. Must be the first step.
    ///
    /// # Safety
    ///
    /// Same contract as [`Hart::write_trap_vector`].
    pub unsafe fn install_vector(&self, entry: usize) -> Result<(), ArmError> {
        // SAFETY: forwarded from the caller.
        unsafe { self.vector.install(self.hart, entry) }?;
        debug!("arming: vector at {:#x}", entry);
        Ok(())
    }

    fn require_vector(&self) -> Result<(), ArmError> {
        if self.vector.is_installed() {
            Ok(())
        } else {
            Err(ArmError::VectorNotInstalled)
        }
    }

    /// Enables `lines` in `mie` and machine interrupts globally.
    pub fn enable_global(&self, lines: MachineInterrupts) -> Result<(), ArmError> {
        self.require_vector()?;
        self.hart.enable_interrupts(lines);
        debug!("arming: mie |= {:?}", lines);
        Ok(())
    }

    /// Gives `source` a priority, enables it for this context and sets the
    /// context threshold.
    pub fn route_source<B: RegisterBus32>(
        &self,
        plic: &Plic<B>,
        source: u32,
        priority: u32,
        threshold: u32,
    ) -> Result<SourceId, ArmError> {
        self.require_vector()?;
        let id = SourceId::new(source).ok_or(ArmError::InvalidSource(source))?;
        if priority == 0 {
            return Err(ArmError::ZeroPriority);
        }

        plic.set_priority(id, priority);
        plic.enable(self.context, id);
        plic.set_threshold(self.context, threshold);
        debug!(
            "arming: source {} -> context {} (priority {}, threshold {})",
            id,
            self.context.index(),
            priority,
            threshold
        );
        Ok(id)
    }

    /// Enables interrupt generation in the UART itself.
    pub fn enable_device<B: RegisterBus8, const N: usize>(
        &self,
        uart: &Uart<B, N>,
        flags: IrqFlags,
    ) -> Result<(), ArmError> {
        self.require_vector()?;
        uart.irq_enable_set(flags);
        Ok(())
    }
}

/// One iteration of the echo loop.
///
/// Takes a received byte inside a critical section, sleeping there if none
/// is queued, and echoes it with interrupts back on. `wfi` wakes on a pending
/// interrupt even with `MIE` clear, so nothing is lost between the empty
/// check and the sleep.
pub fn echo_step<H, B, const N: usize>(hart: &H, uart: &Uart<B, N>) -> Option<u8>
where
    H: Hart + ?Sized,
    B: RegisterBus8,
{
    let byte = without_interrupts(hart, || {
        let byte = uart.take_received();
        if byte.is_none() {
            hart.wait_for_interrupt();
        }
        byte
    });
    if let Some(byte) = byte {
        uart.write_byte(byte);
    }
    byte
}

#[cfg(any(target_arch = "riscv32", target_arch = "riscv64"))]
mod firmware {
    use super::*;
    use crate::config::PlatformConfig;
    use crate::console::CONSOLE;
    use crate::mmio::Mmio;
    use crate::trap::{
        halt, trap_entry_address, BindingTable, MachineHart, TrapDispatcher, DISPATCHER,
        TRAP_VECTOR,
    };
    use crate::{error_print, println};
    use log::info;

    /// Arms the interrupt path and serves the echo loop forever.
    pub fn run(config: &PlatformConfig) -> ! {
        let hart = MachineHart;
        let arming = Arming::new(&hart, &TRAP_VECTOR, config.mode);

        if let Err(err) = arm(&arming, config) {
            error_print!("boot failed: {}", err);
            halt()
        }

        println!("waiting for interrupts");
        loop {
            echo_step(&hart, &CONSOLE);
        }
    }

    fn arm(arming: &Arming<'_, MachineHart>, config: &PlatformConfig) -> Result<(), ArmError> {
        // SAFETY: `__trap_entry` saves state and returns with mret.
        unsafe { arming.install_vector(trap_entry_address()) }?;

        if crate::logger::init(config.log_level).is_err() {
            crate::warn_print!("logger already installed");
        }
        config.validate()?;
        CONSOLE.fifo_init();
        println!("init");

        let uart_source = config.uart_source_id()?;
        let mut bindings = BindingTable::new();
        bindings.bind(uart_source, &CONSOLE)?;
        // SAFETY: the platform PLIC base is a device block, and this is the
        // only handle created for it.
        let plic = Plic::new(unsafe { Mmio::new(config.plic_base) });
        DISPATCHER.install(arming.hart, TrapDispatcher::new(plic, arming.context(), bindings))?;

        #[cfg(feature = "selftest")]
        crate::test::run_all_tests();

        arming.enable_global(config.hart_interrupts)?;
        println!("interrupts enabled");

        DISPATCHER
            .with_controller(arming.hart, |plic, _| {
                arming.route_source(plic, config.uart_source, config.uart_priority, config.threshold)
            })
            .ok_or(ArmError::DispatcherNotInstalled)??;
        println!("PLIC configured for UART");

        arming.enable_device(&CONSOLE, config.uart_irq_flags)?;
        println!("UART interrupts enabled");
        info!("armed: hart {} context {}", arming.hart.hart_id(), arming.context().index());
        Ok(())
    }
}

#[cfg(any(target_arch = "riscv32", target_arch = "riscv64"))]
pub use self::firmware::run;
