// rv_trapio/src/trap/api.rs

//! # Public API for the Trap Subsystem
//!
//! Owns the dispatcher the trap entry hands every trap to. The main flow
//! installs it once during arming and afterwards reaches the interrupt
//! controller only through [`DispatcherCell::with_controller`], inside a
//! critical section, so the trap handler and the main flow never drive the
//! controller at the same time.

use super::ds::{decode, ArmError, CauseCode, HaltReason, TrapOutcome};
use super::infrastructure::dispatcher::{write_cause, TrapDispatcher};
use super::infrastructure::hart::{without_interrupts, Hart};
use crate::drivers::plic::{Context, Plic};
use crate::mmio::{Mmio, RegisterBus32};
use core::fmt::Write;
use core::sync::atomic::{AtomicBool, Ordering};
use log::info;
use spin::Mutex;

/// Device bindings the firmware dispatcher can hold.
pub const MAX_BINDINGS: usize = 4;

/// The dispatcher the trap entry calls into.
pub static DISPATCHER: DispatcherCell<'static, Mmio, MAX_BINDINGS> = DispatcherCell::new();

/// A slot holding at most one installed dispatcher.
pub struct DispatcherCell<'d, B: RegisterBus32, const N: usize> {
    slot: Mutex<Option<TrapDispatcher<'d, B, N>>>,
    installed: AtomicBool,
}

impl<'d, B: RegisterBus32, const N: usize> DispatcherCell<'d, B, N> {
    pub const fn new() -> Self {
        Self {
            slot: Mutex::new(None),
            installed: AtomicBool::new(false),
        }
    }

    /// Stores `dispatcher`, holding the slot with interrupts disabled.
    pub fn install<H>(&self, hart: &H, dispatcher: TrapDispatcher<'d, B, N>) -> Result<(), ArmError>
    where
        H: Hart + ?Sized,
    {
        let context = dispatcher.context();
        without_interrupts(hart, || {
            let mut slot = self.slot.lock();
            if slot.is_some() {
                return Err(ArmError::DispatcherAlreadyInstalled);
            }
            *slot = Some(dispatcher);
            self.installed.store(true, Ordering::Release);
            Ok(())
        })?;
        info!("trap dispatcher installed for context {}", context.index());
        Ok(())
    }

    /// Never touches the slot lock, so it is safe with interrupts enabled.
    pub fn is_installed(&self) -> bool {
        self.installed.load(Ordering::Acquire)
    }

    /// Runs `f` on the installed dispatcher with interrupts disabled.
    pub fn with<H, R>(&self, hart: &H, f: impl FnOnce(&mut TrapDispatcher<'d, B, N>) -> R) -> Option<R>
    where
        H: Hart + ?Sized,
    {
        without_interrupts(hart, || self.slot.lock().as_mut().map(f))
    }

    /// Runs `f` on the dispatcher's controller handle and context with
    /// interrupts disabled.
    pub fn with_controller<H, R>(&self, hart: &H, f: impl FnOnce(&Plic<B>, Context) -> R) -> Option<R>
    where
        H: Hart + ?Sized,
    {
        self.with(hart, |dispatcher| f(dispatcher.controller(), dispatcher.context()))
    }

    /// Hands one trap to the installed dispatcher.
    ///
    /// Never blocks: a trap taken while the main flow holds the dispatcher,
    /// or before one is installed, is reported on `sink` and halts.
    pub fn dispatch<W: Write + ?Sized>(&self, raw_cause: usize, sink: &mut W) -> TrapOutcome {
        let Some(mut slot) = self.slot.try_lock() else {
            return Self::refuse(raw_cause, sink, HaltReason::DispatcherBusy);
        };
        match slot.as_mut() {
            Some(dispatcher) => dispatcher.dispatch(raw_cause, sink),
            None => Self::refuse(raw_cause, sink, HaltReason::NotArmed),
        }
    }

    fn refuse<W: Write + ?Sized>(raw_cause: usize, sink: &mut W, reason: HaltReason) -> TrapOutcome {
        let cause = decode(raw_cause);
        let _ = write_cause(sink, cause);
        if let CauseCode::Interrupt(_) = cause {
            let _ = sink.write_char('\n');
        }
        TrapOutcome::Halt(reason)
    }
}

impl<B: RegisterBus32, const N: usize> Default for DispatcherCell<'_, B, N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::plic::{PrivilegeMode, SourceId};
    use crate::testing::{interrupt_cause, HartEvent, PlicModel, RecordingHart};
    use crate::trap::MachineInterrupts;
    use crate::trap::ds::BindingTable;
    use pretty_assertions::assert_eq;
    use std::string::String;

    const M0: Context = Context::new(0, PrivilegeMode::Machine);

    fn dispatcher(model: &PlicModel) -> TrapDispatcher<'_, &PlicModel, 1> {
        TrapDispatcher::new(Plic::new(model), M0, BindingTable::new())
    }

    #[test]
    fn trap_before_install_halts_with_a_diagnostic() {
        let cell: DispatcherCell<'_, &PlicModel, 1> = DispatcherCell::new();
        let mut out = String::new();

        assert_eq!(cell.dispatch(0x5, &mut out), TrapOutcome::Halt(HaltReason::NotArmed));
        assert_eq!(out, "irq: 0b0 : code: 0x5: exception: Load access fault\n");
    }

    #[test]
    fn installs_once() {
        let model = PlicModel::new();
        let cell = DispatcherCell::new();
        let hart = RecordingHart::new(0);
        assert!(!cell.is_installed());
        assert_eq!(cell.install(&hart, dispatcher(&model)), Ok(()));
        assert_eq!(
            cell.install(&hart, dispatcher(&model)),
            Err(ArmError::DispatcherAlreadyInstalled)
        );
        assert!(cell.is_installed());
    }

    #[test]
    fn installed_dispatcher_handles_external_interrupts() {
        let model = PlicModel::new();
        let hart = RecordingHart::new(0);
        let cell = DispatcherCell::new();
        cell.install(&hart, dispatcher(&model)).unwrap();

        let uart = SourceId::new(10).unwrap();
        cell.with_controller(&hart, |plic, context| {
            plic.set_priority(uart, 1);
            plic.enable(context, uart);
        })
        .unwrap();
        model.raise(10);
        hart.set_cause(interrupt_cause(11));

        let mut out = String::new();
        assert_eq!(cell.dispatch(hart.read_cause(), &mut out), TrapOutcome::Resume);
        assert!(out.ends_with("PLIC source: 0xa\n"));
        assert_eq!(model.violations(), 0);
    }

    #[test]
    fn trap_while_main_flow_holds_the_dispatcher_halts() {
        let model = PlicModel::new();
        let hart = RecordingHart::new(0);
        let cell = DispatcherCell::new();
        cell.install(&hart, dispatcher(&model)).unwrap();

        let mut out = String::new();
        let outcome = cell.with(&hart, |_| cell.dispatch(interrupt_cause(11), &mut out));

        assert_eq!(outcome, Some(TrapOutcome::Halt(HaltReason::DispatcherBusy)));
        assert_eq!(
            out,
            "irq: 0b1 : code: 0xb: interrupt: Machine external interrupt: \n"
        );
    }

    #[test]
    fn install_holds_the_slot_with_interrupts_disabled() {
        let model = PlicModel::new();
        let hart = RecordingHart::new(0);
        hart.enable_interrupts(MachineInterrupts::EXTERNAL);
        let cell = DispatcherCell::new();
        cell.install(&hart, dispatcher(&model)).unwrap();

        assert_eq!(
            hart.events(),
            vec![
                HartEvent::EnableInterrupts(MachineInterrupts::EXTERNAL),
                HartEvent::DisableInterrupts,
                HartEvent::RestoreInterrupts(true),
            ]
        );
    }

    #[test]
    fn installed_query_never_blocks_a_concurrent_trap() {
        let model = PlicModel::new();
        let hart = RecordingHart::new(0);
        let uart = SourceId::new(10).unwrap();
        let cell = DispatcherCell::new();
        cell.install(&hart, dispatcher(&model)).unwrap();
        cell.with_controller(&hart, |plic, context| {
            plic.set_priority(uart, 1);
            plic.enable(context, uart);
        })
        .unwrap();

        let done = AtomicBool::new(false);
        let busy = std::thread::scope(|scope| {
            scope.spawn(|| {
                while !done.load(Ordering::Relaxed) {
                    assert!(cell.is_installed());
                }
            });

            let mut busy = 0;
            for _ in 0..20_000 {
                model.raise(10);
                let mut out = String::new();
                if cell.dispatch(interrupt_cause(11), &mut out)
                    == TrapOutcome::Halt(HaltReason::DispatcherBusy)
                {
                    busy += 1;
                }
            }
            done.store(true, Ordering::Relaxed);
            busy
        });

        assert_eq!(busy, 0);
        assert_eq!(model.violations(), 0);
    }

    #[test]
    fn with_is_empty_before_install() {
        let hart = RecordingHart::new(0);
        let cell: DispatcherCell<'_, &PlicModel, 1> = DispatcherCell::new();
        assert_eq!(cell.with(&hart, |d| d.state()), None);
    }
}
