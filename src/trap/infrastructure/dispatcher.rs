// rv_trapio/src/trap/infrastructure/dispatcher.rs

//! # Trap Dispatcher
//!
//! Decides what happens to every trap taken by the hart. Exceptions halt.
//! External interrupts go through exactly one claim/service/complete cycle
//! against the interrupt controller. Any other interrupt halts, since no
//! timer or software interrupt service exists.
//!
//! Each trap also produces one diagnostic line on the sink:
//!
//! ```text
//! irq: 0b1 : code: 0xb: interrupt: Machine external interrupt: PLIC source: 0xa
//! irq: 0b0 : code: 0x2: exception: Illegal instruction
//! ```

use crate::drivers::plic::{Context, Plic};
use crate::mmio::{Mmio, RegisterBus32};
use crate::trap::ds::{
    decode, BindingTable, CauseCode, HaltReason, InterruptKind, TrapOutcome,
};
use core::fmt::{self, Write};
use log::{debug, error, trace};

/// Where the dispatcher is in handling the current trap.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DispatchState {
    /// No trap in progress.
    Running,
    /// Cause decoded, not yet classified.
    Dispatching,
    /// Between claim and complete of an external interrupt.
    ServicingInterrupt,
    /// Terminal. No further trap is handled.
    HaltedOnException,
}

/// Writes the cause part of a diagnostic line.
///
/// Exceptions end the line; interrupts leave it open for the service part.
pub(crate) fn write_cause<W: Write + ?Sized>(sink: &mut W, cause: CauseCode) -> fmt::Result {
    write!(
        sink,
        "irq: {:#b} : code: {:#x}: ",
        cause.is_interrupt() as u8,
        cause.code()
    )?;
    let name = cause.name().unwrap_or("unknown");
    match cause {
        CauseCode::Exception(_) => writeln!(sink, "exception: {}", name),
        CauseCode::Interrupt(_) => write!(sink, "interrupt: {}: ", name),
    }
}

/// The trap state machine for one controller context.
pub struct TrapDispatcher<'d, B: RegisterBus32 = Mmio, const N: usize = 4> {
    plic: Plic<B>,
    context: Context,
    bindings: BindingTable<'d, N>,
    state: DispatchState,
}

impl<'d, B: RegisterBus32, const N: usize> TrapDispatcher<'d, B, N> {
    /// Takes ownership of the controller handle; all later controller access
    /// goes through [`TrapDispatcher::controller`].
    pub const fn new(plic: Plic<B>, context: Context, bindings: BindingTable<'d, N>) -> Self {
        Self {
            plic,
            context,
            bindings,
            state: DispatchState::Running,
        }
    }

    pub fn state(&self) -> DispatchState {
        self.state
    }

    pub fn context(&self) -> Context {
        self.context
    }

    pub fn controller(&self) -> &Plic<B> {
        &self.plic
    }

    /// Handles one trap with raw cause `raw_cause`, reporting on `sink`.
    ///
    /// Sink write errors are ignored; a broken console must not change what
    /// happens to the trap.
    pub fn dispatch<W: Write + ?Sized>(&mut self, raw_cause: usize, sink: &mut W) -> TrapOutcome {
        if self.state == DispatchState::HaltedOnException {
            return TrapOutcome::Halt(HaltReason::AlreadyHalted);
        }

        self.state = DispatchState::Dispatching;
        let cause = decode(raw_cause);
        trace!("dispatch: {}", cause);
        let _ = write_cause(sink, cause);

        match cause {
            CauseCode::Exception(code) => self.halt(HaltReason::Exception(code)),
            CauseCode::Interrupt(code) if code == InterruptKind::MachineExternal.code() => {
                self.service_external(sink);
                let _ = sink.write_char('\n');
                self.state = DispatchState::Running;
                TrapOutcome::Resume
            }
            CauseCode::Interrupt(code) => {
                let _ = sink.write_char('\n');
                self.halt(HaltReason::UnhandledInterrupt(code))
            }
        }
    }

    fn service_external<W: Write + ?Sized>(&mut self, sink: &mut W) {
        let Some(source) = self.plic.claim(self.context) else {
            debug!("dispatch: spurious external interrupt");
            let _ = write!(sink, "PLIC source: 0x0");
            return;
        };

        self.state = DispatchState::ServicingInterrupt;
        match self.bindings.lookup(source) {
            Some(device) => device.service(),
            None => debug!("dispatch: no device bound to source {}", source),
        }
        let _ = write!(sink, "PLIC source: {:#x}", source.get());
        self.plic.complete(self.context, source);
    }

    fn halt(&mut self, reason: HaltReason) -> TrapOutcome {
        error!("dispatch: halting on {}", reason);
        self.state = DispatchState::HaltedOnException;
        TrapOutcome::Halt(reason)
    }
}
