// rv_trapio/src/testing/hart.rs

//! A hart that records privileged operations instead of performing them.

use crate::trap::{Hart, MachineInterrupts};
use core::cell::{Cell, RefCell};
use std::vec::Vec;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum HartEvent {
    TrapVector(usize),
    EnableInterrupts(MachineInterrupts),
    DisableInterrupts,
    RestoreInterrupts(bool),
    WaitForInterrupt,
}

pub struct RecordingHart {
    id: usize,
    cause: Cell<usize>,
    global_enable: Cell<bool>,
    events: RefCell<Vec<HartEvent>>,
}

impl RecordingHart {
    pub fn new(id: usize) -> Self {
        Self {
            id,
            cause: Cell::new(0),
            global_enable: Cell::new(false),
            events: RefCell::new(Vec::new()),
        }
    }

    /// Sets the value the next `read_cause` returns.
    pub fn set_cause(&self, raw: usize) {
        self.cause.set(raw);
    }

    pub fn events(&self) -> Vec<HartEvent> {
        self.events.borrow().clone()
    }

    pub fn interrupts_enabled(&self) -> bool {
        self.global_enable.get()
    }

    fn record(&self, event: HartEvent) {
        self.events.borrow_mut().push(event);
    }
}

impl Hart for RecordingHart {
    fn hart_id(&self) -> usize {
        self.id
    }

    fn read_cause(&self) -> usize {
        self.cause.get()
    }

    fn read_epc(&self) -> usize {
        0x8000_0000
    }

    fn read_tval(&self) -> usize {
        0
    }

    unsafe fn write_trap_vector(&self, entry: usize) {
        self.record(HartEvent::TrapVector(entry));
    }

    fn enable_interrupts(&self, lines: MachineInterrupts) {
        self.global_enable.set(true);
        self.record(HartEvent::EnableInterrupts(lines));
    }

    fn disable_interrupts(&self) -> bool {
        self.record(HartEvent::DisableInterrupts);
        self.global_enable.replace(false)
    }

    fn restore_interrupts(&self, was_enabled: bool) {
        self.record(HartEvent::RestoreInterrupts(was_enabled));
        self.global_enable.set(was_enabled);
    }

    fn wait_for_interrupt(&self) {
        self.record(HartEvent::WaitForInterrupt);
    }
}
