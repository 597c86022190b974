// rv_trapio/src/testing/uart_model.rs

//! Port-level model of an NS16550-compatible UART.

use crate::mmio::RegisterBus8;
use spin::Mutex;
use std::collections::VecDeque;
use std::vec::Vec;

struct Inner {
    rx: VecDeque<u8>,
    tx: Vec<u8>,
    ier: u8,
    fifo_enabled: bool,
    stray: usize,
}

/// A UART whose transmitter is always ready and whose receiver is fed by
/// the test.
pub struct UartModel {
    inner: Mutex<Inner>,
}

impl UartModel {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                rx: VecDeque::new(),
                tx: Vec::new(),
                ier: 0,
                fifo_enabled: false,
                stray: 0,
            }),
        }
    }

    /// Queues bytes as if they arrived on the line.
    pub fn feed(&self, bytes: &[u8]) {
        self.inner.lock().rx.extend(bytes.iter().copied());
    }

    /// Everything written to the transmit holding register.
    pub fn transmitted(&self) -> Vec<u8> {
        self.inner.lock().tx.clone()
    }

    pub fn ier(&self) -> u8 {
        self.inner.lock().ier
    }

    pub fn fifo_enabled(&self) -> bool {
        self.inner.lock().fifo_enabled
    }

    pub fn rx_waiting(&self) -> usize {
        self.inner.lock().rx.len()
    }

    pub fn stray_accesses(&self) -> usize {
        self.inner.lock().stray
    }
}

impl Default for UartModel {
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterBus8 for UartModel {
    fn read8(&self, offset: usize) -> u8 {
        let mut inner = self.inner.lock();
        match offset {
            0 => inner.rx.pop_front().unwrap_or(0),
            1 => inner.ier,
            2 => {
                let fifo = if inner.fifo_enabled { 0xc0 } else { 0 };
                if inner.ier & 0x01 != 0 && !inner.rx.is_empty() {
                    fifo | 0x04
                } else if inner.ier & 0x02 != 0 {
                    fifo | 0x02
                } else {
                    fifo | 0x01
                }
            }
            5 => {
                let ready = if inner.rx.is_empty() { 0 } else { 0x01 };
                ready | 0x60
            }
            _ => {
                inner.stray += 1;
                0
            }
        }
    }

    fn write8(&self, offset: usize, value: u8) {
        let mut inner = self.inner.lock();
        match offset {
            0 => inner.tx.push(value),
            1 => inner.ier = value & 0x0f,
            2 => {
                inner.fifo_enabled = value & 0x01 != 0;
                if value & 0x02 != 0 {
                    inner.rx.clear();
                }
            }
            _ => inner.stray += 1,
        }
    }
}
