// rv_trapio/src/drivers/uart.rs

//! # NS16550A UART Driver
//!
//! Polled transmit and interrupt-driven receive. The interrupt service moves
//! received bytes into a fixed-capacity queue that the main flow drains with
//! [`Uart::take_received`].
//!
//! Blocking operations spin on the line status register with no timeout.

use crate::mmio::{Mmio, RegisterBus8};
use crate::trap::collections::RingBuffer;
use crate::trap::ds::InterruptService;
use core::fmt;
use core::ops::BitOr;
use log::{trace, warn};
use spin::Mutex;

const DATA: usize = 0;
const IER: usize = 1;
/// IIR on read, FCR on write.
const IIR_FCR: usize = 2;
const LSR: usize = 5;

const LSR_DATA_READY: u8 = 1 << 0;
const LSR_TX_READY: u8 = 1 << 5;
const LSR_TX_EMPTY: u8 = 1 << 6;

const IIR_NO_PENDING: u8 = 1 << 0;

const FCR_ENABLE: u8 = 1 << 0;
const FCR_CLEAR_RX: u8 = 1 << 1;
const FCR_CLEAR_TX: u8 = 1 << 2;

const IER_MASK: u8 = 0x0f;

/// Default receive queue depth.
pub const RX_QUEUE_CAPACITY: usize = 64;

/// Interrupt enable bits of the IER register.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct IrqFlags(u8);

impl IrqFlags {
    pub const NONE: Self = Self(0);
    pub const RX_AVAILABLE: Self = Self(1 << 0);
    pub const TX_EMPTY: Self = Self(1 << 1);
    pub const LINE_STATUS: Self = Self(1 << 2);
    pub const MODEM_STATUS: Self = Self(1 << 3);

    /// Keeps only the four defined enable bits.
    pub const fn from_bits_truncate(bits: u8) -> Self {
        Self(bits & IER_MASK)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

impl BitOr for IrqFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

/// One UART and its receive queue.
pub struct Uart<B: RegisterBus8 = Mmio, const N: usize = RX_QUEUE_CAPACITY> {
    regs: B,
    rx: Mutex<RingBuffer<u8, N>>,
}

impl<B: RegisterBus8, const N: usize> Uart<B, N> {
    pub const fn new(regs: B) -> Self {
        Self {
            regs,
            rx: Mutex::new(RingBuffer::new()),
        }
    }

    fn line_status(&self) -> u8 {
        self.regs.read8(LSR)
    }

    /// Sends one byte, preceded by `\r` if it is `\n`.
    pub fn write_byte(&self, byte: u8) {
        if byte == b'\n' {
            self.put_raw(b'\r');
        }
        self.put_raw(byte);
    }

    fn put_raw(&self, byte: u8) {
        while self.line_status() & LSR_TX_READY == 0 {
            core::hint::spin_loop();
        }
        self.regs.write8(DATA, byte);
    }

    pub fn write_bytes(&self, bytes: &[u8]) {
        bytes.iter().for_each(|&b| self.write_byte(b));
    }

    /// Waits for and returns one received byte, with `\r` read as `\n`.
    pub fn read_byte(&self) -> u8 {
        loop {
            if let Some(byte) = self.try_read_byte() {
                return byte;
            }
            core::hint::spin_loop();
        }
    }

    /// Returns a received byte if one is waiting, with `\r` read as `\n`.
    pub fn try_read_byte(&self) -> Option<u8> {
        if self.line_status() & LSR_DATA_READY == 0 {
            return None;
        }
        match self.regs.read8(DATA) {
            b'\r' => Some(b'\n'),
            byte => Some(byte),
        }
    }

    /// Waits until the transmitter has shifted out every byte.
    pub fn flush(&self) {
        while self.line_status() & LSR_TX_EMPTY == 0 {
            core::hint::spin_loop();
        }
    }

    /// Enables the FIFOs and clears both of them, along with the receive
    /// queue.
    pub fn fifo_init(&self) {
        self.regs
            .write8(IIR_FCR, FCR_ENABLE | FCR_CLEAR_RX | FCR_CLEAR_TX);
        self.rx.lock().clear();
    }

    /// FIFO status bits (IIR bits 6 and 7); `0b11` when FIFOs are enabled.
    pub fn fifo_status(&self) -> u8 {
        (self.regs.read8(IIR_FCR) >> 6) & 0b11
    }

    pub fn irq_enable_set(&self, flags: IrqFlags) {
        let ier = self.regs.read8(IER);
        trace!("uart: ier {:#x} |= {:#x}", ier, flags.bits());
        self.regs.write8(IER, (ier | flags.bits()) & IER_MASK);
    }

    pub fn irq_enable_clear(&self, flags: IrqFlags) {
        let ier = self.regs.read8(IER);
        trace!("uart: ier {:#x} &= !{:#x}", ier, flags.bits());
        self.regs.write8(IER, ier & !flags.bits() & IER_MASK);
    }

    pub fn irq_enabled(&self) -> IrqFlags {
        IrqFlags::from_bits_truncate(self.regs.read8(IER))
    }

    /// IIR bit 0 is clear while an interrupt is pending.
    pub fn irq_is_pending(&self) -> bool {
        self.regs.read8(IIR_FCR) & IIR_NO_PENDING == 0
    }

    /// Pops the oldest byte the interrupt service queued.
    ///
    /// Call with interrupts disabled. A byte serviced while this holds the
    /// queue is dropped.
    pub fn take_received(&self) -> Option<u8> {
        self.rx.lock().pop()
    }
}

impl<B: RegisterBus8 + Sync, const N: usize> InterruptService for Uart<B, N> {
    /// Moves at most one received byte into the queue. A byte still waiting
    /// keeps the line asserted and is picked up by the next claim.
    ///
    /// Never waits on the queue lock: if the main flow holds it, the byte is
    /// read and dropped.
    fn service(&self) {
        let Some(byte) = self.try_read_byte() else {
            return;
        };
        match self.rx.try_lock() {
            Some(mut rx) => {
                trace!("uart: rx {:#04x}", byte);
                rx.push(byte);
            }
            None => warn!("uart: receive queue busy, dropped {:#04x}", byte),
        }
    }
}

impl<B: RegisterBus8, const N: usize> fmt::Write for &Uart<B, N> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.write_bytes(s.as_bytes());
        Ok(())
    }
}
