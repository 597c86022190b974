// rv_trapio/src/drivers/plic.rs

//! # Platform-Level Interrupt Controller Driver
//!
//! Relays priority, enable, threshold and claim/complete operations to the
//! memory-mapped arbitration unit. Arbitration itself (eligibility, highest
//! priority wins, tie-break) happens in hardware; the driver never second
//! guesses it.
//!
//! # Memory Map
//!
//! * `0x000000`: source priorities, one word per source
//! * `0x001000`: pending bitmap, one bit per source
//! * `0x002000`: enable bitmaps, `0x80` bytes per context
//! * `0x200000`: threshold and claim/complete, `0x1000` bytes per context
//!
//! # Claim/complete contract
//!
//! A context must complete exactly the source it most recently claimed before
//! it claims again. The hardware cannot detect a violation, so neither does
//! this driver: [`Plic::complete`] with any other id is a caller error.

use crate::mmio::{Mmio, RegisterBus32};
use core::fmt;
use core::num::NonZeroU32;
use log::{trace, warn};

const PRIORITY_BASE: usize = 0x00_0000;
const PENDING_BASE: usize = 0x00_1000;
const ENABLE_BASE: usize = 0x00_2000;
const CONTEXT_BASE: usize = 0x20_0000;

/// Bytes of enable bitmap per context (32 words, 1024 sources).
pub const CONTEXT_ENABLE_STRIDE: usize = 0x80;
/// Bytes of threshold/claim block per context.
pub const CONTEXT_STRIDE: usize = 0x1000;

const CLAIM_OFFSET: usize = 4;
const SOURCES_PER_WORD: u32 = 32;

/// Highest source id the controller can address.
pub const MAX_SOURCE: u32 = 1023;

/// An interrupt source id. Never 0, which the controller reserves for
/// "no source".
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SourceId(NonZeroU32);

impl SourceId {
    /// Returns `None` for 0 and for ids above [`MAX_SOURCE`].
    pub const fn new(raw: u32) -> Option<Self> {
        if raw > MAX_SOURCE {
            return None;
        }
        match NonZeroU32::new(raw) {
            Some(id) => Some(Self(id)),
            None => None,
        }
    }

    pub const fn get(self) -> u32 {
        self.0.get()
    }

    const fn word(self) -> usize {
        (self.get() / SOURCES_PER_WORD) as usize
    }

    const fn bit(self) -> u32 {
        1 << (self.get() % SOURCES_PER_WORD)
    }
}

impl fmt::Debug for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SourceId({})", self.get())
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

/// The privilege mode half of an interrupt context.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[repr(usize)]
pub enum PrivilegeMode {
    Machine = 0,
    Supervisor = 1,
}

/// One interrupt target: a (hart, privilege mode) pair.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Context(usize);

impl Context {
    /// Context id = `(hart_id << 1) | mode`.
    pub const fn new(hart_id: usize, mode: PrivilegeMode) -> Self {
        Self((hart_id << 1) | mode as usize)
    }

    pub const fn index(self) -> usize {
        self.0
    }
}

/// Byte offset of `priority[source]`.
pub const fn priority_offset(source: SourceId) -> usize {
    PRIORITY_BASE + source.get() as usize * 4
}

/// Byte offset of the pending word holding `source`.
pub const fn pending_offset(source: SourceId) -> usize {
    PENDING_BASE + source.word() * 4
}

/// Byte offset of the enable word holding `source` for `context`.
///
/// Word index is `context * 32 + source / 32`.
pub const fn enable_offset(context: Context, source: SourceId) -> usize {
    ENABLE_BASE + context.index() * CONTEXT_ENABLE_STRIDE + source.word() * 4
}

/// Byte offset of `threshold[context]`.
pub const fn threshold_offset(context: Context) -> usize {
    CONTEXT_BASE + context.index() * CONTEXT_STRIDE
}

/// Byte offset of `claim[context]`. Completion writes the same register.
pub const fn claim_offset(context: Context) -> usize {
    threshold_offset(context) + CLAIM_OFFSET
}

/// Byte offset of `complete[context]`.
pub const fn complete_offset(context: Context) -> usize {
    claim_offset(context)
}

/// Driver handle for one interrupt controller.
#[derive(Debug)]
pub struct Plic<B: RegisterBus32 = Mmio> {
    regs: B,
}

impl<B: RegisterBus32> Plic<B> {
    pub const fn new(regs: B) -> Self {
        Self { regs }
    }

    /// Sets the priority of `source`. Priority 0 means it never interrupts.
    pub fn set_priority(&self, source: SourceId, priority: u32) {
        trace!("plic: priority[{}] = {}", source, priority);
        self.regs.write32(priority_offset(source), priority);
    }

    pub fn priority(&self, source: SourceId) -> u32 {
        self.regs.read32(priority_offset(source))
    }

    /// Enables `source` for `context`, leaving the other bits of the word set.
    pub fn enable(&self, context: Context, source: SourceId) {
        let offset = enable_offset(context, source);
        let word = self.regs.read32(offset);
        trace!("plic: enable ctx {} source {}", context.index(), source);
        self.regs.write32(offset, word | source.bit());
    }

    /// Disables `source` for `context`, leaving the other bits of the word alone.
    pub fn disable(&self, context: Context, source: SourceId) {
        let offset = enable_offset(context, source);
        let word = self.regs.read32(offset);
        trace!("plic: disable ctx {} source {}", context.index(), source);
        self.regs.write32(offset, word & !source.bit());
    }

    pub fn is_enabled(&self, context: Context, source: SourceId) -> bool {
        self.regs.read32(enable_offset(context, source)) & source.bit() != 0
    }

    /// A pending source is claimable by `context` only if its priority is
    /// strictly greater than `threshold`.
    pub fn set_threshold(&self, context: Context, threshold: u32) {
        trace!("plic: threshold[{}] = {}", context.index(), threshold);
        self.regs.write32(threshold_offset(context), threshold);
    }

    pub fn threshold(&self, context: Context) -> u32 {
        self.regs.read32(threshold_offset(context))
    }

    pub fn is_pending(&self, source: SourceId) -> bool {
        self.regs.read32(pending_offset(source)) & source.bit() != 0
    }

    /// Claims the highest-priority eligible source for `context`.
    ///
    /// Returns `None` when nothing is eligible. A returned source stays in
    /// service, and is not offered to any context, until [`Plic::complete`].
    pub fn claim(&self, context: Context) -> Option<SourceId> {
        let raw = self.regs.read32(claim_offset(context));
        trace!("plic: claim ctx {} -> {}", context.index(), raw);
        let source = SourceId::new(raw);
        if source.is_none() && raw != 0 {
            warn!("plic: claim ctx {} returned out-of-range source {}", context.index(), raw);
        }
        source
    }

    /// Releases `source`, which must be the id last claimed by `context`.
    pub fn complete(&self, context: Context, source: SourceId) {
        trace!("plic: complete ctx {} source {}", context.index(), source);
        self.regs.write32(complete_offset(context), source.get());
    }
}
