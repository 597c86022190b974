// rv_trapio/src/testing/plic_model.rs

//! Register-level model of a PLIC with gateway and claim tracking.
//!
//! Offsets are decoded from literal addresses rather than the driver's
//! helpers, so an offset bug in the driver shows up as a stray access.

use crate::mmio::RegisterBus32;
use spin::Mutex;

const SOURCES: usize = 1024;
const WORDS: usize = SOURCES / 32;
const CONTEXTS: usize = 4;

struct Inner {
    priority: [u32; SOURCES],
    pending: [u32; WORDS],
    in_service: [u32; WORDS],
    enable: [[u32; WORDS]; CONTEXTS],
    threshold: [u32; CONTEXTS],
    claimed: [Option<u32>; CONTEXTS],
    violations: usize,
    stray: usize,
}

impl Inner {
    fn bit(bitmap: &[u32; WORDS], id: usize) -> bool {
        bitmap[id / 32] & (1 << (id % 32)) != 0
    }

    fn set(bitmap: &mut [u32; WORDS], id: usize, on: bool) {
        if on {
            bitmap[id / 32] |= 1 << (id % 32);
        } else {
            bitmap[id / 32] &= !(1 << (id % 32));
        }
    }

    /// Highest priority above threshold wins; the lowest id breaks ties.
    fn arbitrate(&self, ctx: usize) -> Option<usize> {
        let mut best: Option<(usize, u32)> = None;
        for id in 1..SOURCES {
            let prio = self.priority[id];
            let eligible = prio > self.threshold[ctx]
                && Self::bit(&self.pending, id)
                && Self::bit(&self.enable[ctx], id)
                && !Self::bit(&self.in_service, id);
            if eligible && best.map_or(true, |(_, p)| prio > p) {
                best = Some((id, prio));
            }
        }
        best.map(|(id, _)| id)
    }

    fn claim(&mut self, ctx: usize) -> u32 {
        if self.claimed[ctx].is_some() {
            self.violations += 1;
        }
        match self.arbitrate(ctx) {
            Some(id) => {
                Self::set(&mut self.pending, id, false);
                Self::set(&mut self.in_service, id, true);
                self.claimed[ctx] = Some(id as u32);
                id as u32
            }
            None => 0,
        }
    }

    fn complete(&mut self, ctx: usize, id: u32) {
        if self.claimed[ctx] != Some(id) {
            self.violations += 1;
            return;
        }
        self.claimed[ctx] = None;
        Self::set(&mut self.in_service, id as usize, false);
    }

    fn stray_read(&mut self) -> u32 {
        self.stray += 1;
        0
    }

    fn context_of(offset: usize, base: usize, stride: usize) -> Option<(usize, usize)> {
        let rel = offset.checked_sub(base)?;
        let ctx = rel / stride;
        (ctx < CONTEXTS).then_some((ctx, rel % stride))
    }
}

/// A PLIC with four contexts (harts 0 and 1, M and S mode).
pub struct PlicModel {
    inner: Mutex<Inner>,
}

impl PlicModel {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                priority: [0; SOURCES],
                pending: [0; WORDS],
                in_service: [0; WORDS],
                enable: [[0; WORDS]; CONTEXTS],
                threshold: [0; CONTEXTS],
                claimed: [None; CONTEXTS],
                violations: 0,
                stray: 0,
            }),
        }
    }

    /// Asserts the interrupt line of source `id` at its gateway.
    pub fn raise(&self, id: u32) {
        Inner::set(&mut self.inner.lock().pending, id as usize, true);
    }

    /// Claim/complete protocol violations seen so far.
    pub fn violations(&self) -> usize {
        self.inner.lock().violations
    }

    /// Accesses that hit no modelled register.
    pub fn stray_accesses(&self) -> usize {
        self.inner.lock().stray
    }

    pub fn in_service(&self, id: u32) -> bool {
        Inner::bit(&self.inner.lock().in_service, id as usize)
    }

    /// The source claimed and not yet completed by context `ctx`.
    pub fn outstanding(&self, ctx: usize) -> Option<u32> {
        self.inner.lock().claimed[ctx]
    }
}

impl RegisterBus32 for PlicModel {
    fn read32(&self, offset: usize) -> u32 {
        let mut inner = self.inner.lock();
        match offset {
            0x0..=0xffc if offset % 4 == 0 => inner.priority[offset / 4],
            0x1000..=0x107c if offset % 4 == 0 => inner.pending[(offset - 0x1000) / 4],
            0x2000..=0x1f_fffc => match Inner::context_of(offset, 0x2000, 0x80) {
                Some((ctx, word)) if word % 4 == 0 => inner.enable[ctx][word / 4],
                _ => inner.stray_read(),
            },
            0x20_0000.. => match Inner::context_of(offset, 0x20_0000, 0x1000) {
                Some((ctx, 0)) => inner.threshold[ctx],
                Some((ctx, 4)) => inner.claim(ctx),
                _ => inner.stray_read(),
            },
            _ => inner.stray_read(),
        }
    }

    fn write32(&self, offset: usize, value: u32) {
        let mut inner = self.inner.lock();
        match offset {
            0x0..=0xffc if offset % 4 == 0 => inner.priority[offset / 4] = value,
            0x2000..=0x1f_fffc => match Inner::context_of(offset, 0x2000, 0x80) {
                Some((ctx, word)) if word % 4 == 0 => inner.enable[ctx][word / 4] = value,
                _ => inner.stray += 1,
            },
            0x20_0000.. => match Inner::context_of(offset, 0x20_0000, 0x1000) {
                Some((ctx, 0)) => inner.threshold[ctx] = value,
                Some((ctx, 4)) => inner.complete(ctx, value),
                _ => inner.stray += 1,
            },
            _ => inner.stray += 1,
        }
    }
}

impl Default for PlicModel {
    fn default() -> Self {
        Self::new()
    }
}
