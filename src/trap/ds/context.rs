// rv_trapio/src/trap/ds/context.rs

//! # Trap Frame
//!
//! Layout of the registers the trap entry saves on the stack.

/// Caller-saved registers, in the order `trap_entry.S` stores them.
///
/// Callee-saved registers are preserved by `handle_trap` itself, so they are
/// not part of the frame.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct TrapFrame {
    pub ra: usize,
    pub t: [usize; 3],
    pub a: [usize; 8],
    pub t_hi: [usize; 4],
}

impl TrapFrame {
    /// Number of register slots in the frame.
    pub const SLOTS: usize = 16;

    /// Return address of the interrupted code, the best hint to where a
    /// fault came from besides `mepc`.
    pub fn return_address(&self) -> usize {
        self.ra
    }
}
