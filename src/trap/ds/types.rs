// rv_trapio/src/trap/ds/types.rs

//! # Trap Cause Definitions
//!
//! Decodes the machine cause register into a tagged [`CauseCode`] and maps the
//! numeric codes this system knows about to human-readable names.

use core::fmt;

/// Machine-level exceptions with a known name.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[repr(usize)]
pub enum ExceptionKind {
    InstructionAccessFault = 1,
    IllegalInstruction = 2,
    LoadAccessFault = 5,
    StoreAmoAccessFault = 7,
    InstructionPageFault = 12,
    LoadPageFault = 13,
    StoreAmoPageFault = 15,
}

impl ExceptionKind {
    /// Looks up the exception kind for a raw exception code.
    pub const fn from_code(code: usize) -> Option<Self> {
        match code {
            1 => Some(Self::InstructionAccessFault),
            2 => Some(Self::IllegalInstruction),
            5 => Some(Self::LoadAccessFault),
            7 => Some(Self::StoreAmoAccessFault),
            12 => Some(Self::InstructionPageFault),
            13 => Some(Self::LoadPageFault),
            15 => Some(Self::StoreAmoPageFault),
            _ => None,
        }
    }

    pub const fn code(self) -> usize {
        self as usize
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::InstructionAccessFault => "Instruction access fault",
            Self::IllegalInstruction => "Illegal instruction",
            Self::LoadAccessFault => "Load access fault",
            Self::StoreAmoAccessFault => "Store/AMO access fault",
            Self::InstructionPageFault => "Instruction page fault",
            Self::LoadPageFault => "Load page fault",
            Self::StoreAmoPageFault => "Store/AMO page fault",
        }
    }
}

/// Machine-level interrupts with a known name.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[repr(usize)]
pub enum InterruptKind {
    MachineSoftware = 3,
    MachineTimer = 7,
    MachineExternal = 11,
    CounterOverflow = 13,
}

impl InterruptKind {
    /// Looks up the interrupt kind for a raw interrupt code.
    pub const fn from_code(code: usize) -> Option<Self> {
        match code {
            3 => Some(Self::MachineSoftware),
            7 => Some(Self::MachineTimer),
            11 => Some(Self::MachineExternal),
            13 => Some(Self::CounterOverflow),
            _ => None,
        }
    }

    pub const fn code(self) -> usize {
        self as usize
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::MachineSoftware => "Machine software interrupt",
            Self::MachineTimer => "Machine timer interrupt",
            Self::MachineExternal => "Machine external interrupt",
            Self::CounterOverflow => "Counter overflow interrupt",
        }
    }
}

/// The decoded value of the cause register.
///
/// The most significant bit of the raw word is the interrupt flag and the
/// remaining bits are the code. Every raw value decodes; a code outside the
/// name tables is still a valid code, it just has no name.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CauseCode {
    /// A synchronous fault raised by the instruction stream.
    Exception(usize),
    /// An asynchronous event.
    Interrupt(usize),
}

/// Decodes a cause register value read at the native word width.
pub const fn decode(raw: usize) -> CauseCode {
    decode_width(raw as u64, usize::BITS)
}

/// Decodes a cause register value for a register `width` bits wide.
///
/// Bit `width - 1` is the interrupt flag and bits `0..width - 1` are the code.
/// Bits at or above `width` are ignored. `width` is clamped to `2..=64`.
pub const fn decode_width(raw: u64, width: u32) -> CauseCode {
    let width = if width < 2 {
        2
    } else if width > 64 {
        64
    } else {
        width
    };
    let flag = (raw >> (width - 1)) & 1;
    let code = (raw & ((1u64 << (width - 1)) - 1)) as usize;
    if flag == 1 {
        CauseCode::Interrupt(code)
    } else {
        CauseCode::Exception(code)
    }
}

impl CauseCode {
    pub const fn is_interrupt(&self) -> bool {
        matches!(self, Self::Interrupt(_))
    }

    pub const fn code(&self) -> usize {
        match *self {
            Self::Exception(code) | Self::Interrupt(code) => code,
        }
    }

    pub const fn exception_kind(&self) -> Option<ExceptionKind> {
        match *self {
            Self::Exception(code) => ExceptionKind::from_code(code),
            Self::Interrupt(_) => None,
        }
    }

    pub const fn interrupt_kind(&self) -> Option<InterruptKind> {
        match *self {
            Self::Interrupt(code) => InterruptKind::from_code(code),
            Self::Exception(_) => None,
        }
    }

    /// Returns the human-readable name, or `None` for a code outside the
    /// known tables.
    pub const fn name(&self) -> Option<&'static str> {
        match *self {
            Self::Exception(code) => match ExceptionKind::from_code(code) {
                Some(kind) => Some(kind.name()),
                None => None,
            },
            Self::Interrupt(code) => match InterruptKind::from_code(code) {
                Some(kind) => Some(kind.name()),
                None => None,
            },
        }
    }
}

impl fmt::Display for CauseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.is_interrupt() { "interrupt" } else { "exception" };
        write!(
            f,
            "{} {:#x} ({})",
            kind,
            self.code(),
            self.name().unwrap_or("unknown")
        )
    }
}
