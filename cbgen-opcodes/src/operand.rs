//! Operands that the CB bit instructions act on.
use std::fmt;

/// Identifies an 8 bit register.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Reg8 {
    Acc,
    B,
    C,
    D,
    E,
    H,
    L,
}

impl Reg8 {
    /// Get the register pair and half which store this register.
    pub const fn location(self) -> RegLocation {
        let (pair, half) = match self {
            Self::Acc => (Reg16::AF, Half::High),
            Self::B => (Reg16::BC, Half::High),
            Self::C => (Reg16::BC, Half::Low),
            Self::D => (Reg16::DE, Half::High),
            Self::E => (Reg16::DE, Half::Low),
            Self::H => (Reg16::HL, Half::High),
            Self::L => (Reg16::HL, Half::Low),
        };
        RegLocation { pair, half }
    }
}

impl fmt::Display for Reg8 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Self::Acc => f.write_str("A"),
            Self::B => f.write_str("B"),
            Self::C => f.write_str("C"),
            Self::D => f.write_str("D"),
            Self::E => f.write_str("E"),
            Self::H => f.write_str("H"),
            Self::L => f.write_str("L"),
        }
    }
}

/// Identifies a 16 bit register pair.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Reg16 {
    AF,
    BC,
    DE,
    HL,
}

impl Reg16 {
    /// Lowercase name of the pair, as used for field names in generated code.
    pub const fn field_name(self) -> &'static str {
        match self {
            Self::AF => "af",
            Self::BC => "bc",
            Self::DE => "de",
            Self::HL => "hl",
        }
    }
}

impl fmt::Display for Reg16 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Self::AF => f.write_str("AF"),
            Self::BC => f.write_str("BC"),
            Self::DE => f.write_str("DE"),
            Self::HL => f.write_str("HL"),
        }
    }
}

/// Which byte of a register pair an 8 bit register lives in.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Half {
    /// The first register of the pair, e.g. `B` in `BC`.
    High,
    /// The second register of the pair, e.g. `C` in `BC`.
    Low,
}

impl Half {
    /// Lowercase name of the half, as used for field names in generated code.
    pub const fn field_name(self) -> &'static str {
        match self {
            Self::High => "hi",
            Self::Low => "lo",
        }
    }
}

/// Storage location of an 8 bit register within the register pairs.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct RegLocation {
    pub pair: Reg16,
    pub half: Half,
}

impl fmt::Display for RegLocation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}.{}", self.pair, self.half.field_name())
    }
}

/// An 8 bit operand of a CB bit instruction.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Operand8 {
    /// A register, operated on in place.
    Reg(Reg8),
    /// The byte in memory addressed by a register pair. Accessed by reading the byte,
    /// operating on the copy, then writing it back.
    Indirect(Reg16),
}

impl Operand8 {
    /// The operands addressable by the CB prefixed instructions, in order of their
    /// register code (the low 3 bits of the opcode).
    pub const CB_OPERANDS: [Operand8; 8] = [
        Self::Reg(Reg8::B),
        Self::Reg(Reg8::C),
        Self::Reg(Reg8::D),
        Self::Reg(Reg8::E),
        Self::Reg(Reg8::H),
        Self::Reg(Reg8::L),
        Self::Indirect(Reg16::HL),
        Self::Reg(Reg8::Acc),
    ];

    /// Get the 8 bit operand for the given register code. Returns `None` if the code is
    /// greater than 7. Register codes are mostly 8 bit registers but also include `(HL)`.
    pub fn from_regcode(code: u8) -> Option<Self> {
        Self::CB_OPERANDS.get(code as usize).copied()
    }

    /// Get the register code of this operand, or `None` if the CB instructions cannot
    /// address it (any indirection other than `(HL)`).
    pub fn regcode(self) -> Option<u8> {
        Self::CB_OPERANDS
            .iter()
            .position(|&operand| operand == self)
            .map(|code| code as u8)
    }

    /// Returns true if this operand is a memory access rather than a register.
    pub fn is_memory(self) -> bool {
        matches!(self, Self::Indirect(_))
    }
}

impl fmt::Display for Operand8 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Self::Reg(reg) => fmt::Display::fmt(&reg, f),
            Self::Indirect(pair) => write!(f, "({})", pair),
        }
    }
}
