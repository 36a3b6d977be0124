//! The CB prefixed bit instructions.

use std::fmt;

use crate::gbz80types::Flags;
use crate::operand::{Operand8, Reg16, Reg8};

// Opcode References:
// - Decoding: www.z80.info/decoding.htm
// - GB Z80 Opcode Table: https://izik1.github.io/gbops/
// - GB Z80 Instruction Reference: https://rgbds.gbdev.io/docs/v0.4.1/gbz80.7

/// Type of bit operation performed by a CB prefixed opcode.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum BitOp {
    /// Check if the given bit is set in the operand.
    TestBit,
    /// Clears the given bit in the operand.
    ResetBit,
    /// Sets the given bit in the operand.
    SetBit,
}

impl BitOp {
    /// All bit operations, in the order their opcodes are laid out.
    pub const ALL: [BitOp; 3] = [Self::TestBit, Self::ResetBit, Self::SetBit];

    /// Returns true if this operation changes the operand.
    pub const fn mutates(self) -> bool {
        !matches!(self, Self::TestBit)
    }

    /// Flags written by this operation. `BIT` sets zero to the complement of the tested
    /// bit, clears subtract and sets half-carry. `RES` and `SET` leave the flags alone.
    pub const fn flags_written(self) -> Flags {
        match self {
            Self::TestBit => Flags::ZERO.union(Flags::SUB).union(Flags::HALFCARRY),
            Self::ResetBit | Self::SetBit => Flags::empty(),
        }
    }

    /// Get the `x` code (top two bits of the opcode) for this operation.
    const fn xcode(self) -> u8 {
        match self {
            Self::TestBit => 1,
            Self::ResetBit => 2,
            Self::SetBit => 3,
        }
    }
}

impl fmt::Display for BitOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Self::TestBit => f.write_str("BIT"),
            Self::ResetBit => f.write_str("RES"),
            Self::SetBit => f.write_str("SET"),
        }
    }
}

/// A CB prefixed instruction which tests, resets or sets a single bit.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct CBBitOpcode {
    /// The operation being performed.
    pub op: BitOp,
    /// Index of the bit being operated on, in range `0..=7`.
    pub bit: u8,
    /// The operand to operate on.
    pub operand: Operand8,
}

impl CBBitOpcode {
    /// Length in bytes of every CB instruction: the prefix and the opcode.
    pub const LENGTH: u8 = 2;

    /// Decodes an 8-bit opcode found after a CB prefix. Returns `None` for the
    /// rotate/shift/swap opcodes, which are not bit instructions.
    pub fn decode(opcode: u8) -> Option<Self> {
        let x = (opcode & 0b11000000) >> 6;
        let y = (opcode & 0b00111000) >> 3;
        let z = opcode & 0b00000111;
        let op = match x {
            0 => return None,
            1 => BitOp::TestBit,
            2 => BitOp::ResetBit,
            3 => BitOp::SetBit,
            _ => unreachable!(),
        };
        let operand = Operand8::from_regcode(z)?;
        Some(Self { op, bit: y, operand })
    }

    /// Encodes this instruction as the byte following the CB prefix. Returns `None` if
    /// the bit index is out of range or the operand can't be addressed by a CB opcode.
    pub fn encode(self) -> Option<u8> {
        if self.bit > 7 {
            return None;
        }
        let z = self.operand.regcode()?;
        Some(self.op.xcode() << 6 | self.bit << 3 | z)
    }

    /// Cost of this instruction in machine cycles. Register operands are uniformly
    /// cheap. The memory operand costs an extra read, and for `RES`/`SET` also a write.
    pub fn cycles(self) -> u8 {
        match (self.operand, self.op) {
            (Operand8::Reg(_), _) => 2,
            (Operand8::Indirect(_), BitOp::TestBit) => 3,
            (Operand8::Indirect(_), BitOp::ResetBit | BitOp::SetBit) => 4,
        }
    }

    /// Get the body describing how this instruction accesses its operand.
    pub fn body(self) -> OpBody {
        let access = match self.operand {
            Operand8::Reg(reg) => Access::InPlace(reg),
            Operand8::Indirect(pair) => Access::ReadModifyWrite(pair),
        };
        OpBody {
            op: self.op,
            bit: self.bit,
            access,
        }
    }
}

impl fmt::Display for CBBitOpcode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {},{}", self.op, self.bit, self.operand)
    }
}

/// How an instruction body reaches the byte it operates on.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Access {
    /// Operate on the register's storage directly.
    InPlace(Reg8),
    /// Read the byte addressed by the pair into a local, operate on the local, and write
    /// it back to the same address.
    ReadModifyWrite(Reg16),
}

/// The operation performed by an instruction, independent of how it is rendered.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct OpBody {
    pub op: BitOp,
    pub bit: u8,
    pub access: Access,
}

impl OpBody {
    /// Break the body down into the steps it performs, in order.
    ///
    /// A read-modify-write body always stores the local back, even for `BIT` which
    /// leaves it unchanged, so every memory body has the same load, apply, store shape.
    pub fn steps(&self) -> Vec<Step> {
        match self.access {
            Access::InPlace(reg) => vec![Step::Apply {
                op: self.op,
                bit: self.bit,
                target: Target::Reg(reg),
            }],
            Access::ReadModifyWrite(pair) => vec![
                Step::Load(pair),
                Step::Apply {
                    op: self.op,
                    bit: self.bit,
                    target: Target::Local,
                },
                Step::Store(pair),
            ],
        }
    }
}

/// Formats the body as its steps separated by `; `, e.g. `b = [HL]; BIT 3,b; [HL] = b`.
impl fmt::Display for OpBody {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, step) in self.steps().iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            fmt::Display::fmt(step, f)?;
        }
        Ok(())
    }
}

/// The byte a [`Step::Apply`] operates on.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Target {
    /// A register's storage.
    Reg(Reg8),
    /// The local copy loaded from memory.
    Local,
}

/// One step of an instruction body.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Step {
    /// Read the byte at the address held in the pair into the local.
    Load(Reg16),
    /// Apply the bit operation to the target.
    Apply { op: BitOp, bit: u8, target: Target },
    /// Write the local to the address held in the pair.
    Store(Reg16),
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Self::Load(pair) => write!(f, "b = [{}]", pair),
            Self::Apply {
                op,
                bit,
                target: Target::Reg(reg),
            } => write!(f, "{} {},{}", op, bit, reg.location()),
            Self::Apply {
                op,
                bit,
                target: Target::Local,
            } => write!(f, "{} {},b", op, bit),
            Self::Store(pair) => write!(f, "[{}] = b", pair),
        }
    }
}
