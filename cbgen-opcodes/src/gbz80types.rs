//! Types which are used in the gbz80.
use std::fmt;

use bitflags::bitflags;

bitflags! {
    /// Flags set after various operations.
    #[derive(Default, Debug, Copy, Clone, Eq, PartialEq, Hash)]
    pub struct Flags: u8 {
        /// result was zero.
        const ZERO = 0x80;
        /// operation was a subtraction.
        const SUB = 0x40;
        /// there was a carry in the middle of the number.
        const HALFCARRY = 0x20;
        /// there was a carry out of the top of the number.
        const CARRY = 0x10;
    }
}

/// Formats the flags in the `ZNHC` column style used by published opcode tables, with a
/// `-` in place of each flag not in the set.
impl fmt::Display for Flags {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        const LETTERS: [(Flags, char); 4] = [
            (Flags::ZERO, 'Z'),
            (Flags::SUB, 'N'),
            (Flags::HALFCARRY, 'H'),
            (Flags::CARRY, 'C'),
        ];
        for (flag, letter) in LETTERS {
            if self.contains(flag) {
                write!(f, "{}", letter)?;
            } else {
                f.write_str("-")?;
            }
        }
        Ok(())
    }
}
