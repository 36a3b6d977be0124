//! Builds the dispatch records for the CB bit instructions.
//!
//! Records are enumerated with the operation outermost, then the bit index, then the
//! operand in register-code order. A record's opcode is its start value plus its position
//! in that walk, and is never stored separately from it. Starting at
//! [`CB_BIT_OPS_BASE`] this reproduces the hardware encoding of the instructions.

use log::{debug, trace};
use once_cell::sync::Lazy;

use crate::gbz80types::Flags;
use crate::opcode::{BitOp, CBBitOpcode, OpBody};
use crate::operand::Operand8;

/// Opcode of `BIT 0,B`, the first bit instruction after the CB prefix.
pub const CB_BIT_OPS_BASE: u8 = 0x40;

/// Number of bit indexes in a byte.
const BITS: usize = 8;

/// Number of records in a generated table.
pub const TABLE_LEN: usize = BitOp::ALL.len() * BITS * Operand8::CB_OPERANDS.len();

/// One entry of the dispatch table.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct OpcodeRecord {
    /// Value the dispatcher matches on. This is a `u16` so that a table placed near the
    /// top of the byte range can still index a combined plain + CB dispatch table.
    pub opcode: u16,
    /// The instruction this record performs.
    pub instr: CBBitOpcode,
    /// Assembly text, e.g. `BIT 3,B`.
    pub mnemonic: String,
    /// Length of the encoded instruction in bytes.
    pub length: u8,
    /// Cost in machine cycles.
    pub cycles: u8,
    /// Flags the instruction writes.
    pub flags: Flags,
    /// What the instruction does to its operand.
    pub body: OpBody,
}

impl OpcodeRecord {
    /// Build the record for the given instruction at the given opcode.
    pub fn new(opcode: u16, instr: CBBitOpcode) -> Self {
        Self {
            opcode,
            instr,
            mnemonic: instr.to_string(),
            length: CBBitOpcode::LENGTH,
            cycles: instr.cycles(),
            flags: instr.op.flags_written(),
            body: instr.body(),
        }
    }
}

/// Get the instruction at the given position of the enumeration, or `None` if the index
/// is past the end of the table.
pub fn instr_at(index: usize) -> Option<CBBitOpcode> {
    if index >= TABLE_LEN {
        return None;
    }
    let operands = Operand8::CB_OPERANDS.len();
    Some(CBBitOpcode {
        op: BitOp::ALL[index / (BITS * operands)],
        bit: ((index / operands) % BITS) as u8,
        operand: Operand8::CB_OPERANDS[index % operands],
    })
}

/// Get the record at the given position of a table starting at `start` without building
/// the whole table.
pub fn record_at(start: u8, index: usize) -> Option<OpcodeRecord> {
    let instr = instr_at(index)?;
    Some(OpcodeRecord::new(start as u16 + index as u16, instr))
}

/// Generate the records for every bit instruction, numbering them consecutively from
/// `start`.
pub fn generate(start: u8) -> Vec<OpcodeRecord> {
    debug!("Generating {} CB bit records from {:#04X}", TABLE_LEN, start);
    let mut records = Vec::with_capacity(TABLE_LEN);
    for op in BitOp::ALL {
        for bit in 0..BITS as u8 {
            for operand in Operand8::CB_OPERANDS {
                let opcode = start as u16 + records.len() as u16;
                let record = OpcodeRecord::new(opcode, CBBitOpcode { op, bit, operand });
                trace!("{:#04X}: {}", record.opcode, record.mnemonic);
                records.push(record);
            }
        }
    }
    records
}

/// Get the table starting at [`CB_BIT_OPS_BASE`]. It is generated on first use.
pub fn cb_bit_table() -> &'static [OpcodeRecord] {
    static CB_BIT_TABLE: Lazy<Vec<OpcodeRecord>> = Lazy::new(|| generate(CB_BIT_OPS_BASE));
    &CB_BIT_TABLE
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::opcode::{Access, Step, Target};
    use crate::operand::{Reg16, Reg8};

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn opcodes_are_contiguous() {
        init();
        for start in [0, CB_BIT_OPS_BASE, 0xFF] {
            let records = generate(start);
            assert_eq!(records.len(), TABLE_LEN);
            assert_eq!(TABLE_LEN, 192);
            for (i, record) in records.iter().enumerate() {
                assert_eq!(record.opcode, start as u16 + i as u16);
            }
            let unique: HashSet<_> = records.iter().map(|r| r.opcode).collect();
            assert_eq!(unique.len(), TABLE_LEN);
        }
    }

    #[test]
    fn every_record_is_two_bytes() {
        assert!(generate(CB_BIT_OPS_BASE).iter().all(|r| r.length == 2));
    }

    #[test]
    fn cost_depends_on_operand_and_op() {
        for record in generate(CB_BIT_OPS_BASE) {
            let expected = match record.instr.operand {
                Operand8::Reg(_) => 2,
                Operand8::Indirect(_) if record.instr.op == BitOp::TestBit => 3,
                Operand8::Indirect(_) => 4,
            };
            assert_eq!(record.cycles, expected, "{}", record.mnemonic);
        }
    }

    #[test]
    fn mnemonics_follow_position() {
        const OPS: [&str; 3] = ["BIT", "RES", "SET"];
        const OPERANDS: [&str; 8] = ["B", "C", "D", "E", "H", "L", "(HL)", "A"];
        for (i, record) in generate(0).iter().enumerate() {
            let expected = format!("{} {},{}", OPS[i / 64], (i / 8) % 8, OPERANDS[i % 8]);
            assert_eq!(record.mnemonic, expected);
        }
    }

    #[test]
    fn matches_hardware_encoding_at_base() {
        for record in cb_bit_table() {
            assert_eq!(record.instr.encode().map(u16::from), Some(record.opcode));
            assert_eq!(
                CBBitOpcode::decode(record.opcode as u8),
                Some(record.instr)
            );
        }
    }

    #[test]
    fn first_record() {
        let first = &generate(0x40)[0];
        assert_eq!(first.opcode, 0x40);
        assert_eq!(first.mnemonic, "BIT 0,B");
        assert_eq!(first.length, 2);
        assert_eq!(first.cycles, 2);
        assert_eq!(first.body.access, Access::InPlace(Reg8::B));
    }

    #[test]
    fn memory_test_reads_and_writes_back() {
        let record = generate(CB_BIT_OPS_BASE)
            .into_iter()
            .find(|r| r.mnemonic == "BIT 3,(HL)")
            .unwrap();
        assert_eq!(record.cycles, 3);
        assert_eq!(
            record.body.steps(),
            [
                Step::Load(Reg16::HL),
                Step::Apply {
                    op: BitOp::TestBit,
                    bit: 3,
                    target: Target::Local,
                },
                Step::Store(Reg16::HL),
            ]
        );
    }

    #[test]
    fn last_bit_records() {
        let start = 0x10;
        let records = generate(start);
        // (HL) is register code 6, so it comes just before A.
        let set_hl = &records[190];
        assert_eq!(set_hl.mnemonic, "SET 7,(HL)");
        assert_eq!(set_hl.cycles, 4);
        assert_eq!(set_hl.opcode, start as u16 + 190);
        let last = records.last().unwrap();
        assert_eq!(last.mnemonic, "SET 7,A");
        assert_eq!(last.cycles, 2);
        assert_eq!(last.opcode, start as u16 + 191);
    }

    #[test]
    fn record_at_matches_generate() {
        let records = generate(0x22);
        for (i, record) in records.iter().enumerate() {
            assert_eq!(record_at(0x22, i).as_ref(), Some(record));
        }
        assert_eq!(record_at(0x22, TABLE_LEN), None);
    }

    #[test]
    fn generation_is_deterministic() {
        assert_eq!(generate(0x40), generate(0x40));
        assert_eq!(cb_bit_table(), &generate(CB_BIT_OPS_BASE)[..]);
    }

    #[test]
    fn only_test_writes_flags() {
        for record in cb_bit_table() {
            assert_eq!(record.flags.is_empty(), record.instr.op != BitOp::TestBit);
        }
    }
}
