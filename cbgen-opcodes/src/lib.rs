//! Defines the CB-prefixed bit opcodes for the `cbgen` table generator.
//!
//! This library enumerates the `BIT`, `RES` and `SET` instructions of the gbz80 CPU over
//! every 8 bit operand they can address, producing one [`OpcodeRecord`][table::OpcodeRecord]
//! per opcode for an emulator's dispatch table.
//!
//! The [`operand`] module supplies [`Operand8`][operand::Operand8], the registers and the
//! memory indirection the instructions act on.
//!
//! The [`opcode`] module supplies [`CBBitOpcode`][opcode::CBBitOpcode] and the
//! [`OpBody`][opcode::OpBody] describing how each instruction reads and writes its
//! operand.
//!
//! The [`table`] module walks the opcode space and builds the records.

pub mod gbz80types;
pub mod opcode;
pub mod operand;
pub mod table;
