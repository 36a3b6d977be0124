//! Generates the CB prefixed `BIT`, `RES` and `SET` entries of a gbz80 dispatch table.
//!
//! The records themselves come from [`cbgen_opcodes`]. This crate turns them into text,
//! either Rust source to splice into an emulator's dispatch table or a CSV listing for
//! comparison against published opcode tables, and writes that text out.

pub mod output;
pub mod render;

pub use cbgen_opcodes::table::{generate, OpcodeRecord, CB_BIT_OPS_BASE};
