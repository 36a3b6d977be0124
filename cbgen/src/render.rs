//! Renders opcode records as text.

use cbgen_opcodes::gbz80types::Flags;
use cbgen_opcodes::opcode::{Access, BitOp, OpBody, Step, Target};
use cbgen_opcodes::table::OpcodeRecord;
use clap::ValueEnum;
use proc_macro2::{Ident, Span, TokenStream};
use quote::quote;

/// Text format to render a table in.
#[derive(Default, Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    /// Rust struct literals, one per record, to splice into a dispatch table array.
    #[default]
    Rust,
    /// One CSV line per record, for comparison against published opcode tables.
    Csv,
}

/// Render the records in the given format. The records are rendered in the order given.
pub fn render_table(records: &[OpcodeRecord], format: OutputFormat) -> String {
    match format {
        OutputFormat::Rust => render_rust(records),
        OutputFormat::Csv => render_csv(records),
    }
}

/// Render each record as a `CbEntry` literal followed by a comma, preceded by a comment
/// with the opcode in hex.
fn render_rust(records: &[OpcodeRecord]) -> String {
    let mut out = String::new();
    for record in records {
        out.push_str(&format!(
            "// {:#04X}\n{},\n",
            record.opcode,
            record_tokens(record)
        ));
    }
    out
}

/// Render the records as CSV with a header line.
fn render_csv(records: &[OpcodeRecord]) -> String {
    let mut out = String::from("opcode,asm,length,cycles,flags,body\n");
    for record in records {
        out.push_str(&format!(
            "{:#04X},\"{}\",{},{},{},\"{}\"\n",
            record.opcode, record.mnemonic, record.length, record.cycles, record.flags, record.body
        ));
    }
    out
}

/// Build the `CbEntry` literal for a single record.
///
/// The generated code expects the dispatch table to provide `test_bit`, `reset_bit` and
/// `set_bit` helpers, a `cpu.regs` with register pair fields split into `hi` and `lo`
/// bytes, and a `mem` with `read` and `write`.
pub fn record_tokens(record: &OpcodeRecord) -> TokenStream {
    let opcode = record.opcode;
    let asm = &record.mnemonic;
    let length = record.length;
    let cycles = record.cycles;
    let flags = flags_tokens(record.flags);
    let exec = exec_tokens(&record.body);
    quote! {
        CbEntry {
            opcode: #opcode,
            asm: #asm,
            length: #length,
            cycles: #cycles,
            flags: #flags,
            exec: #exec,
        }
    }
}

fn flags_tokens(flags: Flags) -> TokenStream {
    let val = flags.bits();
    quote! { Flags::from_bits_retain(#val) }
}

/// Build the closure executing the body. Register bodies leave memory alone, so their
/// memory argument is marked unused.
fn exec_tokens(body: &OpBody) -> TokenStream {
    let mem = match body.access {
        Access::InPlace(_) => ident("_mem"),
        Access::ReadModifyWrite(_) => ident("mem"),
    };
    let steps = body.steps().into_iter().map(step_tokens);
    quote! {
        |cpu, #mem| {
            #(#steps)*
        }
    }
}

fn step_tokens(step: Step) -> TokenStream {
    match step {
        Step::Load(pair) => {
            let pair = ident(pair.field_name());
            quote! { let mut val = mem.read(cpu.regs.#pair.get()); }
        }
        Step::Apply { op, bit, target } => {
            let target = match target {
                Target::Reg(reg) => {
                    let location = reg.location();
                    let pair = ident(location.pair.field_name());
                    let half = ident(location.half.field_name());
                    quote! { cpu.regs.#pair.#half }
                }
                Target::Local => quote! { val },
            };
            match op {
                BitOp::TestBit => quote! { test_bit(&mut cpu.flags, &mut #target, #bit); },
                BitOp::ResetBit => quote! { reset_bit(&mut #target, #bit); },
                BitOp::SetBit => quote! { set_bit(&mut #target, #bit); },
            }
        }
        Step::Store(pair) => {
            let pair = ident(pair.field_name());
            quote! { mem.write(cpu.regs.#pair.get(), val); }
        }
    }
}

fn ident(name: &str) -> Ident {
    Ident::new(name, Span::call_site())
}

#[cfg(test)]
mod tests {
    use cbgen_opcodes::table::{cb_bit_table, generate};

    use super::*;

    /// Strip whitespace so token spacing doesn't matter to the comparison.
    fn squash(text: &str) -> String {
        text.chars().filter(|c| !c.is_whitespace()).collect()
    }

    fn find(mnemonic: &str) -> &'static OpcodeRecord {
        cb_bit_table()
            .iter()
            .find(|r| r.mnemonic == mnemonic)
            .unwrap()
    }

    #[test]
    fn register_entry_operates_in_place() {
        let tokens = record_tokens(find("BIT 0,B")).to_string();
        assert_eq!(
            squash(&tokens),
            squash(
                "CbEntry { opcode: 64u16, asm: \"BIT 0,B\", length: 2u8, cycles: 2u8, \
                 flags: Flags::from_bits_retain(224u8), \
                 exec: |cpu, _mem| { test_bit(&mut cpu.flags, &mut cpu.regs.bc.hi, 0u8); }, }"
            )
        );
    }

    #[test]
    fn memory_entry_reads_operates_and_writes() {
        let tokens = record_tokens(find("BIT 3,(HL)")).to_string();
        assert_eq!(
            squash(&tokens),
            squash(
                "CbEntry { opcode: 94u16, asm: \"BIT 3,(HL)\", length: 2u8, cycles: 3u8, \
                 flags: Flags::from_bits_retain(224u8), \
                 exec: |cpu, mem| { \
                 let mut val = mem.read(cpu.regs.hl.get()); \
                 test_bit(&mut cpu.flags, &mut val, 3u8); \
                 mem.write(cpu.regs.hl.get(), val); }, }"
            )
        );
    }

    #[test]
    fn mutating_entries_use_their_helper() {
        let res = squash(&record_tokens(find("RES 4,E")).to_string());
        assert!(res.contains("reset_bit(&mutcpu.regs.de.lo,4u8);"), "{}", res);
        let set = squash(&record_tokens(find("SET 7,(HL)")).to_string());
        assert!(set.contains("cycles:4u8"), "{}", set);
        assert!(set.contains("set_bit(&mutval,7u8);"), "{}", set);
    }

    #[test]
    fn rust_blocks_are_labelled_with_opcodes() {
        let text = render_table(&generate(0x40), OutputFormat::Rust);
        let labels: Vec<&str> = text.lines().filter(|l| l.starts_with("// ")).collect();
        assert_eq!(labels.len(), 192);
        assert_eq!(labels[0], "// 0x40");
        assert_eq!(labels[191], "// 0xFF");
    }

    #[test]
    fn csv_lines() {
        let text = render_table(&generate(0x40), OutputFormat::Csv);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 193);
        assert_eq!(lines[0], "opcode,asm,length,cycles,flags,body");
        assert_eq!(lines[1], "0x40,\"BIT 0,B\",2,2,ZNH-,\"BIT 0,BC.hi\"");
        assert_eq!(
            lines[31],
            "0x5E,\"BIT 3,(HL)\",2,3,ZNH-,\"b = [HL]; BIT 3,b; [HL] = b\""
        );
        assert_eq!(
            lines[192],
            "0xFF,\"SET 7,A\",2,2,----,\"SET 7,AF.hi\""
        );
    }

    #[test]
    fn csv_opcodes_past_a_byte() {
        let text = render_table(&generate(0xFF), OutputFormat::Csv);
        let last = text.lines().last().unwrap();
        assert!(last.starts_with("0x1BE,\"SET 7,A\""), "{}", last);
    }
}
