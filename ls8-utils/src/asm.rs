//! A minimal LS-8 assembler, so programs can be written as mnemonics rather than binary.
//!
//! ```text
//! main:
//!     LDI R0, 8       ; comments start with `;` or `#`
//!     LDI R1, print
//!     CALL R1
//!     HLT
//! print:
//!     PRN R0
//!     RET
//! ```
//!
//! Labels evaluate to their address and may be used anywhere a number can. `db` emits raw bytes.

use std::collections::HashMap;

use thiserror::Error;

use crate::{Instruction, MEMORY_SIZE};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssembleError {
    #[error("line {line}: unknown mnemonic `{mnemonic}`")]
    UnknownMnemonic { line: usize, mnemonic: String },

    #[error("line {line}: {mnemonic} takes {expected} operand(s), got {actual}")]
    OperandCount { line: usize, mnemonic: &'static str, expected: usize, actual: usize },

    #[error("line {line}: invalid register `{text}`")]
    InvalidRegister { line: usize, text: String },

    #[error("line {line}: invalid operand `{text}`")]
    InvalidOperand { line: usize, text: String },

    #[error("line {line}: undefined label `{label}`")]
    UndefinedLabel { line: usize, label: String },

    #[error("line {line}: label `{label}` is already defined")]
    DuplicateLabel { line: usize, label: String },

    #[error("program is {0} bytes, but memory only holds {MEMORY_SIZE}")]
    TooLarge(usize),
}

enum Statement<'a> {
    Instruction(Instruction, Vec<&'a str>),
    Bytes(Vec<&'a str>),
}

struct SourceLine<'a> {
    number: usize,
    statement: Statement<'a>,
}

/// Assembles LS-8 source into a memory image which loads at address 0.
pub fn assemble_ls8(source: &str) -> Result<Vec<u8>, AssembleError> {
    let mut labels = HashMap::new();
    let mut lines = vec![];
    let mut address = 0;

    // First pass: find statements and label addresses
    for (i, raw) in source.lines().enumerate() {
        let number = i + 1;
        let mut code = raw.split(['#', ';']).next().unwrap_or_default().trim();

        while let Some((label, rest)) = code.split_once(':') {
            let label = label.trim();
            if labels.insert(label.to_string(), address).is_some() {
                return Err(AssembleError::DuplicateLabel { line: number, label: label.to_string() });
            }
            code = rest.trim();
        }

        let Some((head, rest)) = split_mnemonic(code) else { continue };
        let operands = rest
            .split([',', ' ', '\t'])
            .filter(|op| !op.is_empty())
            .collect::<Vec<_>>();

        let statement = if head.eq_ignore_ascii_case("db") {
            address += operands.len();
            Statement::Bytes(operands)
        } else {
            let ins = Instruction::from_mnemonic(head)
                .ok_or_else(|| AssembleError::UnknownMnemonic { line: number, mnemonic: head.to_string() })?;
            if operands.len() != ins.operand_count() {
                return Err(AssembleError::OperandCount {
                    line: number,
                    mnemonic: ins.mnemonic(),
                    expected: ins.operand_count(),
                    actual: operands.len(),
                });
            }
            address += ins.width();
            Statement::Instruction(ins, operands)
        };

        lines.push(SourceLine { number, statement });
    }

    if address > MEMORY_SIZE {
        return Err(AssembleError::TooLarge(address));
    }

    // Second pass: emit bytes
    let mut rom = Vec::with_capacity(address);
    for SourceLine { number, statement } in lines {
        match statement {
            Statement::Instruction(ins, operands) => {
                rom.push(ins.opcode());
                for (i, operand) in operands.into_iter().enumerate() {
                    let byte = if ins.operand_is_immediate(i) {
                        resolve_value(operand, &labels, number)?
                    } else {
                        parse_register(operand)
                            .ok_or_else(|| AssembleError::InvalidRegister { line: number, text: operand.to_string() })?
                    };
                    rom.push(byte);
                }
            }
            Statement::Bytes(values) => {
                for value in values {
                    rom.push(resolve_value(value, &labels, number)?);
                }
            }
        }
    }

    Ok(rom)
}

/// Renders a memory image as one instruction per line, prefixed with its address.
/// Bytes which don't decode are shown as `db`.
pub fn disassemble(bytes: &[u8]) -> Vec<String> {
    let mut lines = vec![];
    let mut address = 0;

    while address < bytes.len() {
        let byte = bytes[address];
        match Instruction::decode(byte) {
            Some(ins) if address + ins.width() <= bytes.len() => {
                let operands = (0..ins.operand_count())
                    .map(|i| {
                        let operand = bytes[address + 1 + i];
                        if ins.operand_is_immediate(i) { operand.to_string() } else { format!("R{operand}") }
                    })
                    .collect::<Vec<_>>();

                if operands.is_empty() {
                    lines.push(format!("{address:02X}: {}", ins.mnemonic()));
                } else {
                    lines.push(format!("{address:02X}: {} {}", ins.mnemonic(), operands.join(", ")));
                }
                address += ins.width();
            }
            _ => {
                lines.push(format!("{address:02X}: db 0b{byte:08b}"));
                address += 1;
            }
        }
    }

    lines
}

/// Parses a byte literal in decimal, `0x` hex, or `0b` binary.
pub fn parse_number(text: &str) -> Option<u8> {
    let text = text.trim();
    if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        u8::from_str_radix(hex, 16).ok()
    } else if let Some(bin) = text.strip_prefix("0b").or_else(|| text.strip_prefix("0B")) {
        u8::from_str_radix(&bin.replace('_', ""), 2).ok()
    } else {
        text.parse().ok()
    }
}

fn split_mnemonic(code: &str) -> Option<(&str, &str)> {
    if code.is_empty() {
        return None;
    }
    Some(code.split_once(char::is_whitespace).unwrap_or((code, "")))
}

fn parse_register(text: &str) -> Option<u8> {
    let index = text.strip_prefix(['R', 'r'])?.parse::<u8>().ok()?;
    (index < 8).then_some(index)
}

fn resolve_value(text: &str, labels: &HashMap<String, usize>, line: usize) -> Result<u8, AssembleError> {
    if let Some(value) = parse_number(text) {
        return Ok(value);
    }

    if text.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_') {
        return labels
            .get(text)
            .map(|&address| address as u8)
            .ok_or_else(|| AssembleError::UndefinedLabel { line, label: text.to_string() });
    }

    Err(AssembleError::InvalidOperand { line, text: text.to_string() })
}

#[cfg(test)]
mod test {
    use proptest::prelude::*;

    use super::{AssembleError, assemble_ls8, disassemble, parse_number};

    #[test]
    fn test_asm() {
        let rom = assemble_ls8("LDI R0, 8\nPRN R0\nHLT").unwrap();
        assert_eq!(rom, [0b10000010, 0, 8, 0b01000111, 0, 0b00000001]);
    }

    #[test]
    fn test_labels() {
        let rom = assemble_ls8("
            start: LDI R1, sub
                   CALL R1
                   HLT
            sub:   RET
        ").unwrap();
        assert_eq!(rom, [0b10000010, 1, 6, 0b01010000, 1, 0b00000001, 0b00010001]);
    }

    #[test]
    fn test_db_and_comments() {
        let rom = assemble_ls8("db 1, 0x10 0b11 ; three bytes\n# nothing here\ndb end\nend:").unwrap();
        assert_eq!(rom, [1, 0x10, 3, 4]);
    }

    #[test]
    fn test_errors() {
        assert_eq!(
            assemble_ls8("NOP\nFOO R0"),
            Err(AssembleError::UnknownMnemonic { line: 2, mnemonic: "FOO".to_string() }),
        );
        assert_eq!(
            assemble_ls8("PRN R0, R1"),
            Err(AssembleError::OperandCount { line: 1, mnemonic: "PRN", expected: 1, actual: 2 }),
        );
        assert_eq!(
            assemble_ls8("PUSH R8"),
            Err(AssembleError::InvalidRegister { line: 1, text: "R8".to_string() }),
        );
        assert_eq!(
            assemble_ls8("LDI R0, nowhere"),
            Err(AssembleError::UndefinedLabel { line: 1, label: "nowhere".to_string() }),
        );
        assert_eq!(
            assemble_ls8("a:\na:"),
            Err(AssembleError::DuplicateLabel { line: 2, label: "a".to_string() }),
        );
        assert!(matches!(assemble_ls8(&"NOP\n".repeat(257)), Err(AssembleError::TooLarge(257))));
    }

    #[test]
    fn test_disassemble() {
        let lines = disassemble(&[0b10000010, 0, 8, 0b01000111, 0, 0b00000001, 0xff]);
        assert_eq!(lines, ["00: LDI R0, 8", "03: PRN R0", "05: HLT", "06: db 0b11111111"]);
    }

    proptest! {
        #[test]
        fn test_parse_number_formats(n in any::<u8>()) {
            prop_assert_eq!(parse_number(&n.to_string()), Some(n));
            prop_assert_eq!(parse_number(&format!("0x{n:x}")), Some(n));
            prop_assert_eq!(parse_number(&format!("0b{n:b}")), Some(n));
        }
    }
}
