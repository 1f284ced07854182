//! The LS-8 instruction set.
//!
//! Opcodes follow the LS-8 encoding convention:
//!
//! ```text
//!   .-. Number of operands
//!   | |.- ALU operation
//!   | ||.- Sets the program counter itself
//!   | |||.--. Instruction identifier
//! 0b11111111
//! ```

macro_rules! instructions {
    ($($variant:ident = $opcode:literal, $mnemonic:literal;)*) => {
        /// A decoded LS-8 instruction.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        pub enum Instruction {
            $($variant),*
        }

        impl Instruction {
            /// Every instruction, in opcode table order.
            pub const ALL: &'static [Instruction] = &[$(Instruction::$variant),*];

            pub const fn opcode(self) -> u8 {
                match self {
                    $(Instruction::$variant => $opcode),*
                }
            }

            pub const fn mnemonic(self) -> &'static str {
                match self {
                    $(Instruction::$variant => $mnemonic),*
                }
            }
        }
    };
}

instructions! {
    Nop  = 0b0000_0000, "NOP";
    Hlt  = 0b0000_0001, "HLT";
    Ret  = 0b0001_0001, "RET";
    Iret = 0b0001_0011, "IRET";
    Push = 0b0100_0101, "PUSH";
    Pop  = 0b0100_0110, "POP";
    Prn  = 0b0100_0111, "PRN";
    Pra  = 0b0100_1000, "PRA";
    Call = 0b0101_0000, "CALL";
    Int  = 0b0101_0010, "INT";
    Jmp  = 0b0101_0100, "JMP";
    Jeq  = 0b0101_0101, "JEQ";
    Jne  = 0b0101_0110, "JNE";
    Jgt  = 0b0101_0111, "JGT";
    Jlt  = 0b0101_1000, "JLT";
    Jle  = 0b0101_1001, "JLE";
    Jge  = 0b0101_1010, "JGE";
    Inc  = 0b0110_0101, "INC";
    Dec  = 0b0110_0110, "DEC";
    Not  = 0b0110_1001, "NOT";
    Ldi  = 0b1000_0010, "LDI";
    Ld   = 0b1000_0011, "LD";
    St   = 0b1000_0100, "ST";
    Add  = 0b1010_0000, "ADD";
    Sub  = 0b1010_0001, "SUB";
    Mul  = 0b1010_0010, "MUL";
    Div  = 0b1010_0011, "DIV";
    Mod  = 0b1010_0100, "MOD";
    Cmp  = 0b1010_0111, "CMP";
    And  = 0b1010_1000, "AND";
    Or   = 0b1010_1010, "OR";
    Xor  = 0b1010_1011, "XOR";
    Shl  = 0b1010_1100, "SHL";
    Shr  = 0b1010_1101, "SHR";
}

/// Opcode-indexed lookup of every defined instruction. Empty slots are unknown opcodes.
pub static DISPATCH_TABLE: [Option<Instruction>; 256] = build_dispatch_table();

const fn build_dispatch_table() -> [Option<Instruction>; 256] {
    let mut table = [None; 256];
    let mut i = 0;
    while i < Instruction::ALL.len() {
        let ins = Instruction::ALL[i];
        table[ins.opcode() as usize] = Some(ins);
        i += 1;
    }
    table
}

impl Instruction {
    pub fn decode(opcode: u8) -> Option<Instruction> {
        DISPATCH_TABLE[opcode as usize]
    }

    /// Looks up an instruction by its mnemonic, ignoring case.
    pub fn from_mnemonic(mnemonic: &str) -> Option<Instruction> {
        Self::ALL
            .iter()
            .copied()
            .find(|ins| ins.mnemonic().eq_ignore_ascii_case(mnemonic))
    }

    /// Number of operand bytes following the opcode.
    pub const fn operand_count(self) -> usize {
        (self.opcode() >> 6) as usize
    }

    /// Total encoded size in bytes, which is how far the program counter moves when the
    /// instruction doesn't set it.
    pub const fn width(self) -> usize {
        1 + self.operand_count()
    }

    pub const fn is_alu(self) -> bool {
        self.opcode() & 0b0010_0000 != 0
    }

    pub const fn sets_pc(self) -> bool {
        self.opcode() & 0b0001_0000 != 0
    }

    /// Whether the operand at `index` is an immediate value rather than a register index.
    pub const fn operand_is_immediate(self, index: usize) -> bool {
        matches!(self, Instruction::Ldi) && index == 1
    }
}

#[cfg(test)]
mod test {
    use super::{DISPATCH_TABLE, Instruction};

    #[test]
    fn test_opcodes_are_unique() {
        let defined = DISPATCH_TABLE.iter().filter(|slot| slot.is_some()).count();
        assert_eq!(defined, Instruction::ALL.len());
    }

    #[test]
    fn test_decode() {
        assert_eq!(Instruction::decode(0b1000_0010), Some(Instruction::Ldi));
        assert_eq!(Instruction::decode(0b0000_0001), Some(Instruction::Hlt));
        assert_eq!(Instruction::decode(0b1111_1111), None);
    }

    #[test]
    fn test_encoding_bits() {
        assert_eq!(Instruction::Ldi.width(), 3);
        assert_eq!(Instruction::Prn.width(), 2);
        assert_eq!(Instruction::Ret.width(), 1);

        assert!(Instruction::Cmp.is_alu());
        assert!(!Instruction::Push.is_alu());

        assert!(Instruction::Call.sets_pc());
        assert!(Instruction::Jge.sets_pc());
        assert!(!Instruction::Add.sets_pc());
    }

    #[test]
    fn test_from_mnemonic() {
        assert_eq!(Instruction::from_mnemonic("ldi"), Some(Instruction::Ldi));
        assert_eq!(Instruction::from_mnemonic("IRET"), Some(Instruction::Iret));
        assert_eq!(Instruction::from_mnemonic("BRK"), None);
    }
}
