use ls8_utils::Instruction;

use crate::{Fault, Flags, device::Device};

use super::Core;

impl<D: Device> Core<D> {
    /// Executes an ALU-class instruction on registers `a` and `b`, storing the result in `a`.
    ///
    /// Results wrap at 8 bits. `b` is only read for two-operand instructions.
    pub(super) fn alu(&mut self, ins: Instruction, a: u8, b: u8) -> Result<(), Fault> {
        use Instruction::*;

        let x = self.reg(a)?;
        let y = if ins.operand_count() == 2 { self.reg(b)? } else { 0 };
        let divide_by_zero = Fault::DivideByZero { instruction: ins, pc: self.program_counter };

        let result = match ins {
            Add => x.wrapping_add(y),
            Sub => x.wrapping_sub(y),
            Mul => x.wrapping_mul(y),
            Div => x.checked_div(y).ok_or(divide_by_zero)?,
            Mod => x.checked_rem(y).ok_or(divide_by_zero)?,

            Inc => x.wrapping_add(1),
            Dec => x.wrapping_sub(1),

            And => x & y,
            Or => x | y,
            Xor => x ^ y,
            Not => !x,

            // Shifting every bit out leaves zero
            Shl => x.checked_shl(y as u32).unwrap_or(0),
            Shr => x.checked_shr(y as u32).unwrap_or(0),

            Cmp => {
                self.flags = Flags::compare(x, y);
                return Ok(());
            }

            _ => unreachable!("{} is not an ALU instruction", ins.mnemonic()),
        };

        self.set_reg(a, result)
    }
}
