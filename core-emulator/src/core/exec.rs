use ls8_utils::Instruction;
use tracing::{instrument, trace};

use crate::{Fault, Flags, Memory, device::Device};

use super::Core;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionResult {
    Continue,
    Halt,
}

/// Where the program counter goes after an instruction.
enum Flow {
    /// Past the instruction and its operands.
    Next,

    /// To an address chosen by the instruction.
    Jump(u8),

    Halt,
}

impl<D: Device> Core<D> {
    /// Runs until `HLT`, or until a fault stops the machine.
    #[instrument(skip(self))]
    pub fn execute_until_halt(&mut self) -> Result<(), Fault> {
        loop {
            match self.step()? {
                ExecutionResult::Continue => {},
                ExecutionResult::Halt => return Ok(()),
            }
        }
    }

    /// Runs a single cycle: deliver any pending interrupt, execute one instruction, poll the timer.
    ///
    /// The core is halted after this returns [`ExecutionResult::Halt`] or an error.
    pub fn step(&mut self) -> Result<ExecutionResult, Fault> {
        if self.halted {
            return Ok(ExecutionResult::Halt);
        }

        let result = self.cycle();
        if !matches!(result, Ok(ExecutionResult::Continue)) {
            self.halted = true;
        }
        result
    }

    fn cycle(&mut self) -> Result<ExecutionResult, Fault> {
        self.deliver_pending_interrupt()?;

        if self.trace {
            trace!("{}", self.trace_line());
        }

        let pc = self.program_counter;
        let opcode = self.memory.read_byte(pc)?;
        let ins = Instruction::decode(opcode).ok_or(Fault::UnknownOpcode { opcode, pc })?;

        // Only fetch the operands this instruction has, so one at the very end of memory doesn't
        // read past it
        let mut operands = [0; 2];
        for (i, operand) in operands.iter_mut().take(ins.operand_count()).enumerate() {
            *operand = self.memory.read_byte(pc + 1 + i)?;
        }
        let [a, b] = operands;

        match self.execute_one_instruction(ins, a, b)? {
            Flow::Next => self.program_counter = pc + ins.width(),
            Flow::Jump(addr) => self.program_counter = addr as usize,
            Flow::Halt => return Ok(ExecutionResult::Halt),
        }

        self.poll_timer()?;
        Ok(ExecutionResult::Continue)
    }

    fn execute_one_instruction(&mut self, ins: Instruction, a: u8, b: u8) -> Result<Flow, Fault> {
        use Instruction::*;

        match ins {
            Nop => {},
            Hlt => return Ok(Flow::Halt),

            Ldi => self.set_reg(a, b)?,

            Ld => {
                let addr = self.reg(b)? as usize;
                let value = self.memory.read_byte(addr)?;
                self.set_reg(a, value)?;
            },

            St => {
                let addr = self.reg(a)? as usize;
                let value = self.reg(b)?;
                self.memory.write_byte(addr, value)?;
            },

            Prn => {
                let value = self.reg(a)?;
                self.device.print_number(value)?;
            },

            Pra => {
                let value = self.reg(a)?;
                self.device.print_char(value)?;
            },

            Push => {
                let value = self.reg(a)?;
                self.push(value)?;
            },

            Pop => {
                let value = self.pop()?;
                self.set_reg(a, value)?;
            },

            Call => {
                let target = self.reg(a)?;
                let return_address = u8::try_from(self.program_counter + ins.width())
                    .map_err(|_| Fault::AddressOutOfRange(self.program_counter + ins.width()))?;
                self.push(return_address)?;
                return Ok(Flow::Jump(target));
            },

            Ret => return Ok(Flow::Jump(self.pop()?)),

            Int => {
                let lines = self.reg(a)?;
                self.request_interrupt(lines)?;
            },

            Iret => return Ok(Flow::Jump(self.return_from_interrupt()?)),

            Jmp => return Ok(Flow::Jump(self.reg(a)?)),
            Jeq => return self.jump_if(self.flags.contains(Flags::EQUAL), a),
            Jne => return self.jump_if(!self.flags.contains(Flags::EQUAL), a),
            Jgt => return self.jump_if(self.flags.contains(Flags::GREATER), a),
            Jlt => return self.jump_if(self.flags.contains(Flags::LESS), a),
            Jle => return self.jump_if(self.flags.contains(Flags::LESS) || self.flags.contains(Flags::EQUAL), a),
            Jge => return self.jump_if(self.flags.contains(Flags::GREATER) || self.flags.contains(Flags::EQUAL), a),

            Add | Sub | Mul | Div | Mod | Inc | Dec | Cmp | And | Not | Or | Xor | Shl | Shr => {
                self.alu(ins, a, b)?
            },
        }

        Ok(Flow::Next)
    }

    fn jump_if(&self, condition: bool, target: u8) -> Result<Flow, Fault> {
        if condition {
            Ok(Flow::Jump(self.reg(target)?))
        } else {
            Ok(Flow::Next)
        }
    }

    /// Renders the machine state as one line:
    /// `TRACE: PC | FL IE RAM[PC] RAM[PC+1] RAM[PC+2] | R0 ... R7`, all in hex.
    pub fn trace_line(&self) -> String {
        let pc = self.program_counter;
        let peek = |offset: usize| self.memory.0.get(pc + offset).copied().unwrap_or(0);

        let registers = self.registers.0.iter()
            .map(|register| format!(" {register:02X}"))
            .collect::<String>();

        format!(
            "TRACE: {:02X} | {:02X} {:02X} {:02X} {:02X} {:02X} |{registers}",
            pc,
            self.flags.bits(),
            self.interrupts_enabled as u8,
            peek(0),
            peek(1),
            peek(2),
        )
    }
}
