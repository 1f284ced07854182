use std::time::Duration;

use crate::{Fault, Flags, MachineConfig, Memory, device::Device};

/// Register holding the interrupt mask.
pub const INTERRUPT_MASK: u8 = 5;

/// Register holding the pending interrupt status bits.
pub const INTERRUPT_STATUS: u8 = 6;

/// Register holding the stack pointer.
pub const STACK_POINTER: u8 = 7;

/// Initial stack pointer. The stack is empty when the pointer is here, and grows downwards.
pub const STACK_BASE: u8 = 0xF4;

/// Start of the interrupt vector table. Slot `n` holds the handler address for interrupt line `n`.
pub const VECTOR_TABLE: usize = 0xF8;

/// An LS-8 machine: memory, registers, and the execution state needed to run a program.
pub struct Core<D: Device = crate::device::ConsoleDevice> {
    pub program_counter: usize,
    pub memory: Ram,
    pub registers: Registers,
    pub flags: Flags,
    pub interrupts_enabled: bool,
    pub halted: bool,
    pub device: D,
    timer_interval: Duration,
    trace: bool,
}

impl<D: Device> Core<D> {
    pub fn with_device(device: D, config: &MachineConfig) -> Self {
        let mut registers = Registers::new();
        registers.0[STACK_POINTER as usize] = STACK_BASE;
        registers.0[INTERRUPT_MASK as usize] = config.interrupt_mask;

        Self {
            program_counter: 0,
            memory: Ram::new(),
            registers,
            flags: Flags::BASE,
            interrupts_enabled: true,
            halted: false,
            device,
            timer_interval: config.timer_interval,
            trace: config.trace,
        }
    }

    /// Shorthand for reading a register.
    pub fn reg(&self, index: u8) -> Result<u8, Fault> {
        self.registers.read_byte(index)
    }

    pub fn set_reg(&mut self, index: u8, value: u8) -> Result<(), Fault> {
        self.registers.write_byte(index, value)
    }
}

impl<D: Device + Default> Core<D> {
    pub fn new() -> Self {
        Self::with_device(D::default(), &MachineConfig::default())
    }

    pub fn new_with_rom(rom: &[u8]) -> Result<Self, Fault> {
        let mut this = Self::new();
        this.load_rom(rom)?;
        Ok(this)
    }
}

impl<D: Device + Default> Default for Core<D> {
    fn default() -> Self {
        Self::new()
    }
}

mod alu;

mod exec;
pub use exec::*;

mod interrupt;
pub use interrupt::*;

mod mem;
pub use mem::*;
