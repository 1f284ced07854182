use tracing::{debug, warn};

use crate::{Fault, Flags, Memory, device::Device};

use super::{Core, INTERRUPT_MASK, INTERRUPT_STATUS, VECTOR_TABLE};

/// Status bit raised by the timer.
pub const TIMER_INTERRUPT: u8 = 0b01;

/// The interrupt lines which can be delivered, in priority order. Requests for any other line are
/// dropped.
pub const DELIVERABLE_INTERRUPTS: [u8; 2] = [0b01, 0b10];

/// Number of general-purpose registers saved on interrupt entry (R0 to R6). The stack pointer
/// isn't saved.
const SAVED_REGISTERS: u8 = 7;

impl<D: Device> Core<D> {
    /// Handles an `INT` request for the lines set in `lines`, which are filtered through the
    /// interrupt mask.
    pub fn request_interrupt(&mut self, lines: u8) -> Result<(), Fault> {
        let masked = lines & self.reg(INTERRUPT_MASK)?;

        if DELIVERABLE_INTERRUPTS.contains(&masked) {
            let status = self.reg(INTERRUPT_STATUS)?;
            self.set_reg(INTERRUPT_STATUS, status | masked)?;
        } else if masked != 0 {
            warn!(lines, masked, "ignoring request for undeliverable interrupt line");
        }

        Ok(())
    }

    /// Raises the timer interrupt if at least one timer interval has passed since the last one.
    pub(super) fn poll_timer(&mut self) -> Result<(), Fault> {
        if self.device.timer_elapsed() >= self.timer_interval {
            let status = self.reg(INTERRUPT_STATUS)?;
            self.set_reg(INTERRUPT_STATUS, status | TIMER_INTERRUPT)?;
            self.device.reset_timer();
        }
        Ok(())
    }

    /// If interrupts are enabled and a deliverable line is pending, enters its handler.
    ///
    /// The mask only filters `INT` requests. A pending status bit is delivered whatever the mask
    /// holds, so the timer fires for any program which fills its vector slot.
    ///
    /// Returns whether an interrupt was delivered.
    pub fn deliver_pending_interrupt(&mut self) -> Result<bool, Fault> {
        if !self.interrupts_enabled {
            return Ok(false);
        }

        let status = self.reg(INTERRUPT_STATUS)?;
        let Some(line) = DELIVERABLE_INTERRUPTS.iter().position(|bit| status & bit != 0) else {
            return Ok(false);
        };

        self.interrupts_enabled = false;
        self.set_reg(INTERRUPT_STATUS, status & !DELIVERABLE_INTERRUPTS[line])?;

        let return_address = u8::try_from(self.program_counter)
            .map_err(|_| Fault::AddressOutOfRange(self.program_counter))?;
        self.push(return_address)?;
        self.push(self.flags.bits())?;
        for index in (0..SAVED_REGISTERS).rev() {
            let value = self.reg(index)?;
            self.push(value)?;
        }

        let handler = self.memory.read_byte(VECTOR_TABLE + line)?;
        debug!(line, handler, return_address, "delivering interrupt");
        self.program_counter = handler as usize;

        Ok(true)
    }

    /// Restores the state saved by interrupt delivery and re-enables interrupts.
    ///
    /// Lines raised while the handler ran stay pending, rather than being overwritten by the saved
    /// status register. The serviced line was already cleared on entry, so the cost is that a
    /// handler can't drop other pending lines by clearing R6 itself.
    ///
    /// Returns the address to resume at.
    pub(super) fn return_from_interrupt(&mut self) -> Result<u8, Fault> {
        let raised = self.reg(INTERRUPT_STATUS)?;
        for index in 0..SAVED_REGISTERS {
            let value = self.pop()?;
            self.set_reg(index, value)?;
        }
        let status = self.reg(INTERRUPT_STATUS)?;
        self.set_reg(INTERRUPT_STATUS, status | raised)?;

        let flags = self.pop()?;
        self.flags = Flags::from_bits(flags);
        let return_address = self.pop()?;

        self.interrupts_enabled = true;
        Ok(return_address)
    }
}
