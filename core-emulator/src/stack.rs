//! The LS-8 stack, which lives in main memory below [`STACK_BASE`] and is addressed through the
//! stack pointer register.
//!
//! Everything which uses the stack (`PUSH`/`POP`, `CALL`/`RET`, interrupt entry and `IRET`) is
//! built on [`Core::push`] and [`Core::pop`].

use crate::{Fault, Memory, device::Device, Core, STACK_BASE, STACK_POINTER};

impl<D: Device> Core<D> {
    pub fn stack_pointer(&self) -> Result<u8, Fault> {
        self.reg(STACK_POINTER)
    }

    /// Decrements the stack pointer, then writes `value` to the new top of the stack.
    pub fn push(&mut self, value: u8) -> Result<(), Fault> {
        let pointer = self.stack_pointer()?
            .checked_sub(1)
            .ok_or(Fault::StackOverflow)?;

        self.set_reg(STACK_POINTER, pointer)?;
        self.memory.write_byte(pointer as usize, value)
    }

    /// Reads the top of the stack, then increments the stack pointer.
    pub fn pop(&mut self) -> Result<u8, Fault> {
        let pointer = self.stack_pointer()?;
        if pointer >= STACK_BASE {
            return Err(Fault::StackUnderflow);
        }

        let value = self.memory.read_byte(pointer as usize)?;
        self.set_reg(STACK_POINTER, pointer + 1)?;
        Ok(value)
    }
}

#[cfg(test)]
mod test {
    use proptest::prelude::*;

    use crate::{Core, Fault, STACK_BASE, STACK_POINTER, device::RecordingDevice};

    #[test]
    fn test_push_pop() {
        let mut core = Core::<RecordingDevice>::new();

        core.push(1).unwrap();
        core.push(2).unwrap();
        assert_eq!(core.stack_pointer(), Ok(STACK_BASE - 2));
        assert_eq!(core.memory.0[STACK_BASE as usize - 1], 1);

        assert_eq!(core.pop(), Ok(2));
        assert_eq!(core.pop(), Ok(1));
        assert_eq!(core.stack_pointer(), Ok(STACK_BASE));
    }

    #[test]
    fn test_underflow() {
        let mut core = Core::<RecordingDevice>::new();
        assert_eq!(core.pop(), Err(Fault::StackUnderflow));
    }

    #[test]
    fn test_overflow() {
        let mut core = Core::<RecordingDevice>::new();
        core.set_reg(STACK_POINTER, 1).unwrap();

        core.push(9).unwrap();
        assert_eq!(core.memory.0[0], 9);
        assert_eq!(core.push(10), Err(Fault::StackOverflow));
    }

    proptest! {
        #[test]
        fn test_stack_is_lifo(values in prop::collection::vec(any::<u8>(), 0..64)) {
            let mut core = Core::<RecordingDevice>::new();
            for value in &values {
                core.push(*value).unwrap();
            }

            for value in values.iter().rev() {
                prop_assert_eq!(core.pop(), Ok(*value));
            }
            prop_assert_eq!(core.stack_pointer(), Ok(STACK_BASE));
        }
    }
}
