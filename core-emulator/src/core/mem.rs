use ls8_utils::MEMORY_SIZE;

use crate::{Fault, Memory, device::Device};

use super::Core;

pub const REGISTER_COUNT: usize = 8;

/// The LS-8's 256 bytes of main memory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ram(pub [u8; MEMORY_SIZE]);

impl Ram {
    pub fn new() -> Self {
        Self([0; MEMORY_SIZE])
    }
}

impl Default for Ram {
    fn default() -> Self {
        Self::new()
    }
}

impl Memory for Ram {
    type AddressSpace = usize;

    fn cells(&self) -> &[u8] {
        &self.0
    }

    fn cells_mut(&mut self) -> &mut [u8] {
        &mut self.0
    }

    fn out_of_range(addr: usize) -> Fault {
        Fault::AddressOutOfRange(addr)
    }
}

/// The general-purpose registers R0 to R7.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Registers(pub [u8; REGISTER_COUNT]);

impl Registers {
    pub fn new() -> Self {
        Self([0; REGISTER_COUNT])
    }
}

impl Memory for Registers {
    type AddressSpace = u8;

    fn cells(&self) -> &[u8] {
        &self.0
    }

    fn cells_mut(&mut self) -> &mut [u8] {
        &mut self.0
    }

    fn out_of_range(index: u8) -> Fault {
        Fault::RegisterOutOfRange(index)
    }
}

impl<D: Device> Core<D> {
    /// Clears memory and copies `rom` in from address 0. Memory is untouched if `rom` doesn't fit.
    pub fn load_rom(&mut self, rom: &[u8]) -> Result<(), Fault> {
        if rom.len() > MEMORY_SIZE {
            return Err(Fault::AddressOutOfRange(MEMORY_SIZE));
        }
        self.memory.clear();

        for (addr, byte) in rom.iter().enumerate() {
            self.memory.write_byte(addr, *byte)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use crate::{Fault, Memory, device::RecordingDevice};

    use super::{Core, Ram, Registers};

    #[test]
    fn test_bounds() {
        let mut ram = Ram::new();
        ram.write_byte(255, 7).unwrap();
        assert_eq!(ram.read_byte(255), Ok(7));
        assert_eq!(ram.read_byte(256), Err(Fault::AddressOutOfRange(256)));
        assert_eq!(ram.write_byte(300, 1), Err(Fault::AddressOutOfRange(300)));

        let mut registers = Registers::new();
        registers.write_byte(7, 1).unwrap();
        assert_eq!(registers.read_byte(8), Err(Fault::RegisterOutOfRange(8)));
    }

    #[test]
    fn test_load_rom() {
        let mut core = Core::<RecordingDevice>::new();
        core.memory.write_byte(10, 0xaa).unwrap();

        core.load_rom(&[1, 2, 3]).unwrap();
        assert_eq!(&core.memory.0[..4], [1, 2, 3, 0]);
        assert_eq!(core.memory.0[10], 0);

        assert_eq!(core.load_rom(&[0xff; 257]), Err(Fault::AddressOutOfRange(256)));
        assert_eq!(&core.memory.0[..4], [1, 2, 3, 0]);
        assert_eq!(core.memory.0[255], 0);
    }
}
