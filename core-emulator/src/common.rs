use std::cmp::Ordering;

use num_traits::ToPrimitive;

use crate::Fault;

/// A fixed block of byte cells with bounds-checked access.
///
/// Both main memory and the register file are modelled this way, differing only in how they're
/// addressed and which fault an out-of-range access raises.
pub trait Memory {
    type AddressSpace: Copy + ToPrimitive;

    fn cells(&self) -> &[u8];
    fn cells_mut(&mut self) -> &mut [u8];

    /// The fault raised when `addr` doesn't name a cell.
    fn out_of_range(addr: Self::AddressSpace) -> Fault;

    fn read_byte(&self, addr: Self::AddressSpace) -> Result<u8, Fault> {
        addr.to_usize()
            .and_then(|i| self.cells().get(i).copied())
            .ok_or_else(|| Self::out_of_range(addr))
    }

    fn write_byte(&mut self, addr: Self::AddressSpace, byte: u8) -> Result<(), Fault> {
        let cell = addr.to_usize()
            .and_then(|i| self.cells_mut().get_mut(i))
            .ok_or_else(|| Self::out_of_range(addr))?;
        *cell = byte;
        Ok(())
    }

    fn clear(&mut self) {
        self.cells_mut().fill(0);
    }
}

/// The flags register, holding the outcome of the last `CMP`.
///
/// Laid out as `0b00000LGE`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Flags(u8);

impl Flags {
    pub const BASE: Flags = Flags(0);
    pub const EQUAL: Flags = Flags(0b001);
    pub const GREATER: Flags = Flags(0b010);
    pub const LESS: Flags = Flags(0b100);

    pub fn compare(a: u8, b: u8) -> Flags {
        match a.cmp(&b) {
            Ordering::Equal => Flags::EQUAL,
            Ordering::Greater => Flags::GREATER,
            Ordering::Less => Flags::LESS,
        }
    }

    /// Restores flags from a raw byte, such as one popped from the stack. Bits outside `LGE` are
    /// dropped.
    pub fn from_bits(bits: u8) -> Flags {
        Flags(bits & 0b111)
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn contains(self, other: Flags) -> bool {
        self.0 & other.0 != 0
    }
}

#[cfg(test)]
mod test {
    use super::Flags;

    #[test]
    fn test_compare() {
        assert_eq!(Flags::compare(3, 3), Flags::EQUAL);
        assert_eq!(Flags::compare(4, 3), Flags::GREATER);
        assert_eq!(Flags::compare(0, 255), Flags::LESS);
    }

    #[test]
    fn test_from_bits() {
        assert_eq!(Flags::from_bits(0b1111_1010), Flags::GREATER);
        assert!(Flags::from_bits(0b101).contains(Flags::LESS));
        assert!(!Flags::BASE.contains(Flags::EQUAL));
    }
}
