//! Shared LS-8 tooling: the instruction set, the program file loader, and an assembler.

mod isa;
pub use isa::*;

mod load;
pub use load::*;

mod asm;
pub use asm::*;
