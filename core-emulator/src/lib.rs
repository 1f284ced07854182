//! An emulator for the LS-8, a small 8-bit teaching computer.

mod common;
pub use common::*;

mod config;
pub use config::*;

pub mod device;

mod error;
pub use error::*;

mod stack;

mod core;
pub use self::core::*;
