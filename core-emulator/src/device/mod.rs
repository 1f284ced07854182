mod console;
pub use console::*;

mod recording;
pub use recording::*;

use std::{io, time::Duration};

/// The machine's connection to the outside world: a console to print to, and the wall clock which
/// drives the timer interrupt.
pub trait Device {
    /// Prints a value in decimal, followed by a newline. Used by `PRN`.
    fn print_number(&mut self, value: u8) -> io::Result<()>;

    /// Prints a value as a single character. Used by `PRA`.
    fn print_char(&mut self, value: u8) -> io::Result<()>;

    /// Time since the timer was last reset.
    fn timer_elapsed(&self) -> Duration;

    fn reset_timer(&mut self);
}
