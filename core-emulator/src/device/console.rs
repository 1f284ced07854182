use std::{io::{self, Stdout, Write}, time::{Duration, Instant}};

use super::Device;

/// Prints to standard output, and times interrupts with the system clock.
pub struct ConsoleDevice {
    out: Stdout,
    timer_start: Instant,
}

impl ConsoleDevice {
    pub fn new() -> Self {
        Self {
            out: io::stdout(),
            timer_start: Instant::now(),
        }
    }
}

impl Default for ConsoleDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl Device for ConsoleDevice {
    fn print_number(&mut self, value: u8) -> io::Result<()> {
        writeln!(self.out, "{value}")
    }

    fn print_char(&mut self, value: u8) -> io::Result<()> {
        let mut out = self.out.lock();
        out.write_all(&[value])?;
        out.flush()
    }

    fn timer_elapsed(&self) -> Duration {
        self.timer_start.elapsed()
    }

    fn reset_timer(&mut self) {
        self.timer_start = Instant::now();
    }
}
