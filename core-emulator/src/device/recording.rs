use std::{io, time::{Duration, Instant}};

use super::Device;

/// Collects console output in memory instead of printing it.
///
/// By default time only moves when [`RecordingDevice::advance`] is called, which makes timer
/// interrupts deterministic. [`RecordingDevice::with_wall_clock`] uses real time instead.
#[derive(Clone, Debug, Default)]
pub struct RecordingDevice {
    pub output: String,
    clock: Clock,
}

#[derive(Clone, Debug)]
enum Clock {
    Manual(Duration),
    Wall(Instant),
}

impl Default for Clock {
    fn default() -> Self {
        Clock::Manual(Duration::ZERO)
    }
}

impl RecordingDevice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_wall_clock() -> Self {
        Self {
            output: String::new(),
            clock: Clock::Wall(Instant::now()),
        }
    }

    /// Moves a manual clock forwards. Has no effect on a wall clock.
    pub fn advance(&mut self, by: Duration) {
        if let Clock::Manual(elapsed) = &mut self.clock {
            *elapsed += by;
        }
    }
}

impl Device for RecordingDevice {
    fn print_number(&mut self, value: u8) -> io::Result<()> {
        self.output.push_str(&format!("{value}\n"));
        Ok(())
    }

    fn print_char(&mut self, value: u8) -> io::Result<()> {
        self.output.push(value as char);
        Ok(())
    }

    fn timer_elapsed(&self) -> Duration {
        match &self.clock {
            Clock::Manual(elapsed) => *elapsed,
            Clock::Wall(start) => start.elapsed(),
        }
    }

    fn reset_timer(&mut self) {
        self.clock = match self.clock {
            Clock::Manual(_) => Clock::Manual(Duration::ZERO),
            Clock::Wall(_) => Clock::Wall(Instant::now()),
        };
    }
}

#[cfg(test)]
mod test {
    use std::time::Duration;

    use super::{Device, RecordingDevice};

    #[test]
    fn test_manual_clock() {
        let mut device = RecordingDevice::new();
        assert_eq!(device.timer_elapsed(), Duration::ZERO);

        device.advance(Duration::from_millis(1500));
        assert_eq!(device.timer_elapsed(), Duration::from_millis(1500));

        device.reset_timer();
        assert_eq!(device.timer_elapsed(), Duration::ZERO);
    }

    #[test]
    fn test_output() {
        let mut device = RecordingDevice::new();
        device.print_number(42).unwrap();
        device.print_char(b'!').unwrap();
        assert_eq!(device.output, "42\n!");
    }
}
