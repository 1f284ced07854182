use std::{env, time::Duration};

use ls8_utils::parse_number;
use tracing::warn;

/// Settings fixed when a [`crate::Core`] is constructed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MachineConfig {
    /// Initial value of the interrupt mask register (R5), which filters `INT` requests. Defaults to
    /// both deliverable lines.
    pub interrupt_mask: u8,

    /// How often the timer raises interrupt line 0.
    pub timer_interval: Duration,

    /// Emit a trace line before every instruction, at `TRACE` level.
    pub trace: bool,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            interrupt_mask: 0b11,
            timer_interval: Duration::from_secs(1),
            trace: false,
        }
    }
}

impl MachineConfig {
    /// Reads overrides from `LS8_INTERRUPT_MASK`, `LS8_TIMER_MS` and `LS8_TRACE`.
    ///
    /// Unset or invalid variables keep their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(mask) = parse_var(&lookup, "LS8_INTERRUPT_MASK", parse_number) {
            config.interrupt_mask = mask;
        }
        if let Some(ms) = parse_var(&lookup, "LS8_TIMER_MS", |v| v.parse::<u64>().ok().filter(|&ms| ms > 0)) {
            config.timer_interval = Duration::from_millis(ms);
        }
        if let Some(trace) = parse_var(&lookup, "LS8_TRACE", parse_bool) {
            config.trace = trace;
        }

        config
    }
}

fn parse_var<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> Option<T> {
    let value = lookup(key)?;
    let parsed = parse(value.trim());
    if parsed.is_none() {
        warn!(key, value = %value, "ignoring invalid configuration value");
    }
    parsed
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod test {
    use std::{collections::HashMap, time::Duration};

    use super::MachineConfig;

    fn config_from(vars: &[(&str, &str)]) -> MachineConfig {
        let vars = vars.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>();
        MachineConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        assert_eq!(config_from(&[]), MachineConfig::default());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("LS8_INTERRUPT_MASK", "0b11"),
            ("LS8_TIMER_MS", "250"),
            ("LS8_TRACE", "true"),
        ]);

        assert_eq!(config.interrupt_mask, 0b11);
        assert_eq!(config.timer_interval, Duration::from_millis(250));
        assert!(config.trace);
    }

    #[test]
    fn test_invalid_values_keep_defaults() {
        let config = config_from(&[
            ("LS8_INTERRUPT_MASK", "256"),
            ("LS8_TIMER_MS", "0"),
            ("LS8_TRACE", "maybe"),
        ]);
        assert_eq!(config, MachineConfig::default());
    }
}
