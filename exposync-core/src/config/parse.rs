//! Minimal TOML parser for the timer configuration
//!
//! Handles only the subset `timer.toml` needs and never allocates.
//!
//! Supported:
//! - `[section]` headers
//! - `key = value` pairs (integer, boolean, quoted string)
//! - Comments (`# ...`), whole-line or trailing
//!
//! Anything else, including keys this firmware doesn't know, is an error
//! carrying the 1-based line number.

use super::types::TimerConfig;

/// Highest GPIO number on the board
const MAX_GPIO: u8 = 29;

/// What went wrong
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigErrorKind {
    /// Malformed `[section]` header
    InvalidSection,
    /// Section name not recognized
    UnknownSection,
    /// Key not recognized in its section
    UnknownKey,
    /// Line is neither a header nor `key = value`
    Syntax,
    /// Value has the wrong type or is out of range
    InvalidValue,
    /// Pin is not `gpioN` or a GPIO number
    InvalidPin,
}

/// Parse error with location
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConfigError {
    /// 1-based line number
    pub line: usize,
    pub kind: ConfigErrorKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Gps,
    Exposure,
    Pins,
}

/// Parse configuration text
///
/// Keys that are absent keep their default values.
pub fn parse_config(input: &str) -> Result<TimerConfig, ConfigError> {
    let mut config = TimerConfig::default();
    let mut section = Section::Root;

    for (index, line) in input.lines().enumerate() {
        let at = |kind| ConfigError {
            line: index + 1,
            kind,
        };
        let line = strip_comment(line).trim();
        if line.is_empty() {
            continue;
        }

        if line.starts_with('[') {
            section = parse_section_header(line).map_err(at)?;
            continue;
        }

        let (key, value) = parse_key_value(line).ok_or(at(ConfigErrorKind::Syntax))?;
        apply_value(&mut config, section, key, value).map_err(at)?;
    }

    Ok(config)
}

/// Drop a trailing comment unless the `#` is inside a string
fn strip_comment(line: &str) -> &str {
    let mut in_string = false;
    for (i, c) in line.char_indices() {
        match c {
            '"' => in_string = !in_string,
            '#' if !in_string => return &line[..i],
            _ => {}
        }
    }
    line
}

fn parse_section_header(line: &str) -> Result<Section, ConfigErrorKind> {
    let name = line
        .strip_prefix('[')
        .and_then(|l| l.strip_suffix(']'))
        .ok_or(ConfigErrorKind::InvalidSection)?
        .trim();
    match name {
        "gps" => Ok(Section::Gps),
        "exposure" => Ok(Section::Exposure),
        "pins" => Ok(Section::Pins),
        "" => Err(ConfigErrorKind::InvalidSection),
        _ => Err(ConfigErrorKind::UnknownSection),
    }
}

fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    let value = value.trim();
    if key.is_empty() || value.is_empty() {
        return None;
    }
    Some((key, value))
}

fn apply_value(
    config: &mut TimerConfig,
    section: Section,
    key: &str,
    value: &str,
) -> Result<(), ConfigErrorKind> {
    match (section, key) {
        (Section::Gps, "baudrate") => config.gps.baudrate = parse_nonzero(value)?,
        (Section::Gps, "watchdog_timeout_ms") => {
            config.gps.watchdog_timeout_ms = parse_nonzero(value)?
        }
        (Section::Gps, "configure_binary") => config.gps.configure_binary = parse_bool(value)?,
        (Section::Gps, "configure_text") => config.gps.configure_text = parse_bool(value)?,

        (Section::Exposure, "length_s") => config.exposure.length_s = parse_int(value)?,
        (Section::Exposure, "trigger_pulse_ms") => {
            config.exposure.trigger_pulse_ms = parse_nonzero(value)?
        }

        (Section::Pins, "gps_tx") => config.pins.gps_tx = parse_pin(value)?,
        (Section::Pins, "gps_rx") => config.pins.gps_rx = parse_pin(value)?,
        (Section::Pins, "pps") => config.pins.pps = parse_pin(value)?,
        (Section::Pins, "trigger") => config.pins.trigger = parse_pin(value)?,

        _ => return Err(ConfigErrorKind::UnknownKey),
    }
    Ok(())
}

/// Parse a string value (removes quotes)
fn parse_string(value: &str) -> Result<&str, ConfigErrorKind> {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .ok_or(ConfigErrorKind::InvalidValue)
}

fn parse_int<T: core::str::FromStr>(value: &str) -> Result<T, ConfigErrorKind> {
    value.parse().map_err(|_| ConfigErrorKind::InvalidValue)
}

fn parse_nonzero(value: &str) -> Result<u32, ConfigErrorKind> {
    match parse_int(value)? {
        0 => Err(ConfigErrorKind::InvalidValue),
        n => Ok(n),
    }
}

fn parse_bool(value: &str) -> Result<bool, ConfigErrorKind> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ConfigErrorKind::InvalidValue),
    }
}

/// Parse a pin like `"gpio11"` or `11`
fn parse_pin(value: &str) -> Result<u8, ConfigErrorKind> {
    let number = match parse_string(value) {
        Ok(s) => s.strip_prefix("gpio").ok_or(ConfigErrorKind::InvalidPin)?,
        Err(_) => value,
    };
    let pin: u8 = number.parse().map_err(|_| ConfigErrorKind::InvalidPin)?;
    if pin > MAX_GPIO {
        return Err(ConfigErrorKind::InvalidPin);
    }
    Ok(pin)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
# Exposure timer configuration

[gps]
baudrate = 9600
watchdog_timeout_ms = 4000   # serial silence
configure_binary = true
configure_text = false

[exposure]
length_s = 30
trigger_pulse_ms = 20

[pins]
gps_tx = "gpio4"
gps_rx = "gpio5"
pps = 6
trigger = "gpio15"
"#;

    #[test]
    fn test_parse_full_config() {
        let config = parse_config(SAMPLE).unwrap();
        assert_eq!(config.gps.baudrate, 9600);
        assert_eq!(config.gps.watchdog_timeout_ms, 4000);
        assert!(config.gps.configure_binary);
        assert!(!config.gps.configure_text);
        assert_eq!(config.exposure.length_s, 30);
        assert_eq!(config.exposure.trigger_pulse_ms, 20);
        assert_eq!(config.pins.gps_tx, 4);
        assert_eq!(config.pins.gps_rx, 5);
        assert_eq!(config.pins.pps, 6);
        assert_eq!(config.pins.trigger, 15);
    }

    #[test]
    fn test_empty_input_is_default() {
        assert_eq!(parse_config("").unwrap(), TimerConfig::default());
        assert_eq!(parse_config("# nothing\n\n").unwrap(), TimerConfig::default());
    }

    #[test]
    fn test_partial_section_keeps_defaults() {
        let config = parse_config("[exposure]\nlength_s = 60\n").unwrap();
        assert_eq!(config.exposure.length_s, 60);
        assert_eq!(config.exposure.trigger_pulse_ms, 10);
        assert_eq!(config.gps, Default::default());
    }

    #[test]
    fn test_unknown_key_reports_line() {
        let err = parse_config("[gps]\nbaudrate = 9600\nparity = \"none\"\n").unwrap_err();
        assert_eq!(
            err,
            ConfigError {
                line: 3,
                kind: ConfigErrorKind::UnknownKey
            }
        );
    }

    #[test]
    fn test_key_outside_section_rejected() {
        let err = parse_config("length_s = 10").unwrap_err();
        assert_eq!(err.kind, ConfigErrorKind::UnknownKey);
    }

    #[test]
    fn test_bad_values() {
        let cases = [
            ("[gps]\nbaudrate = fast", ConfigErrorKind::InvalidValue),
            ("[gps]\nbaudrate = 0", ConfigErrorKind::InvalidValue),
            ("[gps]\nconfigure_text = yes", ConfigErrorKind::InvalidValue),
            ("[exposure]\nlength_s = 70000", ConfigErrorKind::InvalidValue),
            ("[pins]\npps = \"pin6\"", ConfigErrorKind::InvalidPin),
            ("[pins]\npps = 30", ConfigErrorKind::InvalidPin),
            ("[timing]", ConfigErrorKind::UnknownSection),
            ("[gps", ConfigErrorKind::InvalidSection),
            ("[gps]\nbaudrate", ConfigErrorKind::Syntax),
        ];
        for (input, kind) in cases {
            assert_eq!(parse_config(input).unwrap_err().kind, kind, "{input}");
        }
    }

    #[test]
    fn test_hash_inside_string_kept() {
        assert_eq!(strip_comment("a = \"x#y\" # c"), "a = \"x#y\" ");
    }
}
