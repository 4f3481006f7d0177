//! Build script for exposync-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates timer.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    println!("cargo:rustc-link-search={}", out_dir.display());
    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate timer.toml at compile time
///
/// The firmware parses the same file with its own minimal parser at boot and
/// falls back to defaults on error; catching mistakes here keeps that
/// fallback a development-only path.
fn validate_config() {
    println!("cargo:rerun-if-changed=timer.toml");

    let config_path = Path::new("timer.toml");
    if !config_path.exists() {
        fail(
            "timer.toml not found",
            &["The firmware embeds timer.toml; create one next to Cargo.toml."],
        );
    }

    let content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => fail("Failed to read timer.toml", &[e.to_string().as_str()]),
    };

    let config: toml::Value = match toml::from_str(&content) {
        Ok(value) => value,
        Err(e) => {
            let msg = e.to_string();
            let lines: Vec<&str> = msg.lines().collect();
            fail("Invalid TOML syntax in timer.toml", &lines)
        }
    };

    let mut errors = Vec::new();
    validate_gps(&config, &mut errors);
    validate_exposure(&config, &mut errors);
    validate_pins(&config, &mut errors);
    reject_unknown(&config, &mut errors);

    if !errors.is_empty() {
        let lines: Vec<&str> = errors.iter().map(String::as_str).collect();
        fail("Invalid timer.toml configuration", &lines);
    }

    println!("cargo:warning=timer.toml validated successfully");
}

const SECTIONS: &[(&str, &[&str])] = &[
    (
        "gps",
        &["baudrate", "watchdog_timeout_ms", "configure_binary", "configure_text"],
    ),
    ("exposure", &["length_s", "trigger_pulse_ms"]),
    ("pins", &["gps_tx", "gps_rx", "pps", "trigger"]),
];

/// Highest GPIO number on the RP2040
const MAX_GPIO: i64 = 29;

fn section<'a>(config: &'a toml::Value, name: &str) -> Option<&'a toml::value::Table> {
    config.get(name).and_then(|s| s.as_table())
}

fn check_int(
    table: &toml::value::Table,
    section: &str,
    key: &str,
    range: std::ops::RangeInclusive<i64>,
    errors: &mut Vec<String>,
) {
    match table.get(key) {
        None => {}
        Some(toml::Value::Integer(v)) if range.contains(v) => {}
        Some(toml::Value::Integer(_)) => errors.push(format!(
            "[{}] {} must be {}-{}",
            section,
            key,
            range.start(),
            range.end()
        )),
        Some(_) => errors.push(format!("[{}] {} must be an integer", section, key)),
    }
}

fn check_bool(table: &toml::value::Table, section: &str, key: &str, errors: &mut Vec<String>) {
    if let Some(v) = table.get(key) {
        if !v.is_bool() {
            errors.push(format!("[{}] {} must be true or false", section, key));
        }
    }
}

fn validate_gps(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(gps) = section(config, "gps") else {
        return;
    };
    check_int(gps, "gps", "baudrate", 1..=u32::MAX as i64, errors);
    check_int(gps, "gps", "watchdog_timeout_ms", 1..=u32::MAX as i64, errors);
    check_bool(gps, "gps", "configure_binary", errors);
    check_bool(gps, "gps", "configure_text", errors);
}

fn validate_exposure(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(exposure) = section(config, "exposure") else {
        return;
    };
    check_int(exposure, "exposure", "length_s", 0..=u16::MAX as i64, errors);
    check_int(
        exposure,
        "exposure",
        "trigger_pulse_ms",
        1..=u32::MAX as i64,
        errors,
    );
}

fn validate_pins(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(pins) = section(config, "pins") else {
        return;
    };

    let mut seen: Vec<(i64, &str)> = Vec::new();
    for (key, value) in pins {
        let pin = match value {
            toml::Value::Integer(n) => Some(*n),
            toml::Value::String(s) => s.strip_prefix("gpio").and_then(|n| n.parse().ok()),
            _ => None,
        };
        match pin {
            Some(n) if (0..=MAX_GPIO).contains(&n) => {
                if let Some((_, other)) = seen.iter().find(|(p, _)| *p == n) {
                    errors.push(format!("[pins] {} and {} both use gpio{}", other, key, n));
                }
                seen.push((n, key.as_str()));
            }
            _ => errors.push(format!(
                "[pins] {} must be \"gpio0\"-\"gpio{}\"",
                key, MAX_GPIO
            )),
        }
    }
}

fn reject_unknown(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(root) = config.as_table() else {
        return;
    };
    for (name, value) in root {
        let Some((_, keys)) = SECTIONS.iter().find(|(s, _)| *s == name.as_str()) else {
            errors.push(format!("Unknown section [{}]", name));
            continue;
        };
        let Some(table) = value.as_table() else {
            errors.push(format!("[{}] must be a table", name));
            continue;
        };
        for key in table.keys() {
            if !keys.contains(&key.as_str()) {
                errors.push(format!("[{}] unknown key '{}'", name, key));
            }
        }
    }
}

/// Abort the build with a boxed error message
fn fail(title: &str, lines: &[&str]) -> ! {
    let body = lines
        .iter()
        .map(|line| {
            let truncated = if line.len() > 62 {
                format!("{}...", &line[..59])
            } else {
                line.to_string()
            };
            format!("║  • {:<62} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n");
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title, body
    );
}
