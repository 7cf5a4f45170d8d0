//! Build script for pongpad-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates controller.toml at compile time
//! - Generates the configuration constants used by the firmware

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Longest server host name accepted (fits one AT+CIPSTART line)
const MAX_HOST_LEN: usize = 64;
/// Longest player name accepted on the wire
const MAX_NAME_LEN: usize = 32;
/// Highest legal paddle position on a 128x64 panel with 16 px paddles
const MAX_PADDLE_Y: i64 = 48;

fn main() {
    setup_linker();
    let config = validate_config();
    generate_constants(&config);
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validated controller settings
struct ControllerConfig {
    host: String,
    port: u16,
    name: String,
    side: &'static str,
    winning_score: u8,
    frame_timeout_ms: u32,
    lobby_tick_ms: u32,
    join_timeout_ms: u32,
    max_consecutive_faults: u8,
    max_step: f64,
    initial_target: i16,
}

/// Print a boxed error and abort the build
fn fail(title: &str, errors: &[String]) -> ! {
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title,
        errors
            .iter()
            .map(|e| format!("║  • {:<62} ║", e))
            .collect::<Vec<_>>()
            .join("\n")
    );
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> Vec<String> {
    msg.lines()
        .map(|line| {
            if line.len() > 61 {
                format!("{}...", &line[..58])
            } else {
                line.to_string()
            }
        })
        .collect()
}

/// Validate controller.toml configuration at compile time
fn validate_config() -> ControllerConfig {
    // Re-run if controller.toml changes
    println!("cargo:rerun-if-changed=controller.toml");

    let config_path = Path::new("controller.toml");

    // Check if config file exists
    if !config_path.exists() {
        fail(
            "controller.toml not found!",
            &[
                "The firmware requires a controller.toml configuration file.".to_string(),
                "Please create one in the pongpad-firmware directory.".to_string(),
            ],
        );
    }

    // Read the config file
    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => fail("Failed to read controller.toml", &[e.to_string()]),
    };

    // Parse and validate TOML syntax
    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => fail(
            "Invalid TOML syntax in controller.toml",
            &format_error_lines(&e.to_string()),
        ),
    };

    let mut errors = Vec::new();

    for section in ["server", "player", "game", "timing", "input"] {
        if !matches!(config.get(section), Some(toml::Value::Table(_))) {
            errors.push(format!("Missing [{}] section", section));
        }
    }
    if !errors.is_empty() {
        fail("Missing required sections in controller.toml", &errors);
    }

    let host = string(&config, "server", "host", &mut errors);
    let port = integer(&config, "server", "port", 1, 65_535, &mut errors);
    let name = string(&config, "player", "name", &mut errors);
    let side = string(&config, "player", "side", &mut errors);
    let winning_score = integer(&config, "game", "winning_score", 1, 255, &mut errors);
    let frame_timeout_ms = integer(&config, "timing", "frame_timeout_ms", 1, 60_000, &mut errors);
    let lobby_tick_ms = integer(&config, "timing", "lobby_tick_ms", 1, 10_000, &mut errors);
    let join_timeout_ms =
        integer(&config, "timing", "join_timeout_ms", 1, 3_600_000, &mut errors);
    let max_consecutive_faults =
        integer(&config, "timing", "max_consecutive_faults", 1, 255, &mut errors);
    let max_step = float(&config, "input", "max_step", &mut errors);
    let initial_target = integer(&config, "input", "initial_target", 0, MAX_PADDLE_Y, &mut errors);

    if host.is_empty() || host.len() > MAX_HOST_LEN {
        errors.push(format!("[server] host must be 1-{} characters", MAX_HOST_LEN));
    }
    if host.contains('"') || host.contains(',') {
        errors.push("[server] host must not contain quotes or commas".to_string());
    }
    if name.is_empty() || name.len() > MAX_NAME_LEN {
        errors.push(format!("[player] name must be 1-{} characters", MAX_NAME_LEN));
    }
    if !name.chars().all(|c| c.is_ascii_graphic() && c != '"' && c != '\\') {
        errors.push("[player] name must be printable ASCII without quotes".to_string());
    }
    let side = match side.as_str() {
        "left" => "Left",
        "right" => "Right",
        _ => {
            errors.push("[player] side must be 'left' or 'right'".to_string());
            "Left"
        }
    };
    if !(max_step > 0.0 && max_step <= MAX_PADDLE_Y as f64) {
        errors.push(format!("[input] max_step must be in (0, {}]", MAX_PADDLE_Y));
    }
    if lobby_tick_ms > join_timeout_ms {
        errors.push("[timing] lobby_tick_ms must not exceed join_timeout_ms".to_string());
    }

    if !errors.is_empty() {
        fail("Invalid controller configuration", &errors);
    }

    println!("cargo:warning=controller.toml validated successfully");

    // Ranges were checked above, so the narrowing casts are exact
    ControllerConfig {
        host,
        port: port as u16,
        name,
        side,
        winning_score: winning_score as u8,
        frame_timeout_ms: frame_timeout_ms as u32,
        lobby_tick_ms: lobby_tick_ms as u32,
        join_timeout_ms: join_timeout_ms as u32,
        max_consecutive_faults: max_consecutive_faults as u8,
        max_step,
        initial_target: initial_target as i16,
    }
}

fn value<'a>(config: &'a toml::Value, section: &str, key: &str) -> Option<&'a toml::Value> {
    config.get(section).and_then(|s| s.get(key))
}

/// Read a required string
fn string(config: &toml::Value, section: &str, key: &str, errors: &mut Vec<String>) -> String {
    match value(config, section, key) {
        Some(toml::Value::String(s)) => s.clone(),
        Some(_) => {
            errors.push(format!("[{}] {} must be a string", section, key));
            String::new()
        }
        None => {
            errors.push(format!("[{}] missing '{}'", section, key));
            String::new()
        }
    }
}

/// Read a required integer within `min..=max`
fn integer(
    config: &toml::Value,
    section: &str,
    key: &str,
    min: i64,
    max: i64,
    errors: &mut Vec<String>,
) -> i64 {
    match value(config, section, key) {
        Some(toml::Value::Integer(n)) if (min..=max).contains(n) => *n,
        Some(toml::Value::Integer(_)) => {
            errors.push(format!("[{}] {} must be {}-{}", section, key, min, max));
            min
        }
        Some(_) => {
            errors.push(format!("[{}] {} must be an integer", section, key));
            min
        }
        None => {
            errors.push(format!("[{}] missing '{}'", section, key));
            min
        }
    }
}

/// Read a required number (integers are accepted)
fn float(config: &toml::Value, section: &str, key: &str, errors: &mut Vec<String>) -> f64 {
    match value(config, section, key) {
        Some(toml::Value::Float(f)) => *f,
        Some(toml::Value::Integer(n)) => *n as f64,
        Some(_) => {
            errors.push(format!("[{}] {} must be a number", section, key));
            0.0
        }
        None => {
            errors.push(format!("[{}] missing '{}'", section, key));
            0.0
        }
    }
}

/// Write the validated settings as Rust constants into OUT_DIR
fn generate_constants(config: &ControllerConfig) {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let mut f = File::create(out_dir.join("controller_config.rs")).unwrap();

    writeln!(f, "// Generated from controller.toml by build.rs").unwrap();
    writeln!(f, "pub const SERVER_HOST: &str = {:?};", config.host).unwrap();
    writeln!(f, "pub const SERVER_PORT: u16 = {};", config.port).unwrap();
    writeln!(f, "pub const PLAYER_NAME: &str = {:?};", config.name).unwrap();
    writeln!(f, "pub const LOCAL_SIDE: Side = Side::{};", config.side).unwrap();
    writeln!(f, "pub const WINNING_SCORE: u8 = {};", config.winning_score).unwrap();
    writeln!(f, "pub const FRAME_TIMEOUT_MS: u32 = {};", config.frame_timeout_ms).unwrap();
    writeln!(f, "pub const LOBBY_TICK_MS: u32 = {};", config.lobby_tick_ms).unwrap();
    writeln!(f, "pub const JOIN_TIMEOUT_MS: u32 = {};", config.join_timeout_ms).unwrap();
    writeln!(
        f,
        "pub const MAX_CONSECUTIVE_FAULTS: u8 = {};",
        config.max_consecutive_faults
    )
    .unwrap();
    writeln!(f, "pub const MAX_STEP: f32 = {:?};", config.max_step).unwrap();
    writeln!(f, "pub const INITIAL_TARGET: i16 = {};", config.initial_target).unwrap();
}
