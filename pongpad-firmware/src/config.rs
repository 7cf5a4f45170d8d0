//! Compiled-in controller configuration
//!
//! The constants are generated by build.rs from controller.toml after
//! validation; this module turns them into the core config types.

use pongpad_core::config::{DisplayGeometry, Endpoint, InputTuning, SessionConfig};
use pongpad_core::game::Side;

include!(concat!(env!("OUT_DIR"), "/controller_config.rs"));

/// Game server address
pub fn endpoint() -> Endpoint {
    Endpoint {
        host: SERVER_HOST,
        port: SERVER_PORT,
    }
}

/// Session policy
pub fn session() -> SessionConfig {
    SessionConfig {
        player_name: PLAYER_NAME,
        local_side: LOCAL_SIDE,
        winning_score: WINNING_SCORE,
        frame_timeout_ms: FRAME_TIMEOUT_MS,
        lobby_tick_ms: LOBBY_TICK_MS,
        join_timeout_ms: JOIN_TIMEOUT_MS,
        max_consecutive_faults: MAX_CONSECUTIVE_FAULTS,
    }
}

/// Joystick shaping
pub fn input_tuning() -> InputTuning {
    InputTuning {
        max_step: MAX_STEP,
        initial_target: INITIAL_TARGET,
        ..InputTuning::default()
    }
}

/// Panel geometry (SSD1306 128x64)
pub fn geometry() -> DisplayGeometry {
    DisplayGeometry::default()
}
