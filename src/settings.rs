//! Game settings and tuning
//!
//! Preferences are read from LocalStorage on the web. Gameplay progress is
//! never stored; only these knobs are.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Shot gesture tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputTuning {
    /// Shot power per pixel of drag
    pub drag_sensitivity: f32,
    /// Power clamp
    pub max_power: f32,
    /// Power meter smoothing per reference frame (0-1)
    pub power_smoothing: f32,
}

impl Default for InputTuning {
    fn default() -> Self {
        Self {
            drag_sensitivity: DRAG_SENSITIVITY,
            max_power: MAX_POWER,
            power_smoothing: POWER_SMOOTHING,
        }
    }
}

/// Ball physics tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsTuning {
    /// Launch speed (units/s) per unit of power
    pub launch_speed_scale: f32,
    /// Speed clamp (units/s)
    pub max_speed: f32,
    /// Energy kept on a wall bounce
    pub restitution: f32,
    /// Extra push-out after resolving a penetration
    pub collision_epsilon: f32,
    /// Descent speed over the hole (units/s)
    pub sink_speed: f32,
    /// Speeds below this snap to zero (units/s)
    pub stop_speed: f32,
    /// Horizontal escape limit for the failsafe
    pub out_of_bounds_limit: f32,
    /// Depth below the surface that counts as an escape
    pub out_of_bounds_depth: f32,
}

impl Default for PhysicsTuning {
    fn default() -> Self {
        Self {
            launch_speed_scale: LAUNCH_SPEED_SCALE,
            max_speed: BALL_MAX_SPEED,
            restitution: RESTITUTION,
            collision_epsilon: COLLISION_EPSILON,
            sink_speed: SINK_SPEED,
            stop_speed: BALL_STOP_SPEED,
            out_of_bounds_limit: OUT_OF_BOUNDS_LIMIT,
            out_of_bounds_depth: OUT_OF_BOUNDS_DEPTH,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub input: InputTuning,
    pub physics: PhysicsTuning,

    // === Audio ===
    /// Sound cues on/off
    pub sound: bool,
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            input: InputTuning::default(),
            physics: PhysicsTuning::default(),
            sound: true,
            master_volume: 0.8,
        }
    }
}

impl Settings {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "mini_golf_settings";

    /// Parse settings; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Settings = serde_json::from_str(json)?;
        settings.master_volume = settings.master_volume.clamp(0.0, 1.0);
        settings.input.power_smoothing = settings.input.power_smoothing.clamp(0.0, 1.0);
        Ok(settings)
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}
