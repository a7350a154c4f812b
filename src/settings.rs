//! Game tuning and world layout
//!
//! Loaded from JSON. Every section is optional and falls back to the defaults
//! in [`crate::consts`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SimError;
use crate::sim::{BodyParams, ReptileTuning, SpriteSize};

/// Play field extents in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldSettings {
    pub width: i32,
    pub height: i32,
}

impl Default for FieldSettings {
    fn default() -> Self {
        Self {
            width: FIELD_WIDTH,
            height: FIELD_HEIGHT,
        }
    }
}

/// Native sprite sizes; the only thing the core needs from the visual resources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpriteSettings {
    pub crate_sprite: SpriteSize,
    pub reptile_sprite: SpriteSize,
}

impl Default for SpriteSettings {
    fn default() -> Self {
        Self {
            crate_sprite: SpriteSize::new(CRATE_SPRITE_SIZE.0, CRATE_SPRITE_SIZE.1),
            reptile_sprite: SpriteSize::new(REPTILE_SPRITE_SIZE.0, REPTILE_SPRITE_SIZE.1),
        }
    }
}

/// Where and how fast the reptile re-enters after coming to rest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnSettings {
    /// Offset from the spawn edge
    pub left: i32,
    pub bottom: i32,
    /// Velocity when spawning from the left edge (mirrored on the right)
    pub vx: i32,
    pub vy: i32,
}

impl Default for SpawnSettings {
    fn default() -> Self {
        Self {
            left: SPAWN_LEFT_OFFSET,
            bottom: SPAWN_BOTTOM_OFFSET,
            vx: SPAWN_VELOCITY.0,
            vy: SPAWN_VELOCITY.1,
        }
    }
}

/// Per-respawn difficulty escalation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultySettings {
    /// Added to both horizontal speed bounds on every respawn
    pub speed_step: u32,
    /// Upper bound the max horizontal speed never exceeds
    pub max_speed_cap: u32,
    /// Falling ticks before a respawn is forced even if the reptile never settles
    pub max_dead_ticks: u32,
}

impl Default for DifficultySettings {
    fn default() -> Self {
        Self {
            speed_step: SPEED_ESCALATION,
            max_speed_cap: MAX_SPEED_CAP,
            max_dead_ticks: MAX_DEAD_TICKS,
        }
    }
}

/// One crate in the initial layout
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CrateLayout {
    pub left: i32,
    pub bottom: i32,
    /// Overrides for special crates
    #[serde(default)]
    pub params: Option<BodyParams>,
}

impl CrateLayout {
    pub const fn at(left: i32, bottom: i32) -> Self {
        Self {
            left,
            bottom,
            params: None,
        }
    }
}

/// Default platform: a small pyramid with a heavy crate at the base
fn default_crates() -> Vec<CrateLayout> {
    let heavy = BodyParams {
        weight: 15,
        force_given: 0.9,
        scale: 0.4,
        ..BodyParams::crate_defaults()
    };
    vec![
        CrateLayout::at(700, 0),
        CrateLayout::at(738, 0),
        CrateLayout::at(776, 0),
        CrateLayout::at(719, 38),
        CrateLayout::at(757, 38),
        CrateLayout::at(738, 76),
        CrateLayout {
            left: 950,
            bottom: 0,
            params: Some(heavy),
        },
    ]
}

/// Complete simulation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub field: FieldSettings,
    pub sprites: SpriteSettings,
    pub crate_body: BodyParams,
    pub reptile_body: BodyParams,
    pub reptile: ReptileTuning,
    pub spawn: SpawnSettings,
    pub difficulty: DifficultySettings,
    pub crates: Vec<CrateLayout>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            field: FieldSettings::default(),
            sprites: SpriteSettings::default(),
            crate_body: BodyParams::crate_defaults(),
            reptile_body: BodyParams::reptile_defaults(),
            reptile: ReptileTuning::default(),
            spawn: SpawnSettings::default(),
            difficulty: DifficultySettings::default(),
            crates: default_crates(),
        }
    }
}

impl Settings {
    /// Parse and validate settings from JSON
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| SimError::SettingsIo {
            path: path.display().to_string(),
            source,
        })?;
        let settings = Self::from_json(&json)?;
        log::info!(
            "Loaded settings from {} ({} crates)",
            path.display(),
            settings.crates.len()
        );
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SimError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check everything that would otherwise only fail when the world is built
    pub fn validate(&self) -> Result<(), SimError> {
        if self.field.width <= 0 || self.field.height <= 0 {
            return Err(SimError::invalid(
                "field",
                format!("empty play field {}x{}", self.field.width, self.field.height),
            ));
        }
        self.crate_body.normalized()?;
        self.reptile_body.normalized()?;
        for layout in &self.crates {
            if let Some(params) = layout.params {
                params.normalized()?;
            }
        }
        self.reptile.validate()?;
        if self.difficulty.max_speed_cap < self.reptile.max_x_speed {
            return Err(SimError::invalid(
                "max_speed_cap",
                "must be at least the initial max_x_speed",
            ));
        }
        Ok(())
    }
}
