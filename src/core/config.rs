//! Engine configuration with documented constants
//!
//! Every rules number that is not part of a lookup table lives here.

use serde::{Deserialize, Serialize};

use crate::core::error::{EngineError, Result};

/// Configuration for the resolution pipelines
///
/// Defaults reproduce the published tabletop rules. Changing them is a
/// house-rule decision, not a tuning knob.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // === TARGET ===
    /// Net situational modifier is clamped to +/- this value
    pub modifier_cap: i32,

    /// Flat bonus applied to every mass-combat target
    pub mass_combat_bonus: i32,

    // === DAMAGE ===
    /// Faces of the righteous fury bonus die (1d5)
    pub righteous_fury_faces: u32,

    /// Faces of the warp conduit psy rating bonus die (1d5)
    pub warp_conduit_faces: u32,

    /// Minimum DoS at which razor sharp (and legacy `X(Y)` penetration) applies
    pub razor_sharp_dos: u32,

    // === SHIPS ===
    /// Flat bonus added to the critical input when the bridge is breached
    pub bridge_critical_bonus: i32,

    /// Divisor applied to structure damage before adding it to the 2d6 roll
    pub critical_damage_divisor: i32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            modifier_cap: 60,
            mass_combat_bonus: 30,

            righteous_fury_faces: 5,
            warp_conduit_faces: 5,
            razor_sharp_dos: 3,

            bridge_critical_bonus: 8,
            critical_damage_divisor: 4,
        }
    }
}

impl EngineConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML; missing keys keep their defaults
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: EngineConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.modifier_cap < 0 {
            return Err(EngineError::Config(format!(
                "modifier_cap ({}) must not be negative",
                self.modifier_cap
            )));
        }

        if self.righteous_fury_faces == 0 || self.warp_conduit_faces == 0 {
            return Err(EngineError::Config("bonus dice need at least one face".into()));
        }

        if self.critical_damage_divisor <= 0 {
            return Err(EngineError::Config(format!(
                "critical_damage_divisor ({}) must be positive",
                self.critical_damage_divisor
            )));
        }

        Ok(())
    }

    /// Clamp a summed modifier into the allowed band
    pub fn clamp_modifier(&self, net: i32) -> i32 {
        net.clamp(-self.modifier_cap, self.modifier_cap)
    }
}

// === GLOBAL CONFIG ACCESS ===

use std::sync::OnceLock;

static CONFIG: OnceLock<EngineConfig> = OnceLock::new();

/// Get the global engine config (initializes with defaults if not set)
pub fn config() -> &'static EngineConfig {
    CONFIG.get_or_init(EngineConfig::default)
}

/// Set the global engine config (can only be called once)
///
/// Returns Err if config was already set.
pub fn set_config(config: EngineConfig) -> std::result::Result<(), EngineConfig> {
    CONFIG.set(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_clamp_modifier() {
        let config = EngineConfig::default();
        assert_eq!(config.clamp_modifier(75), 60);
        assert_eq!(config.clamp_modifier(-90), -60);
        assert_eq!(config.clamp_modifier(-15), -15);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = EngineConfig::from_toml("modifier_cap = 40").unwrap();
        assert_eq!(config.modifier_cap, 40);
        assert_eq!(config.mass_combat_bonus, 30);
    }

    #[test]
    fn test_invalid_divisor_rejected() {
        let result = EngineConfig::from_toml("critical_damage_divisor = 0");
        assert!(matches!(result, Err(EngineError::Config(_))));
    }
}
