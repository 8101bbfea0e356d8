//! Unit conversion between Havok engine units and scene units
//!
//! Havok lengths are stored in engine units. The scene side works in display
//! units: `scene = asset * ENGINE_UNIT_SCALE * game_scale * import_scale` on
//! the way in, and the inverse (with `export_scale`) on the way out.
//!
//! The game profile is always passed explicitly; nothing here is global.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Serialize, Deserialize};

use crate::error::{BridgeError, BridgeResult};

/// Fixed ratio between asset-file units and Havok engine units
pub const ENGINE_UNIT_SCALE: f32 = 0.1;

/// Games whose assets carry (or explicitly lack) Havok collision data
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum GameProfile {
    /// The Elder Scrolls III (no Havok, never registered by default)
    #[serde(rename = "MORROWIND")]
    Morrowind,
    /// The Elder Scrolls IV
    #[serde(rename = "OBLIVION")]
    Oblivion,
    /// Fallout 3
    #[serde(rename = "FALLOUT_3")]
    Fallout3,
    /// Fallout: New Vegas
    #[serde(rename = "FALLOUT_NV")]
    FalloutNV,
    /// The Elder Scrolls V
    #[serde(rename = "SKYRIM")]
    Skyrim,
    /// The Elder Scrolls V, Special Edition
    #[serde(rename = "SKYRIM_SE")]
    SkyrimSE,
}

impl GameProfile {
    /// Every known profile
    pub const ALL: [Self; 6] = [
        Self::Morrowind,
        Self::Oblivion,
        Self::Fallout3,
        Self::FalloutNV,
        Self::Skyrim,
        Self::SkyrimSE,
    ];

    /// Canonical upper-case name, as used in config files
    pub const fn name(self) -> &'static str {
        match self {
            Self::Morrowind => "MORROWIND",
            Self::Oblivion => "OBLIVION",
            Self::Fallout3 => "FALLOUT_3",
            Self::FalloutNV => "FALLOUT_NV",
            Self::Skyrim => "SKYRIM",
            Self::SkyrimSE => "SKYRIM_SE",
        }
    }
}

impl fmt::Display for GameProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-game collision scale factors
#[derive(Debug, Clone, PartialEq)]
pub struct ScaleTable {
    factors: BTreeMap<GameProfile, f32>,
}

impl Default for ScaleTable {
    fn default() -> Self {
        Self::empty()
            .with(GameProfile::Oblivion, 1.0)
            .with(GameProfile::Fallout3, 1.0)
            .with(GameProfile::FalloutNV, 1.0)
            .with(GameProfile::Skyrim, 1.0)
            .with(GameProfile::SkyrimSE, 1.0)
    }
}

impl ScaleTable {
    /// A table with no registered games
    pub fn empty() -> Self {
        Self { factors: BTreeMap::new() }
    }

    /// Builder pattern: register a game's scale
    #[must_use]
    pub fn with(mut self, game: GameProfile, scale: f32) -> Self {
        self.factors.insert(game, scale);
        self
    }

    /// Registered scale for a game
    pub fn get(&self, game: GameProfile) -> Option<f32> {
        self.factors.get(&game).copied()
    }

    /// All registered entries in profile order
    pub fn entries(&self) -> impl Iterator<Item = (GameProfile, f32)> + '_ {
        self.factors.iter().map(|(game, scale)| (*game, *scale))
    }
}

/// Converts lengths between asset and scene units
#[derive(Debug, Clone, PartialEq)]
pub struct UnitConverter {
    table: ScaleTable,
    import_scale: f32,
    export_scale: f32,
}

impl Default for UnitConverter {
    fn default() -> Self {
        Self::new(ScaleTable::default(), 1.0, 1.0)
    }
}

impl UnitConverter {
    /// Create a converter from a scale table and the user scale factors
    pub fn new(table: ScaleTable, import_scale: f32, export_scale: f32) -> Self {
        Self {
            table,
            import_scale,
            export_scale,
        }
    }

    /// `ENGINE_UNIT_SCALE * game_scale`
    pub fn effective_scale(&self, game: GameProfile) -> BridgeResult<f32> {
        self.table
            .get(game)
            .map(|scale| ENGINE_UNIT_SCALE * scale)
            .ok_or(BridgeError::UnknownGameProfile(game))
    }

    /// Multiplier applied to asset lengths on import
    pub fn import_factor(&self, game: GameProfile) -> BridgeResult<f32> {
        Ok(self.effective_scale(game)? * self.import_scale)
    }

    /// Divisor applied to scene lengths on export
    pub fn export_factor(&self, game: GameProfile) -> BridgeResult<f32> {
        Ok(self.effective_scale(game)? * self.export_scale)
    }

    /// Asset length to scene length
    pub fn decode_length(&self, game: GameProfile, length: f32) -> BridgeResult<f32> {
        Ok(length * self.import_factor(game)?)
    }

    /// Scene length to asset length
    pub fn encode_length(&self, game: GameProfile, length: f32) -> BridgeResult<f32> {
        Ok(length / self.export_factor(game)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_effective_scale_is_deterministic() {
        let converter = UnitConverter::default();
        let first = converter.effective_scale(GameProfile::Skyrim).unwrap();
        for _ in 0..10 {
            assert_eq!(converter.effective_scale(GameProfile::Skyrim).unwrap(), first);
        }
        assert_relative_eq!(first, 0.1);
    }

    #[test]
    fn test_unregistered_game_fails() {
        let converter = UnitConverter::default();
        assert_eq!(
            converter.effective_scale(GameProfile::Morrowind),
            Err(BridgeError::UnknownGameProfile(GameProfile::Morrowind))
        );

        let empty = UnitConverter::new(ScaleTable::empty(), 1.0, 1.0);
        for game in GameProfile::ALL {
            assert!(empty.decode_length(game, 1.0).is_err());
        }
    }

    #[test]
    fn test_import_and_export_factors() {
        let table = ScaleTable::empty().with(GameProfile::Oblivion, 7.0);
        let converter = UnitConverter::new(table, 2.0, 0.5);

        assert_relative_eq!(converter.effective_scale(GameProfile::Oblivion).unwrap(), 0.7, epsilon = 1e-6);
        assert_relative_eq!(converter.decode_length(GameProfile::Oblivion, 10.0).unwrap(), 14.0, epsilon = 1e-5);
        assert_relative_eq!(converter.encode_length(GameProfile::Oblivion, 0.35).unwrap(), 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_symmetric_scales_round_trip() {
        let converter = UnitConverter::new(ScaleTable::default(), 1.5, 1.5);
        let scene = converter.decode_length(GameProfile::SkyrimSE, 42.0).unwrap();
        assert_relative_eq!(converter.encode_length(GameProfile::SkyrimSE, scene).unwrap(), 42.0, epsilon = 1e-4);
    }
}
