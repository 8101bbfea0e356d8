//! # Bridge Configuration
//!
//! Settings for collision import and export: the per-game collision scale
//! table, user import/export scale factors, tessellation of generated
//! primitives and the tolerances used by the geometry solvers.
//!
//! Every field has a default, so a config file only needs the values it
//! overrides:
//!
//! ```toml
//! import_scale = 1.0
//! export_scale = 1.0
//!
//! [[game_scales]]
//! game = "SKYRIM"
//! scale = 1.0
//!
//! [tessellation]
//! capsule_segments = 24
//! ```

use serde::{Serialize, Deserialize};

use super::Config;
use crate::units::{GameProfile, ScaleTable, UnitConverter};

/// One entry of the per-game collision scale table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GameScale {
    /// Game the factor applies to
    pub game: GameProfile,
    /// Collision scale relative to the engine unit scale
    pub scale: f32,
}

/// Resolution of generated editable meshes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TessellationConfig {
    /// Segments around a sphere
    pub sphere_segments: u32,
    /// Latitude bands of a sphere
    pub sphere_rings: u32,
    /// Segments around a capsule; keep even so every ring has opposite vertices
    pub capsule_segments: u32,
    /// Rings per capsule hemisphere, equator included
    pub capsule_rings: u32,
}

impl Default for TessellationConfig {
    fn default() -> Self {
        Self {
            sphere_segments: 16,
            sphere_rings: 8,
            capsule_segments: 16,
            capsule_rings: 4,
        }
    }
}

/// Numeric tolerances for the inverse geometry solvers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToleranceConfig {
    /// Below this a transform counts as identity (length and radians)
    pub identity: f32,
    /// Plane distance tolerance when collecting a capsule's equator ring
    pub capsule_ring: f32,
    /// Angle (radians) under which two hull face normals are merged
    pub hull_normal_angle: f32,
    /// Plane distance (asset units) under which two hull faces are merged
    pub hull_distance: f32,
}

impl Default for ToleranceConfig {
    fn default() -> Self {
        Self {
            identity: 1e-5,
            capsule_ring: 1e-3,
            hull_normal_angle: 1e-3,
            hull_distance: 1e-4,
        }
    }
}

/// Top-level configuration for the collision bridge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Per-game collision scale factors
    pub game_scales: Vec<GameScale>,
    /// User scale applied on import (asset to scene)
    pub import_scale: f32,
    /// User scale applied on export (scene to asset)
    pub export_scale: f32,
    /// Mesh resolution of generated primitives
    pub tessellation: TessellationConfig,
    /// Solver tolerances
    pub tolerances: ToleranceConfig,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        let game_scales = ScaleTable::default()
            .entries()
            .map(|(game, scale)| GameScale { game, scale })
            .collect();
        Self {
            game_scales,
            import_scale: 1.0,
            export_scale: 1.0,
            tessellation: TessellationConfig::default(),
            tolerances: ToleranceConfig::default(),
        }
    }
}

impl Config for BridgeConfig {}

impl BridgeConfig {
    /// Build the scale table from the configured entries
    pub fn scale_table(&self) -> ScaleTable {
        self.game_scales
            .iter()
            .fold(ScaleTable::empty(), |table, entry| table.with(entry.game, entry.scale))
    }

    /// Unit converter using this configuration's scales
    pub fn unit_converter(&self) -> UnitConverter {
        UnitConverter::new(self.scale_table(), self.import_scale, self.export_scale)
    }
}
