//! Havok enum and material tables
//!
//! Raw values as stored in the asset, paired with the names shown on the
//! scene side.

use crate::foundation::collections::NamedValues;
use crate::units::GameProfile;

/// hkMotionType
pub mod motion_system {
    use super::NamedValues;

    /// Keyframed motion
    pub const KEYFRAMED: u8 = 6;
    /// Static object
    pub const FIXED: u8 = 7;

    /// Name table
    pub const TABLE: NamedValues<u8> = NamedValues::new(
        "motion system",
        &[
            (0, "MO_SYS_INVALID"),
            (1, "MO_SYS_DYNAMIC"),
            (2, "MO_SYS_SPHERE_INERTIA"),
            (3, "MO_SYS_SPHERE_STABILIZED"),
            (4, "MO_SYS_BOX_INERTIA"),
            (5, "MO_SYS_BOX_STABILIZED"),
            (KEYFRAMED, "MO_SYS_KEYFRAMED"),
            (FIXED, "MO_SYS_FIXED"),
            (8, "MO_SYS_THIN_BOX"),
            (9, "MO_SYS_CHARACTER"),
        ],
    );
}

/// hkQualityType
pub mod quality_type {
    use super::NamedValues;

    /// Static object
    pub const FIXED: u8 = 1;

    /// Name table
    pub const TABLE: NamedValues<u8> = NamedValues::new(
        "quality type",
        &[
            (0, "MO_QUAL_INVALID"),
            (FIXED, "MO_QUAL_FIXED"),
            (2, "MO_QUAL_KEYFRAMED"),
            (3, "MO_QUAL_DEBRIS"),
            (4, "MO_QUAL_MOVING"),
            (5, "MO_QUAL_CRITICAL"),
            (6, "MO_QUAL_BULLET"),
            (7, "MO_QUAL_USER"),
            (8, "MO_QUAL_CHARACTER"),
            (9, "MO_QUAL_KEYFRAMED_REPORT"),
        ],
    );
}

/// Broad-phase type
pub mod broad_phase {
    use super::NamedValues;

    /// Regular entity
    pub const ENTITY: u8 = 1;

    /// Name table
    pub const TABLE: NamedValues<u8> = NamedValues::new(
        "broad phase",
        &[
            (0, "BROAD_PHASE_INVALID"),
            (ENTITY, "BROAD_PHASE_ENTITY"),
            (2, "BROAD_PHASE_PHANTOM"),
            (3, "BROAD_PHASE_BORDER"),
        ],
    );
}

/// hkDeactivatorType
pub mod deactivator_type {
    use super::NamedValues;

    /// Never deactivates
    pub const NEVER: u8 = 1;

    /// Name table
    pub const TABLE: NamedValues<u8> = NamedValues::new(
        "deactivator type",
        &[
            (0, "DEACTIVATOR_INVALID"),
            (NEVER, "DEACTIVATOR_NEVER"),
            (2, "DEACTIVATOR_SPATIAL"),
        ],
    );
}

/// hkSolverDeactivation
pub mod solver_deactivation {
    use super::NamedValues;

    /// Deactivation off
    pub const OFF: u8 = 1;

    /// Name table
    pub const TABLE: NamedValues<u8> = NamedValues::new(
        "solver deactivation",
        &[
            (0, "SOLVER_DEACTIVATION_INVALID"),
            (OFF, "SOLVER_DEACTIVATION_OFF"),
            (2, "SOLVER_DEACTIVATION_LOW"),
            (3, "SOLVER_DEACTIVATION_MEDIUM"),
            (4, "SOLVER_DEACTIVATION_HIGH"),
            (5, "SOLVER_DEACTIVATION_MAX"),
        ],
    );
}

/// hkResponseType
pub mod collision_response {
    use super::NamedValues;

    /// Plain contact response
    pub const SIMPLE_CONTACT: u8 = 1;

    /// Name table
    pub const TABLE: NamedValues<u8> = NamedValues::new(
        "collision response",
        &[
            (0, "RESPONSE_INVALID"),
            (SIMPLE_CONTACT, "RESPONSE_SIMPLE_CONTACT"),
            (2, "RESPONSE_REPORTING"),
            (3, "RESPONSE_NONE"),
        ],
    );
}

/// Oblivion physics materials
pub const OBLIVION_MATERIALS: NamedValues<u32> = NamedValues::new(
    "oblivion material",
    &[
        (0, "OB_HAV_MAT_STONE"),
        (1, "OB_HAV_MAT_CLOTH"),
        (2, "OB_HAV_MAT_DIRT"),
        (3, "OB_HAV_MAT_GLASS"),
        (4, "OB_HAV_MAT_GRASS"),
        (5, "OB_HAV_MAT_METAL"),
        (6, "OB_HAV_MAT_ORGANIC"),
        (7, "OB_HAV_MAT_SKIN"),
        (8, "OB_HAV_MAT_WATER"),
        (9, "OB_HAV_MAT_WOOD"),
        (10, "OB_HAV_MAT_HEAVY_STONE"),
        (11, "OB_HAV_MAT_HEAVY_METAL"),
        (12, "OB_HAV_MAT_HEAVY_WOOD"),
        (13, "OB_HAV_MAT_CHAIN"),
        (14, "OB_HAV_MAT_SNOW"),
    ],
);

/// Fallout 3 / New Vegas physics materials
pub const FALLOUT_MATERIALS: NamedValues<u32> = NamedValues::new(
    "fallout material",
    &[
        (0, "FO_HAV_MAT_STONE"),
        (1, "FO_HAV_MAT_CLOTH"),
        (2, "FO_HAV_MAT_DIRT"),
        (3, "FO_HAV_MAT_GLASS"),
        (4, "FO_HAV_MAT_GRASS"),
        (5, "FO_HAV_MAT_METAL"),
        (6, "FO_HAV_MAT_ORGANIC"),
        (7, "FO_HAV_MAT_SKIN"),
        (8, "FO_HAV_MAT_WATER"),
        (9, "FO_HAV_MAT_WOOD"),
        (10, "FO_HAV_MAT_HEAVY_STONE"),
        (11, "FO_HAV_MAT_HEAVY_METAL"),
        (12, "FO_HAV_MAT_HEAVY_WOOD"),
        (13, "FO_HAV_MAT_CHAIN"),
        (14, "FO_HAV_MAT_BOTTLECAP"),
        (15, "FO_HAV_MAT_ELEVATOR"),
        (16, "FO_HAV_MAT_HOLLOW_METAL"),
        (17, "FO_HAV_MAT_SHEET_METAL"),
        (18, "FO_HAV_MAT_SAND"),
        (19, "FO_HAV_MAT_BROKEN_CONCRETE"),
    ],
);

/// Skyrim physics materials (hashed ids)
pub const SKYRIM_MATERIALS: NamedValues<u32> = NamedValues::new(
    "skyrim material",
    &[
        (131_151_687, "SKY_HAV_MAT_BROKEN_STONE"),
        (365_420_259, "SKY_HAV_MAT_LIGHT_WOOD"),
        (398_949_039, "SKY_HAV_MAT_SNOW"),
        (428_587_608, "SKY_HAV_MAT_GRAVEL"),
        (500_811_281, "SKY_HAV_MAT_WOOD"),
        (591_247_106, "SKY_HAV_MAT_SKIN"),
        (873_356_572, "SKY_HAV_MAT_ICE"),
        (1_024_582_599, "SKY_HAV_MAT_WATER"),
        (1_288_358_971, "SKY_HAV_MAT_METAL"),
        (1_486_385_281, "SKY_HAV_MAT_MUD"),
        (1_570_821_952, "SKY_HAV_MAT_HEAVY_STONE"),
        (1_848_600_814, "SKY_HAV_MAT_GRASS"),
        (2_168_343_821, "SKY_HAV_MAT_SAND"),
        (2_229_413_539, "SKY_HAV_MAT_HEAVY_METAL"),
        (2_974_920_155, "SKY_HAV_MAT_ORGANIC"),
        (3_070_783_559, "SKY_HAV_MAT_HEAVY_WOOD"),
        (3_106_094_762, "SKY_HAV_MAT_DIRT"),
        (3_739_830_338, "SKY_HAV_MAT_GLASS"),
        (3_741_512_247, "SKY_HAV_MAT_STONE"),
        (3_839_073_443, "SKY_HAV_MAT_CLOTH"),
    ],
);

/// Material table for a game, `None` for games without Havok data
pub const fn materials(game: GameProfile) -> Option<NamedValues<u32>> {
    match game {
        GameProfile::Morrowind => None,
        GameProfile::Oblivion => Some(OBLIVION_MATERIALS),
        GameProfile::Fallout3 | GameProfile::FalloutNV => Some(FALLOUT_MATERIALS),
        GameProfile::Skyrim | GameProfile::SkyrimSE => Some(SKYRIM_MATERIALS),
    }
}

/// Material id for the game's stone material, used when none is annotated
pub const fn default_material(game: GameProfile) -> u32 {
    match game {
        GameProfile::Skyrim | GameProfile::SkyrimSE => 3_741_512_247,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_material_lookup_per_game() {
        let skyrim = materials(GameProfile::SkyrimSE).unwrap();
        assert_eq!(skyrim.name_of(default_material(GameProfile::SkyrimSE)), Some("SKY_HAV_MAT_STONE"));
        assert_eq!(skyrim.value_of("SKY_HAV_MAT_SNOW"), Some(398_949_039));
        assert_eq!(skyrim.name_of(3), None);

        let fallout = materials(GameProfile::FalloutNV).unwrap();
        assert_eq!(fallout.name_of(18), Some("FO_HAV_MAT_SAND"));

        assert!(materials(GameProfile::Morrowind).is_none());
    }

    #[test]
    fn test_enum_defaults_have_names() {
        assert_eq!(motion_system::TABLE.name_of(motion_system::FIXED), Some("MO_SYS_FIXED"));
        assert_eq!(quality_type::TABLE.name_of(quality_type::FIXED), Some("MO_QUAL_FIXED"));
        assert_eq!(broad_phase::TABLE.value_of("BROAD_PHASE_PHANTOM"), Some(2));
        assert_eq!(collision_response::TABLE.name_of(42), None);
    }
}
