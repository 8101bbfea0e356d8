//! Collision filter words and per-game layer tables
//!
//! Havok packs a body's collision filter into one 32-bit word: the layer in
//! the low byte, filter flags in the next byte and the system group in the
//! high half. The layer numbering differs between games.

use crate::foundation::collections::NamedValues;
use crate::units::GameProfile;

/// Unpacked Havok collision filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CollisionFilter {
    /// Collision layer (per-game numbering)
    pub layer: u8,
    /// Filter flags (ragdoll part number, scaled flag)
    pub flags: u8,
    /// System group
    pub group: u16,
}

impl Default for CollisionFilter {
    fn default() -> Self {
        // Static layer in every supported game
        Self::new(1)
    }
}

impl CollisionFilter {
    /// A filter on `layer` with no flags or group
    pub const fn new(layer: u8) -> Self {
        Self {
            layer,
            flags: 0,
            group: 0,
        }
    }

    /// Pack into the 32-bit word stored in the asset
    pub const fn pack(self) -> u32 {
        (self.layer as u32) | ((self.flags as u32) << 8) | ((self.group as u32) << 16)
    }

    /// Unpack a stored filter word
    pub const fn unpack(word: u32) -> Self {
        Self {
            layer: (word & 0xFF) as u8,
            flags: ((word >> 8) & 0xFF) as u8,
            group: (word >> 16) as u16,
        }
    }
}

/// Oblivion collision layers
pub const OBLIVION_LAYERS: NamedValues<u8> = NamedValues::new(
    "oblivion layer",
    &[
        (0, "OL_UNIDENTIFIED"),
        (1, "OL_STATIC"),
        (2, "OL_ANIM_STATIC"),
        (3, "OL_TRANSPARENT"),
        (4, "OL_CLUTTER"),
        (5, "OL_WEAPON"),
        (6, "OL_PROJECTILE"),
        (7, "OL_SPELL"),
        (8, "OL_BIPED"),
        (9, "OL_TREES"),
        (10, "OL_PROPS"),
        (11, "OL_WATER"),
        (12, "OL_TRIGGER"),
        (13, "OL_TERRAIN"),
        (14, "OL_TRAP"),
        (15, "OL_NONCOLLIDABLE"),
        (16, "OL_CLOUD_TRAP"),
        (17, "OL_GROUND"),
        (18, "OL_PORTAL"),
        (19, "OL_STAIRS"),
        (20, "OL_CHAR_CONTROLLER"),
        (21, "OL_AVOID_BOX"),
        (24, "OL_CAMERA_PICK"),
        (25, "OL_ITEM_PICK"),
        (26, "OL_LINE_OF_SIGHT"),
        (27, "OL_PATH_PICK"),
        (28, "OL_CUSTOM_PICK_1"),
        (29, "OL_CUSTOM_PICK_2"),
        (30, "OL_SPELL_EXPLOSION"),
        (31, "OL_DROPPING_PICK"),
    ],
);

/// Fallout 3 / New Vegas collision layers
pub const FALLOUT_LAYERS: NamedValues<u8> = NamedValues::new(
    "fallout layer",
    &[
        (0, "FOL_UNIDENTIFIED"),
        (1, "FOL_STATIC"),
        (2, "FOL_ANIM_STATIC"),
        (3, "FOL_TRANSPARENT"),
        (4, "FOL_CLUTTER"),
        (5, "FOL_WEAPON"),
        (6, "FOL_PROJECTILE"),
        (7, "FOL_SPELL"),
        (8, "FOL_BIPED"),
        (9, "FOL_TREES"),
        (10, "FOL_PROPS"),
        (11, "FOL_WATER"),
        (12, "FOL_TRIGGER"),
        (13, "FOL_TERRAIN"),
        (14, "FOL_TRAP"),
        (15, "FOL_NONCOLLIDABLE"),
        (16, "FOL_CLOUD_TRAP"),
        (17, "FOL_GROUND"),
        (18, "FOL_PORTAL"),
        (19, "FOL_DEBRIS_SMALL"),
        (20, "FOL_DEBRIS_LARGE"),
        (21, "FOL_ACOUSTIC_SPACE"),
        (22, "FOL_ACTORZONE"),
        (23, "FOL_PROJECTILEZONE"),
        (24, "FOL_GASTRAP"),
        (25, "FOL_SHELLCASING"),
        (26, "FOL_TRANSPARENT_SMALL"),
        (27, "FOL_INVISIBLE_WALL"),
        (28, "FOL_TRANSPARENT_SMALL_ANIM"),
        (29, "FOL_DEADBIP"),
        (30, "FOL_CHARCONTROLLER"),
        (31, "FOL_AVOIDBOX"),
    ],
);

/// Skyrim collision layers
pub const SKYRIM_LAYERS: NamedValues<u8> = NamedValues::new(
    "skyrim layer",
    &[
        (0, "SKYL_UNIDENTIFIED"),
        (1, "SKYL_STATIC"),
        (2, "SKYL_ANIMSTATIC"),
        (3, "SKYL_TRANSPARENT"),
        (4, "SKYL_CLUTTER"),
        (5, "SKYL_WEAPON"),
        (6, "SKYL_PROJECTILE"),
        (7, "SKYL_SPELL"),
        (8, "SKYL_BIPED"),
        (9, "SKYL_TREES"),
        (10, "SKYL_PROPS"),
        (11, "SKYL_WATER"),
        (12, "SKYL_TRIGGER"),
        (13, "SKYL_TERRAIN"),
        (14, "SKYL_TRAP"),
        (15, "SKYL_NONCOLLIDABLE"),
        (16, "SKYL_CLOUD_TRAP"),
        (17, "SKYL_GROUND"),
        (18, "SKYL_PORTAL"),
        (19, "SKYL_DEBRIS_SMALL"),
        (20, "SKYL_DEBRIS_LARGE"),
        (21, "SKYL_ACOUSTIC_SPACE"),
        (22, "SKYL_ACTORZONE"),
        (23, "SKYL_PROJECTILEZONE"),
        (24, "SKYL_GASTRAP"),
        (25, "SKYL_SHELLCASING"),
        (26, "SKYL_TRANSPARENT_SMALL"),
        (27, "SKYL_INVISIBLE_WALL"),
        (28, "SKYL_TRANSPARENT_SMALL_ANIM"),
        (29, "SKYL_WARD"),
        (30, "SKYL_CHARCONTROLLER"),
        (31, "SKYL_STAIRHELPER"),
        (32, "SKYL_DEADBIP"),
        (33, "SKYL_BIPED_NO_CC"),
        (34, "SKYL_AVOIDBOX"),
        (35, "SKYL_COLLISIONBOX"),
        (36, "SKYL_CAMERASHPERE"),
        (37, "SKYL_DOORDETECTION"),
        (38, "SKYL_CONEPROJECTILE"),
        (39, "SKYL_CAMERAPICK"),
        (40, "SKYL_ITEMPICK"),
        (41, "SKYL_LINEOFSIGHT"),
        (42, "SKYL_PATHPICK"),
        (43, "SKYL_CUSTOMPICK1"),
        (44, "SKYL_CUSTOMPICK2"),
        (45, "SKYL_SPELLEXPLOSION"),
        (46, "SKYL_DROPPINGPICK"),
    ],
);

/// Layer table for a game, `None` for games without Havok data
pub const fn layers(game: GameProfile) -> Option<NamedValues<u8>> {
    match game {
        GameProfile::Morrowind => None,
        GameProfile::Oblivion => Some(OBLIVION_LAYERS),
        GameProfile::Fallout3 | GameProfile::FalloutNV => Some(FALLOUT_LAYERS),
        GameProfile::Skyrim | GameProfile::SkyrimSE => Some(SKYRIM_LAYERS),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_unpack() {
        let filter = CollisionFilter {
            layer: 8,
            flags: 0x20,
            group: 0x1234,
        };

        let word = filter.pack();

        assert_eq!(word, 0x1234_2008);
        assert_eq!(CollisionFilter::unpack(word), filter);
    }

    #[test]
    fn test_layer_names_differ_per_game() {
        assert_eq!(layers(GameProfile::Oblivion).unwrap().name_of(19), Some("OL_STAIRS"));
        assert_eq!(layers(GameProfile::Fallout3).unwrap().name_of(19), Some("FOL_DEBRIS_SMALL"));
        assert_eq!(layers(GameProfile::Skyrim).unwrap().value_of("SKYL_WARD"), Some(29));
        assert!(layers(GameProfile::Morrowind).is_none());
    }
}
