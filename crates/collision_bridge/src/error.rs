//! Error types for collision import and export

use thiserror::Error;

use crate::asset::ShapeKind;
use crate::units::GameProfile;

/// Errors raised while converting collision data
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BridgeError {
    /// The shape block is not one of the supported variants
    #[error("unsupported collision shape '{block_name}'")]
    UnsupportedShape {
        /// Block name as read from the asset
        block_name: String,
    },

    /// Geometry is too degenerate to recover shape parameters
    #[error("degenerate {kind} shape: {reason}")]
    DegenerateShape {
        /// Shape variant being converted
        kind: ShapeKind,
        /// What was missing
        reason: String,
    },

    /// No collision scale registered for the game
    #[error("no collision scale registered for game profile {0}")]
    UnknownGameProfile(GameProfile),

    /// The physics material id has no name in the game's table
    #[error("unknown physics material {id} for {game}")]
    UnknownMaterial {
        /// Game whose table was searched
        game: GameProfile,
        /// Raw material id
        id: u32,
    },
}

impl BridgeError {
    /// Shorthand for a [`BridgeError::DegenerateShape`]
    pub fn degenerate(kind: ShapeKind, reason: impl Into<String>) -> Self {
        Self::DegenerateShape {
            kind,
            reason: reason.into(),
        }
    }

    /// Whether the caller should skip the shape and continue.
    ///
    /// Only a missing game profile is a configuration problem that aborts
    /// the whole operation.
    pub const fn is_recoverable(&self) -> bool {
        !matches!(self, Self::UnknownGameProfile(_))
    }
}

/// Result alias used across the bridge
pub type BridgeResult<T> = Result<T, BridgeError>;
