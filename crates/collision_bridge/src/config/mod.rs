//! Configuration system
//!
//! Settings files are TOML or RON, picked by extension.

mod bridge;

use std::path::{Path, PathBuf};

pub use serde::{Serialize, Deserialize};
pub use bridge::{BridgeConfig, GameScale, TessellationConfig, ToleranceConfig};

/// On-disk settings format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Toml,
    Ron,
}

impl Format {
    fn of(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Ok(Self::Toml),
            Some("ron") => Ok(Self::Ron),
            _ => Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let format = Format::of(path)?;
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let parsed = match format {
            Format::Toml => toml::from_str(&contents).map_err(|e| e.to_string()),
            Format::Ron => ron::from_str(&contents).map_err(|e| e.to_string()),
        };
        parsed.map_err(|message| ConfigError::Parse {
            path: path.to_path_buf(),
            message,
        })
    }

    /// Save configuration to file
    fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = match Format::of(path)? {
            Format::Toml => toml::to_string_pretty(self).map_err(|e| e.to_string()),
            Format::Ron => {
                ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default()).map_err(|e| e.to_string())
            }
        }
        .map_err(|message| ConfigError::Serialize {
            path: path.to_path_buf(),
            message,
        })?;

        std::fs::write(path, contents).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Configuration errors, each naming the file involved
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// File could not be read or written
    #[error("cannot access {}: {source}", .path.display())]
    Io {
        /// File involved
        path: PathBuf,
        /// Underlying failure
        #[source]
        source: std::io::Error,
    },

    /// Contents are not valid for the format
    #[error("cannot parse {}: {message}", .path.display())]
    Parse {
        /// File involved
        path: PathBuf,
        /// Parser message
        message: String,
    },

    /// Settings could not be written in the format
    #[error("cannot serialize {}: {message}", .path.display())]
    Serialize {
        /// File involved
        path: PathBuf,
        /// Serializer message
        message: String,
    },

    /// Extension is neither `.toml` nor `.ron`
    #[error("unsupported settings format: {}", .0.display())]
    UnsupportedFormat(PathBuf),
}
