//! Resource limits enforced before any computation.

use std::path::Path;

use serde::{Deserialize, Serialize};

const LIMITS_FILE_FORMAT: config::FileFormat = config::FileFormat::Yaml;
const DEFAULT_LIMITS_STR: &str = include_str!("default_limits.yaml");
const ENV_PREFIX: &str = "HYPERSOLID";

/// Parameter caps for shape, comparison, and tiling requests.
///
/// Requests that exceed a limit are rejected outright, never truncated.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Limits {
    /// Largest number of dimensions accepted for a shape.
    pub max_ndim: u8,
    /// Largest number of tiles a single tiling request may produce.
    pub max_tiles: usize,
    /// Largest number of shapes in one comparison.
    pub max_shapes: usize,
}
impl Default for Limits {
    fn default() -> Self {
        Self {
            max_ndim: 100,
            max_tiles: 10_000,
            max_shapes: 20,
        }
    }
}
impl Limits {
    /// Loads limits by layering, from lowest to highest priority:
    ///
    /// 1. built-in defaults
    /// 2. the YAML file at `path`, if any
    /// 3. environment variables such as `HYPERSOLID_MAX_TILES`
    pub fn load(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        let mut config = config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_LIMITS_STR, LIMITS_FILE_FORMAT));

        if let Some(path) = path {
            log::debug!("loading limits from {}", path.display());
            config = config.add_source(config::File::from(path).format(LIMITS_FILE_FORMAT));
        }

        config = config.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let limits: Self = config.build()?.try_deserialize()?;
        log::debug!("effective limits: {limits:?}");
        Ok(limits)
    }

    /// Serializes the limits as YAML in the same format that
    /// [`Limits::load()`] reads.
    pub fn to_yaml(&self) -> Result<String, serde_norway::Error> {
        serde_norway::to_string(self)
    }
}
