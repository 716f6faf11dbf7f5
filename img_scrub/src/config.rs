//! Job configuration
//!
//! A `JobConfig` is built once, validated, and then only read. The batch
//! runner never consults ambient state.

use crate::error::ConfigError;
use serde::Serialize;
use shared_utils::{validate_path, SortStrategy};
use std::fmt;
use std::path::{Path, PathBuf};

// ============================================================================
// Quality
// ============================================================================

/// JPEG quality in `[Quality::MIN, Quality::MAX]`.
///
/// ```
/// use img_scrub::Quality;
///
/// assert_eq!(Quality::default().value(), 85);
/// assert!(Quality::new(100).is_ok());
/// assert!(Quality::new(9).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Quality(u8);

impl Quality {
    pub const MIN: u8 = 10;
    pub const MAX: u8 = 100;
    pub const DEFAULT: u8 = 85;

    pub fn new(value: i64) -> Result<Self, ConfigError> {
        if value < Self::MIN as i64 || value > Self::MAX as i64 {
            return Err(ConfigError::QualityOutOfRange {
                value,
                min: Self::MIN,
                max: Self::MAX,
            });
        }
        Ok(Self(value as u8))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

// ============================================================================
// JobConfig
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobConfig {
    input_dir: PathBuf,
    output_dir: PathBuf,
    quality: Quality,
    order: SortStrategy,
    auto_orient: bool,
}

impl JobConfig {
    /// Validates that both folders were given. Existence is checked when the
    /// run starts, not here.
    pub fn new(
        input_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        quality: Quality,
    ) -> Result<Self, ConfigError> {
        let input_dir = input_dir.into();
        let output_dir = output_dir.into();

        validate_path(&input_dir).map_err(|_| ConfigError::MissingInput)?;
        validate_path(&output_dir).map_err(|_| ConfigError::MissingOutput)?;

        Ok(Self {
            input_dir,
            output_dir,
            quality,
            order: SortStrategy::None,
            auto_orient: false,
        })
    }

    pub fn with_order(mut self, order: SortStrategy) -> Self {
        self.order = order;
        self
    }

    /// Rotate/flip pixels according to the EXIF Orientation tag before the
    /// tag is dropped.
    pub fn with_auto_orient(mut self, auto_orient: bool) -> Self {
        self.auto_orient = auto_orient;
        self
    }

    pub fn input_dir(&self) -> &Path {
        &self.input_dir
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn quality(&self) -> Quality {
        self.quality
    }

    pub fn order(&self) -> SortStrategy {
        self.order
    }

    pub fn auto_orient(&self) -> bool {
        self.auto_orient
    }
}
