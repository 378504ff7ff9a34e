use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::hints::PackingHints;

/// Free-space structure used by each trial.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    /// Arena-backed guillotine tree; best-area-fit over the free leaves.
    Guillotine,
    /// Bottom-left skyline. Faster on large batches, wastes the area below the skyline.
    Skyline,
}

impl FromStr for Placement {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "guillotine" | "tree" => Ok(Self::Guillotine),
            "skyline" => Ok(Self::Skyline),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PackerConfig {
    /// Heuristics to try; the best trial wins.
    #[serde(default)]
    pub hints: PackingHints,
    /// Pixels between rectangles.
    #[serde(default)]
    pub padding: u32,
    #[serde(default = "default_placement")]
    pub placement: Placement,

    /// Upper limit on the bounding width. None leaves it unbounded.
    #[serde(default)]
    pub max_width: Option<u32>,
    /// Upper limit on the bounding height. None leaves it unbounded.
    #[serde(default)]
    pub max_height: Option<u32>,

    /// Round the final bounds up to powers of two.
    #[serde(default)]
    pub power_of_two: bool,
    /// Force square bounds (max(width,height)).
    #[serde(default)]
    pub square: bool,

    /// Evaluate trials in parallel when feature "parallel" is on.
    #[serde(default)]
    pub parallel: bool,
}

impl Default for PackerConfig {
    fn default() -> Self {
        Self {
            hints: PackingHints::FIND_BEST,
            padding: 0,
            placement: default_placement(),
            max_width: None,
            max_height: None,
            power_of_two: false,
            square: false,
            parallel: false,
        }
    }
}

impl PackerConfig {
    /// Validates the configuration parameters.
    ///
    /// Returns an error if:
    /// - No heuristic is selected
    /// - A size limit is zero
    pub fn validate(&self) -> crate::error::Result<()> {
        use crate::error::RectPackError;

        if self.hints.is_empty() {
            return Err(RectPackError::UnsupportedHint(self.hints.bits()));
        }
        // Re-check bits in case the set was built from a raw value elsewhere.
        PackingHints::from_bits(self.hints.bits())?;

        if self.max_width == Some(0) || self.max_height == Some(0) {
            return Err(RectPackError::InvalidConfig(format!(
                "size limits must be positive, got {:?}x{:?}",
                self.max_width, self.max_height
            )));
        }
        Ok(())
    }
}

fn default_placement() -> Placement {
    Placement::Guillotine
}

/// Builder for `PackerConfig` for ergonomic construction.
#[derive(Debug, Default, Clone)]
pub struct PackerConfigBuilder {
    cfg: PackerConfig,
}

impl PackerConfigBuilder {
    pub fn new() -> Self {
        Self {
            cfg: PackerConfig::default(),
        }
    }
    pub fn hints(mut self, v: PackingHints) -> Self {
        self.cfg.hints = v;
        self
    }
    pub fn padding(mut self, v: u32) -> Self {
        self.cfg.padding = v;
        self
    }
    pub fn placement(mut self, v: Placement) -> Self {
        self.cfg.placement = v;
        self
    }
    pub fn with_max_dimensions(mut self, w: u32, h: u32) -> Self {
        self.cfg.max_width = Some(w);
        self.cfg.max_height = Some(h);
        self
    }
    pub fn max_width(mut self, v: Option<u32>) -> Self {
        self.cfg.max_width = v;
        self
    }
    pub fn max_height(mut self, v: Option<u32>) -> Self {
        self.cfg.max_height = v;
        self
    }
    pub fn pow2(mut self, v: bool) -> Self {
        self.cfg.power_of_two = v;
        self
    }
    pub fn square(mut self, v: bool) -> Self {
        self.cfg.square = v;
        self
    }
    pub fn parallel(mut self, v: bool) -> Self {
        self.cfg.parallel = v;
        self
    }
    pub fn build(self) -> PackerConfig {
        self.cfg
    }
}

impl PackerConfig {
    /// Create a fluent builder for `PackerConfig`.
    pub fn builder() -> PackerConfigBuilder {
        PackerConfigBuilder::new()
    }
}
