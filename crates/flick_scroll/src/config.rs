//! Scroll behavior configuration
//!
//! Every field has a default, so a TOML file only needs the values it wants
//! to change:
//!
//! ```toml
//! drag_start_distance = 12.0
//!
//! [fling]
//! min_velocity = 400.0
//! easing = "ease-out-cubic"
//!
//! [indicator]
//! vertical = "always-on"
//! ```

use std::fs;
use std::path::Path;

use flick_animation::Easing;
use flick_core::Axis;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

// ============================================================================
// Scroll Direction
// ============================================================================

/// Axes the engine responds to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScrollDirection {
    /// Vertical scrolling only
    Vertical,
    /// Horizontal scrolling only
    Horizontal,
    /// Both directions (free scroll)
    #[default]
    Both,
}

impl ScrollDirection {
    /// Check whether deltas on `axis` are applied
    pub fn allows(&self, axis: Axis) -> bool {
        match self {
            ScrollDirection::Both => true,
            ScrollDirection::Vertical => axis == Axis::Vertical,
            ScrollDirection::Horizontal => axis == Axis::Horizontal,
        }
    }
}

// ============================================================================
// Indicator Policy
// ============================================================================

/// When a scroll indicator is painted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IndicatorPolicy {
    /// Shown on scroll activity, faded out after a quiet period
    #[default]
    AsNeeded,
    /// Painted whenever the content overflows
    AlwaysOn,
    /// Never painted (content still scrollable)
    AlwaysOff,
}

// ============================================================================
// Sections
// ============================================================================

/// Post-release fling behavior
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlingConfig {
    /// Minimum release speed (pixels/second) on an axis for it to fling
    pub min_velocity: f32,
    /// Fling duration in milliseconds; the travel is `velocity * duration`
    pub duration_ms: u32,
    /// Deceleration curve
    pub easing: Easing,
}

impl Default for FlingConfig {
    fn default() -> Self {
        Self {
            min_velocity: 300.0,
            duration_ms: 3000,
            easing: Easing::EaseOutCirc,
        }
    }
}

/// Overscroll pressure feedback
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BounceConfig {
    /// Feed overscroll into the pressure accumulator at all
    pub enabled: bool,
    /// Pressure saturates at +/- this value
    pub max_pressure: f32,
    /// Pressure gained per pixel of excess
    pub gain: f32,
    /// Time for released pressure to decay back to zero
    pub decay_ms: u32,
    /// Decay curve
    pub easing: Easing,
}

impl Default for BounceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_pressure: 20.0,
            gain: 0.5,
            decay_ms: 300,
            easing: Easing::EaseOutCubic,
        }
    }
}

/// Scroll position indicators
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorConfig {
    pub horizontal: IndicatorPolicy,
    pub vertical: IndicatorPolicy,
    /// Quiet period before the fade starts
    pub fade_timeout_ms: u32,
    /// Time between fade steps
    pub fade_interval_ms: u32,
    /// Opacity removed per fade step (0, 1]
    pub fade_step: f32,
    /// Minimum indicator length in pixels
    pub min_length: f32,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            horizontal: IndicatorPolicy::AsNeeded,
            vertical: IndicatorPolicy::AsNeeded,
            fade_timeout_ms: 600,
            fade_interval_ms: 50,
            fade_step: 0.1,
            min_length: 30.0,
        }
    }
}

impl IndicatorConfig {
    pub fn policy(&self, axis: Axis) -> IndicatorPolicy {
        match axis {
            Axis::Horizontal => self.horizontal,
            Axis::Vertical => self.vertical,
        }
    }
}

// ============================================================================
// Scroll Configuration
// ============================================================================

/// Configuration for scroll behavior
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollConfig {
    /// Pointer travel (pixels) before a press becomes a drag
    pub drag_start_distance: f32,
    /// Axes that respond to input
    pub direction: ScrollDirection,
    /// Samples further apart than this are not used together for velocity
    pub velocity_stale_ms: u32,
    pub fling: FlingConfig,
    pub bounce: BounceConfig,
    pub indicator: IndicatorConfig,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            drag_start_distance: 10.0,
            direction: ScrollDirection::Both,
            velocity_stale_ms: 300,
            fling: FlingConfig::default(),
            bounce: BounceConfig::default(),
            indicator: IndicatorConfig::default(),
        }
    }
}

impl ScrollConfig {
    /// Create config with overscroll feedback disabled
    pub fn no_bounce() -> Self {
        Self {
            bounce: BounceConfig {
                enabled: false,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Create config with indicators painted whenever content overflows
    pub fn always_visible_indicators() -> Self {
        Self {
            indicator: IndicatorConfig {
                horizontal: IndicatorPolicy::AlwaysOn,
                vertical: IndicatorPolicy::AlwaysOn,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Create config with indicators never painted
    pub fn hidden_indicators() -> Self {
        Self {
            indicator: IndicatorConfig {
                horizontal: IndicatorPolicy::AlwaysOff,
                vertical: IndicatorPolicy::AlwaysOff,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: ScrollConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!("Loaded scroll config from {}", path.display());
        Ok(config)
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check every value is in its accepted range
    pub fn validate(&self) -> Result<()> {
        non_negative("drag_start_distance", self.drag_start_distance)?;
        positive_ms("velocity_stale_ms", self.velocity_stale_ms)?;

        non_negative("fling.min_velocity", self.fling.min_velocity)?;
        positive_ms("fling.duration_ms", self.fling.duration_ms)?;

        non_negative("bounce.max_pressure", self.bounce.max_pressure)?;
        non_negative("bounce.gain", self.bounce.gain)?;
        positive_ms("bounce.decay_ms", self.bounce.decay_ms)?;

        positive_ms("indicator.fade_interval_ms", self.indicator.fade_interval_ms)?;
        non_negative("indicator.min_length", self.indicator.min_length)?;
        let step = self.indicator.fade_step;
        if !step.is_finite() || step <= 0.0 || step > 1.0 {
            return Err(ConfigError::Invalid {
                field: "indicator.fade_step",
                reason: format!("{} is outside (0, 1]", step),
            });
        }

        Ok(())
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("{} must be a finite, non-negative number", value),
        })
    }
}

fn positive_ms(field: &'static str, value: u32) -> Result<()> {
    if value > 0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: "must be at least 1 ms".to_string(),
        })
    }
}
