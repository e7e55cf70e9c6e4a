//! Tuning knobs for card placement, overlap relaxation and round pacing.
//!
//! The padding / margin / attempt values are empirical: they look right for
//! 150x100 cards in a typical play area and are kept configurable rather than
//! treated as derived constants.

use crate::error::LayoutError;

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LayoutConfig {
    /// Grown onto each box before the overlap test.
    pub padding: f64,
    /// Added to half the summed widths when pushing two cards apart.
    pub extra_margin: f64,
    /// Upper bound on push iterations per resolved card.
    pub max_attempts: u32,
    /// Period of the background relaxation pass.
    pub relax_interval_ms: u32,
    pub card_width: f64,
    pub card_height: f64,
    /// Cards dealt on level 1; each later level adds two.
    pub cards_per_level: usize,
    pub max_levels: u32,
    pub hit_points: u32,
    pub miss_penalty: u32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            padding: 10.0,
            extra_margin: 20.0,
            max_attempts: 20,
            relax_interval_ms: 2_000,
            card_width: 150.0,
            card_height: 100.0,
            cards_per_level: 5,
            max_levels: 4,
            hit_points: 10,
            miss_penalty: 5,
        }
    }
}

impl LayoutConfig {
    pub fn validate(&self) -> Result<(), LayoutError> {
        let finite_non_negative = |v: f64| v.is_finite() && v >= 0.0;
        if !finite_non_negative(self.padding) {
            return Err(LayoutError::InvalidConfig(format!("padding {}", self.padding)));
        }
        if !finite_non_negative(self.extra_margin) {
            return Err(LayoutError::InvalidConfig(format!(
                "extra_margin {}",
                self.extra_margin
            )));
        }
        if self.max_attempts == 0 {
            return Err(LayoutError::InvalidConfig("max_attempts must be > 0".into()));
        }
        if self.relax_interval_ms == 0 {
            return Err(LayoutError::InvalidConfig("relax_interval_ms must be > 0".into()));
        }
        if !(self.card_width.is_finite() && self.card_width > 0.0)
            || !(self.card_height.is_finite() && self.card_height > 0.0)
        {
            return Err(LayoutError::InvalidConfig(format!(
                "card size {}x{}",
                self.card_width, self.card_height
            )));
        }
        if self.max_levels == 0 {
            return Err(LayoutError::InvalidConfig("max_levels must be > 0".into()));
        }
        Ok(())
    }

    /// Number of cards dealt for `level` (clamped to `1..=max_levels`).
    pub fn cards_for_level(&self, level: u32) -> usize {
        let level = level.clamp(1, self.max_levels);
        self.cards_per_level + (level as usize - 1) * 2
    }

    /// Parse a (possibly partial) JSON object; missing keys keep their defaults.
    #[cfg(feature = "serde_json")]
    pub fn from_json(json: &str) -> Result<Self, LayoutError> {
        let config: LayoutConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}
