//! Layout parameters

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Upper bound for any day count in the config (about a century)
pub const MAX_CONFIG_DAYS: i64 = 36_525;

/// How far collapse state reaches down a tree of nested projects
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CollapseStrategy {
    /// Only a row's own `project_id` is consulted; Project rows stay visible.
    /// Nested projects under a collapsed project keep showing their children.
    #[default]
    SingleLevel,
    /// Every enclosing project up the chain must be expanded, Project rows included.
    Transitive,
}

impl CollapseStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            CollapseStrategy::SingleLevel => "single-level",
            CollapseStrategy::Transitive => "transitive",
        }
    }
}

impl FromStr for CollapseStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "single-level" | "single" => Ok(CollapseStrategy::SingleLevel),
            "transitive" => Ok(CollapseStrategy::Transitive),
            other => Err(format!(
                "unknown collapse strategy '{}' (expected single-level or transitive)",
                other
            )),
        }
    }
}

impl std::fmt::Display for CollapseStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Geometry and timeline parameters shared by the layout engine and the
/// dependency resolver. Units are pixel-equivalents.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Height of every row slot
    pub row_height: f64,
    /// Width of one calendar day
    pub day_width: f64,
    /// Bar length for rows that only have one of their two dates
    pub placeholder_days: i64,
    /// Horizontal run of a connector before it turns toward its target row
    pub connector_offset: f64,
    /// Days shown before the earliest date
    pub lead_padding_days: i64,
    /// Days shown after the latest date
    pub trail_padding_days: i64,
    /// Window length, in calendar months from today, when no task has a date
    pub default_window_months: u32,
    pub collapse_strategy: CollapseStrategy,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            row_height: 28.0,
            day_width: 30.0,
            placeholder_days: 7,
            connector_offset: 20.0,
            lead_padding_days: 30,
            trail_padding_days: 60,
            default_window_months: 6,
            collapse_strategy: CollapseStrategy::SingleLevel,
        }
    }
}

impl LayoutConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn row_height(mut self, height: f64) -> Self {
        self.row_height = height;
        self
    }

    pub fn day_width(mut self, width: f64) -> Self {
        self.day_width = width;
        self
    }

    pub fn collapse_strategy(mut self, strategy: CollapseStrategy) -> Self {
        self.collapse_strategy = strategy;
        self
    }

    /// Replace non-positive geometry values with the defaults and clamp
    /// day counts to `0..=MAX_CONFIG_DAYS`
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if self.row_height.is_nan() || self.row_height <= 0.0 {
            self.row_height = defaults.row_height;
        }
        if self.day_width.is_nan() || self.day_width <= 0.0 {
            self.day_width = defaults.day_width;
        }
        if self.placeholder_days < 1 {
            self.placeholder_days = defaults.placeholder_days;
        }
        self.placeholder_days = self.placeholder_days.min(MAX_CONFIG_DAYS);
        self.lead_padding_days = self.lead_padding_days.clamp(0, MAX_CONFIG_DAYS);
        self.trail_padding_days = self.trail_padding_days.clamp(0, MAX_CONFIG_DAYS);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_chart_constants() {
        let config = LayoutConfig::default();
        assert_eq!(config.row_height, 28.0);
        assert_eq!(config.day_width, 30.0);
        assert_eq!(config.placeholder_days, 7);
        assert_eq!(config.connector_offset, 20.0);
        assert_eq!(config.collapse_strategy, CollapseStrategy::SingleLevel);
    }

    #[test]
    fn strategy_from_str() {
        assert_eq!("transitive".parse(), Ok(CollapseStrategy::Transitive));
        assert_eq!("Single-Level".parse(), Ok(CollapseStrategy::SingleLevel));
        assert!("deep".parse::<CollapseStrategy>().is_err());
    }

    #[test]
    fn sanitize_restores_bad_geometry() {
        let config = LayoutConfig::new().row_height(0.0).day_width(-5.0).sanitized();
        assert_eq!(config.row_height, 28.0);
        assert_eq!(config.day_width, 30.0);
    }

    #[test]
    fn sanitize_bounds_day_counts() {
        let config: LayoutConfig = serde_json::from_str(
            r#"{"lead_padding_days": 9223372036854775807, "trail_padding_days": -4, "placeholder_days": 9223372036854775807}"#,
        )
        .unwrap();
        let config = config.sanitized();
        assert_eq!(config.lead_padding_days, MAX_CONFIG_DAYS);
        assert_eq!(config.trail_padding_days, 0);
        assert_eq!(config.placeholder_days, MAX_CONFIG_DAYS);
    }

    #[test]
    fn partial_config_deserializes_with_defaults() {
        let config: LayoutConfig =
            serde_json::from_str(r#"{"day_width": 12.0, "collapse_strategy": "transitive"}"#)
                .unwrap();
        assert_eq!(config.day_width, 12.0);
        assert_eq!(config.row_height, 28.0);
        assert_eq!(config.collapse_strategy, CollapseStrategy::Transitive);
    }
}
