use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{
    validate_ordered, validate_positive_number, validate_probability, validate_range, Validate,
};
use serde::{Deserialize, Serialize};

/// Upper bound for `lookback_years`, well inside chrono's date range.
pub const MAX_LOOKBACK_YEARS: u32 = 10_000;

/// Tunable knobs for installation generation.
///
/// Every field has a default, so a TOML `[policy]` table only needs the
/// values it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationPolicy {
    /// Draws below this value yield a single installation.
    pub single_threshold: f64,
    /// Draws below this value (and above `single_threshold`) yield a few.
    pub few_threshold: f64,
    pub few_min: u32,
    pub few_max: u32,
    /// Multi-unit buildings.
    pub many_min: u32,
    pub many_max: u32,

    /// How far back the first installation of an address may start.
    pub lookback_years: u32,

    pub deletion_probability: f64,
    /// Triangular lifespan distribution, in days.
    pub lifespan_min_days: f64,
    pub lifespan_max_days: f64,
    pub lifespan_mode_days: f64,

    /// Gap between a deletion and the replacement installation, in days.
    pub replacement_gap_min_days: i64,
    pub replacement_gap_max_days: i64,

    /// Fixed seed for reproducible runs (None = OS entropy)
    pub seed: Option<u64>,
}

impl Default for GenerationPolicy {
    fn default() -> Self {
        Self {
            single_threshold: 0.85,
            few_threshold: 0.95,
            few_min: 2,
            few_max: 3,
            many_min: 3,
            many_max: 20,
            lookback_years: 5,
            deletion_probability: 0.2,
            lifespan_min_days: 20.0,
            lifespan_max_days: 1800.0,
            lifespan_mode_days: 360.0,
            replacement_gap_min_days: 0,
            replacement_gap_max_days: 360,
            seed: None,
        }
    }
}

impl Validate for GenerationPolicy {
    fn validate(&self) -> Result<()> {
        validate_probability("policy.single_threshold", self.single_threshold)?;
        validate_probability("policy.few_threshold", self.few_threshold)?;
        validate_range(
            "policy.few_threshold",
            self.few_threshold,
            self.single_threshold,
            1.0,
        )?;

        validate_positive_number("policy.few_min", self.few_min, 1)?;
        validate_ordered("policy.few_min", self.few_min, self.few_max)?;
        validate_positive_number("policy.many_min", self.many_min, 1)?;
        validate_ordered("policy.many_min", self.many_min, self.many_max)?;

        validate_range(
            "policy.lookback_years",
            self.lookback_years,
            1,
            MAX_LOOKBACK_YEARS,
        )?;

        validate_probability("policy.deletion_probability", self.deletion_probability)?;

        validate_range(
            "policy.lifespan_min_days",
            self.lifespan_min_days,
            0.0,
            f64::MAX,
        )?;
        if self.lifespan_min_days >= self.lifespan_max_days {
            return Err(EtlError::InvalidConfigValueError {
                field: "policy.lifespan_max_days".to_string(),
                value: self.lifespan_max_days.to_string(),
                reason: format!(
                    "Must be greater than lifespan_min_days ({})",
                    self.lifespan_min_days
                ),
            });
        }
        validate_range(
            "policy.lifespan_mode_days",
            self.lifespan_mode_days,
            self.lifespan_min_days,
            self.lifespan_max_days,
        )?;

        validate_range(
            "policy.replacement_gap_min_days",
            self.replacement_gap_min_days,
            0,
            i64::MAX,
        )?;
        validate_ordered(
            "policy.replacement_gap_min_days",
            self.replacement_gap_min_days,
            self.replacement_gap_max_days,
        )?;

        Ok(())
    }
}
