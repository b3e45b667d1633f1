//! Generator parameters.
//!
//! Every tunable of the stimulus generator lives here and is passed
//! explicitly into each generator function. Profiles are plain TOML; any
//! field left out takes its default:
//!
//! ```toml
//! n_configs = 8
//! max_states = 6
//! data_width = 8
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ParamsError;

/// Smallest legal sum of per-state pulse widths.
pub const MIN_TOTAL_CYCLE_LENGTH: u32 = 3;

/// Smallest legal number of cycles per configuration.
pub const MIN_CYCLE_COUNT: u32 = 4;

/// Idle output steps emitted before the first configuration.
pub const LEAD_IN_STEPS: usize = 5;

/// Narrowest decimal cell of the text tables.
pub const MIN_DECIMAL_CELL_WIDTH: usize = 3;

/// Tunables for one generation run.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorParams {
    /// Configurations per batch.
    pub n_configs: usize,
    /// Upper bound for `state_count` (inclusive).
    pub max_states: u32,
    /// Upper bound for a single pulse width (inclusive).
    pub max_value: u32,
    /// Upper bound for `cycle_count` (inclusive).
    pub max_cycles: u32,
    /// Serialization width in bits; `total_cycle_length` must fit in it.
    pub data_width: u32,
    /// Whole-batch retries before giving up.
    pub max_attempts: u32,
    /// Rejection-sampling draws per configuration before giving up.
    pub max_config_draws: u32,
}

impl Default for GeneratorParams {
    fn default() -> Self {
        Self {
            n_configs: 5,
            max_states: 8,
            max_value: 20,
            max_cycles: 10,
            data_width: 8,
            max_attempts: 1000,
            max_config_draws: 10_000,
        }
    }
}

impl GeneratorParams {
    /// Largest legal `total_cycle_length` for the configured width.
    #[inline]
    #[must_use]
    pub const fn max_total_cycle_length(&self) -> u64 {
        (1u64 << self.data_width) - 1
    }

    /// Returns `true` if `total` is a legal cycle length.
    #[inline]
    #[must_use]
    pub const fn is_legal_total(&self, total: u64) -> bool {
        total >= MIN_TOTAL_CYCLE_LENGTH as u64 && total <= self.max_total_cycle_length()
    }

    /// Decimal cell width that holds every exported value.
    ///
    /// The largest values are cycle steps and totals (bounded by
    /// [`Self::max_total_cycle_length`]), state counts, cycle numbers and
    /// configuration indices. Never below [`MIN_DECIMAL_CELL_WIDTH`].
    /// Params are assumed validated.
    #[must_use]
    pub fn decimal_cell_width(&self) -> usize {
        let last_index = u64::try_from(self.n_configs.saturating_sub(1)).unwrap_or(u64::MAX);
        let largest = self
            .max_total_cycle_length()
            .max(u64::from(self.max_states))
            .max(u64::from(self.max_cycles))
            .max(last_index);
        decimal_digits(largest).max(MIN_DECIMAL_CELL_WIDTH)
    }

    /// Check the parameters before any random draw.
    pub fn validate(&self) -> Result<(), ParamsError> {
        if self.n_configs == 0 {
            return Err(ParamsError::NoConfigs);
        }
        if self.max_states < 2 {
            return Err(ParamsError::TooFewStates(self.max_states));
        }
        if self.max_value == 0 {
            return Err(ParamsError::ZeroMaxValue);
        }
        if self.max_cycles < MIN_CYCLE_COUNT {
            return Err(ParamsError::TooFewCycles {
                min: MIN_CYCLE_COUNT,
                got: self.max_cycles,
            });
        }
        if !(2..=32).contains(&self.data_width) {
            return Err(ParamsError::UnsupportedWidth(self.data_width));
        }
        if u64::from(self.max_states) > (1u64 << self.data_width) {
            return Err(ParamsError::AddressOverflow {
                max_states: self.max_states,
                data_width: self.data_width,
            });
        }
        let reach = u64::from(self.max_states) * u64::from(self.max_value);
        if reach < u64::from(MIN_TOTAL_CYCLE_LENGTH) {
            return Err(ParamsError::UnreachableTotal(reach));
        }
        if self.max_attempts == 0 {
            return Err(ParamsError::ZeroBudget("max_attempts"));
        }
        if self.max_config_draws == 0 {
            return Err(ParamsError::ZeroBudget("max_config_draws"));
        }
        Ok(())
    }
}

#[inline]
fn decimal_digits(v: u64) -> usize {
    v.checked_ilog10().map_or(1, |d| d as usize + 1)
}
