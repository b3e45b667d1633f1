// crates/pwmgen-stim/src/config.rs

//! Random configuration generator.
//!
//! Draws are rejected until the sum of pulse widths is a legal cycle length
//! for the serialization width. Only configuration 0 gets an update offset:
//! it is written before any output exists, so its update pulse cannot be
//! timed against a previous configuration.

use rand::Rng;

use pwmgen_core::{
    Configuration, GenerationError, GeneratorParams, LEAD_IN_STEPS, MIN_CYCLE_COUNT,
};

/// Chance of forcing the first (and, independently, the last) pulse to 1.
pub const EDGE_FORCE_PROBABILITY: f64 = 0.25;

/// Draw one legal configuration for position `index`.
///
/// - `state_count` uniform in `[2, max_states]`
/// - each width uniform in `[1, max_value]`
/// - first/last width forced to 1 with probability [`EDGE_FORCE_PROBABILITY`]
/// - `[1, 1]` becomes `[1, 2]`
///
/// Resamples while the total is outside `[3, 2^data_width - 1]`. Params are
/// assumed validated.
pub fn generate_config<R: Rng>(
    index: usize,
    params: &GeneratorParams,
    rng: &mut R,
) -> Result<Configuration, GenerationError> {
    for _ in 0..params.max_config_draws {
        let state_count = rng.random_range(2..=params.max_states);
        let mut data: Vec<u32> = (0..state_count)
            .map(|_| rng.random_range(1..=params.max_value))
            .collect();

        if rng.random_bool(EDGE_FORCE_PROBABILITY) {
            data[0] = 1;
        }
        if rng.random_bool(EDGE_FORCE_PROBABILITY) {
            if let Some(last) = data.last_mut() {
                *last = 1;
            }
        }
        if data == [1u32, 1] {
            data[1] = 2;
        }

        let total: u64 = data.iter().map(|&v| u64::from(v)).sum();
        if !params.is_legal_total(total) {
            continue;
        }

        let init_level = rng.random_range(0..=1u8);
        let cycle_count = rng.random_range(MIN_CYCLE_COUNT..=params.max_cycles);
        let first_update_offset = if index == 0 {
            let lead_in = LEAD_IN_STEPS as u32;
            rng.random_range(state_count..=state_count + lead_in)
        } else {
            0
        };

        return Ok(Configuration::new(
            index,
            data,
            init_level,
            cycle_count,
            first_update_offset,
        ));
    }

    Err(GenerationError::NoLegalConfig {
        index,
        draws: params.max_config_draws,
    })
}

/// Draw `params.n_configs` configurations in index order.
pub fn generate_configs<R: Rng>(
    params: &GeneratorParams,
    rng: &mut R,
) -> Result<Vec<Configuration>, GenerationError> {
    (0..params.n_configs)
        .map(|i| generate_config(i, params, &mut *rng))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn respects_ranges() {
        let params = GeneratorParams::default();
        let mut rng = StdRng::seed_from_u64(7);
        for i in 0..500 {
            let c = generate_config(i, &params, &mut rng).unwrap();
            assert!((2..=params.max_states).contains(&c.state_count));
            assert_eq!(c.write_data.len(), c.state_count as usize);
            assert!(c.write_data.iter().all(|&v| v >= 1));
            assert!(c.total_cycle_length >= 3);
            assert!(u64::from(c.total_cycle_length) <= params.max_total_cycle_length());
            assert!((4..=params.max_cycles).contains(&c.cycle_count));
            assert!(c.init_level <= 1);
            if i == 0 {
                assert!(c.first_update_offset >= c.state_count);
            } else {
                assert_eq!(c.first_update_offset, 0);
            }
        }
    }

    #[test]
    fn tight_width_forces_resampling() {
        // 4-bit width: totals above 15 must be rejected.
        let params = GeneratorParams {
            max_states: 4,
            max_value: 10,
            data_width: 4,
            ..GeneratorParams::default()
        };
        let mut rng = StdRng::seed_from_u64(3);
        for i in 0..200 {
            let c = generate_config(i, &params, &mut rng).unwrap();
            assert!(c.total_cycle_length <= 15);
        }
    }

    #[test]
    fn pair_of_ones_is_mutated() {
        // max_value = 1 makes every two-state draw [1, 1] before the fix-up.
        let params = GeneratorParams { max_states: 2, max_value: 1, ..GeneratorParams::default() };
        let mut rng = StdRng::seed_from_u64(11);
        for i in 0..50 {
            let c = generate_config(i, &params, &mut rng).unwrap();
            assert_eq!(c.write_data, vec![1, 2]);
            assert_eq!(c.total_cycle_length, 3);
        }
    }

    #[test]
    fn exhausted_draw_budget_is_reported() {
        let params = GeneratorParams { max_config_draws: 0, ..GeneratorParams::default() };
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            generate_config(4, &params, &mut rng),
            Err(GenerationError::NoLegalConfig { index: 4, draws: 0 })
        );
    }
}
