// crates/pwmgen-stim/src/output.rs

//! Expected-output synthesis.
//!
//! A configuration's waveform is the run-length expansion of its pulse
//! widths, starting at `init_level` and toggling after each run. With an odd
//! state count the level at the end of a cycle equals the start level of the
//! next, so the hardware starts every even cycle inverted; even cycles then
//! use the bitwise complement. With an even state count every cycle is the
//! same.

use pwmgen_core::{Configuration, Level, OutputFragment, OutputRow, OutputTimeline};

/// Run-length expansion of `write_data` starting at `init_level`.
#[must_use]
pub fn pwm_waveform(cfg: &Configuration) -> Vec<Level> {
    let mut out = Vec::with_capacity(cfg.total_cycle_length as usize);
    let mut level = cfg.init_level & 1;
    for &width in &cfg.write_data {
        out.extend(std::iter::repeat(level).take(width as usize));
        level ^= 1;
    }
    out
}

/// Bitwise NOT of a waveform.
#[must_use]
pub fn complement(wave: &[Level]) -> Vec<Level> {
    wave.iter().map(|&b| b ^ 1).collect()
}

/// Expand one configuration over all of its cycles.
///
/// Cycle `c` (1-based) uses the plain waveform when `c` is odd or the state
/// count is even, otherwise the complement. `step` restarts at 1 per cycle;
/// `unlock` is always 0.
#[must_use]
pub fn synthesize_output(cfg: &Configuration) -> OutputFragment {
    let odd = pwm_waveform(cfg);
    let even = complement(&odd);
    let keep_parity = cfg.state_count % 2 == 0;

    let mut rows = Vec::with_capacity(cfg.fragment_len());
    for cycle in 1..=cfg.cycle_count {
        let wave = if cycle % 2 == 1 || keep_parity { &odd } else { &even };
        for (i, &pwm) in wave.iter().enumerate() {
            rows.push(OutputRow {
                step: i as u32 + 1,
                pwm,
                unlock: 0,
                config: cfg.index,
                cycle,
            });
        }
    }

    OutputFragment {
        config: cfg.index,
        cycle_len: odd.len(),
        rows,
    }
}

/// Lead-in followed by every configuration's fragment, spans recorded.
#[must_use]
pub fn build_output_timeline(configs: &[Configuration]) -> OutputTimeline {
    let mut timeline = OutputTimeline::with_lead_in();
    for cfg in configs {
        timeline.append(&synthesize_output(cfg));
    }
    timeline
}
