//! Testbench data model.
//!
//! A [`Configuration`] is one scenario written into the PWM controller's
//! memory. The [`OutputTimeline`] holds the expected per-step waveform of all
//! configurations back to back, and records a [`ConfigSpan`] per configuration
//! so the input synthesizer can place its write bursts and update pulses
//! without rescanning. The [`InputTimeline`] holds the stimulus rows.
//!
//! Both timelines are stored column-wise (one vector per signal) and export
//! through [`ColumnTable`].

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, TableError};
use crate::params::{LEAD_IN_STEPS, MIN_CYCLE_COUNT, MIN_TOTAL_CYCLE_LENGTH};
use crate::table::{CellFormat, ColumnTable};

/// Logic level, `0` or `1`.
pub type Level = u8;

/// One test scenario fed to the design under test.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Configuration {
    /// Position in the batch.
    pub index: usize,
    /// Number of states (`N_ADDR`).
    pub state_count: u32,
    /// Memory addresses `0..state_count`.
    pub write_addresses: Vec<u32>,
    /// Pulse width per state.
    pub write_data: Vec<u32>,
    /// Level of the first run.
    pub init_level: Level,
    /// Repetitions of the pulse sequence.
    pub cycle_count: u32,
    /// Sum of `write_data` (`N_TOT_CYC`).
    pub total_cycle_length: u32,
    /// Row of the first update pulse; nonzero only for index 0.
    pub first_update_offset: u32,
}

impl Configuration {
    /// Build a configuration, deriving addresses, state count and total.
    #[must_use]
    pub fn new(
        index: usize,
        write_data: Vec<u32>,
        init_level: Level,
        cycle_count: u32,
        first_update_offset: u32,
    ) -> Self {
        let state_count = u32::try_from(write_data.len()).unwrap_or(u32::MAX);
        Self {
            index,
            state_count,
            write_addresses: (0..state_count).collect(),
            total_cycle_length: write_data.iter().sum(),
            write_data,
            init_level,
            cycle_count,
            first_update_offset,
        }
    }

    /// Output rows this configuration occupies.
    #[inline]
    #[must_use]
    pub fn fragment_len(&self) -> usize {
        self.cycle_count as usize * self.total_cycle_length as usize
    }

    /// Check the invariants [`Configuration::new`] establishes and the
    /// generator's legality rules. Width limits depend on the parameters and
    /// are not checked here.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let index = self.index;
        let n = self.state_count as usize;
        if self.write_data.len() != n || self.write_addresses.len() != n {
            return Err(ConfigError::StateCountMismatch {
                index,
                state_count: self.state_count,
                data: self.write_data.len(),
                addresses: self.write_addresses.len(),
            });
        }
        if self.state_count < 2 {
            return Err(ConfigError::TooFewStates { index, state_count: self.state_count });
        }
        if !self.write_addresses.iter().copied().eq(0..self.state_count) {
            return Err(ConfigError::AddressOrder(index));
        }
        if let Some(state) = self.write_data.iter().position(|&w| w == 0) {
            return Err(ConfigError::ZeroWidth { index, state });
        }
        let sum: u64 = self.write_data.iter().map(|&w| u64::from(w)).sum();
        if sum != u64::from(self.total_cycle_length) {
            return Err(ConfigError::TotalMismatch { index, stored: self.total_cycle_length, sum });
        }
        // Also rules out `[1, 1]`.
        if self.total_cycle_length < MIN_TOTAL_CYCLE_LENGTH {
            return Err(ConfigError::TotalTooShort { index, total: self.total_cycle_length });
        }
        if self.cycle_count < MIN_CYCLE_COUNT {
            return Err(ConfigError::TooFewCycles { index, cycle_count: self.cycle_count });
        }
        if self.init_level > 1 {
            return Err(ConfigError::BadLevel { index, level: self.init_level });
        }
        Ok(())
    }

    /// Last `(address, value)` pair of the write burst.
    #[inline]
    #[must_use]
    pub fn last_pair(&self) -> (u32, u32) {
        (
            self.write_addresses.last().copied().unwrap_or(0),
            self.write_data.last().copied().unwrap_or(0),
        )
    }
}

/* ---------------- Output side ---------------- */

/// One expected-output step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OutputRow {
    /// Step inside the cycle, starting at 1 (0 during the lead-in).
    pub step: u32,
    /// Expected PWM level.
    pub pwm: Level,
    /// Unlock flag; always 0 for the current design.
    pub unlock: Level,
    /// Owning configuration index.
    pub config: usize,
    /// Cycle number, starting at 1 (0 during the lead-in).
    pub cycle: u32,
}

/// Output rows of a single configuration, not yet placed globally.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputFragment {
    /// Configuration index.
    pub config: usize,
    /// Steps per cycle (`total_cycle_length`).
    pub cycle_len: usize,
    /// `cycle_count × cycle_len` rows.
    pub rows: Vec<OutputRow>,
}

/// Global row boundaries of one configuration's output.
///
/// Recorded while the timeline is built; all fields are global row indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConfigSpan {
    /// Step 1 of cycle 1.
    pub start: usize,
    /// One past the last row.
    pub end: usize,
    /// Step 2 of cycle 1.
    pub second_step: usize,
    /// Step 1 of the second-to-last cycle.
    pub last_cycles_start: usize,
    /// Second-to-last step of the last cycle.
    pub second_to_last_step: usize,
}

impl ConfigSpan {
    /// Span of `len` rows starting at `start`, with cycles of `cycle_len`.
    #[must_use]
    pub const fn new(start: usize, len: usize, cycle_len: usize) -> Self {
        let end = start + len;
        Self {
            start,
            end,
            second_step: start + 1,
            last_cycles_start: end.saturating_sub(2 * cycle_len),
            second_to_last_step: end.saturating_sub(2),
        }
    }
}

/// Expected outputs for a whole batch, column-wise.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OutputTimeline {
    /// Step inside the cycle.
    pub step: Vec<u32>,
    /// PWM level.
    pub pwm: Vec<Level>,
    /// Unlock flag.
    pub unlock: Vec<Level>,
    /// Owning configuration.
    pub config: Vec<usize>,
    /// Cycle number.
    pub cycle: Vec<u32>,
    spans: Vec<ConfigSpan>,
}

impl OutputTimeline {
    /// Timeline holding only the idle lead-in.
    #[must_use]
    pub fn with_lead_in() -> Self {
        let mut t = Self::default();
        for _ in 0..LEAD_IN_STEPS {
            t.push(OutputRow { step: 0, pwm: 0, unlock: 0, config: 0, cycle: 0 });
        }
        t
    }

    fn push(&mut self, row: OutputRow) {
        self.step.push(row.step);
        self.pwm.push(row.pwm);
        self.unlock.push(row.unlock);
        self.config.push(row.config);
        self.cycle.push(row.cycle);
    }

    /// Append a configuration's fragment and record its span.
    pub fn append(&mut self, fragment: &OutputFragment) -> ConfigSpan {
        let span = ConfigSpan::new(self.len(), fragment.rows.len(), fragment.cycle_len);
        for row in &fragment.rows {
            self.push(*row);
        }
        self.spans.push(span);
        span
    }

    /// Spans in configuration order.
    #[must_use]
    pub fn spans(&self) -> &[ConfigSpan] {
        &self.spans
    }

    /// Span of the `ordinal`-th appended configuration.
    #[must_use]
    pub fn span(&self, ordinal: usize) -> Option<&ConfigSpan> {
        self.spans.get(ordinal)
    }

    /// Number of rows.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.step.len()
    }

    /// Whether the timeline is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.step.is_empty()
    }

    /// Row `i`, if present.
    #[must_use]
    pub fn row(&self, i: usize) -> Option<OutputRow> {
        Some(OutputRow {
            step: *self.step.get(i)?,
            pwm: *self.pwm.get(i)?,
            unlock: *self.unlock.get(i)?,
            config: *self.config.get(i)?,
            cycle: *self.cycle.get(i)?,
        })
    }

    /// Export as a column table (`step pwm unlock config cycle`).
    pub fn to_table(&self, fmt: CellFormat, pad: usize) -> Result<ColumnTable, TableError> {
        let mut t = ColumnTable::new(pad);
        t.push_numeric("step", self.step.iter().copied(), fmt)?
            .push_numeric("pwm", self.pwm.iter().copied(), fmt)?
            .push_numeric("unlock", self.unlock.iter().copied(), fmt)?
            .push_numeric("config", self.config.iter().map(|&c| c as u64), fmt)?
            .push_numeric("cycle", self.cycle.iter().copied(), fmt)?;
        Ok(t)
    }
}

/* ---------------- Input side ---------------- */

/// One stimulus row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InputRow {
    /// Write enable.
    pub wr_en: Level,
    /// Write address.
    pub wr_addr: u32,
    /// Write data (pulse width).
    pub wr_data: u32,
    /// State count of the configuration being written.
    pub n_addr: u32,
    /// Total cycle length of the configuration being written.
    pub n_tot_cyc: u32,
    /// Update-memory pulse.
    pub upd_mem: Level,
}

/// Input rows for one configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InputFragment {
    /// Configuration index.
    pub config: usize,
    /// Rows, write burst first.
    pub rows: Vec<InputRow>,
    /// Row carrying `upd_mem = 1`.
    pub update_position: usize,
}

/// Where a fragment landed in the global input timeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FragmentBounds {
    /// Configuration index.
    pub config: usize,
    /// First global row.
    pub start: usize,
    /// Row count.
    pub len: usize,
    /// Global row of the update pulse.
    pub update_row: usize,
}

/// Stimulus for a whole batch, column-wise.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InputTimeline {
    /// Write enable.
    pub wr_en: Vec<Level>,
    /// Write address.
    pub wr_addr: Vec<u32>,
    /// Write data.
    pub wr_data: Vec<u32>,
    /// State count.
    pub n_addr: Vec<u32>,
    /// Total cycle length.
    pub n_tot_cyc: Vec<u32>,
    /// Update-memory pulse.
    pub upd_mem: Vec<Level>,
    fragments: Vec<FragmentBounds>,
}

impl InputTimeline {
    fn push(&mut self, row: InputRow) {
        self.wr_en.push(row.wr_en);
        self.wr_addr.push(row.wr_addr);
        self.wr_data.push(row.wr_data);
        self.n_addr.push(row.n_addr);
        self.n_tot_cyc.push(row.n_tot_cyc);
        self.upd_mem.push(row.upd_mem);
    }

    /// Append a fragment and record its bounds.
    pub fn append(&mut self, fragment: &InputFragment) -> FragmentBounds {
        let start = self.len();
        let bounds = FragmentBounds {
            config: fragment.config,
            start,
            len: fragment.rows.len(),
            update_row: start + fragment.update_position,
        };
        for row in &fragment.rows {
            self.push(*row);
        }
        self.fragments.push(bounds);
        bounds
    }

    /// Repeat the last row with `wr_en = 0` and `upd_mem = 0` until `len`.
    pub fn pad_to(&mut self, len: usize) {
        let Some(last) = self.len().checked_sub(1).and_then(|i| self.row(i)) else {
            return;
        };
        let hold = InputRow { wr_en: 0, upd_mem: 0, ..last };
        while self.len() < len {
            self.push(hold);
        }
    }

    /// Fragment bounds in configuration order.
    #[must_use]
    pub fn fragments(&self) -> &[FragmentBounds] {
        &self.fragments
    }

    /// Number of rows.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.wr_en.len()
    }

    /// Whether the timeline is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.wr_en.is_empty()
    }

    /// Row `i`, if present.
    #[must_use]
    pub fn row(&self, i: usize) -> Option<InputRow> {
        Some(InputRow {
            wr_en: *self.wr_en.get(i)?,
            wr_addr: *self.wr_addr.get(i)?,
            wr_data: *self.wr_data.get(i)?,
            n_addr: *self.n_addr.get(i)?,
            n_tot_cyc: *self.n_tot_cyc.get(i)?,
            upd_mem: *self.upd_mem.get(i)?,
        })
    }

    /// Export as a column table (`wr_en wr_addr wr_data n_addr n_tot_cyc upd_mem`).
    pub fn to_table(&self, fmt: CellFormat, pad: usize) -> Result<ColumnTable, TableError> {
        let mut t = ColumnTable::new(pad);
        t.push_numeric("wr_en", self.wr_en.iter().copied(), fmt)?
            .push_numeric("wr_addr", self.wr_addr.iter().copied(), fmt)?
            .push_numeric("wr_data", self.wr_data.iter().copied(), fmt)?
            .push_numeric("n_addr", self.n_addr.iter().copied(), fmt)?
            .push_numeric("n_tot_cyc", self.n_tot_cyc.iter().copied(), fmt)?
            .push_numeric("upd_mem", self.upd_mem.iter().copied(), fmt)?;
        Ok(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frag(config: usize, cycle_len: usize, cycles: usize) -> OutputFragment {
        let rows = (0..cycles * cycle_len)
            .map(|i| OutputRow {
                step: (i % cycle_len) as u32 + 1,
                pwm: 0,
                unlock: 0,
                config,
                cycle: (i / cycle_len) as u32 + 1,
            })
            .collect();
        OutputFragment { config, cycle_len, rows }
    }

    #[test]
    fn configuration_derives_fields() {
        let c = Configuration::new(3, vec![4, 1, 2], 1, 5, 0);
        assert_eq!(c.state_count, 3);
        assert_eq!(c.write_addresses, vec![0, 1, 2]);
        assert_eq!(c.total_cycle_length, 7);
        assert_eq!(c.fragment_len(), 35);
        assert_eq!(c.last_pair(), (2, 2));
    }

    #[test]
    fn validate_accepts_built_and_rejects_tampered() {
        let good = Configuration::new(0, vec![4, 1, 2], 1, 5, 3);
        assert_eq!(good.validate(), Ok(()));

        let mut c = good.clone();
        c.total_cycle_length = 8;
        assert_eq!(c.validate(), Err(ConfigError::TotalMismatch { index: 0, stored: 8, sum: 7 }));

        let mut c = good.clone();
        c.state_count = 4;
        assert!(matches!(c.validate(), Err(ConfigError::StateCountMismatch { data: 3, .. })));

        let mut c = good.clone();
        c.write_addresses = vec![0, 2, 1];
        assert_eq!(c.validate(), Err(ConfigError::AddressOrder(0)));

        let mut c = good.clone();
        c.cycle_count = 3;
        assert!(matches!(c.validate(), Err(ConfigError::TooFewCycles { .. })));

        let mut c = good;
        c.init_level = 2;
        assert!(matches!(c.validate(), Err(ConfigError::BadLevel { level: 2, .. })));

        let ones = Configuration::new(1, vec![1, 1], 0, 4, 0);
        assert_eq!(ones.validate(), Err(ConfigError::TotalTooShort { index: 1, total: 2 }));
    }

    #[test]
    fn spans_record_boundaries() {
        let mut t = OutputTimeline::with_lead_in();
        assert_eq!(t.len(), LEAD_IN_STEPS);

        let a = t.append(&frag(0, 3, 4));
        assert_eq!(a.start, 5);
        assert_eq!(a.end, 17);
        assert_eq!(a.second_step, 6);
        assert_eq!(a.last_cycles_start, 11);
        assert_eq!(a.second_to_last_step, 15);

        let b = t.append(&frag(1, 5, 4));
        assert_eq!(b.start, a.end);
        assert_eq!(t.len(), 37);
        assert_eq!(t.spans(), &[a, b]);

        let r = t.row(a.second_to_last_step).unwrap();
        assert_eq!((r.config, r.cycle, r.step), (0, 4, 2));
    }

    #[test]
    fn input_pad_holds_last_row() {
        let mut t = InputTimeline::default();
        let row = InputRow { wr_en: 1, wr_addr: 1, wr_data: 9, n_addr: 2, n_tot_cyc: 12, upd_mem: 1 };
        let b = t.append(&InputFragment { config: 0, rows: vec![row; 2], update_position: 1 });
        assert_eq!(b.update_row, 1);
        t.pad_to(5);
        assert_eq!(t.len(), 5);
        let tail = t.row(4).unwrap();
        assert_eq!((tail.wr_en, tail.upd_mem, tail.wr_addr, tail.wr_data), (0, 0, 1, 9));
    }

    #[test]
    fn pad_on_empty_timeline_is_noop() {
        let mut t = InputTimeline::default();
        t.pad_to(3);
        assert!(t.is_empty());
    }
}
