//! Error types for parameter validation, configuration checks, input-window
//! synthesis, batch generation and table assembly.
//!
//! `WindowError` is the recoverable class: the batch driver discards the
//! whole attempt and regenerates from scratch. Everything else fails fast.

use thiserror::Error;

/// Rejected generator parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParamsError {
    /// At least one configuration must be requested.
    #[error("n_configs must be at least 1")]
    NoConfigs,

    /// A configuration needs two or more states.
    #[error("max_states must be at least 2 (got {0})")]
    TooFewStates(u32),

    /// Pulse widths are drawn from `[1, max_value]`.
    #[error("max_value must be at least 1")]
    ZeroMaxValue,

    /// Cycle counts are drawn from `[4, max_cycles]`.
    #[error("max_cycles must be at least {min} (got {got})")]
    TooFewCycles {
        /// Smallest accepted value.
        min: u32,
        /// Value supplied.
        got: u32,
    },

    /// Serialization width outside the supported range.
    #[error("unsupported data width {0} (supported: 2..=32 bits)")]
    UnsupportedWidth(u32),

    /// Write addresses would not fit in the serialization width.
    #[error("max_states {max_states} does not fit in {data_width}-bit addresses")]
    AddressOverflow {
        /// Requested maximum state count.
        max_states: u32,
        /// Serialization width in bits.
        data_width: u32,
    },

    /// No draw could ever reach the minimum cycle length.
    #[error("max_states × max_value = {0} cannot reach the minimum cycle length of 3")]
    UnreachableTotal(u64),

    /// Retry budget must allow at least one attempt.
    #[error("{0} must be at least 1")]
    ZeroBudget(&'static str),
}

/// Inconsistent timing window met while synthesizing an input fragment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WindowError {
    /// The random draw bounds are inverted.
    #[error("empty {what} window for configuration {ordinal}: [{lo}, {hi}]")]
    EmptyRange {
        /// Which window was being drawn.
        what: &'static str,
        /// Configuration ordinal.
        ordinal: usize,
        /// Lower bound (inclusive).
        lo: i64,
        /// Upper bound (inclusive).
        hi: i64,
    },

    /// The update pulse would land past the end of its fragment.
    #[error("update position {position} outside fragment of {len} rows (configuration {ordinal})")]
    UpdateOutsideFragment {
        /// Configuration ordinal.
        ordinal: usize,
        /// Row offset inside the fragment.
        position: usize,
        /// Fragment length.
        len: usize,
    },

    /// The fragment cannot hold the write burst.
    #[error("fragment of {len} rows cannot hold {state_count} writes (configuration {ordinal})")]
    FragmentTooShort {
        /// Configuration ordinal.
        ordinal: usize,
        /// Fragment length.
        len: usize,
        /// Writes required.
        state_count: u32,
    },

    /// The output timeline has no span for this configuration.
    #[error("output timeline has no span for configuration {0}")]
    MissingSpan(usize),
}

/// Failure of a whole multi-configuration generation pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// Parameters rejected before any draw.
    #[error("invalid parameters: {0}")]
    Params(#[from] ParamsError),

    /// Rejection sampling never produced a legal configuration.
    #[error("no legal configuration for index {index} after {draws} draws")]
    NoLegalConfig {
        /// Configuration index.
        index: usize,
        /// Draws attempted.
        draws: u32,
    },

    /// Every attempt hit a window violation.
    #[error("generation failed after {attempts} attempts; last error: {last}")]
    AttemptsExhausted {
        /// Attempts made.
        attempts: u32,
        /// Error from the final attempt.
        last: WindowError,
    },
}

/// A configuration that breaks its own invariants (e.g. a hand-edited dump).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// `state_count`, `write_data` and `write_addresses` disagree.
    #[error("configuration {index}: state_count {state_count} but {data} widths and {addresses} addresses")]
    StateCountMismatch {
        /// Configuration index.
        index: usize,
        /// Declared state count.
        state_count: u32,
        /// Number of pulse widths.
        data: usize,
        /// Number of addresses.
        addresses: usize,
    },

    /// Fewer than two states.
    #[error("configuration {index}: needs at least 2 states (got {state_count})")]
    TooFewStates {
        /// Configuration index.
        index: usize,
        /// Declared state count.
        state_count: u32,
    },

    /// Addresses are not `0..state_count` in order.
    #[error("configuration {0}: write addresses must be 0..state_count in order")]
    AddressOrder(usize),

    /// A pulse width of zero.
    #[error("configuration {index}: pulse width 0 at state {state}")]
    ZeroWidth {
        /// Configuration index.
        index: usize,
        /// State position.
        state: usize,
    },

    /// The stored total is not the sum of the widths.
    #[error("configuration {index}: total_cycle_length {stored} but widths sum to {sum}")]
    TotalMismatch {
        /// Configuration index.
        index: usize,
        /// Stored total.
        stored: u32,
        /// Actual sum.
        sum: u64,
    },

    /// Total below the minimum cycle length.
    #[error("configuration {index}: total_cycle_length {total} is below 3")]
    TotalTooShort {
        /// Configuration index.
        index: usize,
        /// Stored total.
        total: u32,
    },

    /// Fewer cycles than the minimum.
    #[error("configuration {index}: cycle_count {cycle_count} is below 4")]
    TooFewCycles {
        /// Configuration index.
        index: usize,
        /// Stored cycle count.
        cycle_count: u32,
    },

    /// Initial level other than 0 or 1.
    #[error("configuration {index}: init_level {level} is not 0 or 1")]
    BadLevel {
        /// Configuration index.
        index: usize,
        /// Stored level.
        level: u8,
    },
}

/// Column table assembly error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    /// A pushed column differs in length from the existing ones.
    #[error("column '{column}' has {found} rows, expected {expected}")]
    LengthMismatch {
        /// Offending column.
        column: String,
        /// Row count of the table.
        expected: usize,
        /// Row count of the column.
        found: usize,
    },

    /// A column with this name already exists.
    #[error("duplicate column '{0}'")]
    DuplicateColumn(String),
}
