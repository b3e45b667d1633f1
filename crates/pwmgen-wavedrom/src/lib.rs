//! Wavedrom diagrams as a compact source of testbench vectors.
//!
//! A diagram written for documentation (relaxed JSON, one `signal` entry per
//! wire) is turned into the same fixed-width binary tables the generated
//! stimulus uses:
//!
//! - `relaxed`: repair JS-style object text and extract the signals.
//! - `wave`: expand wave notation into one value per clock position and
//!   format values as fixed-width binary strings.
//! - `classify`: the fixed name → role/order table for the PWM controller.
//! - `convert`: tabulate, split into input/output tables, write the files.
//!
//! ```
//! use pwmgen_wavedrom::convert::convert_text;
//!
//! let text = "{signal: [{name: 'EN', wave: '01.'}, {name: 'EN_CNT', wave: 'x1'},]}";
//! let tables = convert_text(text, 8)?;
//! assert_eq!(tables.inputs.lines().collect::<Vec<_>>(), ["00000000", "00000001", "00000001"]);
//! assert_eq!(tables.outputs.rows(), 2);
//! # Ok::<(), pwmgen_wavedrom::WavedromError>(())
//! ```

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![warn(
    missing_docs,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::unwrap_used,
    clippy::expect_used
)]

/// Signal name classification table.
pub mod classify;
/// Tabulation and file export.
pub mod convert;
/// Relaxed-JSON repair and signal extraction.
pub mod relaxed;
/// Wave notation expansion and bit formatting.
pub mod wave;

mod error;

pub use error::WavedromError;
