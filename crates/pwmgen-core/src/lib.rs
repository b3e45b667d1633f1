//! pwmgen-core: data model, parameters, column tables and text export.
//!
//! This crate defines the boundary shared by the stimulus generator and the
//! Wavedrom converter:
//! - the testbench data model (`Configuration`, output/input timelines and
//!   the per-configuration boundary spans recorded while they are built),
//! - explicit generator parameters (`GeneratorParams`) loaded from TOML
//!   profiles or CLI flags,
//! - typed errors for parameter, window and table failures, and
//! - the columnar `ColumnTable` with its single transpose-and-format step,
//!   plus the fixed-width text writers built on it.
//!
//! ```
//! use pwmgen_core::{CellFormat, ColumnTable};
//!
//! let mut t = ColumnTable::new(3);
//! t.push_numeric("step", [1u32, 2, 3], CellFormat::Decimal { width: 3 })?;
//! t.push_numeric("pwm", [0u8, 1, 1], CellFormat::Decimal { width: 3 })?;
//! assert_eq!(t.lines().next().as_deref(), Some("  1   0"));
//! # Ok::<(), pwmgen_core::TableError>(())
//! ```

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
// Small, explicit allowlist to keep docs readable and APIs ergonomic.
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::doc_markdown
)]

/// Typed errors for parameters, timing windows, generation and tables.
pub mod error;
/// Fixed-width text writers and file concatenation.
pub mod io;
/// Explicit generator parameters (replaces script-level literals).
pub mod params;
/// Columnar record type and cell formatting.
pub mod table;
/// Testbench data model: configurations, spans and timelines.
pub mod types;

// ---- Re-exports for workspace compatibility ----
pub use error::*;
pub use io::*;
pub use params::*;
pub use table::*;
pub use types::*;

/// Commonly-used items for quick imports.
///
/// ```rust
/// use pwmgen_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        error::{ConfigError, GenerationError, ParamsError, WindowError},
        params::GeneratorParams,
        table::{CellFormat, ColumnTable},
        types::*,
    };
}
