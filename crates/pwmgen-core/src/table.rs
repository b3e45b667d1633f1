//! Columnar record type shared by every text exporter.
//!
//! A [`ColumnTable`] is an ordered set of named, equal-length columns of
//! pre-formatted cells. [`ColumnTable::lines`] is the one transpose-and-format
//! step: row `i` is cell `i` of every column, each right-aligned to the table's
//! pad width, joined by a single space, trailing whitespace trimmed.
//!
//! Cells are not escaped; a cell containing a space corrupts the column
//! layout. Inputs are generated, so this is accepted.

use std::io::{self, Write};

use serde::{Deserialize, Serialize};

use crate::error::TableError;

/// How a numeric value becomes a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellFormat {
    /// Decimal, right-aligned and space padded to `width`.
    Decimal {
        /// Minimum cell width.
        width: usize,
    },
    /// Binary, zero padded to `width` bits.
    Binary {
        /// Minimum number of bits.
        width: usize,
    },
}

impl CellFormat {
    /// Format one value.
    #[must_use]
    pub fn format(&self, v: u64) -> String {
        match *self {
            Self::Decimal { width } => format!("{v:>width$}"),
            Self::Binary { width } => format!("{v:0width$b}"),
        }
    }
}

/// One named column of formatted cells.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Column {
    /// Column name (not written to the text output).
    pub name: String,
    /// Formatted cells, one per row.
    pub cells: Vec<String>,
}

/// Ordered set of equal-length named columns.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ColumnTable {
    pad: usize,
    columns: Vec<Column>,
}

impl ColumnTable {
    /// Empty table whose cells are right-aligned to `pad` characters.
    #[must_use]
    pub const fn new(pad: usize) -> Self {
        Self { pad, columns: Vec::new() }
    }

    /// Append a column of already-formatted cells.
    pub fn push_cells(
        &mut self,
        name: impl Into<String>,
        cells: Vec<String>,
    ) -> Result<&mut Self, TableError> {
        let name = name.into();
        if self.columns.iter().any(|c| c.name == name) {
            return Err(TableError::DuplicateColumn(name));
        }
        if let Some(first) = self.columns.first() {
            if first.cells.len() != cells.len() {
                return Err(TableError::LengthMismatch {
                    column: name,
                    expected: first.cells.len(),
                    found: cells.len(),
                });
            }
        }
        self.columns.push(Column { name, cells });
        Ok(self)
    }

    /// Append a numeric column, formatting each value with `fmt`.
    pub fn push_numeric<I>(
        &mut self,
        name: impl Into<String>,
        values: I,
        fmt: CellFormat,
    ) -> Result<&mut Self, TableError>
    where
        I: IntoIterator,
        I::Item: Into<u64>,
    {
        let cells = values.into_iter().map(|v| fmt.format(v.into())).collect();
        self.push_cells(name, cells)
    }

    /// Number of rows (0 for a table without columns).
    #[must_use]
    pub fn rows(&self) -> usize {
        self.columns.first().map_or(0, |c| c.cells.len())
    }

    /// Columns in insertion order.
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Whether the table holds no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Drop every row at or past `len`.
    pub fn truncate(&mut self, len: usize) {
        for c in &mut self.columns {
            c.cells.truncate(len);
        }
    }

    /// Transpose to rows and format each as one text line.
    pub fn lines(&self) -> impl Iterator<Item = String> + '_ {
        let pad = self.pad;
        (0..self.rows()).map(move |i| {
            let line = self
                .columns
                .iter()
                .map(|c| format!("{:>pad$}", c.cells[i]))
                .collect::<Vec<_>>()
                .join(" ");
            line.trim_end().to_owned()
        })
    }

    /// Write every line followed by `\n`.
    pub fn write_fixed_width<W: Write>(&self, mut w: W) -> io::Result<()> {
        for line in self.lines() {
            w.write_all(line.as_bytes())?;
            w.write_all(b"\n")?;
        }
        w.flush()
    }
}
