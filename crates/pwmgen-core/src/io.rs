//! Text file helpers for column tables.
//!
//! Tables are written in one pass after generation has fully succeeded; a
//! failed run never leaves partial files behind from this module.

use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;

use crate::table::ColumnTable;

/// Ensure the parent directory for a file exists (no-op if none).
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir)
                .with_context(|| format!("creating parent directory {}", display(path)))?;
        }
    }
    Ok(())
}

/// Write a table as fixed-width text, one line per row.
pub fn write_table_txt<P: AsRef<Path>>(path: P, table: &ColumnTable) -> Result<()> {
    let path_ref = path.as_ref();
    ensure_parent_dir(path_ref)?;
    let f = File::create(path_ref).with_context(|| format!("create {}", display(path_ref)))?;
    table
        .write_fixed_width(BufWriter::new(f))
        .with_context(|| format!("write table {}", display(path_ref)))?;
    Ok(())
}

/// Concatenate text files in order into `output`.
///
/// Used to stitch tables from several short diagrams into one long
/// simulation run.
pub fn concat_files<P: AsRef<Path>>(inputs: &[P], output: &Path) -> Result<usize> {
    ensure_parent_dir(output)?;
    let f = File::create(output).with_context(|| format!("create {}", display(output)))?;
    let mut w = BufWriter::new(f);
    let mut total = 0u64;
    for input in inputs {
        let p = input.as_ref();
        let src = File::open(p).with_context(|| format!("open {}", display(p)))?;
        total += io::copy(&mut BufReader::new(src), &mut w)
            .with_context(|| format!("copy {} into {}", display(p), display(output)))?;
    }
    w.flush().context("flush writer")?;
    Ok(usize::try_from(total).unwrap_or(usize::MAX))
}

#[inline]
fn display(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
