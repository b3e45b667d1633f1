//! Tabulation and file export.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use pwmgen_core::{write_table_txt, ColumnTable};
use tracing::{debug, info, warn};

use crate::classify::{classify, SignalRole};
use crate::relaxed::{parse_signals, WaveSignal};
use crate::wave::{expand_wave, BitFormat};
use crate::WavedromError;

/// A signal expanded and formatted, one cell per clock position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TabulatedSignal {
    /// Signal name.
    pub name: String,
    /// Formatted cells.
    pub cells: Vec<String>,
}

/// The two exported tables of one diagram.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConvertedTables {
    /// Testbench-driven signals.
    pub inputs: ColumnTable,
    /// Expected design outputs.
    pub outputs: ColumnTable,
}

/// Expand and format one signal.
pub fn tabulate(sig: &WaveSignal, fmt: &BitFormat) -> Result<TabulatedSignal, WavedromError> {
    let cells = expand_wave(sig)?.iter().map(|v| fmt.format(v)).collect();
    Ok(TabulatedSignal { name: sig.name.clone(), cells })
}

/// Keep the signals with `role`, ordered by display order, truncated to the
/// shortest among them.
pub fn build_table(
    signals: &[TabulatedSignal],
    role: SignalRole,
) -> Result<ColumnTable, WavedromError> {
    let mut picked: Vec<(u32, &TabulatedSignal)> = signals
        .iter()
        .filter_map(|s| {
            classify(&s.name)
                .filter(|c| c.role == role)
                .map(|c| (c.order, s))
        })
        .collect();
    picked.sort_by_key(|(order, _)| *order);

    let mut table = ColumnTable::new(0);
    let Some(shortest) = picked.iter().map(|(_, s)| s.cells.len()).min() else {
        return Ok(table);
    };
    if picked.iter().any(|(_, s)| s.cells.len() != shortest) {
        warn!(?role, rows = shortest, "signals differ in length; truncating to the shortest");
    }
    for (_, s) in picked {
        table.push_cells(s.name.clone(), s.cells[..shortest].to_vec())?;
    }
    Ok(table)
}

/// Convert diagram text to input/output tables of `width`-bit cells.
pub fn convert_text(text: &str, width: u32) -> Result<ConvertedTables, WavedromError> {
    let fmt = BitFormat::new(width)?;
    let signals = parse_signals(text)?
        .iter()
        .map(|s| tabulate(s, &fmt))
        .collect::<Result<Vec<_>, _>>()?;

    for s in &signals {
        if classify(&s.name).is_none() {
            debug!(name = %s.name, "dropping unclassified signal");
        }
    }

    Ok(ConvertedTables {
        inputs: build_table(&signals, SignalRole::Input)?,
        outputs: build_table(&signals, SignalRole::Output)?,
    })
}

/// `<dir>/<stem>_inputs.txt` and `<dir>/<stem>_outputs_ref.txt` next to `path`.
#[must_use]
pub fn output_paths(path: &Path) -> (PathBuf, PathBuf) {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    (
        path.with_file_name(format!("{stem}_inputs.txt")),
        path.with_file_name(format!("{stem}_outputs_ref.txt")),
    )
}

/// Read a diagram file, convert it, and write both tables beside it.
///
/// Returns the `(inputs, outputs)` paths written.
pub fn convert_file(path: &Path, width: u32) -> Result<(PathBuf, PathBuf)> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read diagram {}", path.display()))?;
    let tables = convert_text(&text, width)
        .with_context(|| format!("convert diagram {}", path.display()))?;

    let (inputs_path, outputs_path) = output_paths(path);
    write_table_txt(&inputs_path, &tables.inputs)?;
    write_table_txt(&outputs_path, &tables.outputs)?;
    info!(
        inputs = %inputs_path.display(),
        outputs = %outputs_path.display(),
        rows_in = tables.inputs.rows(),
        rows_out = tables.outputs.rows(),
        "wavedrom tables written"
    );
    Ok((inputs_path, outputs_path))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tab(name: &str, cells: &[&str]) -> TabulatedSignal {
        TabulatedSignal {
            name: name.into(),
            cells: cells.iter().map(|c| (*c).to_owned()).collect(),
        }
    }

    #[test]
    fn orders_by_table_not_by_diagram() {
        let sigs = [
            tab("UPD_MEM", &["u0", "u1"]),
            tab("EN", &["e0", "e1"]),
            tab("N_ADDR", &["a0", "a1"]),
            tab("RD_ADDR", &["r0", "r1"]),
        ];
        let t = build_table(&sigs, SignalRole::Input).unwrap();
        let names: Vec<_> = t.columns().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["EN", "N_ADDR", "UPD_MEM"]);
        assert_eq!(t.lines().next().as_deref(), Some("e0 a0 u0"));
    }

    #[test]
    fn truncates_to_shortest() {
        let sigs = [tab("EN_CNT", &["1", "2", "3"]), tab("RD_ADDR", &["4", "5"])];
        let t = build_table(&sigs, SignalRole::Output).unwrap();
        assert_eq!(t.lines().collect::<Vec<_>>(), ["4 1", "5 2"]);
    }

    #[test]
    fn no_matching_signals_gives_empty_table() {
        let t = build_table(&[tab("CLK", &["1"])], SignalRole::Input).unwrap();
        assert!(t.is_empty());
        assert_eq!(t.rows(), 0);
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let sigs = [tab("EN", &["1"]), tab("EN", &["0"])];
        assert!(matches!(
            build_table(&sigs, SignalRole::Input),
            Err(WavedromError::Table(_))
        ));
    }

    #[test]
    fn output_paths_follow_stem() {
        let (i, o) = output_paths(Path::new("diagrams/reset.json"));
        assert_eq!(i, Path::new("diagrams/reset_inputs.txt"));
        assert_eq!(o, Path::new("diagrams/reset_outputs_ref.txt"));
    }

    #[test]
    fn width_is_checked_before_parsing() {
        assert!(matches!(
            convert_text("not even json", 0),
            Err(WavedromError::UnsupportedWidth(0))
        ));
    }
}
