//! I/O helpers for generated configurations.
//!
//! Supports JSON/CBOR dumps with extension-based auto-detection, plus the
//! per-configuration summary text the testbench authors read by eye.

use anyhow::{anyhow, Context, Result};
use pwmgen_core::{ensure_parent_dir, CellFormat, Configuration};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use crate::output::pwm_waveform;

/* ---------------- JSON ---------------- */

/// Read configurations from **JSON**.
pub fn read_configs_json<P: AsRef<Path>>(path: P) -> Result<Vec<Configuration>> {
    let path_ref = path.as_ref();
    let f = File::open(path_ref).with_context(|| format!("open {}", display(path_ref)))?;
    let rdr = BufReader::new(f);
    let v: Vec<Configuration> =
        serde_json::from_reader(rdr).with_context(|| "deserialize JSON configurations")?;
    checked(v)
}

/// Write configurations to **JSON** (pretty).
pub fn write_configs_json<P: AsRef<Path>>(path: P, v: &[Configuration]) -> Result<()> {
    let path_ref = path.as_ref();
    ensure_parent_dir(path_ref)?;
    let f = File::create(path_ref).with_context(|| format!("create {}", display(path_ref)))?;
    let mut w = BufWriter::new(f);
    serde_json::to_writer_pretty(&mut w, v).with_context(|| "serialize JSON configurations")?;
    w.flush().with_context(|| "flush JSON writer")?;
    Ok(())
}

/* ---------------- CBOR ---------------- */

/// Read configurations from **CBOR**.
pub fn read_configs_cbor<P: AsRef<Path>>(path: P) -> Result<Vec<Configuration>> {
    let path_ref = path.as_ref();
    let f = File::open(path_ref).with_context(|| format!("open {}", display(path_ref)))?;
    let mut rdr = BufReader::new(f);
    let v: Vec<Configuration> =
        ciborium::de::from_reader(&mut rdr).with_context(|| "deserialize CBOR configurations")?;
    checked(v)
}

/// Write configurations to **CBOR**.
pub fn write_configs_cbor<P: AsRef<Path>>(path: P, v: &[Configuration]) -> Result<()> {
    let path_ref = path.as_ref();
    ensure_parent_dir(path_ref)?;
    let f = File::create(path_ref).with_context(|| format!("create {}", display(path_ref)))?;
    let mut w = BufWriter::new(f);
    ciborium::ser::into_writer(v, &mut w).with_context(|| "serialize CBOR configurations")?;
    w.flush().with_context(|| "flush CBOR writer")?;
    Ok(())
}

/* --------------- Auto-detect by extension --------------- */

/// Auto-detect **read** by extension (`.json` / `.cbor`, case-insensitive).
pub fn read_configs_auto<P: AsRef<Path>>(path: P) -> Result<Vec<Configuration>> {
    match ext_lower(path.as_ref()).as_deref() {
        Some("json") => read_configs_json(path),
        Some("cbor") => read_configs_cbor(path),
        Some(other) => Err(anyhow!(
            "unsupported configuration extension: {} (supported: .json, .cbor)",
            other
        )),
        None => Err(anyhow!("path has no extension (expected .json or .cbor)")),
    }
}

/// Auto-detect **write** (defaults to JSON if unknown/missing).
pub fn write_configs_auto<P: AsRef<Path>>(path: P, v: &[Configuration]) -> Result<()> {
    match ext_lower(path.as_ref()).as_deref() {
        Some("cbor") => write_configs_cbor(path, v),
        _ => write_configs_json(path, v),
    }
}

/* ---------------- Summary text ---------------- */

/// Write the summary block of every configuration to `w`.
///
/// Per configuration, one line each: state count, addresses, widths, total,
/// init level, first update offset, expanded waveform, cycle count; then a
/// separator of `4 ×` waveform-length dashes. Numbers are 3 wide.
pub fn format_config_summary<W: Write>(mut w: W, configs: &[Configuration]) -> Result<()> {
    for c in configs {
        let wave = pwm_waveform(c);
        writeln!(w, "{}", cells([c.state_count]))?;
        writeln!(w, "{}", cells(c.write_addresses.iter().copied()))?;
        writeln!(w, "{}", cells(c.write_data.iter().copied()))?;
        writeln!(w, "{}", cells([c.total_cycle_length]))?;
        writeln!(w, "{}", cells([c.init_level]))?;
        writeln!(w, "{}", cells([c.first_update_offset]))?;
        writeln!(w, "{}", cells(wave.iter().copied()))?;
        writeln!(w, "{}", cells([c.cycle_count]))?;
        writeln!(w, "{}", "-".repeat(4 * wave.len()))?;
    }
    w.flush().context("flush summary")?;
    Ok(())
}

/// Write the summary text to a file.
pub fn write_config_summary<P: AsRef<Path>>(path: P, configs: &[Configuration]) -> Result<()> {
    let path_ref = path.as_ref();
    ensure_parent_dir(path_ref)?;
    let f = File::create(path_ref).with_context(|| format!("create {}", display(path_ref)))?;
    format_config_summary(BufWriter::new(f), configs)
        .with_context(|| format!("write summary {}", display(path_ref)))
}

/* ---------------- Small helpers ---------------- */

/// Loaded dumps may be hand-edited; reject anything the generator could not
/// have produced.
fn checked(v: Vec<Configuration>) -> Result<Vec<Configuration>> {
    for c in &v {
        c.validate().context("invalid configuration in dump")?;
    }
    Ok(v)
}

fn cells<I>(values: I) -> String
where
    I: IntoIterator,
    I::Item: Into<u64>,
{
    let fmt = CellFormat::Decimal { width: 3 };
    values
        .into_iter()
        .map(|v| fmt.format(v.into()))
        .collect::<Vec<_>>()
        .join(" ")
}

#[inline]
fn ext_lower(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_ascii_lowercase())
}

#[inline]
fn display(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tmp(name: &str) -> std::path::PathBuf {
        let mut p = std::env::temp_dir();
        p.push(format!("pwmgen_stim_io_{}_{name}", std::process::id()));
        p
    }

    fn sample() -> Vec<Configuration> {
        vec![
            Configuration::new(0, vec![2, 1], 1, 4, 3),
            Configuration::new(1, vec![1, 3, 2], 0, 6, 0),
        ]
    }

    #[test]
    fn json_and_cbor_round_trip() {
        for name in ["cfg.json", "cfg.cbor"] {
            let p = tmp(name);
            write_configs_auto(&p, &sample()).unwrap();
            assert_eq!(read_configs_auto(&p).unwrap(), sample());
            let _ = std::fs::remove_file(p);
        }
    }

    #[test]
    fn tampered_dump_is_rejected() {
        let mut v = sample();
        v[1].total_cycle_length += 1;
        let p = tmp("tampered.json");
        write_configs_json(&p, &v).unwrap();
        let err = read_configs_auto(&p).unwrap_err();
        assert!(format!("{err:#}").contains("total_cycle_length 7 but widths sum to 6"));
        let _ = std::fs::remove_file(p);
    }

    #[test]
    fn rejects_unknown_extension_on_read() {
        let err = read_configs_auto(tmp("cfg.yaml")).unwrap_err();
        assert!(err.to_string().contains("unsupported configuration extension"));
    }

    #[test]
    fn summary_matches_legacy_layout() {
        let mut buf = Vec::new();
        format_config_summary(&mut buf, &sample()[..1]).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let expected = [
            "  2",
            "  0   1",
            "  2   1",
            "  3",
            "  1",
            "  3",
            "  1   1   0",
            "  4",
            "------------",
        ]
        .join("\n")
            + "\n";
        assert_eq!(text, expected);
    }
}
