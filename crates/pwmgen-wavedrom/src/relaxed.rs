//! Relaxed-JSON repair and signal extraction.
//!
//! Diagrams are usually written in the JS object style the Wavedrom editor
//! accepts: bare keys, single quotes, trailing commas. Three textual rewrites
//! turn that into JSON; anything they miss surfaces as a parse error carrying
//! the repaired text.

use regex::Regex;
use serde_json::Value;
use tracing::error;

use crate::WavedromError;

// Literal patterns; compiling them cannot fail.
#[allow(clippy::expect_used)]
mod patterns {
    use super::Regex;

    lazy_static::lazy_static! {
        pub(super) static ref BARE_KEY: Regex =
            Regex::new(r"([{,]\s*)([A-Za-z0-9_]+)\s*:").expect("bare-key pattern");
        pub(super) static ref TRAILING_COMMA: Regex =
            Regex::new(r",(\s*[}\]])").expect("trailing-comma pattern");
    }
}

/// One wire of a diagram.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WaveSignal {
    /// Signal name (empty if the entry has none).
    pub name: String,
    /// Wave notation, one symbol per clock position.
    pub wave: String,
    /// Labels consumed by data symbols, in order.
    pub data: Vec<String>,
}

/// Quote bare keys, turn single quotes into double quotes, drop trailing
/// commas before `]`/`}`, and trim.
#[must_use]
pub fn repair_relaxed_json(text: &str) -> String {
    let quoted = patterns::BARE_KEY.replace_all(text, r#"${1}"${2}":"#);
    let quoted = quoted.replace('\'', "\"");
    let repaired = patterns::TRAILING_COMMA.replace_all(&quoted, "${1}");
    repaired.trim().to_owned()
}

/// Repair `text`, parse it, and collect every entry of `signal` that has a
/// `wave`. Spacers (`{}`) are skipped; groups (nested arrays) are flattened.
pub fn parse_signals(text: &str) -> Result<Vec<WaveSignal>, WavedromError> {
    let repaired = repair_relaxed_json(text);
    let root: Value = match serde_json::from_str(&repaired) {
        Ok(v) => v,
        Err(source) => {
            error!(%repaired, "repaired diagram text");
            return Err(WavedromError::Json { source, repaired });
        }
    };

    let Value::Object(map) = root else {
        return Err(WavedromError::NotADiagram);
    };
    let mut out = Vec::new();
    if let Some(Value::Array(entries)) = map.get("signal") {
        collect_signals(entries, &mut out);
    }
    Ok(out)
}

fn collect_signals(entries: &[Value], out: &mut Vec<WaveSignal>) {
    for entry in entries {
        match entry {
            Value::Object(map) => {
                let Some(wave) = map.get("wave").and_then(Value::as_str) else {
                    continue;
                };
                out.push(WaveSignal {
                    name: map
                        .get("name")
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_owned(),
                    wave: wave.to_owned(),
                    data: map.get("data").map(data_labels).unwrap_or_default(),
                });
            }
            Value::Array(group) => collect_signals(group, out),
            _ => {}
        }
    }
}

/// `data` may be a list or one whitespace-separated string.
fn data_labels(v: &Value) -> Vec<String> {
    match v {
        Value::Array(items) => items
            .iter()
            .map(|it| match it {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect(),
        Value::String(s) => s.split_whitespace().map(str::to_owned).collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repairs_js_style_objects() {
        let text = "{signal: [\n  {name: 'clk', wave: 'p..'},\n  {name: 'bus', wave: '=.=', data: ['3', '4'],},\n]}\n";
        let fixed = repair_relaxed_json(text);
        assert_eq!(
            fixed,
            r#"{"signal": [
  {"name": "clk", "wave": "p.."},
  {"name": "bus", "wave": "=.=", "data": ["3", "4"]}
]}"#
        );
        let _: Value = serde_json::from_str(&fixed).unwrap();
    }

    #[test]
    fn leaves_strict_json_alone() {
        let text = r#"{"signal": [{"name": "EN", "wave": "01"}]}"#;
        assert_eq!(repair_relaxed_json(text), text);
    }

    #[test]
    fn repair_is_stable_across_calls() {
        let text = "{signal: [{name: 'EN', wave: '01',},]}";
        let once = repair_relaxed_json(text);
        assert_eq!(repair_relaxed_json(text), once);
        assert_eq!(repair_relaxed_json(&once), once);
    }

    #[test]
    fn extracts_signals_groups_and_data_forms() {
        let text = "{signal: [
            {name: 'EN', wave: '01'},
            {},
            ['grp', {name: 'N_ADDR', wave: '==', data: 'a b'}],
            {name: 'N_TOT_CYC', wave: '=', data: [12]},
        ]}";
        let sigs = parse_signals(text).unwrap();
        assert_eq!(sigs.len(), 3);
        assert_eq!(sigs[0], WaveSignal { name: "EN".into(), wave: "01".into(), data: vec![] });
        assert_eq!(sigs[1].data, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(sigs[2].data, vec!["12".to_string()]);
    }

    #[test]
    fn malformed_text_carries_repaired_source() {
        let err = parse_signals("{signal: [ {name: 'EN' wave: '01'} ]}").unwrap_err();
        match err {
            WavedromError::Json { repaired, .. } => assert!(repaired.contains("\"name\": \"EN\"")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn non_object_root_is_rejected() {
        assert!(matches!(parse_signals("[1, 2]"), Err(WavedromError::NotADiagram)));
    }

    #[test]
    fn missing_signal_key_yields_nothing() {
        assert!(parse_signals("{config: {hscale: 2}}").unwrap().is_empty());
    }
}
