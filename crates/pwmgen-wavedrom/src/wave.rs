//! Wave notation expansion and bit formatting.
//!
//! Symbols, one per clock position:
//! - `1 p P h H` high, `0 n N l L` low,
//! - `x X` undefined,
//! - `.` repeats the previous value (undefined when nothing precedes it),
//! - `|` is a gap marker and emits [`WaveValue::Repeat`],
//! - anything else (`=`, `2`..`9`, ...) consumes the next `data` label, or
//!   acts like `.` when the signal has no labels at all.

use crate::relaxed::WaveSignal;
use crate::WavedromError;

/// Cell written for a gap marker, regardless of width.
pub const REPEAT_SENTINEL: &str = "UUUUUUUU";

/// Value of a signal at one clock position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WaveValue {
    /// Logic level, 0 or 1.
    Bit(u8),
    /// `x` or a leading `.`.
    Undefined,
    /// `|` gap marker.
    Repeat,
    /// A data label, decimal if it is meant to be written as a number.
    Literal(String),
}

/// Expand `sig.wave` into one value per symbol.
pub fn expand_wave(sig: &WaveSignal) -> Result<Vec<WaveValue>, WavedromError> {
    let mut labels = sig.data.iter();
    let mut out = Vec::with_capacity(sig.wave.len());
    let mut prev: Option<WaveValue> = None;

    for (position, ch) in sig.wave.chars().enumerate() {
        let value = match ch {
            '1' | 'p' | 'P' | 'h' | 'H' => WaveValue::Bit(1),
            '0' | 'n' | 'N' | 'l' | 'L' => WaveValue::Bit(0),
            'x' | 'X' => WaveValue::Undefined,
            '.' => prev.clone().unwrap_or(WaveValue::Undefined),
            '|' => {
                out.push(WaveValue::Repeat);
                continue;
            }
            _ if sig.data.is_empty() => prev.clone().unwrap_or(WaveValue::Undefined),
            _ => match labels.next() {
                Some(label) => WaveValue::Literal(label.clone()),
                None => {
                    return Err(WavedromError::MissingData {
                        signal: sig.name.clone(),
                        position,
                    })
                }
            },
        };
        prev = Some(value.clone());
        out.push(value);
    }
    Ok(out)
}

/// Fixed-width binary cell formatter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BitFormat {
    width: u32,
}

impl BitFormat {
    /// Formatter for `width` bits, 1..=32.
    pub fn new(width: u32) -> Result<Self, WavedromError> {
        if width == 0 || width > 32 {
            return Err(WavedromError::UnsupportedWidth(width));
        }
        Ok(Self { width })
    }

    /// Bits per cell.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Cell for a label that is not a representable number.
    #[must_use]
    pub fn error_sentinel(&self) -> String {
        "X".repeat(self.width as usize)
    }

    /// Format one value.
    ///
    /// Undefined is all zeros. Literals must be unsigned decimal and fit the
    /// width; anything else becomes [`Self::error_sentinel`].
    #[must_use]
    pub fn format(&self, v: &WaveValue) -> String {
        let w = self.width as usize;
        match v {
            WaveValue::Bit(b) => format!("{:0w$b}", b),
            WaveValue::Undefined => "0".repeat(w),
            WaveValue::Repeat => REPEAT_SENTINEL.to_owned(),
            WaveValue::Literal(s) => self
                .parse_literal(s)
                .map_or_else(|| self.error_sentinel(), |n| format!("{n:0w$b}")),
        }
    }

    fn parse_literal(&self, s: &str) -> Option<u64> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let n: u64 = s.parse().ok()?;
        (n >> self.width == 0).then_some(n)
    }
}
