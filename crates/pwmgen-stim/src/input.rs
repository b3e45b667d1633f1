// crates/pwmgen-stim/src/input.rs

//! Input (stimulus) synthesis.
//!
//! Fragment `i` holds configuration `i`'s write burst followed by hold rows,
//! and its length decides where fragment `i + 1`'s burst begins. Timing is
//! read from the spans recorded in the output timeline:
//!
//! - the fragment ends somewhere between step 2 of the first cycle and the
//!   second-to-last step of the last cycle of its own configuration, less
//!   the rows the next configuration's burst will need;
//! - the update pulse lands inside the previous configuration's last two
//!   cycles, and never on the fragment's own write burst.
//!
//! All bounds are global rows; subtracting the rows already emitted makes
//! them fragment-relative.

use rand::Rng;

use pwmgen_core::{Configuration, InputFragment, InputRow, OutputTimeline, WindowError};

/// Everything the synthesizer needs besides the configuration itself.
#[derive(Clone, Copy, Debug)]
pub struct InputContext<'a> {
    /// Position of the configuration in the batch.
    pub ordinal: usize,
    /// Global expected-output timeline, spans recorded.
    pub output: &'a OutputTimeline,
    /// Input rows emitted before this fragment.
    pub consumed: usize,
    /// Previous configuration, if any. Its span is the one at
    /// `ordinal - 1`, whatever its `index` says.
    pub prev: Option<&'a Configuration>,
    /// Next configuration, if any.
    pub next: Option<&'a Configuration>,
}

/// Build the input fragment for `cfg`.
///
/// Draw order is fixed (length, then update position) so a seeded RNG
/// reproduces the fragment.
pub fn synthesize_input<R: Rng>(
    cfg: &Configuration,
    ctx: &InputContext<'_>,
    rng: &mut R,
) -> Result<InputFragment, WindowError> {
    let span = ctx
        .output
        .span(ctx.ordinal)
        .ok_or(WindowError::MissingSpan(ctx.ordinal))?;
    let consumed = as_i64(ctx.consumed);

    let reserve = ctx.next.map_or(0, |n| i64::from(n.state_count));
    let len = draw(
        rng,
        "fragment length",
        ctx.ordinal,
        as_i64(span.second_step) - consumed,
        as_i64(span.second_to_last_step) - reserve - consumed,
    )?;
    let state_count = cfg.state_count as usize;
    if len < state_count {
        return Err(WindowError::FragmentTooShort {
            ordinal: ctx.ordinal,
            len,
            state_count: cfg.state_count,
        });
    }

    let prev_ordinal = ctx.prev.and_then(|_| ctx.ordinal.checked_sub(1));
    let update_position = match prev_ordinal {
        None => cfg.first_update_offset as usize,
        Some(prev) => {
            let prev_span = ctx
                .output
                .span(prev)
                .ok_or(WindowError::MissingSpan(prev))?;
            let p = draw(
                rng,
                "update",
                ctx.ordinal,
                as_i64(prev_span.last_cycles_start) - consumed,
                as_i64(prev_span.second_to_last_step) - consumed,
            )?;
            p.max(state_count)
        }
    };
    if update_position >= len {
        return Err(WindowError::UpdateOutsideFragment {
            ordinal: ctx.ordinal,
            position: update_position,
            len,
        });
    }

    let (hold_addr, hold_data) = cfg.last_pair();
    let rows = (0..len)
        .map(|i| {
            let write = cfg.write_addresses.get(i).zip(cfg.write_data.get(i));
            let (wr_en, wr_addr, wr_data) = match write {
                Some((&a, &d)) => (1, a, d),
                None => (0, hold_addr, hold_data),
            };
            InputRow {
                wr_en,
                wr_addr,
                wr_data,
                n_addr: cfg.state_count,
                n_tot_cyc: cfg.total_cycle_length,
                upd_mem: u8::from(i == update_position),
            }
        })
        .collect();

    Ok(InputFragment {
        config: cfg.index,
        rows,
        update_position,
    })
}

/// Uniform draw from `[max(lo, 0), hi]`.
fn draw<R: Rng>(
    rng: &mut R,
    what: &'static str,
    ordinal: usize,
    lo: i64,
    hi: i64,
) -> Result<usize, WindowError> {
    let lo = lo.max(0);
    if hi < lo {
        return Err(WindowError::EmptyRange { what, ordinal, lo, hi });
    }
    let v = rng.random_range(lo..=hi);
    Ok(usize::try_from(v).unwrap_or(usize::MAX))
}

#[inline]
fn as_i64(v: usize) -> i64 {
    i64::try_from(v).unwrap_or(i64::MAX)
}
