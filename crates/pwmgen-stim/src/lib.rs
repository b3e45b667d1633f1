//! Constrained random stimulus for the PWM controller testbench.
//!
//! The pipeline runs in one direction:
//!
//! - `config`: rejection-sampled `Configuration`s that respect the legality
//!   rules (cycle-length range, forced edge pulses, no `[1, 1]`).
//! - `output`: the deterministic expected waveform of each configuration,
//!   concatenated into a global `OutputTimeline` with recorded spans.
//! - `input`: write bursts and the single update pulse per configuration,
//!   timed against the spans of the current and previous configuration.
//! - `batch`: the whole-batch driver that regenerates from scratch when an
//!   input window turns out empty.
//! - `io`: JSON/CBOR dumps of configurations and the legacy summary text.
//!
//! Everything takes the RNG explicitly; a fixed seed reproduces a batch.
//!
//! We intentionally avoid broad re-exports so callers use stable paths like
//! `pwmgen_stim::batch::generate_batch`.

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

/// Whole-batch generation with bounded retry.
pub mod batch;
/// Rejection-sampled configuration generator.
pub mod config;
/// Input (stimulus) synthesis against output spans.
pub mod input;
/// JSON/CBOR configuration dumps and the summary text format.
pub mod io;
/// Expected-output synthesis.
pub mod output;
