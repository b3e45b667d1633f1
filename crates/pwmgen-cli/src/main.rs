// crates/pwmgen-cli/src/main.rs

#![forbid(unsafe_code)]
#![deny(
    rust_2018_idioms,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo
)]

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use pwmgen_core::{concat_files, write_table_txt, CellFormat, GeneratorParams};
use pwmgen_stim::{
    batch::generate_batch_seeded,
    io::{read_configs_auto, write_config_summary, write_configs_auto},
};
use rand::Rng;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const INPUTS_FILE: &str = "pwm_top_inputs.txt";
const OUTPUTS_FILE: &str = "pwm_top_outputs_ref.txt";
const CONFIGS_FILE: &str = "pwm_top_configs.txt";

#[derive(Parser, Debug)]
#[command(
    name = "pwmgen",
    about = "PWM controller testbench vector generator",
    long_about = "PWM controller testbench vector generator.\n\nUse this tool to generate randomized stimulus with matching expected outputs, and to turn Wavedrom diagrams into the same fixed-width tables.",
    version = env!("CARGO_PKG_VERSION"),
    disable_help_subcommand = true
)]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Generate a random batch of configurations with inputs and expected outputs.
    Generate(GenerateArgs),

    /// Rewrite a saved configuration dump (JSON/CBOR) as the summary text.
    Summarize {
        /// Configuration dump written by `generate --save-configs`
        #[arg(long)]
        configs: PathBuf,

        /// Output summary path
        #[arg(long)]
        out: PathBuf,
    },

    /// Convert a Wavedrom diagram into `<stem>_inputs.txt` / `<stem>_outputs_ref.txt`.
    Wavedrom {
        /// Diagram file (relaxed JSON)
        path: PathBuf,

        /// Bits per cell (1..=32)
        #[arg(long, default_value_t = 8)]
        width: u32,
    },

    /// Concatenate text tables in order
    Concat {
        /// Output path
        #[arg(long)]
        output: PathBuf,

        /// Input tables
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// TOML profile with generator parameters; flags below override it
    #[arg(long)]
    profile: Option<PathBuf>,

    /// RNG seed (random and logged when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Directory for the three output files
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Number of configurations
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    configs: Option<u64>,

    /// Maximum state count per configuration
    #[arg(long)]
    max_states: Option<u32>,

    /// Maximum pulse width
    #[arg(long)]
    max_value: Option<u32>,

    /// Maximum cycle count
    #[arg(long)]
    max_cycles: Option<u32>,

    /// Serialization width in bits
    #[arg(long)]
    data_width: Option<u32>,

    /// Write zero-padded binary cells instead of right-aligned decimal
    #[arg(long, default_value_t = false)]
    binary: bool,

    /// Also dump the configurations (CBOR/JSON by extension)
    #[arg(long)]
    save_configs: Option<PathBuf>,
}

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    match cli.cmd {
        Cmd::Generate(args) => generate(&args),
        Cmd::Summarize { configs, out } => summarize(&configs, &out),
        Cmd::Wavedrom { path, width } => wavedrom(&path, width),
        Cmd::Concat { output, inputs } => concat(&inputs, &output),
    }
}

/// Initialize tracing with an env-driven filter (default INFO).
fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .with_writer(std::io::stderr)
        .compact();

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}

/// Profile (or defaults), then flag overrides, then validation.
fn load_params(args: &GenerateArgs) -> Result<GeneratorParams> {
    let mut params: GeneratorParams = match &args.profile {
        Some(path) => {
            let src = fs::read_to_string(path)
                .with_context(|| format!("read profile {}", path.display()))?;
            toml::from_str(&src).with_context(|| format!("parse profile {}", path.display()))?
        }
        None => GeneratorParams::default(),
    };

    if let Some(n) = args.configs {
        params.n_configs = usize::try_from(n).context("--configs does not fit in usize")?;
    }
    if let Some(v) = args.max_states {
        params.max_states = v;
    }
    if let Some(v) = args.max_value {
        params.max_value = v;
    }
    if let Some(v) = args.max_cycles {
        params.max_cycles = v;
    }
    if let Some(v) = args.data_width {
        params.data_width = v;
    }

    params.validate().context("invalid generator parameters")?;
    Ok(params)
}

fn generate(args: &GenerateArgs) -> Result<()> {
    let params = load_params(args)?;
    let seed = args.seed.unwrap_or_else(|| rand::rng().random());

    info!(seed, n_configs = params.n_configs, out_dir = %args.out_dir.display(), "generating batch");
    let batch = generate_batch_seeded(&params, seed)
        .with_context(|| format!("generating batch (seed {seed})"))?;

    let (fmt, pad) = if args.binary {
        (CellFormat::Binary { width: params.data_width as usize }, 0)
    } else {
        let width = params.decimal_cell_width();
        (CellFormat::Decimal { width }, width)
    };
    let inputs = batch.input.to_table(fmt, pad).context("tabulate inputs")?;
    let outputs = batch.output.to_table(fmt, pad).context("tabulate outputs")?;

    let dir = &args.out_dir;
    write_table_txt(dir.join(INPUTS_FILE), &inputs)?;
    write_table_txt(dir.join(OUTPUTS_FILE), &outputs)?;
    write_config_summary(dir.join(CONFIGS_FILE), &batch.configs)?;
    if let Some(path) = &args.save_configs {
        write_configs_auto(path, &batch.configs)
            .with_context(|| format!("saving configurations to {}", path.display()))?;
    }

    println!(
        "Generated {} configurations in {} attempt(s), {} rows (seed {seed}) → {}",
        batch.configs.len(),
        batch.attempts,
        batch.output.len(),
        dir.display()
    );
    Ok(())
}

fn summarize(configs: &Path, out: &Path) -> Result<()> {
    info!(configs = %configs.display(), out = %out.display(), "summarizing configurations");
    let v = read_configs_auto(configs)
        .with_context(|| format!("reading configurations from {}", configs.display()))?;
    write_config_summary(out, &v)?;

    println!("Summarized {} configurations → {}", v.len(), out.display());
    Ok(())
}

fn wavedrom(path: &Path, width: u32) -> Result<()> {
    info!(path = %path.display(), width, "converting wavedrom diagram");
    let (inputs, outputs) = pwmgen_wavedrom::convert::convert_file(path, width)?;

    println!("Converted {} → {}, {}", path.display(), inputs.display(), outputs.display());
    Ok(())
}

fn concat(inputs: &[PathBuf], output: &Path) -> Result<()> {
    info!(n = inputs.len(), output = %output.display(), "concatenating tables");
    let bytes = concat_files(inputs, output)?;

    println!("Concatenated {} files ({bytes} bytes) → {}", inputs.len(), output.display());
    Ok(())
}
