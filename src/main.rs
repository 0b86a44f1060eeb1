use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use bdecode::json::{to_json, BytesPolicy};
use bdecode::{DecodeError, Decoder, Value, DEFAULT_MAX_DEPTH};
use clap::{ArgAction, CommandFactory, Parser};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Decode a bencoded file (such as a .torrent) and save it as JSON.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Bencoded input file
    input: Option<PathBuf>,

    /// JSON output file, or `-` for stdout
    output: Option<PathBuf>,

    /// How byte strings that are not valid UTF-8 are written
    #[arg(long, value_enum, default_value_t = BytesPolicy::Lossy)]
    bytes: BytesPolicy,

    /// Reject input with data after the top-level value
    #[arg(long)]
    strict: bool,

    /// Maximum nesting of lists and dictionaries
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Write JSON on a single line instead of indenting it
    #[arg(long)]
    compact: bool,

    /// Log more (-v info, -vv debug, -vvv trace); overrides RUST_LOG
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    let (Some(input), Some(output)) = (args.input.as_deref(), args.output.as_deref()) else {
        println!("{}", Args::command().render_usage());
        return ExitCode::SUCCESS;
    };

    match run(&args, input, output) {
        Ok(()) => {
            if !is_stdout(output) {
                println!("Decoded data saved to {}", output.display());
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            println!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args, input: &Path, output: &Path) -> anyhow::Result<()> {
    let data = fs::read(input).with_context(|| format!("read {}", input.display()))?;
    debug!(path = %input.display(), len = data.len(), "read input");

    let value = decode(&data, args.strict, args.max_depth).context("decode bencoded data")?;
    let json = to_json(&value, args.bytes).context("render JSON")?;

    // Serialize fully before touching the output so a failure leaves nothing behind.
    let text = if args.compact {
        serde_json::to_string(&json)
    } else {
        serde_json::to_string_pretty(&json)
    }
    .context("serialize JSON")?;

    if is_stdout(output) {
        println!("{text}");
    } else {
        fs::write(output, text).with_context(|| format!("write {}", output.display()))?;
        info!(path = %output.display(), "wrote JSON");
    }
    Ok(())
}

fn decode(data: &[u8], strict: bool, max_depth: usize) -> Result<Value, DecodeError> {
    let mut decoder = Decoder::new(data).with_max_depth(max_depth);
    let value = decoder.decode()?;
    if !decoder.is_exhausted() {
        if strict {
            return Err(DecodeError::TrailingData {
                position: decoder.position(),
            });
        }
        debug!(trailing = decoder.remaining().len(), "ignoring trailing data");
    }
    Ok(value)
}

fn is_stdout(output: &Path) -> bool {
    output == Path::new("-")
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
