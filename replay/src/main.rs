mod session;
mod trace;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use log::*;
use tokio::io::AsyncReadExt;
use xstream::{DEFAULT_CAPACITY, DEFAULT_MAX_SEGMENT_SIZE, StreamConfig};

use session::ReplaySession;
use trace::Trace;

/// Replays a segment trace through a reassembler and writes the delivered
/// bytes to stdout.
#[derive(Debug, Parser)]
#[command(name = "replay", version)]
struct Args {
    /// Trace file of `<offset> <-|F> <payload>` lines, or `-` for stdin
    input: PathBuf,

    /// Stream capacity in bytes
    #[arg(long, default_value_t = DEFAULT_CAPACITY)]
    capacity: u64,

    /// Treat the input as raw bytes and cut it into segments of this size
    #[arg(long, value_name = "BYTES")]
    split: Option<usize>,

    /// Shuffle segments with this seed before replaying
    #[arg(long, value_name = "SEED")]
    shuffle_seed: Option<u64>,

    /// Re-send a random quarter of the segments
    #[arg(long)]
    duplicate: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    match run(args).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => {
            warn!("Stream did not finish");
            ExitCode::FAILURE
        }
        Err(e) => {
            error!("Replay failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> std::io::Result<bool> {
    let config = StreamConfig::new()
        .with_capacity(args.capacity)
        .with_max_segment_size(args.split.unwrap_or(DEFAULT_MAX_SEGMENT_SIZE));
    config.validate()?;

    let input = read_input(&args.input).await?;
    info!("Read {} bytes from {:?}", input.len(), args.input);

    let mut trace = match args.split {
        Some(size) => Trace::split(&input, size),
        None => {
            let text = String::from_utf8(input)
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
            Trace::parse(&text)
        }
    };
    trace.scramble(args.shuffle_seed, args.duplicate);

    let mut stdout = tokio::io::stdout();
    let report = ReplaySession::new(config).run(trace, &mut stdout).await?;

    Ok(report.finished && !report.errored)
}

async fn read_input(path: &Path) -> std::io::Result<Vec<u8>> {
    if path.as_os_str() == "-" {
        let mut buf = Vec::new();
        tokio::io::stdin().read_to_end(&mut buf).await?;
        Ok(buf)
    } else {
        tokio::fs::read(path).await
    }
}
