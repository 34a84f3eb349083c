//! Command-line RDS decoder.
//!
//! Reads the FM multiplex baseband as signed 16-bit little-endian PCM at
//! 228 kHz from standard input and prints one record per received RDS group.
//!
//! # Usage Examples
//!
//! ## Decode from an SDR front-end
//! ```bash
//! rtl_fm -f 99.1M -M fm -s 228k | rdsdec
//! ```
//!
//! ## Decode a recorded capture
//! ```bash
//! rdsdec < capture_228k_s16le.raw
//! ```
//!
//! ## Decode an ASCII bit stream
//! ```bash
//! rdsdec --ascii-bits < bits.txt
//! ```
//!
//! ## Strict JSON output for downstream tooling
//! ```bash
//! rdsdec --json | jq .ps
//! ```

use std::io::{self, BufWriter, Write};
use std::process::ExitCode;

use clap::{ArgAction, Parser};
use rdsmpx::{AsciiBitSource, BitSource, DpskDemodulator, RdsReceiver};
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(author, version, about = "RDS decoder for FM multiplex baseband on standard input", long_about = None)]
struct Args {
    /// Read an ASCII bit stream ('0'/'1' characters, everything else
    /// ignored) instead of PCM samples
    #[arg(short = 'b', long)]
    ascii_bits: bool,

    /// Output strict JSON records (one object per line)
    #[arg(long)]
    json: bool,

    /// Verbosity level (-v=info, -vv=debug, -vvv=trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Records go to stdout; logging stays on stderr so the output remains
    // machine-readable.
    let log_level = match args.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    let _ = tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(io::stderr)
        .try_init();

    let stdin = io::stdin().lock();
    let result = if args.ascii_bits {
        info!("decoding RDS groups from an ASCII bit stream");
        run(RdsReceiver::new(AsciiBitSource::new(stdin)), args.json)
    } else {
        info!("decoding RDS groups from 228 kHz s16le MPX samples");
        run(RdsReceiver::new(DpskDemodulator::new(stdin)), args.json)
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run<S: BitSource>(mut receiver: RdsReceiver<S>, json: bool) -> rdsmpx::Result<()> {
    let stdout = io::stdout().lock();
    let mut out = BufWriter::new(stdout);

    while let Some(record) = receiver.next_record()? {
        if json {
            let line = serde_json::to_string(&record)
                .map_err(|e| io::Error::other(format!("record serialisation failed: {}", e)))?;
            writeln!(out, "{}", line)?;
        } else {
            writeln!(out, "{}", record)?;
        }
        // Groups arrive at ~11 per second; flush per record so consumers
        // see them live.
        out.flush()?;
    }
    Ok(())
}
