use clap::Parser;
use eyre::{Result, WrapErr};
use ringtape::{RingOptions, Shutdown, ingest};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "ringtape")]
#[command(about = "pipe stdin into a file backed ring buffer")]
struct Args {
    #[arg(help = "path to ring buffer file location")]
    path: PathBuf,

    #[arg(value_parser = parse_capacity, help = "size of ring buffer in bytes (> 0)")]
    capacity: usize,

    #[arg(
        short,
        long,
        value_parser = parse_capacity,
        help = "maximum bytes to read from stdin at a time [default: page size]"
    )]
    chunk_size: Option<usize>,

    #[arg(short, long, help = "keep existing contents of the file instead of zeroing it")]
    keep: bool,

    #[arg(long, help = "pre-fault all pages of the file mapping")]
    populate: bool,
}

fn parse_capacity(value: &str) -> Result<usize, String> {
    match value.parse::<usize>() {
        Ok(0) => Err("has to be an integer greater than 0, got 0".to_string()),
        Ok(size) => Ok(size),
        Err(e) => Err(format!("has to be an integer greater than 0, got {value}: {e}")),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let chunk_size = args.chunk_size.unwrap_or_else(page_size::get);

    let shutdown = Shutdown::new();
    let handler = shutdown.clone();
    ctrlc::set_handler(move || {
        info!("received ctrl+c, shutting down cleanly");
        handler.request();
    })
    .wrap_err("failed to install signal handler")?;

    let mut options = RingOptions::new();
    options.path(&args.path).zero_fill(!args.keep);
    if args.populate {
        options.populate();
    }

    let mut ring = options
        .open(args.capacity)
        .wrap_err_with(|| format!("failed to create ring buffer path={}", args.path.display()))?;

    info!(path = %args.path.display(), capacity = args.capacity, chunk_size, "piping stdin");

    // Ring buffer is released on every path, even when reading fails.
    let ingested = ingest::run_stdin(&mut ring, chunk_size, &shutdown);
    ring.destroy().wrap_err("failed to release ring buffer")?;
    let ingested = ingested.wrap_err("failed to pipe stdin")?;

    info!(
        bytes = ingested.bytes,
        writes = ingested.writes,
        stop = ?ingested.stop,
        "ring buffer closed"
    );

    Ok(())
}
