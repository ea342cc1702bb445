mod action;
mod args;
mod condition;
mod convert;
mod diagnostic;
mod mapping;
mod record;
mod rule;
mod utils;

use anyhow::{Context, Result};
use args::Args;
use std::fs;
use std::io;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    let args = Args::parse_args();
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(args.log_level())),
        )
        .init();

    if let Err(e) = do_main(&args) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn do_main(args: &Args) -> Result<()> {
    let text = fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read '{}'", args.input.display()))?;

    let conversion = convert::convert(&text, args.dialect);

    fs::write(&args.output, &conversion.document)
        .with_context(|| format!("failed to write '{}'", args.output.display()))?;

    println!(
        "Sieve rules have been successfully written to {}",
        args.output.display()
    );
    println!("Total rules converted: {}", conversion.rules);
    Ok(())
}
