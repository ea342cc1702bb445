use crate::mapping::Dialect;
use clap::Parser;
use std::path::PathBuf;
use std::process;

#[derive(Debug, Parser)]
#[clap(name = "msgfilter-sieve")]
#[clap(author, version, about)]
pub struct Args {
    /// Path to the Thunderbird msgFilterRules.dat file.
    pub input: PathBuf,
    /// Path of the Sieve script to write.
    #[clap(default_value = "roundcube.sieve")]
    pub output: PathBuf,
    /// Which condition table and folder naming to use.
    #[clap(short, long, value_enum, default_value_t)]
    pub dialect: Dialect,
    /// Log every condition term while converting.
    #[clap(short, long)]
    pub verbose: bool,
    /// Only log errors. Diagnostics are still written into the script.
    #[clap(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Args {
    /// Like `parse`, but usage errors exit with code 1.
    pub fn parse_args() -> Self {
        Self::try_parse().unwrap_or_else(|e| {
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            process::exit(code);
        })
    }

    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else if self.verbose {
            "debug"
        } else {
            "info"
        }
    }
}
