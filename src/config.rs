use std::path::PathBuf;

use clap::Parser;

/// Watches a local solution, re-runs the judge's sample tests on every
/// rebuild, and submits source plus hidden-input outputs once they pass.
#[derive(Debug, Parser)]
#[command(name = "ojhelper", about, version)]
pub struct Config {
    /// The question number
    #[arg(short = 'q', long)]
    pub problem: u32,

    /// The executable to test and to monitor for rebuilds
    #[arg(short, long, default_value = "a.out")]
    pub executable: PathBuf,

    /// The source file to upload
    #[arg(short, long, default_value = "main.cpp")]
    pub source: PathBuf,

    /// Number of published sample input/output pairs
    #[arg(long, default_value_t = 2)]
    pub samples: usize,

    /// Number of hidden inputs to compute and submit
    #[arg(long, default_value_t = 5)]
    pub hidden: usize,

    /// Session cookie value for the judge
    #[arg(long, env = "SESSION_ID", hide_env_values = true)]
    pub session: String,

    /// Contest term identifier
    #[arg(long, env = "CONTEST_TERM")]
    pub term: String,
}
