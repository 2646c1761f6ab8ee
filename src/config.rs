use std::path::{Path, PathBuf};

use clap::Parser;

/// Job name used when the caller passes no identifier (or an empty one).
pub const DEFAULT_JOB_ID: &str = "Geno2PhenoTest_log";

/// Run configuration. Everything beyond the two positional arguments has a
/// working default and can also be set through the environment.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "coreceptor-submit",
    about = "Submit FASTA sequences to the geno2pheno coreceptor form and scrape the results into a CSV report"
)]
pub struct Config {
    /// FASTA file, or directory containing FASTA files
    pub input_path: PathBuf,

    /// Job identifier used to name the output CSV
    #[arg(default_value = DEFAULT_JOB_ID)]
    pub job_id: String,

    /// URL of the coreceptor prediction form
    #[arg(
        long,
        env = "CORECEPTOR_URL",
        default_value = "https://coreceptor.geno2pheno.org/"
    )]
    pub target_url: String,

    /// Chrome/Chromium executable to launch instead of the detected one
    #[arg(long, env = "CHROME_EXECUTABLE")]
    pub chrome_executable: Option<PathBuf>,

    /// Seconds to wait for the result table to render after a submission
    #[arg(long, default_value_t = 180)]
    pub results_timeout_secs: u64,

    /// Rewrite the report after every batch instead of once at the end
    #[arg(long, default_value_t = false)]
    pub flush_each_batch: bool,
}

impl Config {
    /// Effective job identifier; an empty argument falls back to the default.
    pub fn job_id(&self) -> &str {
        if self.job_id.is_empty() {
            DEFAULT_JOB_ID
        } else {
            &self.job_id
        }
    }

    /// Destination of the CSV report: `<job_id>.csv` inside the input
    /// directory, or next to the input file.
    pub fn output_path(&self) -> PathBuf {
        let dir = if self.input_path.is_dir() {
            self.input_path.as_path()
        } else {
            self.input_path.parent().unwrap_or_else(|| Path::new(""))
        };
        dir.join(format!("{}.csv", self.job_id()))
    }
}
