use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use chromiumoxide::Browser;
use tracing::info;

use crate::browser::{launch_headless_browser, shutdown_browser, Geno2PhenoForm, SubmissionForm};
use crate::config::Config;
use crate::fasta::{self, SequenceRecord, SUBMISSION_LIMIT};
use crate::report::{self, Report};

/// One run of the tool: the browser session and its configuration.
pub struct App {
    config: Config,
    browser: Option<Browser>,
    form: Geno2PhenoForm,
}

impl App {
    /// Launch the browser and open the prediction form.
    pub async fn initialize(config: Config) -> Result<Self> {
        let (browser, page) =
            launch_headless_browser(&config.target_url, config.chrome_executable.as_deref())
                .await?;
        let form = Geno2PhenoForm::new(page, Duration::from_secs(config.results_timeout_secs));

        Ok(Self {
            config,
            browser: Some(browser),
            form,
        })
    }

    /// Load the input, submit it batch by batch, and write the report.
    pub async fn run(&self) -> Result<()> {
        let started = Instant::now();

        let sequences = fasta::load_sequences(&self.config.input_path)?;
        info!(sequences = sequences.len(), "loaded input sequences");

        let output_path = self.config.output_path();
        let flush_to = self
            .config
            .flush_each_batch
            .then_some(output_path.as_path());

        let report = process_batches(&self.form, &sequences, flush_to).await?;

        report
            .write_to(&output_path)
            .with_context(|| format!("failed to write report to {}", output_path.display()))?;
        info!(
            rows = report.len(),
            path = %output_path.display(),
            elapsed = ?started.elapsed(),
            "report written"
        );

        Ok(())
    }

    /// Close the browser. Called once per run, on success and failure alike.
    pub async fn shutdown(&mut self) {
        if let Some(browser) = self.browser.take() {
            shutdown_browser(browser).await;
        }
    }
}

/// Submit every batch in order, accumulating parsed rows into one report.
///
/// When `flush_to` is set, the accumulated report is rewritten after each
/// batch so a late failure keeps the completed batches on disk.
pub async fn process_batches<F: SubmissionForm>(
    form: &F,
    sequences: &[SequenceRecord],
    flush_to: Option<&Path>,
) -> Result<Report> {
    let mut report = Report::new();
    let total = sequences.len().div_ceil(SUBMISSION_LIMIT);

    for (index, batch) in fasta::batches(sequences).enumerate() {
        let number = index + 1;
        info!(batch = number, total, size = batch.len(), "submitting batch");

        let fasta_text = fasta::to_submission_text(batch);
        let rendered = form
            .submit(&fasta_text)
            .await
            .with_context(|| format!("submission of batch {number} failed"))?;
        let rows = report::parse_result_table(&rendered)
            .with_context(|| format!("batch {number} returned an unparseable result table"))?;
        info!(batch = number, rows = rows.len(), "batch parsed");
        report.extend(rows);

        form.reset()
            .await
            .with_context(|| format!("failed to reset the form after batch {number}"))?;

        if let Some(path) = flush_to {
            report
                .write_to(path)
                .with_context(|| format!("failed to flush report to {}", path.display()))?;
        }
    }

    Ok(report)
}
