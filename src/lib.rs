//! # coreceptor-submit
//!
//! Automated submission of protein sequences to the geno2pheno coreceptor
//! tropism prediction form, scraping the rendered result table into a CSV
//! report.
//!
//! The flow is strictly sequential: FASTA records are loaded from a file or
//! directory, partitioned into batches of [`fasta::SUBMISSION_LIMIT`], and
//! each batch is pasted into the website's form by a headless browser. The
//! rendered result rows are normalized to five columns and accumulated into
//! a single report, written next to the input.
//!
//! Module map:
//! - `fasta`: input loading, record parsing, batching
//! - `browser`: headless Chromium lifecycle and the form protocol
//! - `report`: result-row normalization and the CSV accumulator
//! - `app`: the batch loop tying the above together
//! - `config` / `logger` / `error`: CLI, tracing setup, typed errors

pub mod app;
pub mod browser;
pub mod config;
pub mod error;
pub mod fasta;
pub mod logger;
pub mod report;

pub use app::{process_batches, App};
pub use browser::{Geno2PhenoForm, Locators, SubmissionForm};
pub use config::Config;
pub use error::{FastaError, ReportError};
pub use fasta::{SequenceRecord, SUBMISSION_LIMIT};
pub use report::{Report, ResultRow, REPORT_HEADER};
