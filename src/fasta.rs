//! FASTA input: loading, record parsing, and submission batching.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::FastaError;

/// Largest number of sequences the prediction form accepts per submission.
pub const SUBMISSION_LIMIT: usize = 50;

/// One FASTA record: the header line after `>` and the concatenated residues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceRecord {
    pub id: String,
    pub seq: String,
}

/// Load every sequence reachable from `path`, in input order.
///
/// A file is parsed when its name contains `.fa`; a directory contributes all
/// such files, visited in sorted name order. A file input without `.fa` in
/// its name yields no records rather than an error, as does a directory with
/// no matching files.
pub fn load_sequences(path: &Path) -> Result<Vec<SequenceRecord>, FastaError> {
    if path.is_file() {
        if !is_fasta_name(path) {
            warn!(path = %path.display(), "input file is not named like FASTA, nothing to submit");
            return Ok(Vec::new());
        }
        return parse_fasta_file(path);
    }

    if path.is_dir() {
        let mut files: Vec<PathBuf> = fs::read_dir(path)
            .map_err(|source| FastaError::Unlistable {
                path: path.to_path_buf(),
                source,
            })?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|p| p.is_file() && is_fasta_name(p))
            .collect();
        files.sort();

        let mut records = Vec::new();
        for file in &files {
            records.extend(parse_fasta_file(file)?);
        }
        debug!(files = files.len(), records = records.len(), "scanned input directory");
        return Ok(records);
    }

    Err(FastaError::InputMissing(path.to_path_buf()))
}

fn parse_fasta_file(path: &Path) -> Result<Vec<SequenceRecord>, FastaError> {
    let text = fs::read_to_string(path).map_err(|source| FastaError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_fasta(&text))
}

/// A file name containing `.fa` anywhere is treated as FASTA, which covers
/// `.fa`, `.fasta`, `.fa.txt` and friends.
fn is_fasta_name(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.contains(".fa"))
}

/// Parse FASTA text into records.
///
/// A `>` line opens a record with the trimmed remainder as its id; following
/// lines are trimmed and concatenated until the next `>` or end of input.
/// Content before the first `>` is ignored.
pub fn parse_fasta(text: &str) -> Vec<SequenceRecord> {
    let mut records = Vec::new();
    let mut current: Option<SequenceRecord> = None;

    for line in text.lines() {
        if let Some(header) = line.strip_prefix('>') {
            if let Some(record) = current.take() {
                records.push(record);
            }
            current = Some(SequenceRecord {
                id: header.trim().to_string(),
                seq: String::new(),
            });
        } else if let Some(record) = current.as_mut() {
            record.seq.push_str(line.trim());
        }
    }
    if let Some(record) = current {
        records.push(record);
    }

    records
}

/// Partition records into submission-sized batches, preserving order.
pub fn batches(records: &[SequenceRecord]) -> std::slice::Chunks<'_, SequenceRecord> {
    records.chunks(SUBMISSION_LIMIT)
}

/// Serialize a batch into the text the form's sequence field expects.
pub fn to_submission_text(batch: &[SequenceRecord]) -> String {
    batch
        .iter()
        .map(|record| format!(">{}\n{}\n", record.id, record.seq))
        .collect()
}
