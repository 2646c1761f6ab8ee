//! Result-table parsing and CSV report accumulation.

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use crate::error::ReportError;

/// First line of every report.
pub const REPORT_HEADER: &str = "ID,V3 Loop,Subtype,FPR,Percentage";

/// One prediction, reduced to the five reported columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRow {
    pub id: String,
    pub v3_loop: String,
    pub subtype: String,
    pub fpr: String,
    pub percentage: String,
}

impl fmt::Display for ResultRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{},{}",
            self.id, self.v3_loop, self.subtype, self.fpr, self.percentage
        )
    }
}

// Rendered rows come in two shapes. Rows whose subtype cell spills into
// extra tokens push FPR and percentage out to indices 6 and 7; plain
// subtype-B rows keep them at 4 and 5.
const WIDE_COLUMNS: [usize; 5] = [1, 2, 3, 6, 7];
const COMPACT_COLUMNS: [usize; 5] = [1, 2, 3, 4, 5];

/// Parse the rendered text of the result table.
///
/// The first line is the table header and is dropped; blank lines are
/// skipped; every remaining line must produce exactly one row.
pub fn parse_result_table(text: &str) -> Result<Vec<ResultRow>, ReportError> {
    text.lines()
        .skip(1)
        .filter(|line| !line.trim().is_empty())
        .map(parse_row)
        .collect()
}

fn parse_row(line: &str) -> Result<ResultRow, ReportError> {
    let parts: Vec<&str> = line.split_whitespace().collect();

    // A row of exactly 6 tokens is always read as compact, whatever its
    // subtype token says.
    let marker = field(&parts, 3, line)?;
    let columns = if parts.len() != 6 && marker != "B" {
        WIDE_COLUMNS
    } else {
        COMPACT_COLUMNS
    };

    Ok(ResultRow {
        id: field(&parts, columns[0], line)?.to_string(),
        v3_loop: field(&parts, columns[1], line)?.to_string(),
        subtype: field(&parts, columns[2], line)?.to_string(),
        fpr: field(&parts, columns[3], line)?.to_string(),
        percentage: field(&parts, columns[4], line)?.to_string(),
    })
}

fn field<'a>(parts: &[&'a str], index: usize, line: &str) -> Result<&'a str, ReportError> {
    parts
        .get(index)
        .copied()
        .ok_or_else(|| ReportError::TruncatedRow {
            line: line.to_string(),
            found: parts.len(),
        })
}

/// The growing CSV report, owned by the batch loop and written as a whole.
#[derive(Debug, Default)]
pub struct Report {
    rows: Vec<ResultRow>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extend(&mut self, rows: Vec<ResultRow>) {
        self.rows.extend(rows);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Header plus one line per row, no trailing newline.
    pub fn to_csv(&self) -> String {
        let mut out = String::from(REPORT_HEADER);
        for row in &self.rows {
            out.push('\n');
            out.push_str(&row.to_string());
        }
        out
    }

    /// Write the whole report, replacing any previous file.
    pub fn write_to(&self, path: &Path) -> io::Result<()> {
        fs::write(path, self.to_csv())
    }
}
