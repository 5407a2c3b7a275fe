//! CSV import and export of record collections.
//!
//! Export always writes an `ID,Question,Answer` header followed by one fully
//! quoted row per record, joined with CRLF. Import accepts that format as
//! well as headerless two- and three-column files, and merges rows into an
//! existing collection by id.
//!
//! Rows are split on line terminators before cells are parsed, so quoted
//! values containing literal newlines are not supported.

use std::collections::HashMap;

use chrono::NaiveDate;
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::record::{generate_id, Record};

/// Header row written by [`generate`].
pub const HEADER: &str = "ID,Question,Answer";

/// Line terminator between rows.
const ROW_SEPARATOR: &str = "\r\n";

/// Result of merging CSV rows into a collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportOutcome {
    /// The full collection after the merge.
    pub records: Vec<Record>,
    /// Rows appended as new records.
    pub added: usize,
    /// Rows that replaced an existing record with the same id.
    pub updated: usize,
}

/// Column positions resolved from the first row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Columns {
    id: Option<usize>,
    question: usize,
    answer: usize,
}

/// Render records as CSV text.
#[must_use]
pub fn generate(records: &[Record]) -> String {
    let mut rows = Vec::with_capacity(records.len() + 1);
    rows.push(HEADER.to_string());
    rows.extend(records.iter().map(|record| {
        [
            escape(&record.id),
            escape(&record.question),
            escape(&record.answer),
        ]
        .join(",")
    }));
    rows.join(ROW_SEPARATOR)
}

/// File name for an export made on `date`, e.g. `kp_records_2024-03-09.csv`.
#[must_use]
pub fn export_file_name(prefix: &str, date: NaiveDate) -> String {
    format!("{prefix}_{}.csv", date.format("%Y-%m-%d"))
}

/// Merge CSV text into `current`, generating ids for rows without one.
///
/// A leading byte-order mark is ignored. Returns `Ok(None)` when the text
/// has no non-blank lines.
///
/// # Errors
///
/// Returns [`Error::MissingColumns`] if the question and answer columns
/// cannot be located. No rows are processed in that case.
pub fn parse(text: &str, current: &[Record]) -> Result<Option<ImportOutcome>> {
    parse_with(text, current, generate_id)
}

/// Like [`parse`], with the id generator supplied by the caller.
///
/// # Errors
///
/// Returns [`Error::MissingColumns`] if the question and answer columns
/// cannot be located.
pub fn parse_with<F>(
    text: &str,
    current: &[Record],
    mut next_id: F,
) -> Result<Option<ImportOutcome>>
where
    F: FnMut() -> String,
{
    let text = text.trim_start_matches('\u{FEFF}');
    let lines: Vec<&str> = text
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| !line.trim().is_empty())
        .collect();

    let Some(first) = lines.first() else {
        debug!("CSV text is empty, nothing to import");
        return Ok(None);
    };

    let first_row = split_row(first);
    let has_header = is_header(&first_row);
    let columns = resolve_columns(&first_row, has_header).ok_or(Error::MissingColumns)?;
    debug!(has_header, ?columns, rows = lines.len(), "Resolved CSV columns");

    let mut records = current.to_vec();
    let mut positions: HashMap<String, usize> = HashMap::with_capacity(records.len());
    for (index, record) in records.iter().enumerate() {
        positions.entry(record.id.clone()).or_insert(index);
    }

    let mut added = 0;
    let mut updated = 0;
    let data_start = usize::from(has_header);

    for line in &lines[data_start..] {
        let row = split_row(line);
        let id = columns.id.map_or("", |index| cell(&row, index));
        let question = cell(&row, columns.question);
        let answer = cell(&row, columns.answer);

        if question.is_empty() || answer.is_empty() {
            trace!(line, "Skipping row with a blank question or answer");
            continue;
        }

        let id = if id.is_empty() {
            next_id()
        } else if let Some(&index) = positions.get(id) {
            let record = &mut records[index];
            record.question = question.to_string();
            record.answer = answer.to_string();
            updated += 1;
            continue;
        } else {
            id.to_string()
        };
        positions.entry(id.clone()).or_insert(records.len());
        records.push(Record::with_id(id, question, answer));
        added += 1;
    }

    debug!(added, updated, "CSV merge complete");
    Ok(Some(ImportOutcome {
        records,
        added,
        updated,
    }))
}

/// Quote a value, doubling embedded quotes.
fn escape(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

/// Split one line into cells, honouring quotes.
fn split_row(line: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => cells.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    cells.push(current);
    cells
}

/// Any cell mentioning "question" or "answer" marks the row as a header.
///
/// This is a substring test, so a headerless file whose first question
/// contains the word "question" is read as having a header.
fn is_header(row: &[String]) -> bool {
    row.iter().any(|cell| {
        let cell = cell.to_lowercase();
        cell.contains("question") || cell.contains("answer")
    })
}

fn resolve_columns(first_row: &[String], has_header: bool) -> Option<Columns> {
    if has_header {
        let mut id = None;
        let mut question = None;
        let mut answer = None;
        for (index, name) in first_row.iter().enumerate() {
            match name.trim().to_lowercase().as_str() {
                "id" => id = Some(index),
                "question" => question = Some(index),
                "answer" => answer = Some(index),
                _ => {}
            }
        }
        return Some(Columns {
            id,
            question: question?,
            answer: answer?,
        });
    }

    match first_row.len() {
        3 => Some(Columns {
            id: Some(0),
            question: 1,
            answer: 2,
        }),
        2 => Some(Columns {
            id: None,
            question: 0,
            answer: 1,
        }),
        _ => None,
    }
}

/// Trimmed cell at `index`, or `""` past the end of the row.
fn cell(row: &[String], index: usize) -> &str {
    row.get(index).map_or("", |value| value.trim())
}
