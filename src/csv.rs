// src/csv.rs
use std::io::{self, Write};
use std::mem::take;

/* ---------------- Parsing ---------------- */

/// One parsed line of a delimited file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Record {
    /// Byte offset of the first character of the row.
    pub start: usize,
    /// False only for a final row that ran into EOF without a line break.
    pub terminated: bool,
    pub cells: Vec<String>,
}

/// Minimal CSV/TSV parser (quotes + CRLF tolerant).
/// Blank lines are skipped.
pub fn parse_records(text: &str, sep: char) -> Vec<Record> {
    let mut records = Vec::new();
    let mut field = String::new();
    let mut row: Vec<String> = Vec::new();
    let mut in_quotes = false;
    let mut row_start = 0usize;
    let mut chars = text.char_indices().peekable();

    while let Some((_, ch)) = chars.next() {
        match ch {
            '"' => {
                if in_quotes {
                    if matches!(chars.peek(), Some((_, '"'))) {
                        chars.next(); // double-quote escape
                        field.push('"');
                    } else {
                        in_quotes = false;
                    }
                } else {
                    in_quotes = true;
                }
            }
            c if c == sep && !in_quotes => {
                row.push(take(&mut field));
            }
            '\n' | '\r' if !in_quotes => {
                if ch == '\r' && matches!(chars.peek(), Some((_, '\n'))) {
                    chars.next();
                }
                row.push(take(&mut field));
                if !(row.len() == 1 && row[0].is_empty()) {
                    records.push(Record { start: row_start, terminated: true, cells: take(&mut row) });
                } else {
                    row.clear();
                }
                row_start = chars.peek().map(|(j, _)| *j).unwrap_or(text.len());
            }
            _ => field.push(ch),
        }
    }

    // Flush a trailing row with no line break, even if quotes were unterminated.
    if !row.is_empty() || !field.is_empty() {
        row.push(field);
        records.push(Record { start: row_start, terminated: false, cells: row });
    }

    records
}

/// Cells only, for callers that do not care about offsets.
pub fn parse_rows(text: &str, sep: char) -> Vec<Vec<String>> {
    parse_records(text, sep).into_iter().map(|r| r.cells).collect()
}

/* ---------------- Writing ---------------- */

fn needs_quotes(field: &str, sep: char) -> bool {
    field.contains(sep) || field.contains('"') || field.contains('\n') || field.contains('\r')
}

/// Write a single CSV/TSV row to any writer.
pub fn write_row<W: Write>(mut w: W, row: &[String], sep: char) -> io::Result<()> {
    let mut first = true;
    for cell in row {
        if !first { write!(w, "{}", sep)?; } else { first = false; }
        if needs_quotes(cell, sep) {
            let escaped = cell.replace('"', "\"\"");
            write!(w, "\"{}\"", escaped)?;
        } else {
            write!(w, "{}", cell)?;
        }
    }
    writeln!(w)
}

/// Serialize an optional header plus rows into one buffer, so the caller can
/// hand the whole batch to the OS in a single write.
pub fn to_bytes(headers: Option<&[String]>, rows: &[Vec<String>], sep: char) -> Vec<u8> {
    let mut buf: Vec<u8> = Vec::new();
    if let Some(h) = headers {
        // Writes into a Vec cannot fail.
        let _ = write_row(&mut buf, h, sep);
    }
    for r in rows {
        let _ = write_row(&mut buf, r, sep);
    }
    buf
}
