// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::error::Error;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fs::read;
use std::path::Path;
use std::path::PathBuf;

use csv::ReaderBuilder;

use crate::error::Fallible;
use crate::types::card::Card;
use crate::types::deck::Deck;
use crate::types::timestamp::Timestamp;

pub const MAX_FIELD_LENGTH: usize = 500;
pub const MAX_ROW_COUNT: usize = 10_000;

const HEADER_WORDS: [&str; 4] = ["front", "back", "fronte", "retro"];

#[derive(Debug, PartialEq)]
pub enum ImportError {
    FileNotFound(PathBuf),
    Encoding,
    EmptyFile,
    NoSeparator {
        line: usize,
    },
    InvalidFormat {
        line: usize,
    },
    EmptyFields {
        line: usize,
    },
    FieldTooLong {
        field: &'static str,
        line: usize,
        length: usize,
    },
    TooManyRows(usize),
    NoCards,
    Malformed {
        line: usize,
        message: String,
    },
}

impl Display for ImportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportError::FileNotFound(path) => {
                write!(f, "file not found: {}.", path.display())
            }
            ImportError::Encoding => write!(f, "file is not valid UTF-8."),
            ImportError::EmptyFile => write!(f, "file is empty."),
            ImportError::NoSeparator { line } => {
                write!(f, "line {line}: no valid separator found (use ; or ,).")
            }
            ImportError::InvalidFormat { line } => {
                write!(f, "line {line}: expected a front and a back field.")
            }
            ImportError::EmptyFields { line } => write!(f, "line {line}: empty fields found."),
            ImportError::FieldTooLong {
                field,
                line,
                length,
            } => write!(
                f,
                "line {line}: {field} is {length} characters long (maximum {MAX_FIELD_LENGTH})."
            ),
            ImportError::TooManyRows(count) => {
                write!(f, "too many rows: {count} (maximum {MAX_ROW_COUNT}).")
            }
            ImportError::NoCards => write!(f, "no cards found."),
            ImportError::Malformed { line, message } => write!(f, "line {line}: {message}"),
        }
    }
}

impl Error for ImportError {}

/// One data row of an import file.
#[derive(Debug, PartialEq)]
pub struct Row {
    pub front: String,
    pub back: String,
    /// One-based line number in the file.
    pub line: usize,
}

/// Parse the text of an import file into rows.
///
/// Blank lines are skipped, and a first line that mentions a column name is
/// taken to be a header. Each line uses `;` as its separator if it has one,
/// and `,` otherwise. Fields may be double-quoted, and a quoted field may
/// span several lines.
pub fn parse_rows(content: &str) -> Result<Vec<Row>, ImportError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut lines = records(content);
    let Some((_, first)) = lines.first() else {
        return Err(ImportError::EmptyFile);
    };
    if is_header(first) {
        log::debug!("Skipping header row.");
        lines.remove(0);
    }
    if lines.len() > MAX_ROW_COUNT {
        return Err(ImportError::TooManyRows(lines.len()));
    }

    let mut rows = Vec::with_capacity(lines.len());
    for (line, text) in lines {
        let fields = split_line(&text, line)?;
        if fields.len() < 2 {
            return Err(ImportError::InvalidFormat { line });
        }
        let front = fields[0].trim();
        let back = fields[1].trim();
        if front.is_empty() || back.is_empty() {
            return Err(ImportError::EmptyFields { line });
        }
        check_length("front", front, line)?;
        check_length("back", back, line)?;
        rows.push(Row {
            front: front.to_string(),
            back: back.to_string(),
            line,
        });
    }
    if rows.is_empty() {
        return Err(ImportError::NoCards);
    }
    Ok(rows)
}

/// Read `path` and turn each row into a new card of `deck_name`.
pub fn import_cards(path: &Path, deck_name: &str, now: Timestamp) -> Fallible<Vec<Card>> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.to_path_buf()).into());
    }
    let bytes = read(path)?;
    let content = String::from_utf8(bytes).map_err(|_| ImportError::Encoding)?;
    let rows = parse_rows(&content)?;
    log::debug!("Parsed {} rows from {}.", rows.len(), path.display());
    let mut cards = Vec::with_capacity(rows.len());
    for (ordinal, row) in rows.iter().enumerate() {
        cards.push(Card::new(deck_name, &row.front, &row.back, now, ordinal)?);
    }
    Ok(cards)
}

/// Build a new deck named `name` from the cards in `path`.
pub fn create_deck(path: &Path, name: &str, now: Timestamp) -> Fallible<Deck> {
    let cards = import_cards(path, name, now)?;
    Ok(Deck::new(name, "", now).with_cards(cards))
}

/// Group the physical lines of `content` into records, each paired with the
/// line it starts on. A record continues while it has an unclosed quote.
fn records(content: &str) -> Vec<(usize, String)> {
    let mut records = Vec::new();
    let mut pending: Option<(usize, String)> = None;
    for (idx, line) in content.lines().enumerate() {
        let (start, text) = match pending.take() {
            Some((start, mut text)) => {
                text.push('\n');
                text.push_str(line);
                (start, text)
            }
            None if line.trim().is_empty() => continue,
            None => (idx + 1, line.to_string()),
        };
        if text.matches('"').count() % 2 == 0 {
            records.push((start, text.trim().to_string()));
        } else {
            pending = Some((start, text));
        }
    }
    if let Some((start, text)) = pending {
        records.push((start, text.trim().to_string()));
    }
    records
}

fn is_header(line: &str) -> bool {
    let line = line.to_lowercase();
    HEADER_WORDS.iter().any(|word| line.contains(word))
}

fn split_line(text: &str, line: usize) -> Result<Vec<String>, ImportError> {
    let delimiter = if text.contains(';') {
        b';'
    } else if text.contains(',') {
        b','
    } else {
        return Err(ImportError::NoSeparator { line });
    };
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(text.as_bytes());
    match reader.records().next() {
        Some(Ok(record)) => Ok(record.iter().map(str::to_string).collect()),
        Some(Err(e)) => Err(ImportError::Malformed {
            line,
            message: e.to_string(),
        }),
        None => Ok(Vec::new()),
    }
}

fn check_length(field: &'static str, value: &str, line: usize) -> Result<(), ImportError> {
    let length = value.chars().count();
    if length > MAX_FIELD_LENGTH {
        return Err(ImportError::FieldTooLong {
            field,
            line,
            length,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs::write;

    use tempfile::tempdir;

    use super::*;
    use crate::helper::t0;

    fn pairs(rows: &[Row]) -> Vec<(&str, &str)> {
        rows.iter()
            .map(|row| (row.front.as_str(), row.back.as_str()))
            .collect()
    }

    #[test]
    fn test_semicolon_rows_with_header() -> Result<(), ImportError> {
        let rows = parse_rows("Fronte;Retro\ncane;dog\n\n gatto ; cat \n")?;
        assert_eq!(pairs(&rows), vec![("cane", "dog"), ("gatto", "cat")]);
        assert_eq!(rows[0].line, 2);
        assert_eq!(rows[1].line, 4);
        Ok(())
    }

    #[test]
    fn test_comma_rows_with_quotes() -> Result<(), ImportError> {
        let rows = parse_rows("\"ciao, amico\",\"hi, friend\"\nsì,yes,extra\n")?;
        assert_eq!(
            pairs(&rows),
            vec![("ciao, amico", "hi, friend"), ("sì", "yes")]
        );
        Ok(())
    }

    #[test]
    fn test_semicolon_wins_over_comma() -> Result<(), ImportError> {
        let rows = parse_rows("uno, due;one, two\n")?;
        assert_eq!(pairs(&rows), vec![("uno, due", "one, two")]);
        Ok(())
    }

    #[test]
    fn test_empty_inputs() {
        assert_eq!(parse_rows(""), Err(ImportError::EmptyFile));
        assert_eq!(parse_rows("\n  \n"), Err(ImportError::EmptyFile));
        assert_eq!(parse_rows("front;back\n"), Err(ImportError::NoCards));
    }

    #[test]
    fn test_line_errors() {
        assert_eq!(
            parse_rows("a;b\nno separator here\n"),
            Err(ImportError::NoSeparator { line: 2 })
        );
        assert_eq!(
            parse_rows("a;b\nc;\n"),
            Err(ImportError::EmptyFields { line: 2 })
        );
        assert_eq!(
            parse_rows("\"one, field\"\n"),
            Err(ImportError::InvalidFormat { line: 1 })
        );
    }

    #[test]
    fn test_field_too_long() {
        let long = "x".repeat(MAX_FIELD_LENGTH + 1);
        assert_eq!(
            parse_rows(&format!("ok;{long}\n")),
            Err(ImportError::FieldTooLong {
                field: "back",
                line: 1,
                length: MAX_FIELD_LENGTH + 1
            })
        );
        let exact = "è".repeat(MAX_FIELD_LENGTH);
        assert!(parse_rows(&format!("{exact};ok\n")).is_ok());
    }

    #[test]
    fn test_too_many_rows() {
        let content = "a;b\n".repeat(MAX_ROW_COUNT + 1);
        assert_eq!(
            parse_rows(&content),
            Err(ImportError::TooManyRows(MAX_ROW_COUNT + 1))
        );
        let content = format!("front;back\n{}", "a;b\n".repeat(MAX_ROW_COUNT));
        assert!(parse_rows(&content).is_ok());
    }

    #[test]
    fn test_create_deck() -> Fallible<()> {
        let dir = tempdir()?;
        let path = dir.path().join("words.csv");
        write(&path, "front;back\ncasa;house\ncasa;house\n")?;
        let deck = create_deck(&path, "Italian", t0())?;
        assert_eq!(deck.name, "Italian");
        assert_eq!(deck.total_count(), 2);
        assert_eq!(deck.new_count(), 2);
        assert_ne!(deck.cards()[0].id(), deck.cards()[1].id());
        Ok(())
    }

    #[test]
    fn test_file_errors() -> Fallible<()> {
        let dir = tempdir()?;
        let missing = dir.path().join("missing.csv");
        assert!(import_cards(&missing, "Italian", t0()).is_err());

        let binary = dir.path().join("binary.csv");
        write(&binary, [0xff, 0xfe, 0x00, b';'])?;
        let err = import_cards(&binary, "Italian", t0()).unwrap_err();
        assert_eq!(err.to_string(), "error: file is not valid UTF-8.");
        Ok(())
    }

    #[test]
    fn test_quoted_field_spans_lines() -> Result<(), ImportError> {
        let rows = parse_rows("front;back\n\"riga uno\n\n riga due\";two lines\ncane;dog\n")?;
        assert_eq!(
            pairs(&rows),
            vec![("riga uno\n\n riga due", "two lines"), ("cane", "dog")]
        );
        assert_eq!(rows[0].line, 2);
        assert_eq!(rows[1].line, 5);
        Ok(())
    }
}
