//! Parsing of the describe tool's tabular output.
//!
//! Data rows start with a lowercase letter, everything else (headers, blank
//! lines, banners) is skipped. A line starting with `Error` aborts the run.

use crate::error::{Error, Result};
use log::trace;
use std::fmt;
use std::str::Lines;

/// Fields of a data row, in column order.
const COLUMNS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Offset,
    Logsize,
    Lag
}

impl Field {
    /// Emission order.
    pub const ALL: [Field; 3] = [Field::Offset, Field::Logsize, Field::Lag];

    pub fn as_str(self) -> &'static str {
        match self {
            Field::Offset => "offset",
            Field::Logsize => "logsize",
            Field::Lag => "lag"
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One partition row. Columns missing from the line are `None`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConsumerRecord {
    pub topic: String,
    pub partition: Option<String>,
    pub offset: Option<String>,
    pub logsize: Option<String>,
    pub lag: Option<String>,
    pub consumer_id: Option<String>,
    pub host: Option<String>,
    pub client_id: Option<String>
}

impl ConsumerRecord {
    fn from_columns(line: &str) -> Self {
        let mut rest = line.trim();
        let mut columns: Vec<String> = Vec::with_capacity(COLUMNS);
        while !rest.is_empty() && columns.len() < COLUMNS - 1 {
            let end = rest.find(char::is_whitespace).unwrap_or_else(|| rest.len());
            columns.push(rest[..end].to_owned());
            rest = rest[end..].trim_start();
        }
        if !rest.is_empty() {
            columns.push(rest.to_owned());
        }

        let mut columns = columns.into_iter();
        ConsumerRecord {
            topic: columns.next().unwrap_or_default(),
            partition: columns.next(),
            offset: columns.next(),
            logsize: columns.next(),
            lag: columns.next(),
            consumer_id: columns.next(),
            host: columns.next(),
            client_id: columns.next()
        }
    }

    /// The integer value of a numeric column. Missing or non-numeric text counts as zero.
    pub fn value(&self, field: Field) -> i64 {
        let raw = match field {
            Field::Offset => &self.offset,
            Field::Logsize => &self.logsize,
            Field::Lag => &self.lag
        };
        raw.as_ref()
            .and_then(|v| v.parse().ok())
            .unwrap_or(0)
    }
}

/// Lazily parses records out of captured command output.
///
/// Newer tools prefix every row with a `GROUP` column. When a header naming
/// the `TOPIC` column is seen, the columns before it are skipped on the rows
/// that follow.
pub struct Records<'a> {
    command: &'a str,
    lines: Lines<'a>,
    leading_columns: usize,
    failed: bool
}

impl<'a> Records<'a> {
    pub fn new(command: &'a str, output: &'a str) -> Self {
        Records {
            command,
            lines: output.lines(),
            leading_columns: 0,
            failed: false
        }
    }
}

fn skip_columns(line: &str, count: usize) -> &str {
    let mut rest = line.trim_start();
    for _ in 0..count {
        let end = rest.find(char::is_whitespace).unwrap_or_else(|| rest.len());
        rest = rest[end..].trim_start();
    }
    rest
}

impl<'a> Iterator for Records<'a> {
    type Item = Result<ConsumerRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        for line in &mut self.lines {
            if line.starts_with("Error") {
                self.failed = true;
                return Some(Err(Error::ToolError {
                    command: self.command.to_owned(),
                    line: line.to_owned()
                }));
            }

            if !line.starts_with(|c: char| c.is_ascii_lowercase()) {
                if let Some(position) = line.split_whitespace().position(|c| c == "TOPIC") {
                    self.leading_columns = position;
                }
                trace!("skipping non-data line: {}", line);
                continue;
            }

            let record = ConsumerRecord::from_columns(skip_columns(line, self.leading_columns));
            if record.topic.is_empty() {
                continue;
            }
            return Some(Ok(record));
        }

        None
    }
}

pub fn parse(command: &str, output: &str) -> Result<Vec<ConsumerRecord>> {
    Records::new(command, output).collect()
}
