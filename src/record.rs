//! Message records and the CSV loader that produces them.

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, bounded};
use csv::{ReaderBuilder, StringRecord};
use tracing::{info, warn};

use crate::error::{GraphError, Result};

const AUTHOR_COLUMNS: &[&str] = &["author", "user", "username", "screen_name"];
const TEXT_COLUMNS: &[&str] = &["text", "tweet", "content", "message"];
const TIMESTAMP_COLUMNS: &[&str] = &["timestamp", "date", "created_at"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub author: String,
    pub text: Option<String>,
    /// Carried through unparsed.
    pub timestamp: Option<String>,
}

impl Record {
    pub fn new(author: impl Into<String>, text: impl Into<String>) -> Self {
        Record {
            author: author.into(),
            text: Some(text.into()),
            timestamp: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadStats {
    pub rows: usize,
    pub unreadable: usize,
}

struct Columns {
    author: usize,
    text: usize,
    timestamp: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let find = |aliases: &[&str]| {
            headers
                .iter()
                .position(|h| aliases.iter().any(|a| h.trim().eq_ignore_ascii_case(a)))
        };
        Ok(Columns {
            author: find(AUTHOR_COLUMNS)
                .ok_or_else(|| GraphError::MissingColumn(AUTHOR_COLUMNS[0].to_string()))?,
            text: find(TEXT_COLUMNS)
                .ok_or_else(|| GraphError::MissingColumn(TEXT_COLUMNS[0].to_string()))?,
            timestamp: find(TIMESTAMP_COLUMNS),
        })
    }

    fn record(&self, row: &StringRecord) -> Record {
        let field = |i: usize| row.get(i).filter(|s| !s.is_empty()).map(str::to_string);
        Record {
            author: row.get(self.author).unwrap_or_default().to_string(),
            text: field(self.text),
            timestamp: self.timestamp.and_then(field),
        }
    }
}

/// Reads every record from `reader`. Rows the CSV parser rejects are logged
/// and counted, not fatal; I/O failures are.
fn for_each_record<R: Read>(reader: R, mut sink: impl FnMut(Record) -> bool) -> Result<LoadStats> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(reader);
    let columns = Columns::from_headers(rdr.headers()?)?;
    let mut stats = LoadStats::default();

    for row in rdr.records() {
        let row = match row {
            Ok(row) => row,
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                warn!(error = %e, "skipping unreadable CSV row");
                stats.unreadable += 1;
                continue;
            }
        };
        stats.rows += 1;
        if !sink(columns.record(&row)) {
            break;
        }
    }
    Ok(stats)
}

pub fn read_records<R: Read>(reader: R) -> Result<(Vec<Record>, LoadStats)> {
    let mut records = Vec::new();
    let stats = for_each_record(reader, |r| {
        records.push(r);
        true
    })?;
    Ok((records, stats))
}

pub fn load_records(path: impl AsRef<Path>) -> Result<(Vec<Record>, LoadStats)> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| GraphError::io(e, path))?;
    let loaded = read_records(file)?;
    info!(path = %path.display(), rows = loaded.1.rows, "records loaded");
    Ok(loaded)
}

/// Reads `path` on a background thread, sending records through a channel
/// bounded to `capacity`. The handle yields the load stats once the file is
/// exhausted or the receiver is dropped.
pub fn stream_records(
    path: impl AsRef<Path>,
    capacity: usize,
) -> Result<(Receiver<Record>, JoinHandle<Result<LoadStats>>)> {
    let path = path.as_ref().to_path_buf();
    let file = File::open(&path).map_err(|e| GraphError::io(e, &path))?;
    let (tx, rx) = bounded(capacity.max(1));

    let handle = thread::spawn(move || {
        let stats = for_each_record(file, |r| tx.send(r).is_ok())?;
        info!(path = %path.display(), rows = stats.rows, "records streamed");
        Ok(stats)
    });
    Ok((rx, handle))
}
