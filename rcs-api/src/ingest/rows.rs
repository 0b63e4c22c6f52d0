//! Streaming CSV row parser
//!
//! Reads `title`, `artist` and `added` from each data row, in file order,
//! without buffering the whole file. Other columns are ignored.

use crate::error::ParseFailure;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;

/// The three source fields of one export row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTrack {
    pub title: String,
    pub artist: String,
    pub added: String,
}

#[derive(Debug, Clone, Copy)]
struct ColumnIndex {
    title: usize,
    artist: usize,
    added: usize,
}

/// Single-pass iterator over the rows of one export
pub struct RowReader<R: Read> {
    file: String,
    columns: ColumnIndex,
    records: csv::StringRecordsIntoIter<R>,
}

impl RowReader<File> {
    /// Open an export file from disk
    pub fn open(path: &Path) -> Result<Self, ParseFailure> {
        let file = File::open(path).map_err(|source| ParseFailure::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
        Self::new(display_name(path), file)
    }
}

impl<R: Read> RowReader<R> {
    /// Read the header row and locate the required columns
    ///
    /// Header names are matched case-insensitively after trimming (a leading
    /// byte-order mark included).
    pub fn new(file: impl Into<String>, reader: R) -> Result<Self, ParseFailure> {
        let file = file.into();
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(reader);

        let headers = csv_reader
            .headers()
            .map_err(|source| ParseFailure::Malformed {
                file: file.clone(),
                line: source.position().map(|p| p.line()),
                source,
            })?
            .clone();

        let find = |column: &'static str| {
            headers
                .iter()
                .position(|h| h.trim_start_matches('\u{feff}').trim().eq_ignore_ascii_case(column))
                .ok_or_else(|| ParseFailure::MissingColumn {
                    file: file.clone(),
                    column,
                })
        };
        let columns = ColumnIndex {
            title: find("title")?,
            artist: find("artist")?,
            added: find("added")?,
        };

        Ok(Self {
            file,
            columns,
            records: csv_reader.into_records(),
        })
    }
}

impl<R: Read> Iterator for RowReader<R> {
    type Item = Result<RawTrack, ParseFailure>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = match self.records.next()? {
            Ok(record) => record,
            Err(source) => {
                return Some(Err(ParseFailure::Malformed {
                    file: self.file.clone(),
                    line: source.position().map(|p| p.line()),
                    source,
                }))
            }
        };

        let field = |i: usize| record.get(i).unwrap_or_default().to_string();
        Some(Ok(RawTrack {
            title: field(self.columns.title),
            artist: field(self.columns.artist),
            added: field(self.columns.added),
        }))
    }
}

/// Parse `path` on a blocking thread, handing rows over a bounded channel
///
/// The channel closes after the last row or after the first error. Dropping
/// the receiver stops the reader at its next send.
pub fn stream_file(path: PathBuf, capacity: usize) -> mpsc::Receiver<Result<RawTrack, ParseFailure>> {
    let (tx, rx) = mpsc::channel(capacity.max(1));

    tokio::task::spawn_blocking(move || {
        let rows = match RowReader::open(&path) {
            Ok(rows) => rows,
            Err(err) => {
                let _ = tx.blocking_send(Err(err));
                return;
            }
        };

        for row in rows {
            let failed = row.is_err();
            if tx.blocking_send(row).is_err() || failed {
                return;
            }
        }
    });

    rx
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(csv: &str) -> Vec<Result<RawTrack, ParseFailure>> {
        RowReader::new("test.csv", csv.as_bytes()).unwrap().collect()
    }

    #[test]
    fn test_rows_in_file_order_extra_columns_ignored() {
        let parsed = rows(
            "position,title,artist,album,added\n\
             1,Song X,Artist A,Album,alice\n\
             2,\"Song, Y\",\"Artist B, Artist C\",Album,bob\n",
        );

        let parsed: Vec<RawTrack> = parsed.into_iter().map(Result::unwrap).collect();
        assert_eq!(
            parsed,
            vec![
                RawTrack {
                    title: "Song X".into(),
                    artist: "Artist A".into(),
                    added: "alice".into(),
                },
                RawTrack {
                    title: "Song, Y".into(),
                    artist: "Artist B, Artist C".into(),
                    added: "bob".into(),
                },
            ]
        );
    }

    #[test]
    fn test_header_names_case_insensitive_and_bom_tolerated() {
        let parsed = rows("\u{feff}Title,ARTIST, added \nA,B,C\n");
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].as_ref().unwrap().added, "C");
    }

    #[test]
    fn test_missing_column_rejected() {
        let err = RowReader::new("test.csv", "title,artist\nA,B\n".as_bytes())
            .err()
            .expect("missing column should fail");
        assert!(matches!(err, ParseFailure::MissingColumn { column: "added", .. }));
    }

    #[test]
    fn test_ragged_row_is_malformed() {
        let parsed = rows("title,artist,added\nA,B,C\nD,E\n");
        assert!(parsed[0].is_ok());
        assert!(matches!(parsed[1], Err(ParseFailure::Malformed { .. })));
    }

    #[test]
    fn test_invalid_utf8_is_malformed() {
        let mut bytes = b"title,artist,added\n".to_vec();
        bytes.extend_from_slice(&[0xff, 0xfe, b',', b'B', b',', b'C', b'\n']);
        let parsed: Vec<_> = RowReader::new("test.csv", bytes.as_slice()).unwrap().collect();
        assert!(matches!(parsed[0], Err(ParseFailure::Malformed { .. })));
    }

    #[test]
    fn test_header_only_file_yields_nothing() {
        assert!(rows("title,artist,added\n").is_empty());
    }

    #[tokio::test]
    async fn test_stream_file_delivers_rows_then_closes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("list.csv");
        std::fs::write(&path, "title,artist,added\nA,B,C\nD,E,F\nG,H,I\n").unwrap();

        let mut rx = stream_file(path, 1);
        let mut titles = Vec::new();
        while let Some(row) = rx.recv().await {
            titles.push(row.unwrap().title);
        }
        assert_eq!(titles, vec!["A", "D", "G"]);
    }

    #[tokio::test]
    async fn test_stream_file_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut rx = stream_file(dir.path().join("absent.csv"), 4);

        assert!(matches!(
            rx.recv().await,
            Some(Err(ParseFailure::Unreadable { .. }))
        ));
        assert!(rx.recv().await.is_none());
    }
}
