//! Line-oriented STEP record reader
//!
//! Lines are read as raw bytes so that definitions which are not valid
//! UTF-8 pass through untouched. Each line, with its `\n` or `\r\n`
//! terminator stripped, must match the whole record pattern to be
//! accepted.
//!
//! Multi-line entities are not reassembled. Their lines fail the pattern
//! and are skipped like any other non-record line.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::OnceLock;

use regex::bytes::Regex;

use super::errors::{ParseError, ParseResult};
use super::record::Record;

/// `#`, one or more digits, `=`, one or more bytes, `;`, end of line.
const RECORD_PATTERN: &str = r"(?-u)^#([0-9]+)=(.+);$";

fn record_regex() -> &'static Regex {
    static RECORD_RE: OnceLock<Regex> = OnceLock::new();
    RECORD_RE.get_or_init(|| Regex::new(RECORD_PATTERN).expect("record pattern is valid"))
}

/// Counters for one parse pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseStats {
    /// Lines that produced a record
    pub matched: usize,
    /// Lines that did not match the record pattern
    pub skipped: usize,
}

impl ParseStats {
    /// Total number of lines consumed
    pub fn lines(&self) -> usize {
        self.matched + self.skipped
    }
}

/// Stateless STEP record parser.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordParser;

impl RecordParser {
    pub fn new() -> Self {
        Self
    }

    /// Parses every record in `reader`, in line order.
    ///
    /// The whole result is held in memory, so peak memory grows with the
    /// document size. Use [`RecordParser::iter`] to stream instead.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::Read` if the underlying stream fails. Lines
    /// that do not match the record pattern never cause an error.
    pub fn parse<R: BufRead>(&self, reader: R) -> ParseResult<Vec<Record>> {
        self.parse_with_stats(reader).map(|(records, _)| records)
    }

    /// Same as [`RecordParser::parse`], also returning line counters.
    pub fn parse_with_stats<R: BufRead>(&self, reader: R) -> ParseResult<(Vec<Record>, ParseStats)> {
        let mut iter = self.iter(reader);
        let mut records = Vec::new();
        for record in &mut iter {
            records.push(record?);
        }
        Ok((records, iter.stats()))
    }

    /// Opens `path` and parses it.
    pub fn parse_file(&self, path: &Path) -> ParseResult<(Vec<Record>, ParseStats)> {
        let file = File::open(path).map_err(|source| ParseError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        self.parse_with_stats(BufReader::new(file))
    }

    /// Lazily yields records from `reader`.
    pub fn iter<R: BufRead>(&self, reader: R) -> RecordIter<R> {
        RecordIter {
            reader,
            buf: Vec::new(),
            stats: ParseStats::default(),
            failed: false,
        }
    }

    /// Matches a single line, without its terminator.
    pub fn parse_line(line: &[u8]) -> Option<Record> {
        let caps = record_regex().captures(line)?;
        let id = std::str::from_utf8(&caps[1]).ok()?;
        Some(Record::new(id, &caps[2]))
    }
}

/// Streaming record iterator returned by [`RecordParser::iter`].
///
/// Yields at most one error, after which it is exhausted.
#[derive(Debug)]
pub struct RecordIter<R> {
    reader: R,
    buf: Vec<u8>,
    stats: ParseStats,
    failed: bool,
}

impl<R> RecordIter<R> {
    /// Counters for the lines consumed so far.
    pub fn stats(&self) -> ParseStats {
        self.stats
    }
}

impl<R: BufRead> Iterator for RecordIter<R> {
    type Item = ParseResult<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        loop {
            self.buf.clear();
            match self.reader.read_until(b'\n', &mut self.buf) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(source) => {
                    self.failed = true;
                    return Some(Err(ParseError::Read {
                        line: self.stats.lines() + 1,
                        source,
                    }));
                }
            }

            let line = strip_terminator(&self.buf);
            match RecordParser::parse_line(line) {
                Some(record) => {
                    self.stats.matched += 1;
                    return Some(Ok(record));
                }
                None => self.stats.skipped += 1,
            }
        }
    }
}

fn strip_terminator(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Cursor, Read};

    fn parse_str(input: &str) -> Vec<Record> {
        RecordParser::new().parse(Cursor::new(input)).unwrap()
    }

    #[test]
    fn test_parse_simple_records() {
        let records = parse_str("#1=A;\n#2=B;\n");
        assert_eq!(records, vec![Record::new("1", "A"), Record::new("2", "B")]);
    }

    #[test]
    fn test_skips_header_and_footer() {
        let input = "ISO-10303-21;\nHEADER;\nFILE_NAME('x.stp');\nENDSEC;\nDATA;\n\
                     #10=CARTESIAN_POINT('',(0.,0.,0.));\nENDSEC;\nEND-ISO-10303-21;\n";
        let (records, stats) = RecordParser::new()
            .parse_with_stats(Cursor::new(input))
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "10");
        assert_eq!(records[0].definition, b"CARTESIAN_POINT('',(0.,0.,0.))".to_vec());
        assert_eq!(stats.matched, 1);
        assert_eq!(stats.skipped, 7);
    }

    #[test]
    fn test_embedded_equals_and_semicolons_kept() {
        let records = parse_str("#5=A=B;C;\n");
        assert_eq!(records, vec![Record::new("5", "A=B;C")]);
    }

    #[test]
    fn test_malformed_lines_skipped() {
        let input = "#=A;\n#x=B;\n#3=;\n#4=C\n 5=D;\n#6=E; \n#7=F;";
        let records = parse_str(input);
        assert_eq!(records, vec![Record::new("7", "F")]);
    }

    #[test]
    fn test_crlf_terminators() {
        let records = parse_str("#1=A;\r\n#2=B;\r\n");
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].definition, b"B".to_vec());
    }

    #[test]
    fn test_multiline_entity_is_skipped() {
        let input = "#1=PRODUCT('a',\n'b');\n#2=OK;\n";
        let records = parse_str(input);
        assert_eq!(records, vec![Record::new("2", "OK")]);
    }

    #[test]
    fn test_non_utf8_definition_preserved() {
        let input: &[u8] = b"#9=NAME('\xff\xfe');\n";
        let records = RecordParser::new().parse(Cursor::new(input)).unwrap();
        assert_eq!(records[0].definition, b"NAME('\xff\xfe')".to_vec());
    }

    #[test]
    fn test_order_follows_input_not_id() {
        let records = parse_str("#30=C;\n#2=B;\n#100=A;\n");
        let ids: Vec<_> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["30", "2", "100"]);
    }

    #[test]
    fn test_good_and_bad_lines_interleaved() {
        let mut input = String::new();
        for i in 0..50 {
            input.push_str(&format!("#{}=V{};\n", i, i));
            input.push_str("garbage line\n");
            if i % 3 == 0 {
                input.push('\n');
            }
        }
        let records = parse_str(&input);
        assert_eq!(records.len(), 50);
        for (i, record) in records.iter().enumerate() {
            assert_eq!(record.id, i.to_string());
        }
    }

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "device gone"))
        }
    }

    #[test]
    fn test_read_failure_is_reported() {
        let result = RecordParser::new().parse(BufReader::new(FailingReader));
        let err = result.unwrap_err();
        assert!(matches!(err, ParseError::Read { line: 1, .. }));
        assert_eq!(err.code(), "STPDB_PARSE_READ_FAILED");
    }

    #[test]
    fn test_iter_stops_after_error() {
        let mut iter = RecordParser::new().iter(BufReader::new(FailingReader));
        assert!(matches!(iter.next(), Some(Err(_))));
        assert!(iter.next().is_none());
    }

    #[test]
    fn test_parse_file_missing() {
        let result = RecordParser::new().parse_file(Path::new("/nonexistent/file.stp"));
        assert!(matches!(result, Err(ParseError::Open { .. })));
    }
}
