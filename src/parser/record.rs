//! Parsed STEP record

use std::io::{self, Write};

/// One `#id=definition;` entity extracted from a STEP file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Record {
    /// Numeric label between `#` and `=`, kept as text
    pub id: String,
    /// Raw bytes between the first `=` and the trailing `;`
    pub definition: Vec<u8>,
}

impl Record {
    pub fn new(id: impl Into<String>, definition: impl Into<Vec<u8>>) -> Self {
        Self {
            id: id.into(),
            definition: definition.into(),
        }
    }
}

/// Writes one record line, `#<id>=<definition>;\n`.
///
/// This is the only renderer of the record grammar; bytes are written
/// verbatim, so any line it produces is matched again by the parser.
pub fn write_record_line<W: Write + ?Sized>(
    writer: &mut W,
    id: &[u8],
    definition: &[u8],
) -> io::Result<()> {
    writer.write_all(b"#")?;
    writer.write_all(id)?;
    writer.write_all(b"=")?;
    writer.write_all(definition)?;
    writer.write_all(b";\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::RecordParser;

    #[test]
    fn test_write_record_line() {
        let mut out = Vec::new();
        write_record_line(&mut out, b"12", b"CARTESIAN_POINT('',(0.,0.,0.))").unwrap();
        assert_eq!(out, b"#12=CARTESIAN_POINT('',(0.,0.,0.));\n".to_vec());
    }

    #[test]
    fn test_written_line_parses_back() {
        let mut out = Vec::new();
        write_record_line(&mut out, b"7", b"A=B;\xff").unwrap();

        let line = out.strip_suffix(b"\n").unwrap();
        let record = RecordParser::parse_line(line).unwrap();
        assert_eq!(record, Record::new("7", &b"A=B;\xff"[..]));
    }
}
