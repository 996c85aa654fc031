//! STEP record parser
//!
//! Turns the data section of a STEP exchange file into an ordered sequence
//! of `(id, definition)` records.
//!
//! # Line grammar
//!
//! ```text
//! #<digits>=<one or more bytes>;
//! ```
//!
//! One record per line. Anything else (header, footer, blank lines,
//! continuation lines of multi-line entities) is skipped without error.
//! Definitions are kept byte-for-byte; nothing is validated or unescaped.

mod errors;
mod reader;
mod record;

pub use errors::{ParseError, ParseResult};
pub use reader::{ParseStats, RecordIter, RecordParser};
pub use record::{write_record_line, Record};
