//! Tag/value codec.
//!
//! One `Tag: value` pair per line; free text that spans lines is wrapped in
//! `<text>...</text>`. The reader is a state machine keyed on the element
//! opener tags (`PackageName`, `FileName`, `SnippetSPDXID`, `Annotator`,
//! `LicenseID`); the writer emits one section per element kind.

mod reader;
mod writer;

pub use reader::{parse, parse_with_sink};
pub use writer::write;
