//! Structured side-channel for non-fatal messages.
//!
//! Decoders report recoverable oddities (unknown tags, duplicate tags) and
//! the bumper reports fields it had to drop. None of that may go to stdout
//! from library code, so everything funnels through a [`MessageSink`] that
//! the caller supplies; [`NullSink`] discards, [`NoteList`] collects.

use std::fmt;

/// One non-fatal message, tied to the place it was observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    /// Where the message arose: a line number, a field path, or a field name.
    pub context: String,
    pub message: String,
}

impl Note {
    pub fn new(context: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            context: context.into(),
            message: message.into(),
        }
    }

    /// The bumper's note for a 2.x field without a 3.x home.
    pub fn missing_conversion(field: impl Into<String>, reason: &str) -> Self {
        Self {
            context: field.into(),
            message: format!("missing conversion: {reason}"),
        }
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.context, self.message)
    }
}

/// Receiver for [`Note`]s emitted during decoding or bumping.
pub trait MessageSink {
    fn note(&mut self, note: Note);
}

/// Default sink: drops every message.
#[derive(Debug, Default)]
pub struct NullSink;

impl MessageSink for NullSink {
    fn note(&mut self, _note: Note) {}
}

/// Sink that keeps every message, in emission order.
#[derive(Debug, Default)]
pub struct NoteList {
    pub notes: Vec<Note>,
}

impl NoteList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Note> {
        self.notes.iter()
    }
}

impl MessageSink for NoteList {
    fn note(&mut self, note: Note) {
        self.notes.push(note);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn note_list_keeps_emission_order() {
        let mut sink = NoteList::new();
        sink.note(Note::new("line 4", "unknown tag `PackageColor`"));
        sink.note(Note::missing_conversion(
            "package.license_concluded",
            "missing definitions for license profile",
        ));
        assert_eq!(sink.len(), 2);
        assert_eq!(sink.notes[0].context, "line 4");
        assert_eq!(
            sink.notes[1].to_string(),
            "package.license_concluded: missing conversion: missing definitions for license profile"
        );
    }

    #[test]
    fn null_sink_discards() {
        let mut sink = NullSink;
        sink.note(Note::new("anywhere", "anything"));
    }
}
