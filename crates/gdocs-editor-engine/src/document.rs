//! Immutable document snapshots as fetched from the document service.
//!
//! Positions in a snapshot use the service's *native* index space: 1-based and
//! counted in UTF-16 code units. Every body ends with an implicit trailing unit
//! (the final newline), so a document with no visible content still has an
//! end index of 2.

/// First valid native index in any document.
pub const DOCUMENT_START: usize = 1;

/// A half-open native index range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct NativeRange {
    /// Inclusive start index.
    pub start: usize,
    /// Exclusive end index.
    pub end: usize,
}

impl NativeRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Width in native units; zero for inverted ranges.
    #[must_use]
    pub fn len(self) -> usize {
        self.end.saturating_sub(self.start)
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.len() == 0
    }
}

/// One unit of document structure.
#[derive(Debug, Clone, PartialEq)]
pub enum StructuralElement {
    /// A paragraph made of text runs, in order.
    Paragraph {
        runs: Vec<String>,
        /// Native index one past the paragraph's last unit.
        end_index: usize,
    },
    /// Any element that occupies native index space but has no text
    /// (section breaks, tables, inline objects, ...).
    Opaque { end_index: usize },
}

impl StructuralElement {
    pub fn paragraph<I, S>(runs: I, end_index: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Paragraph {
            runs: runs.into_iter().map(Into::into).collect(),
            end_index,
        }
    }

    pub fn opaque(end_index: usize) -> Self {
        Self::Opaque { end_index }
    }

    pub fn end_index(&self) -> usize {
        match self {
            Self::Paragraph { end_index, .. } | Self::Opaque { end_index } => *end_index,
        }
    }
}

/// A document as fetched once for a single operation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DocumentSnapshot {
    pub title: String,
    /// Body elements in order. Empty when the service returned no body.
    pub content: Vec<StructuralElement>,
}

impl DocumentSnapshot {
    pub fn new(title: impl Into<String>, content: Vec<StructuralElement>) -> Self {
        Self {
            title: title.into(),
            content,
        }
    }

    /// Build the snapshot the service would return for a plain-text body.
    ///
    /// The body is split into one paragraph per line (each keeping its `\n`)
    /// and is preceded by a zero-width section break, matching the shape of a
    /// freshly fetched document. A missing final newline is supplied.
    pub fn from_plain_text(title: impl Into<String>, body: &str) -> Self {
        let mut content = vec![StructuralElement::opaque(DOCUMENT_START)];
        let mut end_index = DOCUMENT_START;

        let body = if body.ends_with('\n') {
            body.to_string()
        } else {
            format!("{body}\n")
        };
        for line in body.split_inclusive('\n') {
            end_index += utf16_len(line);
            content.push(StructuralElement::paragraph([line], end_index));
        }

        Self::new(title, content)
    }
}

/// Length of `text` in UTF-16 code units.
pub fn utf16_len(text: &str) -> usize {
    text.chars().map(char::len_utf16).sum()
}
