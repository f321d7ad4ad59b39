use crate::document::{DOCUMENT_START, DocumentSnapshot, NativeRange, StructuralElement, utf16_len};

/// A contiguous stretch of flat text that maps 1:1 onto native indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Segment {
    /// Offset of the segment in the flat text, in UTF-16 units.
    flat_start: usize,
    /// Native index of the segment's first unit.
    native_start: usize,
    /// Width in UTF-16 units.
    len: usize,
}

impl Segment {
    fn flat_end(&self) -> usize {
        self.flat_start + self.len
    }
}

/// Flat view of a snapshot: run text concatenated in document order, plus the
/// mapping needed to turn flat offsets back into native indices.
///
/// `end_index` is the single source of truth for where the document ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatText {
    text: String,
    segments: Vec<Segment>,
    end_index: usize,
}

impl FlatText {
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Native index one past the last structural element (1 for an empty body).
    pub fn end_index(&self) -> usize {
        self.end_index
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Native index of the flat position `flat_offset` (UTF-16 units).
    ///
    /// Offsets inside a run map through that run; the offset one past the
    /// final character maps to one past that character's native index.
    pub fn native_index(&self, flat_offset: usize) -> usize {
        if let Some(segment) = self
            .segments
            .iter()
            .find(|s| s.flat_start <= flat_offset && flat_offset < s.flat_end())
        {
            return segment.native_start + (flat_offset - segment.flat_start);
        }

        match self.segments.iter().rev().find(|s| s.flat_end() <= flat_offset) {
            Some(last) => last.native_start + last.len + (flat_offset - last.flat_end()),
            None => flat_offset + DOCUMENT_START,
        }
    }

    /// Native range covering the flat range `[start, end)` (UTF-16 units).
    ///
    /// The end is derived from the last covered character so a range ending
    /// right before an opaque element does not stretch over it.
    pub fn native_range(&self, start: usize, end: usize) -> NativeRange {
        let native_start = self.native_index(start);
        if end <= start {
            return NativeRange::new(native_start, native_start);
        }
        NativeRange::new(native_start, self.native_index(end - 1) + 1)
    }
}

/// Flatten a snapshot into its text and document end index.
///
/// Paragraph runs are appended verbatim; opaque elements contribute no text
/// but still advance the native position.
pub fn linearize(snapshot: &DocumentSnapshot) -> FlatText {
    let mut text = String::new();
    let mut segments = Vec::new();
    let mut flat_offset = 0;
    let mut element_start = DOCUMENT_START;

    for element in &snapshot.content {
        if let StructuralElement::Paragraph { runs, .. } = element {
            let mut native = element_start;
            for run in runs {
                let len = utf16_len(run);
                if len > 0 {
                    segments.push(Segment {
                        flat_start: flat_offset,
                        native_start: native,
                        len,
                    });
                }
                text.push_str(run);
                flat_offset += len;
                native += len;
            }
        }
        element_start = element.end_index().max(element_start);
    }

    let end_index = snapshot
        .content
        .last()
        .map(StructuralElement::end_index)
        .unwrap_or(DOCUMENT_START);

    log::trace!(
        "linearized {} elements into {} flat units, end index {end_index}",
        snapshot.content.len(),
        flat_offset
    );

    FlatText {
        text,
        segments,
        end_index,
    }
}
