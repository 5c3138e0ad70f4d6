//! Fill-in blanks in lesson prose.
//!
//! A blank is five underscores. Longer runs hold one blank per five
//! underscores; leftovers shorter than that are plain text. Blanks are
//! numbered from zero in document order, and each one names the storage key
//! the widget layer persists the learner's answer under.

use std::fmt;

use memchr::memmem;

use crate::content::LessonKey;
use crate::range::Span;

/// Marker for one fill-in blank.
pub const BLANK: &str = "_____";

/// One fill-in blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlankField {
    pub key: LessonKey,
    /// Position among the tab's blanks, from zero.
    pub index: usize,
    pub span: Span,
}

impl BlankField {
    /// Storage key, e.g. `lesson-21-reflection-field-0`.
    pub fn storage_key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for BlankField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "lesson-{}-{}-field-{}", self.key.lesson_id, self.key.tab, self.index)
    }
}

/// All blanks in `text`, in document order.
pub fn blank_fields(text: &str, key: LessonKey) -> Vec<BlankField> {
    memmem::find_iter(text.as_bytes(), BLANK)
        .enumerate()
        .map(|(index, start)| BlankField {
            key,
            index,
            span: Span::from_usize(start, start + BLANK.len()),
        })
        .collect()
}
