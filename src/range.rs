//! Compact byte span into lesson text.
//!
//! Uses `u32` offsets (8 bytes per span). Lesson texts are far below 4GB.

/// Byte span `start..end` into a `&str`.
///
/// Spans produced by the scanner always fall on char boundaries.
///
/// # Example
/// ```
/// use lessonmark::Span;
///
/// let text = "Intro. Outro.";
/// assert_eq!(Span::new(7, 13).slice(text), "Outro.");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Hash)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

const _: () = assert!(std::mem::size_of::<Span>() == 8);

impl Span {
    #[inline]
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Create a span from usize offsets.
    ///
    /// # Panics
    /// Panics in debug mode if values exceed u32::MAX.
    #[inline]
    pub fn from_usize(start: usize, end: usize) -> Self {
        debug_assert!(start <= end);
        debug_assert!(end <= u32::MAX as usize);
        Self {
            start: start as u32,
            end: end as u32,
        }
    }

    /// The text this span covers.
    #[inline]
    pub fn slice<'a>(&self, text: &'a str) -> &'a str {
        &text[self.start_usize()..self.end_usize()]
    }

    #[inline]
    pub const fn start_usize(&self) -> usize {
        self.start as usize
    }

    #[inline]
    pub const fn end_usize(&self) -> usize {
        self.end as usize
    }
}

/// Byte offset of the `units`-th UTF-16 code unit, clamped to the end of `text`.
///
/// Lesson offsets are authored in UTF-16 units, so a character outside the
/// BMP (most emoji) counts twice. An offset that falls inside a surrogate
/// pair snaps back to the start of that character.
pub(crate) fn utf16_offset(text: &str, units: usize) -> usize {
    let mut seen = 0;
    for (offset, ch) in text.char_indices() {
        seen += ch.len_utf16();
        if seen > units {
            return offset;
        }
    }
    text.len()
}
