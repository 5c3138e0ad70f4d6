//! Marker scanner: splits lesson text into text and widget blocks.
//!
//! A lesson's raw text is Markdown with widget positions marked in one of
//! three ways:
//!
//! - **Tag markers**: an explicit pair such as
//!   `<breathing-exercise></breathing-exercise>`, treated as one atomic token.
//! - **Anchor markers**: a literal phrase (usually a heading) where one or
//!   more widgets go. An anchor may also replace the static template text
//!   that follows it, up to a second literal or to the end of the text.
//! - **Known widget tags**: any paired or self-closing tag whose name is a
//!   [`WidgetName`](crate::WidgetName).
//!
//! The scanner makes one left-to-right pass. Text between markers is copied
//! through untouched (as zero-copy slices); blank runs are dropped.
//!
//! # Example
//! ```
//! use lessonmark::scan::{Marker, scan_or_text};
//! use lessonmark::{ContentBlock, WidgetName};
//!
//! let text = "Intro.\n<breathing-exercise></breathing-exercise>\nOutro.";
//! let blocks = scan_or_text(text, &[Marker::tag(WidgetName::BreathingExercise)]);
//! assert_eq!(blocks, vec![
//!     ContentBlock::Text { content: "Intro.\n" },
//!     ContentBlock::widget(WidgetName::BreathingExercise),
//!     ContentBlock::Text { content: "\nOutro." },
//! ]);
//! ```
//!
//! # Conflicts
//!
//! When candidate spans overlap, the first declared marker wins. Markers that
//! do not overlap are taken in text order. Matches that fall inside a skipped
//! range are ignored.
//!
//! # Silent fallback instead of errors
//!
//! A missing skip-until literal skips the remainder of the text. A malformed
//! marker set ([`ScanError`](crate::ScanError)) degrades the whole input to a single text block
//! in [`scan_or_text`].

mod scanner;
pub mod tag;

use smallvec::SmallVec;

use crate::content::{ContentBlock, WidgetBlock};
use crate::widget::WidgetName;

pub use scanner::scan;

/// Widgets emitted for one marker match.
pub type Widgets = SmallVec<[WidgetBlock; 2]>;

/// A position in lesson text where widgets are spliced in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Marker {
    /// `open` immediately followed by `close`, replaced by `widget`.
    Tag {
        open: String,
        close: String,
        widget: WidgetBlock,
    },
    /// A literal phrase marking where `widgets` go.
    Anchor {
        literal: String,
        widgets: Widgets,
        skip: Skip,
    },
    /// Any paired or self-closing tag named after a known widget.
    KnownTags,
}

/// What an anchor does with the text that follows it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Skip {
    /// Insert the widgets before the anchor and keep the anchor text.
    #[default]
    Keep,
    /// Replace the anchor and everything up to this literal. The literal
    /// itself starts the next text run. If it never appears, the rest of
    /// the text is dropped.
    Until(String),
    /// Replace the anchor and everything after it.
    ToEnd,
}

impl Marker {
    /// The `<name></name>` tag marker for a widget.
    pub fn tag(widget: WidgetName) -> Self {
        Marker::Tag {
            open: format!("<{widget}>"),
            close: format!("</{widget}>"),
            widget: WidgetBlock::new(widget),
        }
    }

    /// A tag marker with arbitrary open/close strings.
    pub fn tag_pair(open: impl Into<String>, close: impl Into<String>, widget: WidgetBlock) -> Self {
        Marker::Tag {
            open: open.into(),
            close: close.into(),
            widget,
        }
    }

    /// An anchor that inserts `widgets` before `literal`.
    pub fn anchor(literal: impl Into<String>, widgets: impl IntoIterator<Item = WidgetName>) -> Self {
        Marker::Anchor {
            literal: literal.into(),
            widgets: widgets.into_iter().map(WidgetBlock::new).collect(),
            skip: Skip::Keep,
        }
    }

    /// Replace template text up to `literal` (anchor markers only).
    pub fn skip_until(self, literal: impl Into<String>) -> Self {
        self.with_skip(Skip::Until(literal.into()))
    }

    /// Replace everything from the anchor on (anchor markers only).
    pub fn skip_to_end(self) -> Self {
        self.with_skip(Skip::ToEnd)
    }

    /// Pass `lesson_id` to every widget this marker emits.
    pub fn for_lesson(mut self, lesson_id: u32) -> Self {
        match &mut self {
            Marker::Tag { widget, .. } => widget.params.lesson_id = Some(lesson_id),
            Marker::Anchor { widgets, .. } => {
                for widget in widgets.iter_mut() {
                    widget.params.lesson_id = Some(lesson_id);
                }
            }
            Marker::KnownTags => {}
        }
        self
    }

    fn with_skip(mut self, new_skip: Skip) -> Self {
        if let Marker::Anchor { skip, .. } = &mut self {
            *skip = new_skip;
        }
        self
    }

    /// True if this marker occurs in `text`.
    pub fn occurs_in(&self, text: &str) -> bool {
        match self {
            Marker::Tag { open, close, .. } => contains_pair(text, open, close),
            Marker::Anchor { literal, .. } => !literal.is_empty() && text.contains(literal.as_str()),
            Marker::KnownTags => tag::find_widget_tag(text.as_bytes(), 0).is_some(),
        }
    }
}

fn contains_pair(text: &str, open: &str, close: &str) -> bool {
    if open.is_empty() {
        return false;
    }
    let mut from = 0;
    while let Some(found) = memchr::memmem::find(&text.as_bytes()[from..], open.as_bytes()) {
        let after = from + found + open.len();
        if text[after..].starts_with(close) {
            return true;
        }
        from += found + 1;
    }
    false
}

/// Scan `text`, degrading to a single text block if the marker set is
/// malformed.
pub fn scan_or_text<'a>(text: &'a str, markers: &[Marker]) -> Vec<ContentBlock<'a>> {
    match scan(text, markers) {
        Ok(blocks) => blocks,
        Err(err) => {
            tracing::debug!(%err, "marker scan failed, keeping text unchanged");
            whole_text(text)
        }
    }
}

/// The whole input as one text block, or nothing for empty input.
///
/// Unlike split runs, a non-empty but blank input is still emitted so the
/// caller always gets at least one block back.
pub fn whole_text(text: &str) -> Vec<ContentBlock<'_>> {
    if text.is_empty() {
        Vec::new()
    } else {
        vec![ContentBlock::Text { content: text }]
    }
}
