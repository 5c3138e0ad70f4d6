//! lessonmark: lesson content segmentation for an interactive course
//!
//! Lesson tabs are authored as Markdown. Some positions in that Markdown
//! are where interactive widgets (assessments, timers, worksheets) belong.
//! This crate splits a tab's raw text into an ordered list of
//! [`ContentBlock`]s, either narrative text or a widget placeholder, which a
//! renderer then mounts.
//!
//! # Design Principles
//! - Zero-copy: text blocks borrow from the input
//! - No regex: `memchr` literal search and byte-level tag parsing
//! - One pass: the scanner never backtracks
//! - Total: segmentation never fails; any problem degrades to plain text
//!
//! # Example
//! ```
//! use lessonmark::{ContentBlock, Tab, WidgetName};
//!
//! let blocks = lessonmark::segment("Intro.\n<breathing-exercise></breathing-exercise>\nOutro.", 45, Tab::Story);
//! assert_eq!(blocks[1], ContentBlock::widget(WidgetName::BreathingExercise));
//!
//! let blocks = lessonmark::segment("Just prose.", 999_999, Tab::Story);
//! assert_eq!(blocks, vec![ContentBlock::Text { content: "Just prose." }]);
//! ```

pub mod content;
pub mod error;
pub mod fields;
pub mod limits;
pub mod range;
#[cfg(feature = "html")]
pub mod render;
pub mod rules;
pub mod scan;
pub mod widget;

// Re-export primary types
pub use content::{ContentBlock, LessonKey, Tab, WidgetBlock, WidgetParams, widgets_in};
pub use error::{ConfigError, RuleError, ScanError, UnknownTab, UnknownWidget};
pub use range::Span;
pub use rules::{Dispatch, Dispatcher, Layer, Rule, RuleTable};
pub use widget::WidgetName;

#[cfg(feature = "html")]
pub use render::{HtmlRenderer, HtmlWriter, PlaceholderRegistry, WidgetRegistry};

/// Segmentation options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// Consult rules shared by lesson-id ranges.
    pub range_rules: bool,
    /// Consult rules chosen by text content.
    pub shape_rules: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            range_rules: true,
            shape_rules: true,
        }
    }
}

impl Options {
    pub(crate) fn layer_enabled(&self, layer: Layer) -> bool {
        match layer {
            Layer::Exact | Layer::Default => true,
            Layer::Range => self.range_rules,
            Layer::Shape => self.shape_rules,
        }
    }
}

/// Segment one lesson tab with the built-in course rules.
///
/// This is the primary API for simple use cases.
pub fn segment(text: &str, lesson_id: u32, tab: Tab) -> Vec<ContentBlock<'_>> {
    Dispatcher::builtin().segment(lesson_id, tab, text)
}

/// Segment one lesson tab and render it to HTML with placeholder widgets.
///
/// # Example
/// ```
/// use lessonmark::Tab;
///
/// let html = lessonmark::to_html("Feel it.", 21, Tab::Reflection);
/// assert!(html.starts_with("<div class=\"widget\" data-widget=\"emotion-wheel\"></div>"));
/// assert!(html.contains("<p>Feel it.</p>"));
/// ```
#[cfg(feature = "html")]
pub fn to_html(text: &str, lesson_id: u32, tab: Tab) -> String {
    HtmlRenderer::default().render(&segment(text, lesson_id, tab))
}
