//! HTML rendering of segmented lessons.
//!
//! Text blocks go through `pulldown-cmark` with the GFM extensions lessons
//! use (tables, strikethrough, task lists). Widget blocks are handed to a
//! [`WidgetRegistry`]; the default [`PlaceholderRegistry`] emits a mount
//! point for a client-side widget to hydrate.

use std::fmt::Write as _;

use pulldown_cmark::{Options as MarkdownOptions, Parser, html};
use rustc_hash::FxHashSet;

use crate::content::{ContentBlock, WidgetBlock};
use crate::widget::WidgetName;

/// HTML output writer with a pre-allocated, reusable buffer.
///
/// # Example
/// ```
/// use lessonmark::render::HtmlWriter;
///
/// let mut writer = HtmlWriter::with_capacity_for(64);
/// writer.write_str("<p>");
/// writer.write_escaped_text("Calm <down>");
/// writer.write_str("</p>");
/// assert_eq!(writer.into_string(), "<p>Calm &lt;down&gt;</p>");
/// ```
#[derive(Debug, Clone)]
pub struct HtmlWriter {
    out: String,
}

impl HtmlWriter {
    #[inline]
    pub fn new() -> Self {
        Self {
            out: String::with_capacity(1024),
        }
    }

    /// Create with capacity for rendering `input_len` bytes of Markdown.
    ///
    /// Typical HTML is ~1.25x input size.
    #[inline]
    pub fn with_capacity_for(input_len: usize) -> Self {
        Self {
            out: String::with_capacity(input_len + input_len / 4),
        }
    }

    /// Write a static string (compile-time known).
    #[inline]
    pub fn write_str(&mut self, s: &'static str) {
        self.out.push_str(s);
    }

    /// Write a dynamic string without escaping.
    #[inline]
    pub fn write_string(&mut self, s: &str) {
        self.out.push_str(s);
    }

    /// Write text content with HTML escaping.
    #[inline]
    pub fn write_escaped_text(&mut self, text: &str) {
        html_escape::encode_text_to_string(text, &mut self.out);
    }

    /// Write a double-quoted attribute value with escaping.
    #[inline]
    pub fn write_escaped_attr(&mut self, attr: &str) {
        html_escape::encode_double_quoted_attribute_to_string(attr, &mut self.out);
    }

    #[inline]
    pub fn write_u32(&mut self, value: u32) {
        let _ = write!(self.out, "{value}");
    }

    #[inline]
    pub fn newline(&mut self) {
        self.out.push('\n');
    }

    /// Render Markdown into the buffer.
    pub fn write_markdown(&mut self, markdown: &str, options: MarkdownOptions) {
        html::push_html(&mut self.out, Parser::new_ext(markdown, options));
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.out.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.out.is_empty()
    }

    /// Clear for reuse, keeping capacity.
    #[inline]
    pub fn clear(&mut self) {
        self.out.clear();
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.out
    }

    #[inline]
    pub fn into_string(self) -> String {
        self.out
    }
}

impl Default for HtmlWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Maps widget blocks to HTML.
///
/// Implemented for closures, so a one-off registry is just
/// `|widget: &WidgetBlock, out: &mut HtmlWriter| { ...; true }`.
pub trait WidgetRegistry {
    /// Render `widget` into `out`. Returns `false` if the widget is not
    /// registered; nothing should be written in that case.
    fn render(&self, widget: &WidgetBlock, out: &mut HtmlWriter) -> bool;
}

impl<F> WidgetRegistry for F
where
    F: Fn(&WidgetBlock, &mut HtmlWriter) -> bool,
{
    fn render(&self, widget: &WidgetBlock, out: &mut HtmlWriter) -> bool {
        self(widget, out)
    }
}

/// Emits `<div class="widget" data-widget="NAME"></div>` mount points,
/// with `data-lesson-id` when the widget carries one.
#[derive(Debug, Clone, Default)]
pub struct PlaceholderRegistry {
    /// `None` mounts every widget.
    only: Option<FxHashSet<WidgetName>>,
}

impl PlaceholderRegistry {
    /// Mount every known widget.
    pub fn all() -> Self {
        Self::default()
    }

    /// Mount only `widgets`; others are skipped.
    pub fn only(widgets: impl IntoIterator<Item = WidgetName>) -> Self {
        Self {
            only: Some(widgets.into_iter().collect()),
        }
    }

    pub fn is_registered(&self, name: WidgetName) -> bool {
        self.only.as_ref().is_none_or(|only| only.contains(&name))
    }
}

impl WidgetRegistry for PlaceholderRegistry {
    fn render(&self, widget: &WidgetBlock, out: &mut HtmlWriter) -> bool {
        if !self.is_registered(widget.name) {
            return false;
        }
        out.write_str("<div class=\"widget\" data-widget=\"");
        out.write_escaped_attr(widget.name.as_str());
        out.write_str("\"");
        if let Some(lesson_id) = widget.params.lesson_id {
            out.write_str(" data-lesson-id=\"");
            out.write_u32(lesson_id);
            out.write_str("\"");
        }
        out.write_str("></div>");
        out.newline();
        true
    }
}

/// Renders content blocks to HTML.
#[derive(Debug, Clone)]
pub struct HtmlRenderer<R = PlaceholderRegistry> {
    registry: R,
    markdown: MarkdownOptions,
}

impl Default for HtmlRenderer {
    fn default() -> Self {
        Self::new(PlaceholderRegistry::all())
    }
}

impl<R: WidgetRegistry> HtmlRenderer<R> {
    pub fn new(registry: R) -> Self {
        Self {
            registry,
            markdown: MarkdownOptions::ENABLE_TABLES
                | MarkdownOptions::ENABLE_STRIKETHROUGH
                | MarkdownOptions::ENABLE_TASKLISTS,
        }
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    pub fn render(&self, blocks: &[ContentBlock<'_>]) -> String {
        let input_len = blocks.iter().filter_map(ContentBlock::as_text).map(str::len).sum();
        let mut writer = HtmlWriter::with_capacity_for(input_len);
        self.render_into(blocks, &mut writer);
        writer.into_string()
    }

    /// Render into an existing writer, appending.
    pub fn render_into(&self, blocks: &[ContentBlock<'_>], writer: &mut HtmlWriter) {
        for block in blocks {
            match block {
                ContentBlock::Text { content } => writer.write_markdown(content, self.markdown),
                ContentBlock::Widget(widget) => {
                    if !self.registry.render(widget, writer) {
                        tracing::trace!(widget = %widget.name, "widget not registered, skipping");
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Writer ───────────────────────────────────────────────────────

    #[test]
    fn writer_escapes_text_and_attrs() {
        let mut writer = HtmlWriter::new();
        writer.write_escaped_text("a < b & c");
        assert_eq!(writer.as_str(), "a &lt; b &amp; c");

        writer.clear();
        assert!(writer.is_empty());
        writer.write_escaped_attr("say \"hi\"");
        assert_eq!(writer.as_str(), "say &quot;hi&quot;");
    }

    #[test]
    fn writer_u32() {
        let mut writer = HtmlWriter::default();
        writer.write_u32(0);
        writer.write_u32(1234567890);
        assert_eq!(writer.as_str(), "01234567890");
    }

    #[test]
    fn writer_capacity() {
        let writer = HtmlWriter::with_capacity_for(1000);
        assert!(writer.out.capacity() >= 1250);
    }

    // ── Registry ─────────────────────────────────────────────────────

    #[test]
    fn placeholder_with_lesson_id() {
        let mut writer = HtmlWriter::new();
        let widget = WidgetBlock::for_lesson(WidgetName::ProgressTracker, 40);
        assert!(PlaceholderRegistry::all().render(&widget, &mut writer));
        assert_eq!(
            writer.as_str(),
            "<div class=\"widget\" data-widget=\"progress-tracker\" data-lesson-id=\"40\"></div>\n"
        );
    }

    #[test]
    fn placeholder_subset_skips_others() {
        let registry = PlaceholderRegistry::only([WidgetName::EmotionWheel]);
        let mut writer = HtmlWriter::new();
        assert!(!registry.render(&WidgetBlock::new(WidgetName::SmartGoals), &mut writer));
        assert!(writer.is_empty());
        assert!(registry.render(&WidgetBlock::new(WidgetName::EmotionWheel), &mut writer));
    }

    #[test]
    fn closures_are_registries() {
        let renderer = HtmlRenderer::new(|widget: &WidgetBlock, out: &mut HtmlWriter| {
            out.write_string(widget.name.as_str());
            true
        });
        let html = renderer.render(&[ContentBlock::widget(WidgetName::FiveUses)]);
        assert_eq!(html, "five-uses");
    }

    // ── Renderer ─────────────────────────────────────────────────────

    #[test]
    fn renders_markdown_then_widget() {
        let blocks = [
            ContentBlock::Text { content: "## Drill\n\nGo **now**.\n" },
            ContentBlock::widget(WidgetName::FrameSpotting),
        ];
        let html = HtmlRenderer::default().render(&blocks);
        assert_eq!(
            html,
            "<h2>Drill</h2>\n<p>Go <strong>now</strong>.</p>\n\
             <div class=\"widget\" data-widget=\"frame-spotting\"></div>\n"
        );
    }

    #[test]
    fn renders_gfm_tables() {
        let blocks = [ContentBlock::Text {
            content: "| a | b |\n|---|---|\n| 1 | 2 |\n",
        }];
        let html = HtmlRenderer::default().render(&blocks);
        assert!(html.contains("<table>"));
        assert!(html.contains("<td>1</td>"));
    }

    #[test]
    fn empty_blocks_render_nothing() {
        assert_eq!(HtmlRenderer::default().render(&[]), "");
    }
}
