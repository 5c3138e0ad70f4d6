//! Lesson rule dispatcher.
//!
//! Lessons mix prose and widgets differently, so each `(lesson, tab)` pair
//! resolves to a [`Rule`] through four layers, first match wins:
//!
//! 1. **Exact**: a rule registered for the precise [`LessonKey`].
//! 2. **Range**: a rule shared by an inclusive range of lesson ids (usually
//!    one course module), optionally limited to one tab. Declaration order
//!    decides between overlapping ranges.
//! 3. **Shape**: a rule chosen by what the text contains (a rating-scale
//!    prompt, an embedded widget tag), regardless of lesson id.
//! 4. **Default**: the whole text as a single block.
//!
//! A rule that does not apply to the text (a [`Rule::Guarded`] whose
//! required phrases are missing, a [`Rule::Preceded`] whose anchor opens the
//! text) passes control to the next candidate. A rule
//! that fails is replaced by the default, so a lesson always renders.

mod builtin;
pub mod config;

use std::ops::RangeInclusive;
use std::sync::LazyLock;

use rustc_hash::FxHashMap;

use crate::Options;
use crate::content::{ContentBlock, LessonKey, Tab, WidgetBlock};
use crate::error::RuleError;
use crate::limits::MAX_RULE_DEPTH;
use crate::range::utf16_offset;
use crate::scan::{self, Marker, whole_text};

pub use builtin::builtin_table;

/// How one lesson tab is split into blocks.
///
/// Rules are pure: the same text always yields the same blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    /// The whole text as one block.
    Plain,
    /// Fixed widgets; the text is ignored.
    Constant(Vec<WidgetBlock>),
    /// Widgets, then the text.
    Prepend(Vec<WidgetBlock>),
    /// The text, then widgets.
    Append(Vec<WidgetBlock>),
    /// Text up to `offset` UTF-16 code units, the widgets, then the rest.
    SplitAt {
        offset: usize,
        widgets: Vec<WidgetBlock>,
    },
    /// Text before the first occurrence of the phrase.
    TextBefore(String),
    /// Text from the first occurrence of the phrase to the end.
    TextFrom(String),
    /// Run the marker scanner.
    Scan(Vec<Marker>),
    /// `rule`, but only if every phrase in `requires` occurs in the text.
    Guarded { requires: Vec<String>, rule: Box<Rule> },
    /// `rule`, but only if `anchor` occurs after some leading text.
    Preceded { anchor: String, rule: Box<Rule> },
    /// Each rule in turn, concatenated. Inapplicable members add nothing.
    Sequence(Vec<Rule>),
}

impl Rule {
    /// Apply the rule. `Ok(None)` means the rule does not apply to `text`.
    pub fn apply<'a>(&self, text: &'a str) -> Result<Option<Vec<ContentBlock<'a>>>, RuleError> {
        self.apply_at(text, 0)
    }

    fn apply_at<'a>(&self, text: &'a str, depth: usize) -> Result<Option<Vec<ContentBlock<'a>>>, RuleError> {
        if depth > MAX_RULE_DEPTH {
            return Err(RuleError::TooDeep {
                limit: MAX_RULE_DEPTH,
            });
        }
        let blocks = match self {
            Rule::Plain => whole_text(text),
            Rule::Constant(widgets) => widget_blocks(widgets).collect(),
            Rule::Prepend(widgets) => widget_blocks(widgets).chain(ContentBlock::text(text)).collect(),
            Rule::Append(widgets) => ContentBlock::text(text).into_iter().chain(widget_blocks(widgets)).collect(),
            Rule::SplitAt { offset, widgets } => {
                let split = utf16_offset(text, *offset);
                ContentBlock::text(&text[..split])
                    .into_iter()
                    .chain(widget_blocks(widgets))
                    .chain(ContentBlock::text(&text[split..]))
                    .collect()
            }
            Rule::TextBefore(phrase) => match text.find(phrase.as_str()) {
                Some(end) => ContentBlock::text(&text[..end]).into_iter().collect(),
                None => return Ok(None),
            },
            Rule::TextFrom(phrase) => match text.find(phrase.as_str()) {
                Some(start) => ContentBlock::text(&text[start..]).into_iter().collect(),
                None => return Ok(None),
            },
            Rule::Scan(markers) => scan::scan(text, markers)?,
            Rule::Guarded { requires, rule } => {
                if !requires.iter().all(|phrase| text.contains(phrase.as_str())) {
                    return Ok(None);
                }
                return rule.apply_at(text, depth + 1);
            }
            Rule::Preceded { anchor, rule } => {
                if text.find(anchor.as_str()).is_none_or(|at| at == 0) {
                    return Ok(None);
                }
                return rule.apply_at(text, depth + 1);
            }
            Rule::Sequence(rules) => {
                let mut blocks = Vec::new();
                for rule in rules {
                    if let Some(more) = rule.apply_at(text, depth + 1)? {
                        blocks.extend(more);
                    }
                }
                blocks
            }
        };
        Ok(Some(blocks))
    }
}

fn widget_blocks<'a>(widgets: &[WidgetBlock]) -> impl Iterator<Item = ContentBlock<'a>> {
    widgets.iter().copied().map(ContentBlock::Widget)
}

/// A rule shared by a range of lessons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeRule {
    pub lessons: RangeInclusive<u32>,
    /// `None` applies to every tab.
    pub tab: Option<Tab>,
    pub rule: Rule,
}

impl RangeRule {
    fn matches(&self, key: LessonKey) -> bool {
        self.lessons.contains(&key.lesson_id) && self.tab.is_none_or(|tab| tab == key.tab)
    }
}

/// What a shape rule looks for in the text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    /// A literal phrase.
    Contains(String),
    /// Any known widget tag.
    KnownTags,
}

impl Trigger {
    fn fires(&self, text: &str) -> bool {
        match self {
            Trigger::Contains(phrase) => !phrase.is_empty() && text.contains(phrase.as_str()),
            Trigger::KnownTags => Marker::KnownTags.occurs_in(text),
        }
    }
}

/// A rule chosen by the content of the text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeRule {
    /// `None` applies to every tab.
    pub tab: Option<Tab>,
    pub trigger: Trigger,
    pub rule: Rule,
}

/// The exact, range and shape layers.
#[derive(Debug, Clone, Default)]
pub struct RuleTable {
    exact: FxHashMap<LessonKey, Rule>,
    ranges: Vec<RangeRule>,
    shapes: Vec<ShapeRule>,
}

impl RuleTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an exact rule, replacing any previous one for `key`.
    pub fn insert_exact(&mut self, key: LessonKey, rule: Rule) -> Option<Rule> {
        self.exact.insert(key, rule)
    }

    /// Register the same exact rule for several tabs of one lesson.
    pub fn insert_tabs(&mut self, lesson_id: u32, tabs: &[Tab], rule: Rule) {
        for &tab in tabs {
            self.exact.insert(LessonKey::new(lesson_id, tab), rule.clone());
        }
    }

    /// Append a range rule (lower priority than those already present).
    pub fn push_range(&mut self, lessons: RangeInclusive<u32>, tab: Option<Tab>, rule: Rule) {
        self.ranges.push(RangeRule { lessons, tab, rule });
    }

    /// Append a shape rule (lower priority than those already present).
    pub fn push_shape(&mut self, tab: Option<Tab>, trigger: Trigger, rule: Rule) {
        self.shapes.push(ShapeRule { tab, trigger, rule });
    }

    /// Layer `self` over `base`: within each layer, rules of `self` win.
    pub fn layered_over(mut self, base: RuleTable) -> RuleTable {
        for (key, rule) in base.exact {
            self.exact.entry(key).or_insert(rule);
        }
        self.ranges.extend(base.ranges);
        self.shapes.extend(base.shapes);
        self
    }

    pub fn exact(&self, key: LessonKey) -> Option<&Rule> {
        self.exact.get(&key)
    }

    pub fn ranges(&self) -> &[RangeRule] {
        &self.ranges
    }

    pub fn shapes(&self) -> &[ShapeRule] {
        &self.shapes
    }

    pub fn is_empty(&self) -> bool {
        self.exact.is_empty() && self.ranges.is_empty() && self.shapes.is_empty()
    }

    /// Candidate rules for `key` in priority order.
    fn candidates<'t>(&'t self, key: LessonKey, text: &'t str) -> impl Iterator<Item = (Layer, &'t Rule)> + 't {
        let exact = self.exact.get(&key).map(|rule| (Layer::Exact, rule));
        let ranges = self
            .ranges
            .iter()
            .filter(move |range| range.matches(key))
            .map(|range| (Layer::Range, &range.rule));
        let shapes = self
            .shapes
            .iter()
            .filter(move |shape| shape.tab.is_none_or(|tab| tab == key.tab) && shape.trigger.fires(text))
            .map(|shape| (Layer::Shape, &shape.rule));
        exact.into_iter().chain(ranges).chain(shapes)
    }
}

/// Which layer produced a segmentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Exact,
    Range,
    Shape,
    Default,
}

/// Blocks plus the layer that produced them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatch<'a> {
    pub layer: Layer,
    pub blocks: Vec<ContentBlock<'a>>,
}

/// Resolves lesson keys to rules and applies them.
///
/// Immutable after construction; share it freely across calls and threads.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    table: RuleTable,
    options: Options,
}

static BUILTIN: LazyLock<Dispatcher> = LazyLock::new(|| Dispatcher::new(builtin_table(), Options::default()));

impl Default for Dispatcher {
    fn default() -> Self {
        BUILTIN.clone()
    }
}

impl Dispatcher {
    pub fn new(table: RuleTable, options: Options) -> Self {
        Self { table, options }
    }

    /// Shared dispatcher over the built-in course table.
    pub fn builtin() -> &'static Dispatcher {
        &BUILTIN
    }

    pub fn table(&self) -> &RuleTable {
        &self.table
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Segment one lesson tab.
    ///
    /// Never fails: empty text yields no blocks, any other text at least one.
    pub fn segment<'a>(&self, lesson_id: u32, tab: Tab, text: &'a str) -> Vec<ContentBlock<'a>> {
        self.dispatch(LessonKey::new(lesson_id, tab), text).blocks
    }

    /// Segment one lesson tab and report which layer decided.
    pub fn dispatch<'a>(&self, key: LessonKey, text: &'a str) -> Dispatch<'a> {
        if text.is_empty() {
            return Dispatch {
                layer: Layer::Default,
                blocks: Vec::new(),
            };
        }

        for (layer, rule) in self.table.candidates(key, text) {
            if !self.options.layer_enabled(layer) {
                continue;
            }
            match rule.apply(text) {
                Ok(Some(blocks)) if !blocks.is_empty() => {
                    tracing::trace!(%key, ?layer, blocks = blocks.len(), "segmented lesson");
                    return Dispatch { layer, blocks };
                }
                Ok(Some(_)) => {
                    tracing::trace!(%key, ?layer, "rule produced no blocks, using default");
                    break;
                }
                Ok(None) => continue,
                Err(err) => {
                    tracing::warn!(%key, ?layer, %err, "segmentation rule failed, rendering plain text");
                    break;
                }
            }
        }

        Dispatch {
            layer: Layer::Default,
            blocks: whole_text(text),
        }
    }
}
