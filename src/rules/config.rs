//! Rule tables loaded from TOML.
//!
//! ```toml
//! [[exact]]
//! lesson = 40
//! tab = "challenge"
//! rule = { kind = "scan", markers = [
//!   { anchor = "### Reframing Tracker", widgets = ["progress-tracker"], until = "### Reflection Prompts:", lesson_id = 40 },
//! ] }
//!
//! [[range]]
//! lessons = [41, 60]
//! rule = { kind = "scan", markers = [{ known_tags = true }] }
//!
//! [[shape]]
//! tab = "reflection"
//! contains = "Rate yourself"
//! rule = { kind = "append", widgets = ["rating-scale"] }
//! ```
//!
//! Entries keep their file order within each layer. Everything is validated
//! at load time, so a loaded table never fails for malformed markers.

use std::str::FromStr;

use serde::Deserialize;

use super::{Rule, RuleTable, Trigger};
use crate::content::{LessonKey, Tab, WidgetBlock};
use crate::error::ConfigError;
use crate::scan::Marker;
use crate::widget::WidgetName;

/// Top-level layout of a rule file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TableConfig {
    #[serde(default)]
    pub exact: Vec<ExactConfig>,
    #[serde(default)]
    pub range: Vec<RangeConfig>,
    #[serde(default)]
    pub shape: Vec<ShapeConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExactConfig {
    pub lesson: u32,
    pub tab: Tab,
    pub rule: RuleConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RangeConfig {
    /// Inclusive `[first, last]`.
    pub lessons: [u32; 2],
    #[serde(default)]
    pub tab: Option<Tab>,
    pub rule: RuleConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ShapeConfig {
    #[serde(default)]
    pub tab: Option<Tab>,
    #[serde(default)]
    pub contains: Option<String>,
    #[serde(default)]
    pub known_tags: bool,
    pub rule: RuleConfig,
}

/// Serialized form of [`Rule`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RuleConfig {
    Plain,
    Constant { widgets: Vec<WidgetSpec> },
    Prepend { widgets: Vec<WidgetSpec> },
    Append { widgets: Vec<WidgetSpec> },
    SplitAt { offset: usize, widgets: Vec<WidgetSpec> },
    TextBefore { phrase: String },
    TextFrom { phrase: String },
    Scan { markers: Vec<MarkerConfig> },
    Guarded { requires: Vec<String>, rule: Box<RuleConfig> },
    Preceded { anchor: String, rule: Box<RuleConfig> },
    Sequence { rules: Vec<RuleConfig> },
}

/// A widget by name, optionally bound to a lesson.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum WidgetSpec {
    Name(WidgetName),
    WithParams {
        name: WidgetName,
        #[serde(default)]
        lesson_id: Option<u32>,
    },
}

impl From<&WidgetSpec> for WidgetBlock {
    fn from(spec: &WidgetSpec) -> Self {
        match *spec {
            WidgetSpec::Name(name) => WidgetBlock::new(name),
            WidgetSpec::WithParams { name, lesson_id } => {
                let mut block = WidgetBlock::new(name);
                block.params.lesson_id = lesson_id;
                block
            }
        }
    }
}

/// Serialized form of [`Marker`]. Exactly one of `tag`, `anchor` or
/// `known_tags` must be set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MarkerConfig {
    #[serde(default)]
    pub tag: Option<WidgetName>,
    #[serde(default)]
    pub anchor: Option<String>,
    #[serde(default)]
    pub widgets: Vec<WidgetName>,
    #[serde(default)]
    pub until: Option<String>,
    #[serde(default)]
    pub to_end: bool,
    #[serde(default)]
    pub known_tags: bool,
    #[serde(default)]
    pub lesson_id: Option<u32>,
}

impl TableConfig {
    /// Validate and build the table.
    pub fn into_table(self) -> Result<RuleTable, ConfigError> {
        let mut table = RuleTable::new();

        for entry in self.exact {
            let key = LessonKey::new(entry.lesson, entry.tab);
            let rule = entry.rule.build(&key.to_string())?;
            table.insert_exact(key, rule);
        }

        for entry in self.range {
            let [start, end] = entry.lessons;
            if start > end {
                return Err(ConfigError::EmptyRange { start, end });
            }
            let rule = entry.rule.build(&format!("lessons {start}..={end}"))?;
            table.push_range(start..=end, entry.tab, rule);
        }

        for entry in self.shape {
            let trigger = match (entry.contains, entry.known_tags) {
                (Some(phrase), false) => {
                    if phrase.is_empty() {
                        return Err(ConfigError::EmptyLiteral("shape trigger".into()));
                    }
                    Trigger::Contains(phrase)
                }
                (None, true) => Trigger::KnownTags,
                _ => return Err(ConfigError::InvalidTrigger),
            };
            let rule = entry.rule.build("shape rule")?;
            table.push_shape(entry.tab, trigger, rule);
        }

        Ok(table)
    }
}

impl RuleConfig {
    /// Validate and build the rule. `context` names the entry in errors.
    pub fn build(self, context: &str) -> Result<Rule, ConfigError> {
        fn blocks(widgets: Vec<WidgetSpec>) -> Vec<WidgetBlock> {
            widgets.iter().map(WidgetBlock::from).collect()
        }
        let literal = |phrase: String| {
            if phrase.is_empty() {
                Err(ConfigError::EmptyLiteral(context.to_owned()))
            } else {
                Ok(phrase)
            }
        };

        Ok(match self {
            RuleConfig::Plain => Rule::Plain,
            RuleConfig::Constant { widgets } => Rule::Constant(blocks(widgets)),
            RuleConfig::Prepend { widgets } => Rule::Prepend(blocks(widgets)),
            RuleConfig::Append { widgets } => Rule::Append(blocks(widgets)),
            RuleConfig::SplitAt { offset, widgets } => Rule::SplitAt {
                offset,
                widgets: blocks(widgets),
            },
            RuleConfig::TextBefore { phrase } => Rule::TextBefore(literal(phrase)?),
            RuleConfig::TextFrom { phrase } => Rule::TextFrom(literal(phrase)?),
            RuleConfig::Scan { markers } => Rule::Scan(
                markers
                    .into_iter()
                    .map(|marker| marker.build(context))
                    .collect::<Result<_, _>>()?,
            ),
            RuleConfig::Guarded { requires, rule } => {
                if requires.iter().any(String::is_empty) {
                    return Err(ConfigError::EmptyLiteral(context.to_owned()));
                }
                Rule::Guarded {
                    requires,
                    rule: Box::new(rule.build(context)?),
                }
            }
            RuleConfig::Preceded { anchor, rule } => Rule::Preceded {
                anchor: literal(anchor)?,
                rule: Box::new(rule.build(context)?),
            },
            RuleConfig::Sequence { rules } => Rule::Sequence(
                rules
                    .into_iter()
                    .map(|rule| rule.build(context))
                    .collect::<Result<_, _>>()?,
            ),
        })
    }
}

impl MarkerConfig {
    pub fn build(self, context: &str) -> Result<Marker, ConfigError> {
        let invalid = |reason| ConfigError::InvalidMarker {
            context: context.to_owned(),
            reason,
        };

        let marker = match (self.tag, self.anchor, self.known_tags) {
            (Some(widget), None, false) => {
                if !self.widgets.is_empty() || self.until.is_some() || self.to_end {
                    return Err(invalid("tag markers take no `widgets`, `until` or `to_end`"));
                }
                Marker::tag(widget)
            }
            (None, Some(literal), false) => {
                if literal.is_empty() {
                    return Err(ConfigError::EmptyLiteral(context.to_owned()));
                }
                let marker = Marker::anchor(literal, self.widgets);
                match (self.until, self.to_end) {
                    (None, false) => marker,
                    (None, true) => marker.skip_to_end(),
                    (Some(until), false) if until.is_empty() => {
                        return Err(ConfigError::EmptyLiteral(context.to_owned()));
                    }
                    (Some(until), false) => marker.skip_until(until),
                    (Some(_), true) => return Err(invalid("`until` and `to_end` are exclusive")),
                }
            }
            (None, None, true) => {
                if !self.widgets.is_empty() || self.until.is_some() || self.to_end || self.lesson_id.is_some() {
                    return Err(invalid("`known_tags` takes no other fields"));
                }
                Marker::KnownTags
            }
            _ => return Err(invalid("set exactly one of `tag`, `anchor` or `known_tags`")),
        };

        Ok(match self.lesson_id {
            Some(lesson_id) => marker.for_lesson(lesson_id),
            None => marker,
        })
    }
}

impl RuleTable {
    /// Load a rule table from TOML.
    pub fn from_toml_str(source: &str) -> Result<RuleTable, ConfigError> {
        let config: TableConfig = toml::from_str(source)?;
        config.into_table()
    }
}

impl FromStr for RuleTable {
    type Err = ConfigError;

    fn from_str(source: &str) -> Result<Self, Self::Err> {
        RuleTable::from_toml_str(source)
    }
}
