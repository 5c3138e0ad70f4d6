//! Content block model produced by segmentation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::UnknownTab;
use crate::widget::WidgetName;

/// One block of segmented lesson content.
///
/// Text blocks are zero-copy slices into the raw lesson text. Serialises as
/// `{"kind":"text","content":...}` or `{"kind":"widget","name":...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ContentBlock<'a> {
    /// Narrative Markdown. Never empty or whitespace-only.
    Text { content: &'a str },
    /// An interactive widget placeholder.
    Widget(WidgetBlock),
}

impl<'a> ContentBlock<'a> {
    /// Text block, or `None` if `content` is blank.
    #[inline]
    pub fn text(content: &'a str) -> Option<Self> {
        if content.trim().is_empty() {
            None
        } else {
            Some(ContentBlock::Text { content })
        }
    }

    /// Widget block without parameters.
    #[inline]
    pub fn widget(name: WidgetName) -> Self {
        ContentBlock::Widget(WidgetBlock::new(name))
    }

    #[inline]
    pub fn as_text(&self) -> Option<&'a str> {
        match *self {
            ContentBlock::Text { content } => Some(content),
            ContentBlock::Widget(_) => None,
        }
    }

    #[inline]
    pub fn as_widget(&self) -> Option<&WidgetBlock> {
        match self {
            ContentBlock::Widget(widget) => Some(widget),
            ContentBlock::Text { .. } => None,
        }
    }
}

/// Reference to an interactive widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WidgetBlock {
    pub name: WidgetName,
    #[serde(default, skip_serializing_if = "WidgetParams::is_empty")]
    pub params: WidgetParams,
}

impl WidgetBlock {
    #[inline]
    pub const fn new(name: WidgetName) -> Self {
        Self {
            name,
            params: WidgetParams { lesson_id: None },
        }
    }

    /// Widget that persists its state under `lesson_id`.
    #[inline]
    pub const fn for_lesson(name: WidgetName, lesson_id: u32) -> Self {
        Self {
            name,
            params: WidgetParams {
                lesson_id: Some(lesson_id),
            },
        }
    }
}

impl From<WidgetName> for WidgetBlock {
    fn from(name: WidgetName) -> Self {
        WidgetBlock::new(name)
    }
}

/// Optional parameters passed through to the mounted widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lesson_id: Option<u32>,
}

impl WidgetParams {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lesson_id.is_none()
    }
}

/// Presentation tab of a lesson.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    Story,
    Reflection,
    Challenge,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Story, Tab::Reflection, Tab::Challenge];

    pub const fn as_str(self) -> &'static str {
        match self {
            Tab::Story => "story",
            Tab::Reflection => "reflection",
            Tab::Challenge => "challenge",
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tab {
    type Err = UnknownTab;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "story" => Ok(Tab::Story),
            "reflection" => Ok(Tab::Reflection),
            "challenge" => Ok(Tab::Challenge),
            other => Err(UnknownTab(other.to_owned())),
        }
    }
}

/// Dispatch key: which lesson, which tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LessonKey {
    pub lesson_id: u32,
    pub tab: Tab,
}

impl LessonKey {
    #[inline]
    pub const fn new(lesson_id: u32, tab: Tab) -> Self {
        Self { lesson_id, tab }
    }
}

impl fmt::Display for LessonKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "lesson {} ({})", self.lesson_id, self.tab)
    }
}

/// Distinct widget names in order of first appearance.
///
/// Used to announce which interactive exercises a tab offers.
pub fn widgets_in(blocks: &[ContentBlock<'_>]) -> Vec<WidgetName> {
    let mut names = Vec::new();
    for block in blocks {
        if let ContentBlock::Widget(widget) = block {
            if !names.contains(&widget.name) {
                names.push(widget.name);
            }
        }
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_text_is_not_a_block() {
        assert_eq!(ContentBlock::text(""), None);
        assert_eq!(ContentBlock::text(" \n\t\n"), None);
        assert_eq!(
            ContentBlock::text("\nOutro."),
            Some(ContentBlock::Text { content: "\nOutro." })
        );
    }

    #[test]
    fn text_block_json_shape() {
        let block = ContentBlock::Text { content: "Hello" };
        let json = serde_json::to_string(&block).unwrap();
        assert_eq!(json, r#"{"kind":"text","content":"Hello"}"#);
    }

    #[test]
    fn widget_block_json_shape() {
        let plain = ContentBlock::widget(WidgetName::BreathingExercise);
        assert_eq!(
            serde_json::to_string(&plain).unwrap(),
            r#"{"kind":"widget","name":"breathing-exercise"}"#
        );

        let tracked = ContentBlock::Widget(WidgetBlock::for_lesson(WidgetName::ProgressTracker, 40));
        assert_eq!(
            serde_json::to_string(&tracked).unwrap(),
            r#"{"kind":"widget","name":"progress-tracker","params":{"lessonId":40}}"#
        );
    }

    #[test]
    fn tab_parsing() {
        for tab in Tab::ALL {
            assert_eq!(tab.as_str().parse::<Tab>(), Ok(tab));
        }
        assert_eq!("quiz".parse::<Tab>(), Err(UnknownTab("quiz".into())));
    }

    #[test]
    fn widgets_in_keeps_first_appearance_order() {
        let blocks = [
            ContentBlock::widget(WidgetName::SteelmanSwap),
            ContentBlock::Text { content: "x" },
            ContentBlock::widget(WidgetName::LabelLoosenLadder),
            ContentBlock::widget(WidgetName::SteelmanSwap),
        ];
        assert_eq!(
            widgets_in(&blocks),
            vec![WidgetName::SteelmanSwap, WidgetName::LabelLoosenLadder]
        );
    }
}
