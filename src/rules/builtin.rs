//! The course's built-in rule table.
//!
//! Offsets and anchor phrases below are authoring decisions tied to the
//! published lesson texts. They are configuration, not a general heuristic.

use super::{Rule, RuleTable, Trigger};
use crate::content::{LessonKey, Tab, WidgetBlock};
use crate::scan::Marker;
use crate::widget::WidgetName::{self, *};

/// Rating-scale prompt used by reflection tabs across the course.
pub const RATING_PROMPT: &str = "Rate yourself";
/// Heading that follows a rating-scale questionnaire.
pub const RATING_SCORING: &str = "### Scoring";

/// Build the table for the published course.
pub fn builtin_table() -> RuleTable {
    let mut table = RuleTable::new();
    resilience_intro(&mut table);
    emotional_intelligence(&mut table);
    cognitive_flexibility(&mut table);
    module_ranges(&mut table);
    content_shapes(&mut table);
    table
}

fn widgets(names: &[WidgetName]) -> Vec<WidgetBlock> {
    names.iter().copied().map(WidgetBlock::new).collect()
}

fn split_at(offset: usize, widget: WidgetName) -> Rule {
    Rule::SplitAt {
        offset,
        widgets: widgets(&[widget]),
    }
}

/// One bespoke tab; the lesson's other tabs render as plain text.
fn single_tab(table: &mut RuleTable, lesson_id: u32, tab: Tab, rule: Rule) {
    let others: Vec<Tab> = Tab::ALL.into_iter().filter(|&t| t != tab).collect();
    table.insert_tabs(lesson_id, &others, Rule::Plain);
    table.insert_exact(LessonKey::new(lesson_id, tab), rule);
}

/// Intro text before `first`, the widgets, then the text from `resume` on.
/// The widgets are emitted even when neither heading is present.
fn replace_section(first: &str, names: &[WidgetName], resume: &str) -> Rule {
    Rule::Sequence(vec![
        Rule::TextBefore(first.into()),
        Rule::Constant(widgets(names)),
        Rule::TextFrom(resume.into()),
    ])
}

fn rating_scale() -> Marker {
    Marker::anchor(RATING_PROMPT, [RatingScale]).skip_until(RATING_SCORING)
}

// Module 1: Introduction to Resilience
fn resilience_intro(table: &mut RuleTable) {
    // Overview of Resilience
    single_tab(table, 35, Tab::Story, split_at(500, EqAssessment));
    // Goals of the Course
    single_tab(table, 36, Tab::Story, split_at(600, SmartGoals));
}

// Module 2: Emotional Intelligence
fn emotional_intelligence(table: &mut RuleTable) {
    single_tab(table, 26, Tab::Story, split_at(400, EmotionWheel));
    single_tab(table, 20, Tab::Story, split_at(800, EqAssessment));
    single_tab(table, 21, Tab::Reflection, Rule::Prepend(widgets(&[EmotionWheel])));
    single_tab(table, 22, Tab::Story, split_at(700, BreathingExercise));
    single_tab(table, 27, Tab::Challenge, split_at(300, ConflictSimulator));
    single_tab(table, 28, Tab::Challenge, Rule::Prepend(widgets(&[SmartGoals])));
}

// Module 3: Cognitive Flexibility
fn cognitive_flexibility(table: &mut RuleTable) {
    // What Is Cognitive Flexibility? Drills 1 and 2 become interactive.
    table.insert_exact(
        LessonKey::new(38, Tab::Reflection),
        replace_section("## Drill 1:", &[FrameSpotting, AlphabetNumber, FiveUses], "## Mini Cases:"),
    );

    // Barriers & Biases
    table.insert_exact(
        LessonKey::new(39, Tab::Story),
        Rule::Guarded {
            requires: vec!["Breathing Tip".into()],
            rule: Box::new(Rule::Scan(vec![
                Marker::anchor("### 🫁 Breathing Tip", [BreathingExercise, BiasInterrupter]).skip_to_end(),
            ])),
        },
    );
    table.insert_exact(
        LessonKey::new(39, Tab::Reflection),
        replace_section("## Drill 1:", &[LabelLoosenLadder, SteelmanSwap], "## Personal Reflection"),
    );
    table.insert_exact(
        LessonKey::new(39, Tab::Challenge),
        replace_section(
            "## Choose One Mini Case",
            &[MiniCaseStudy, EarlyWarningSystem],
            "## Exit Ticket",
        ),
    );

    // Tools for Reframing. Headings at the very start leave the tab as plain text.
    const TOOLKIT: &str = "## 🧰 Your Reframing Toolkit";
    const PERSONAL_REFRAME: &str = "## 📝 Your Personal Go-To Reframe";
    const TRACKER: &str = "### Reframing Tracker";
    table.insert_exact(
        LessonKey::new(40, Tab::Story),
        Rule::Preceded {
            anchor: TOOLKIT.into(),
            rule: Box::new(Rule::Scan(vec![Marker::anchor(TOOLKIT, [ReframingToolsExplorer])])),
        },
    );
    table.insert_exact(
        LessonKey::new(40, Tab::Reflection),
        Rule::Sequence(vec![
            Rule::Constant(widgets(&[
                ReframingSprintTimer,
                ReframingSprintWorksheet,
                OptionsLadderBuilder,
            ])),
            Rule::Preceded {
                anchor: PERSONAL_REFRAME.into(),
                rule: Box::new(Rule::Constant(widgets(&[PersonalReframeWorksheet]))),
            },
        ]),
    );
    table.insert_exact(
        LessonKey::new(40, Tab::Challenge),
        Rule::Preceded {
            anchor: TRACKER.into(),
            rule: Box::new(Rule::Scan(vec![
                Marker::anchor(TRACKER, [ProgressTracker])
                    .skip_until("### Reflection Prompts:")
                    .for_lesson(40),
            ])),
        },
    );
}

fn module_ranges(table: &mut RuleTable) {
    // Cognitive flexibility reflections open with a baseline questionnaire.
    table.push_range(
        37..=41,
        Some(Tab::Reflection),
        Rule::Scan(vec![rating_scale(), Marker::KnownTags]),
    );
    // Later modules are authored with explicit widget tags.
    table.push_range(41..=60, None, Rule::Scan(vec![Marker::KnownTags]));
}

fn content_shapes(table: &mut RuleTable) {
    table.push_shape(
        Some(Tab::Reflection),
        Trigger::Contains(RATING_PROMPT.into()),
        Rule::Scan(vec![rating_scale()]),
    );
    table.push_shape(None, Trigger::KnownTags, Rule::Scan(vec![Marker::KnownTags]));
}
