use lessonmark::scan::{Marker, scan, scan_or_text};
use lessonmark::{ContentBlock, Tab, WidgetBlock, WidgetName, segment, widgets_in};

// ── Helper ───────────────────────────────────────────────────────────

fn text(content: &str) -> ContentBlock<'_> {
    ContentBlock::Text { content }
}

fn widget(name: WidgetName) -> ContentBlock<'static> {
    ContentBlock::widget(name)
}

/// Concatenated text of all text blocks.
fn joined(blocks: &[ContentBlock<'_>]) -> String {
    blocks.iter().filter_map(ContentBlock::as_text).collect()
}

// ── Basic segmentation ───────────────────────────────────────────────

#[test]
fn tag_between_prose() {
    let input = "Intro.\n<breathing-exercise></breathing-exercise>\nOutro.";
    let blocks = scan(input, &[Marker::tag(WidgetName::BreathingExercise)]).unwrap();
    assert_eq!(
        blocks,
        vec![text("Intro.\n"), widget(WidgetName::BreathingExercise), text("\nOutro.")]
    );
}

#[test]
fn empty_input() {
    assert!(segment("", 40, Tab::Story).is_empty());
    assert!(scan("", &[Marker::KnownTags]).unwrap().is_empty());
}

#[test]
fn unknown_lesson_is_one_text_block() {
    assert_eq!(segment("Just prose.", 999_999, Tab::Story), vec![text("Just prose.")]);
}

#[test]
fn whitespace_only_input_survives_default() {
    let input = "   \n\n   \n";
    assert_eq!(segment(input, 999_999, Tab::Challenge), vec![text(input)]);
}

#[test]
fn no_markers_keeps_everything() {
    let input = "# Title\n\nBody.";
    assert_eq!(scan(input, &[]).unwrap(), vec![text(input)]);
}

// ── Tags ─────────────────────────────────────────────────────────────

#[test]
fn adjacent_tags_have_no_text_between() {
    let input = "<smart-goals></smart-goals><purpose-grid></purpose-grid>";
    let blocks = scan(
        input,
        &[Marker::tag(WidgetName::SmartGoals), Marker::tag(WidgetName::PurposeGrid)],
    )
    .unwrap();
    assert_eq!(blocks, vec![widget(WidgetName::SmartGoals), widget(WidgetName::PurposeGrid)]);
}

#[test]
fn tag_at_start_and_end() {
    let input = "<emotion-wheel></emotion-wheel>Middle<emotion-wheel></emotion-wheel>";
    let blocks = scan(input, &[Marker::tag(WidgetName::EmotionWheel)]).unwrap();
    assert_eq!(
        blocks,
        vec![widget(WidgetName::EmotionWheel), text("Middle"), widget(WidgetName::EmotionWheel)]
    );
}

#[test]
fn unpaired_tag_is_text() {
    let input = "Open <smart-goals> but never closed.";
    let blocks = scan(input, &[Marker::tag(WidgetName::SmartGoals)]).unwrap();
    assert_eq!(blocks, vec![text(input)]);
}

#[test]
fn blank_runs_between_markers_are_dropped() {
    let input = "A\n<five-uses></five-uses>\n\n<steelman-swap></steelman-swap>\nB";
    let blocks = scan(input, &[Marker::KnownTags]).unwrap();
    assert_eq!(
        blocks,
        vec![
            text("A\n"),
            widget(WidgetName::FiveUses),
            widget(WidgetName::SteelmanSwap),
            text("\nB"),
        ]
    );
}

// ── Known tags ───────────────────────────────────────────────────────

#[test]
fn known_tags_accept_self_closing_forms() {
    let input = "a<capstone-setup/>b<capstone-tracker />c";
    let blocks = scan(input, &[Marker::KnownTags]).unwrap();
    assert_eq!(
        blocks,
        vec![
            text("a"),
            widget(WidgetName::CapstoneSetup),
            text("b"),
            widget(WidgetName::CapstoneTracker),
            text("c"),
        ]
    );
}

#[test]
fn unknown_tags_stay_in_text() {
    let input = "Use <strong>bold</strong> and <not-a-widget></not-a-widget>.";
    assert_eq!(scan(input, &[Marker::KnownTags]).unwrap(), vec![text(input)]);
}

// ── Anchors ──────────────────────────────────────────────────────────

#[test]
fn anchor_keeps_its_heading() {
    let input = "Story.\n## 🧰 Your Reframing Toolkit\nTools.";
    let blocks = scan(
        input,
        &[Marker::anchor("## 🧰 Your Reframing Toolkit", [WidgetName::ReframingToolsExplorer])],
    )
    .unwrap();
    assert_eq!(
        blocks,
        vec![
            text("Story.\n"),
            widget(WidgetName::ReframingToolsExplorer),
            text("## 🧰 Your Reframing Toolkit\nTools."),
        ]
    );
}

#[test]
fn anchor_at_offset_zero() {
    let input = "Rate yourself 1-5.\n### Scoring\nAdd it up.";
    let marker = Marker::anchor("Rate yourself", [WidgetName::RatingScale]).skip_until("### Scoring");
    assert_eq!(
        scan(input, &[marker]).unwrap(),
        vec![widget(WidgetName::RatingScale), text("### Scoring\nAdd it up.")]
    );
}

#[test]
fn skip_until_replaces_template() {
    let input = "Intro\n## Drill 1: Spot\nstatic drill\n## Mini Cases:\nCases";
    let marker = Marker::anchor(
        "## Drill 1:",
        [WidgetName::FrameSpotting, WidgetName::AlphabetNumber, WidgetName::FiveUses],
    )
    .skip_until("## Mini Cases:");
    assert_eq!(
        scan(input, &[marker]).unwrap(),
        vec![
            text("Intro\n"),
            widget(WidgetName::FrameSpotting),
            widget(WidgetName::AlphabetNumber),
            widget(WidgetName::FiveUses),
            text("## Mini Cases:\nCases"),
        ]
    );
}

#[test]
fn missing_until_skips_remainder() {
    let input = "Intro\n## Drill 1: only drills here";
    let marker = Marker::anchor("## Drill 1:", [WidgetName::LabelLoosenLadder]).skip_until("## Personal Reflection");
    assert_eq!(
        scan(input, &[marker]).unwrap(),
        vec![text("Intro\n"), widget(WidgetName::LabelLoosenLadder)]
    );
}

#[test]
fn skip_to_end() {
    let input = "Story\n### 🫁 Breathing Tip\nInhale for four.";
    let marker = Marker::anchor("### 🫁 Breathing Tip", [WidgetName::BreathingExercise]).skip_to_end();
    assert_eq!(
        scan(input, &[marker]).unwrap(),
        vec![text("Story\n"), widget(WidgetName::BreathingExercise)]
    );
}

#[test]
fn markers_inside_skip_range_are_ignored() {
    let input = "A\n## Drill 1:\n<five-uses></five-uses>\n## End\nB";
    let markers = [
        Marker::anchor("## Drill 1:", [WidgetName::FrameSpotting]).skip_until("## End"),
        Marker::KnownTags,
    ];
    assert_eq!(
        scan(input, &markers).unwrap(),
        vec![text("A\n"), widget(WidgetName::FrameSpotting), text("## End\nB")]
    );
}

#[test]
fn overlapping_candidates_go_to_first_declared() {
    let input = "x <mini-case-study></mini-case-study> y";
    let markers = [
        Marker::anchor("<mini-case-study>", [WidgetName::EarlyWarningSystem]).skip_to_end(),
        Marker::tag(WidgetName::MiniCaseStudy),
    ];
    assert_eq!(
        scan(input, &markers).unwrap(),
        vec![text("x "), widget(WidgetName::EarlyWarningSystem)]
    );

    let reversed = [markers[1].clone(), markers[0].clone()];
    assert_eq!(
        scan(input, &reversed).unwrap(),
        vec![text("x "), widget(WidgetName::MiniCaseStudy), text(" y")]
    );
}

#[test]
fn overlap_prefers_declaration_over_position() {
    // The later-declared heading starts first but shares its text with the drill label.
    let input = "Warm up.\n## Drill 1: Frames\nbody";
    let markers = [
        Marker::anchor("Drill 1:", [WidgetName::FrameSpotting]).skip_to_end(),
        Marker::anchor("## Drill", [WidgetName::LabelLoosenLadder]).skip_to_end(),
    ];
    assert_eq!(
        scan(input, &markers).unwrap(),
        vec![text("Warm up.\n## "), widget(WidgetName::FrameSpotting)]
    );
}

#[test]
fn disjoint_markers_keep_text_order() {
    let input = "## Setup then Drill 1: go";
    let markers = [
        Marker::anchor("Drill 1:", [WidgetName::FrameSpotting]),
        Marker::anchor("## Setup", [WidgetName::CapstoneSetup]),
    ];
    assert_eq!(
        widgets_in(&scan(input, &markers).unwrap()),
        vec![WidgetName::CapstoneSetup, WidgetName::FrameSpotting]
    );
}

#[test]
fn lesson_params_survive_scanning() {
    let input = "### Reframing Tracker\ntable\n### Reflection Prompts:\nQ";
    let marker = Marker::anchor("### Reframing Tracker", [WidgetName::ProgressTracker])
        .skip_until("### Reflection Prompts:")
        .for_lesson(40);
    let blocks = scan(input, &[marker]).unwrap();
    assert_eq!(
        blocks[0],
        ContentBlock::Widget(WidgetBlock::for_lesson(WidgetName::ProgressTracker, 40))
    );
}

// ── Fallback ─────────────────────────────────────────────────────────

#[test]
fn empty_literal_degrades_to_text() {
    let input = "Nothing lost.";
    assert!(scan(input, &[Marker::anchor("", [WidgetName::FiveUses])]).is_err());
    assert_eq!(
        scan_or_text(input, &[Marker::anchor("", [WidgetName::FiveUses])]),
        vec![text(input)]
    );
}

#[test]
fn text_is_preserved_in_order() {
    let input = "One <values-map></values-map> two <purpose-grid/> three";
    let blocks = scan(input, &[Marker::KnownTags]).unwrap();
    assert_eq!(joined(&blocks), "One  two  three");
    assert_eq!(widgets_in(&blocks), vec![WidgetName::ValuesMap, WidgetName::PurposeGrid]);
}

// ── JSON ─────────────────────────────────────────────────────────────

#[test]
fn blocks_serialize_with_kind_tag() {
    let blocks = segment("Intro.\n<breathing-exercise></breathing-exercise>", 45, Tab::Story);
    let json = serde_json::to_string(&blocks).unwrap();
    assert_eq!(
        json,
        r#"[{"kind":"text","content":"Intro.\n"},{"kind":"widget","name":"breathing-exercise"}]"#
    );
}
