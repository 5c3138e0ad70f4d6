//! Closed set of interactive widget identifiers.
//!
//! Widgets are referenced from lesson text by their kebab-case wire name
//! (`<breathing-exercise></breathing-exercise>`) and handed to the renderer
//! as a [`WidgetName`]. The segmenter never mounts widgets itself.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::UnknownWidget;

macro_rules! widget_names {
    ($($variant:ident => $wire:literal,)+) => {
        /// A known interactive widget.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum WidgetName {
            $($variant,)+
        }

        impl WidgetName {
            /// Every known widget, in declaration order.
            pub const ALL: &'static [WidgetName] = &[$(WidgetName::$variant,)+];

            /// The kebab-case wire name (`"eq-assessment"`).
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(WidgetName::$variant => $wire,)+
                }
            }

            /// Look up a widget by its wire name.
            pub fn from_wire(name: &str) -> Option<WidgetName> {
                match name {
                    $($wire => Some(WidgetName::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

widget_names! {
    // Assessments
    EqAssessment => "eq-assessment",
    BaselineAssessment => "baseline-assessment",
    RatingScale => "rating-scale",
    FlexibilityInventory => "flexibility-inventory",
    InteractiveQuiz => "interactive-quiz",
    EiCompass => "ei-compass",

    // Regulation and timers
    BreathingExercise => "breathing-exercise",
    GroundingExercise => "grounding-exercise",
    InteroceptionScanner => "interoception-scanner",
    RegulationResetTimer => "regulation-reset-timer",
    RegulationSimulator => "regulation-simulator",
    RegulationIntegrationCheck => "regulation-integration-check",
    RegulationExitReflection => "regulation-exit-reflection",
    StateSwitchTracker => "state-switch-tracker",
    ReframingSprintTimer => "reframing-sprint-timer",

    // Emotions and awareness
    EmotionWheel => "emotion-wheel",
    EmotionGranularity => "emotion-granularity",
    TriggerMap => "trigger-map",
    SelfAwarenessChallenge => "self-awareness-challenge",
    EarlyWarningSystem => "early-warning-system",
    RedLineChallenge => "red-line-challenge",
    RedLineReflection => "red-line-reflection",

    // Cognitive flexibility drills
    FrameSpotting => "frame-spotting",
    AlphabetNumber => "alphabet-number",
    FiveUses => "five-uses",
    LabelLoosenLadder => "label-loosen-ladder",
    SteelmanSwap => "steelman-swap",
    BiasInterrupter => "bias-interrupter",
    ThreeHatsDrill => "three-hats-drill",
    NoOptionPractice => "no-option-practice",
    FlexibilitySprint => "flexibility-sprint",
    DecisionTriage => "decision-triage",
    ReappraisalBuilder => "reappraisal-builder",
    StoryRewriter => "story-rewriter",
    MiniCaseStudy => "mini-case-study",

    // Reframing toolkit
    ReframingToolsExplorer => "reframing-tools-explorer",
    ReframingSprintWorksheet => "reframing-sprint-worksheet",
    PersonalReframeWorksheet => "personal-reframe-worksheet",
    OptionsLadderBuilder => "options-ladder-builder",

    // Empathy
    EmpathyCaseSimulator => "empathy-case-simulator",
    EmpathyProtocolBuilder => "empathy-protocol-builder",
    EmpathyTracker => "empathy-tracker",
    AsyncEmpathyDrill => "async-empathy-drill",
    AsyncTemplates => "async-templates",
    LrlDrill => "lrl-drill",
    EarPractice => "ear-practice",
    EarScriptBuilder => "ear-script-builder",

    // Communication and conflict
    ConflictSimulator => "conflict-simulator",
    ClearRepairWorkshop => "clear-repair-workshop",
    SbiRewriter => "sbi-rewriter",
    RequestBuilder => "request-builder",
    ProtocolCardBuilder => "protocol-card-builder",
    CommunicationOverview => "communication-overview",
    CommunicationStoryCards => "communication-story-cards",
    CommunicationCaseSimulator => "communication-case-simulator",
    CommunicationProtocolBuilder => "communication-protocol-builder",
    CommunicationTracker => "communication-tracker",
    CommunicationCommitment => "communication-commitment",
    CommunicationExitCommitment => "communication-exit-commitment",

    // Purpose, goals, planning
    SmartGoals => "smart-goals",
    PurposeGrid => "purpose-grid",
    ValuesMap => "values-map",
    IfThenPlanner => "if-then-planner",
    IntegrationTools => "integration-tools",
    IntegrationReflection => "integration-reflection",

    // Challenges and progress
    ProgressTracker => "progress-tracker",
    ChallengeStory => "challenge-story",
    ChallengeTracker => "challenge-tracker",
    ChallengeReflection => "challenge-reflection",
    ReflectionEditor => "reflection-editor",

    // Capstone
    CapstoneOverview => "capstone-overview",
    CapstoneSetup => "capstone-setup",
    CapstoneCheckins => "capstone-checkins",
    CapstonePatterns => "capstone-patterns",
    CapstoneIterations => "capstone-iterations",
    CapstoneInsights => "capstone-insights",
    CapstoneTracker => "capstone-tracker",
    CapstoneProgress => "capstone-progress",
    CapstoneSubmission => "capstone-submission",
}

impl fmt::Display for WidgetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WidgetName {
    type Err = UnknownWidget;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WidgetName::from_wire(s).ok_or_else(|| UnknownWidget(s.to_owned()))
    }
}

impl Serialize for WidgetName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for WidgetName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}
