//! lessonmark CLI: segment and render lesson tabs

use std::error::Error;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use lessonmark::fields::blank_fields;
use lessonmark::{Dispatcher, HtmlRenderer, LessonKey, Options, RuleTable, Tab, WidgetName, rules};

#[derive(Parser)]
#[command(name = "lessonmark", version, about = "Split lesson text into prose and widget blocks")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print a lesson tab's blocks as JSON.
    Segment {
        #[command(flatten)]
        lesson: LessonArgs,
        /// Pretty-print the JSON.
        #[arg(long)]
        pretty: bool,
    },
    /// Print a lesson tab as HTML with widget mount points.
    Render {
        #[command(flatten)]
        lesson: LessonArgs,
    },
    /// List the storage keys of a lesson tab's fill-in blanks.
    Fields {
        #[command(flatten)]
        lesson: LessonArgs,
    },
    /// List every known widget name.
    Widgets,
}

#[derive(Args)]
struct LessonArgs {
    /// Lesson id.
    #[arg(long)]
    lesson: u32,
    /// Tab: story, reflection or challenge.
    #[arg(long)]
    tab: Tab,
    /// Lesson text file, or `-` for stdin.
    #[arg(default_value = "-")]
    file: PathBuf,
    /// Extra rule table (TOML), layered over the built-in rules.
    #[arg(long)]
    rules: Option<PathBuf>,
    /// Skip rules shared by lesson ranges.
    #[arg(long)]
    no_range_rules: bool,
    /// Skip rules chosen by text content.
    #[arg(long)]
    no_shape_rules: bool,
}

impl LessonArgs {
    fn key(&self) -> LessonKey {
        LessonKey::new(self.lesson, self.tab)
    }

    fn read_text(&self) -> io::Result<String> {
        if self.file == Path::new("-") {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        } else {
            std::fs::read_to_string(&self.file)
        }
    }

    fn dispatcher(&self) -> Result<Dispatcher, Box<dyn Error>> {
        let table = match &self.rules {
            Some(path) => {
                let source = std::fs::read_to_string(path)?;
                let extra = RuleTable::from_toml_str(&source).map_err(|err| format!("{}: {err}", path.display()))?;
                tracing::debug!(path = %path.display(), "loaded rule table");
                extra.layered_over(rules::builtin_table())
            }
            None => rules::builtin_table(),
        };
        let options = Options {
            range_rules: !self.no_range_rules,
            shape_rules: !self.no_shape_rules,
        };
        Ok(Dispatcher::new(table, options))
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("lessonmark=warn")),
        )
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("lessonmark: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let mut stdout = io::stdout().lock();

    match cli.command {
        Command::Segment { lesson, pretty } => {
            let text = lesson.read_text()?;
            let dispatch = lesson.dispatcher()?.dispatch(lesson.key(), &text);
            tracing::debug!(key = %lesson.key(), layer = ?dispatch.layer, "segmented");
            if pretty {
                serde_json::to_writer_pretty(&mut stdout, &dispatch.blocks)?;
            } else {
                serde_json::to_writer(&mut stdout, &dispatch.blocks)?;
            }
            writeln!(stdout)?;
        }
        Command::Render { lesson } => {
            let text = lesson.read_text()?;
            let blocks = lesson.dispatcher()?.segment(lesson.lesson, lesson.tab, &text);
            stdout.write_all(HtmlRenderer::default().render(&blocks).as_bytes())?;
        }
        Command::Fields { lesson } => {
            let text = lesson.read_text()?;
            for field in blank_fields(&text, lesson.key()) {
                writeln!(stdout, "{field}")?;
            }
        }
        Command::Widgets => {
            for widget in WidgetName::ALL {
                writeln!(stdout, "{widget}")?;
            }
        }
    }

    Ok(())
}
