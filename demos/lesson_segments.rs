/// Lesson segmenter: split a lesson tab into prose and widget blocks.
///
/// Run with: `cargo run --example lesson_segments`

use lessonmark::fields::blank_fields;
use lessonmark::{ContentBlock, Dispatcher, LessonKey, Tab, widgets_in};

fn main() {
    let input = r#"# Tools for Reframing

Pick one situation from this week.

### Reframing Tracker

| Day | Old frame | New frame |
|-----|-----------|-----------|
| Mon |           |           |

### Reflection Prompts:

1. The frame I reach for first is _____.
2. Next time I will try _____ instead.
"#;

    let key = LessonKey::new(40, Tab::Challenge);
    let dispatch = Dispatcher::builtin().dispatch(key, input);

    println!("=== {key} via {:?} rule ===\n", dispatch.layer);

    for (i, block) in dispatch.blocks.iter().enumerate() {
        match block {
            ContentBlock::Text { content } => {
                let html = lessonmark::HtmlRenderer::default().render(std::slice::from_ref(block));
                println!("[{i}] Text");
                println!("    input:  {}", content.trim().replace('\n', "\\n"));
                println!("    html:   {}", html.trim().replace('\n', "\\n"));
            }
            ContentBlock::Widget(widget) => {
                println!("[{i}] Widget {}", widget.name);
                if let Some(lesson_id) = widget.params.lesson_id {
                    println!("    lessonId: {lesson_id}");
                }
            }
        }
    }

    let widgets = widgets_in(&dispatch.blocks);
    println!("\n=== {} interactive exercise(s) ===", widgets.len());
    for widget in widgets {
        println!("    {widget}");
    }

    println!("\n=== Fill-in fields ===");
    for field in blank_fields(input, key) {
        println!("    {field} at {}..{}", field.span.start, field.span.end);
    }
}
